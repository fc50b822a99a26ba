//! Shadow and fade color transforms
//!
//! Shadowing darkens every channel by a quarter of full scale. Fading
//! compresses the color range into `[black_map, white_map]`. With both
//! enabled the shadow is applied first. Alpha is never touched.

use crate::color::Rgb;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Amount a shadowed channel is darkened by
pub const SHADOW_STEP: u8 = 0x40;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ShadowMode: u8 {
        const SHADOW = 0x1;
        const FADE = 0x2;
        const SHADOW_FADE = Self::SHADOW.bits() | Self::FADE.bits();
    }
}

/// Endpoints of the faded color range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FadeParams {
    pub black_map: u8,
    pub white_map: u8,
}

impl Default for FadeParams {
    fn default() -> Self {
        Self {
            black_map: 128,
            white_map: 255,
        }
    }
}

impl FadeParams {
    pub fn new(black_map: u8, white_map: u8) -> Self {
        Self {
            black_map,
            white_map,
        }
    }

    /// `black + c * (white - black + 1) / 256`, clamped to a byte
    #[inline]
    pub fn fade_channel(&self, c: u8) -> u8 {
        let black = self.black_map as i32;
        let range = self.white_map as i32 - black + 1;
        (black + c as i32 * range / 256).clamp(0, 255) as u8
    }
}

#[inline]
pub fn shadow_channel(c: u8) -> u8 {
    c.saturating_sub(SHADOW_STEP)
}

/// Current shadow/fade state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShadowFade {
    pub mode: ShadowMode,
    pub fade: FadeParams,
}

impl ShadowFade {
    pub fn is_active(&self) -> bool {
        !self.mode.is_empty()
    }

    pub fn apply(&self, c: Rgb) -> Rgb {
        let mut out = c;
        if self.mode.contains(ShadowMode::SHADOW) {
            out = out.map_channels(shadow_channel);
        }
        if self.mode.contains(ShadowMode::FADE) {
            out = out.map_channels(|v| self.fade.fade_channel(v));
        }
        out
    }

    pub fn apply_run(&self, colors: &mut [Rgb]) {
        if !self.is_active() {
            return;
        }
        for c in colors {
            *c = self.apply(*c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(mode: ShadowMode) -> ShadowFade {
        ShadowFade {
            mode,
            fade: FadeParams::default(),
        }
    }

    #[test]
    fn test_none_is_identity() {
        let c = Rgb::with_alpha(1, 2, 3, 4);
        assert_eq!(with(ShadowMode::empty()).apply(c), c);
    }

    #[test]
    fn test_shadow_darkens_and_saturates() {
        let out = with(ShadowMode::SHADOW).apply(Rgb::new(0xff, 0x50, 0x10));
        assert_eq!(out, Rgb::new(0xbf, 0x10, 0x00));
    }

    #[test]
    fn test_default_fade_endpoints() {
        let s = with(ShadowMode::FADE);
        assert_eq!(s.apply(Rgb::BLACK), Rgb::from_gray256(128));
        assert_eq!(s.apply(Rgb::WHITE), Rgb::WHITE);
    }

    #[test]
    fn test_fade_preserves_alpha() {
        let out = with(ShadowMode::FADE).apply(Rgb::with_alpha(0, 0, 0, 7));
        assert_eq!(out.alpha(), 7);
    }

    #[test]
    fn test_shadow_runs_before_fade() {
        // 0x40 shadows to 0, which fades to the black endpoint
        let out = with(ShadowMode::SHADOW_FADE).apply(Rgb::from_gray256(0x40));
        assert_eq!(out, Rgb::from_gray256(128));
    }

    #[test]
    fn test_custom_fade_range() {
        let f = FadeParams::new(0, 127);
        assert_eq!(f.fade_channel(255), 127);
        assert_eq!(f.fade_channel(0), 0);
    }
}
