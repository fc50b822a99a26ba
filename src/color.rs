//! Canonical color value
//!
//! Every pixel format converts to and from [`Rgb`], so comparisons and
//! blending never depend on how a pixel is packed in memory.

use serde::{Deserialize, Serialize};

/// 32-bit color stored as `0xAARRGGBB`, alpha not premultiplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const TRANSPARENT: Rgb = Rgb::with_alpha(0, 0, 0, 0);

    /// Opaque color
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::with_alpha(r, g, b, 255)
    }

    #[inline]
    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub const fn from_argb(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// The 24 color bits, alpha dropped
    #[inline]
    pub const fn rgb(self) -> u32 {
        self.0 & 0x00ff_ffff
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Same color with a replaced alpha channel
    #[inline]
    pub const fn set_alpha(self, a: u8) -> Self {
        Self((a as u32) << 24 | self.rgb())
    }

    #[inline]
    pub const fn opaque(self) -> Self {
        self.set_alpha(255)
    }

    /// Luminance on a 0-255 scale: (2r + 5g + b) / 8
    #[inline]
    pub const fn gray256(self) -> u8 {
        ((2 * self.red() as u32 + 5 * self.green() as u32 + self.blue() as u32) / 8) as u8
    }

    #[inline]
    pub const fn from_gray256(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Apply `f` to each of red, green and blue, keeping alpha
    #[inline]
    pub fn map_channels(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::with_alpha(
            f(self.red()),
            f(self.green()),
            f(self.blue()),
            self.alpha(),
        )
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_layout() {
        let c = Rgb::with_alpha(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.argb(), 0x7812_3456);
        assert_eq!(c.red(), 0x12);
        assert_eq!(c.green(), 0x34);
        assert_eq!(c.blue(), 0x56);
        assert_eq!(c.alpha(), 0x78);
        assert_eq!(c.rgb(), 0x0012_3456);
    }

    #[test]
    fn test_gray_of_gray_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(Rgb::from_gray256(v).gray256(), v);
        }
    }

    #[test]
    fn test_gray_weights_green_most() {
        assert!(Rgb::GREEN.gray256() > Rgb::RED.gray256());
        assert!(Rgb::RED.gray256() > Rgb::BLUE.gray256());
    }

    #[test]
    fn test_map_channels_keeps_alpha() {
        let c = Rgb::with_alpha(10, 20, 30, 40).map_channels(|v| v * 2);
        assert_eq!(c, Rgb::with_alpha(20, 40, 60, 40));
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Rgb::RED).unwrap();
        assert_eq!(json, format!("{}", 0xffff_0000u32));
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb::RED);
    }
}
