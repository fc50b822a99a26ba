//! The draw device: a pixel buffer seen through one logical coordinate space
//!
//! A [`DrawDevice`] is either an off-screen bitmap (owned memory or caller
//! bits) or a screen device that presents to a [`ScreenSink`]. State setters
//! live here; pixel operations are in `ops`.

pub mod interface;
mod ops;
mod surface;

pub use interface::{
    DrawDeviceOrigin, Interface, ScalingSettings, DRAW_DEVICE_ORIGIN_INTERFACE_ID,
    SCALING_SETTINGS_INTERFACE_ID,
};

use crate::codec::{self, PixelCodec};
use crate::config::DeviceConfig;
use crate::error::{violation, ContractViolation, DrawError};
use crate::format::DisplayMode;
use crate::geometry::{Point, Rect, Size};
use crate::mapper::{Orientation, Scaling, Transform};
use crate::palette::Palette;
use crate::screen::{Frame, ScreenSink, ScreenState};
use crate::shadow::{FadeParams, ShadowFade, ShadowMode};
use bitflags::bitflags;
use surface::Surface;

bitflags! {
    /// Optional features a device implements
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u32 {
        const PALETTE = 1 << 0;
        const DITHER = 1 << 1;
        const SHADOW_FADE = 1 << 2;
        const SCREEN_UPDATE = 1 << 3;
        const SCALING = 1 << 4;
        const ORIENTATION = 1 << 5;
    }
}

/// Codec of a device whose palette invariant holds
pub(crate) fn codec_for(mode: DisplayMode, palette: Option<&Palette>) -> PixelCodec<'_> {
    match PixelCodec::new(mode, palette) {
        Ok(codec) => codec,
        Err(_) => violation(ContractViolation::InvalidDisplayMode),
    }
}

fn frame<'s>(surface: &'s Surface<'_>, palette: Option<&'s Palette>) -> Frame<'s> {
    Frame {
        bytes: surface.bytes(),
        size: surface.size(),
        stride: surface.stride(),
        mode: surface.mode(),
        palette,
    }
}

enum DeviceKind<'a> {
    Bitmap,
    Screen(ScreenState<'a>),
}

pub struct DrawDevice<'a> {
    surface: Surface<'a>,
    kind: DeviceKind<'a>,
    orientation: Orientation,
    orientations: [bool; 4],
    scaling: Scaling,
    dither_origin: Point,
    user_mode: Option<DisplayMode>,
    /// Lookup table for a palettized user mode
    user_palette: Option<Palette>,
    shadow: ShadowFade,
    /// Always present for palettized modes
    palette: Option<Palette>,
    scan_line: Vec<u8>,
}

impl<'a> DrawDevice<'a> {
    fn build(surface: Surface<'a>, kind: DeviceKind<'a>, orientations: [bool; 4]) -> Result<Self, DrawError> {
        let size = surface.size();
        let longest = size.width.max(size.height);
        let scan_line = surface::try_alloc(DisplayMode::Color16MA.scan_line_bytes(longest))?;
        let mode = surface.mode();
        log::debug!(
            "{} device {}x{} {:?}, stride {}",
            if matches!(kind, DeviceKind::Screen(_)) { "screen" } else { "bitmap" },
            size.width,
            size.height,
            mode,
            surface.stride()
        );
        Ok(Self {
            surface,
            kind,
            orientation: Orientation::Normal,
            orientations,
            scaling: Scaling::default(),
            dither_origin: Point::ORIGIN,
            user_mode: None,
            user_palette: None,
            shadow: ShadowFade::default(),
            palette: Palette::default_for(mode),
            scan_line,
        })
    }

    /// Off-screen bitmap with owned, zeroed memory
    pub fn new_bitmap(size: Size, mode: DisplayMode) -> Result<Self, DrawError> {
        Self::new_bitmap_with_stride(size, mode, None)
    }

    /// Bitmap with an explicit stride in bytes
    pub fn new_bitmap_with_stride(size: Size, mode: DisplayMode, stride: Option<usize>) -> Result<Self, DrawError> {
        let surface = Surface::allocate(size, mode, stride)?;
        Self::build(surface, DeviceKind::Bitmap, [true; 4])
    }

    /// Bitmap drawing into caller memory; the device never frees it
    pub fn with_bits(size: Size, mode: DisplayMode, stride: Option<usize>, bits: &'a mut [u8]) -> Result<Self, DrawError> {
        let surface = Surface::external(size, mode, stride, bits)?;
        Self::build(surface, DeviceKind::Bitmap, [true; 4])
    }

    /// Screen device presenting to `sink`
    pub fn new_screen(sink: Box<dyn ScreenSink + 'a>, mode: DisplayMode) -> Result<Self, DrawError> {
        let state = ScreenState::new(sink);
        if !state.info.supports(mode) {
            log::warn!("screen does not support {:?}", mode);
            return Err(DrawError::NotSupported);
        }
        let surface = Surface::allocate(state.info.size, mode, None)?;
        let orientations = state.info.orientations;
        Self::build(surface, DeviceKind::Screen(state), orientations)
    }

    pub(crate) fn transform(&self) -> Transform {
        Transform::new(self.surface.size(), self.orientation, self.scaling)
    }

    pub fn is_screen(&self) -> bool {
        matches!(self.kind, DeviceKind::Screen(_))
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.surface.mode()
    }

    /// Pixels that fit in one physical scan line, padding included
    pub fn long_width(&self) -> i32 {
        self.surface.mode().pixels_per_stride(self.surface.stride())
    }

    pub fn scan_line_bytes(&self) -> usize {
        self.surface.stride()
    }

    pub fn scan_line_words(&self) -> usize {
        self.surface.stride() / crate::format::WORD_BYTES
    }

    /// Format of the buffer returned by [`DrawDevice::scan_line_buffer`]
    pub fn scan_line_display_mode(&self) -> DisplayMode {
        self.surface.mode()
    }

    /// Buffer size in the current orientation
    pub fn size_in_pixels(&self) -> Size {
        self.transform().oriented_size()
    }

    pub fn get_draw_rect(&self) -> Rect {
        self.transform().draw_rect()
    }

    /// Physical width of a thousand logical pixels in twips; 0 for bitmaps
    pub fn horz_twips_per_thousand_pixels(&self) -> i32 {
        match &self.kind {
            DeviceKind::Bitmap => 0,
            DeviceKind::Screen(s) if self.orientation.swaps_axes() => s.info.twips_per_thousand_y,
            DeviceKind::Screen(s) => s.info.twips_per_thousand_x,
        }
    }

    pub fn vert_twips_per_thousand_pixels(&self) -> i32 {
        match &self.kind {
            DeviceKind::Bitmap => 0,
            DeviceKind::Screen(s) if self.orientation.swaps_axes() => s.info.twips_per_thousand_x,
            DeviceKind::Screen(s) => s.info.twips_per_thousand_y,
        }
    }

    /// Which orientations [`DrawDevice::set_orientation`] accepts, by index
    pub fn orientations_available(&self) -> [bool; 4] {
        self.orientations
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn capabilities(&self) -> Capabilities {
        let mode = self.surface.mode();
        let mut caps = Capabilities::SHADOW_FADE | Capabilities::SCALING;
        caps.set(Capabilities::PALETTE, mode.is_palettized());
        caps.set(
            Capabilities::DITHER,
            matches!(mode, DisplayMode::Gray2 | DisplayMode::Gray4),
        );
        caps.set(Capabilities::SCREEN_UPDATE, self.is_screen());
        caps.set(
            Capabilities::ORIENTATION,
            self.orientations.iter().filter(|&&o| o).count() > 1,
        );
        caps
    }

    /// True-color mode this device can take, `None` if there is none
    pub fn display_mode_16m(&self) -> Option<DisplayMode> {
        match &self.kind {
            DeviceKind::Screen(s) => s.info.display_mode_16m(),
            DeviceKind::Bitmap => crate::format::display_mode_16m(&[self.surface.mode()]),
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if !self.orientations[orientation.index()] {
            log::warn!("orientation {:?} not available", orientation);
            return false;
        }
        if orientation != self.orientation {
            log::debug!("orientation {:?} -> {:?}", self.orientation, orientation);
            self.orientation = orientation;
        }
        true
    }

    /// Draw into new caller memory of at least the current layout's size
    pub fn set_bits(&mut self, bits: &'a mut [u8]) {
        if self.is_screen() {
            violation(ContractViolation::InvalidMethodCall);
        }
        if bits.len() < self.surface.byte_len() {
            violation(ContractViolation::InvalidSize);
        }
        self.surface.rebind(bits);
    }

    /// Replace the palette, or restore the default with `None`
    pub fn set_custom_palette(&mut self, palette: Option<&Palette>) -> Result<(), DrawError> {
        let mode = self.surface.mode();
        let Some(max) = mode.palette_size() else {
            return Err(DrawError::NotSupported);
        };
        let palette = match palette {
            Some(p) if p.len() > max => {
                return Err(DrawError::BadArgument(format!(
                    "{} entries for a {}-color mode",
                    p.len(),
                    max
                )))
            },
            Some(p) => p.clone(),
            None => match Palette::default_for(mode) {
                Some(p) => p,
                None => return Err(DrawError::NotSupported),
            },
        };
        log::debug!("palette set, {} entries", palette.len());
        self.palette = Some(palette);
        self.touched_physical(Rect::from_size(self.surface.size()));
        Ok(())
    }

    pub fn get_custom_palette(&self) -> Result<Palette, DrawError> {
        self.palette.clone().ok_or(DrawError::NotSupported)
    }

    /// Take over the settings and pixels of a device of the same physical size
    pub fn set_display_mode(&mut self, other: &DrawDevice<'_>) -> Result<(), DrawError> {
        if other.surface.size() != self.surface.size() {
            violation(ContractViolation::IncompatiblePreviousDevice);
        }
        let from = PixelCodec::new(other.surface.mode(), other.palette.as_ref())?;
        let mode = self.surface.mode();
        let to = codec_for(mode, self.palette.as_ref());
        let size = self.surface.size();
        for y in 0..size.height {
            codec::convert_run(
                other.surface.row(y),
                &from,
                self.surface.row_mut(y),
                &to,
                size.width as usize,
            );
        }

        if self.orientations[other.orientation.index()] {
            self.orientation = other.orientation;
        }
        self.scaling = other.scaling;
        self.dither_origin = other.dither_origin;
        self.user_mode = other.user_mode;
        self.user_palette = other.user_palette.clone();
        self.shadow = other.shadow;
        log::debug!("took over {:?} device as {:?}", other.surface.mode(), mode);
        self.touched_physical(Rect::from_size(size));
        Ok(())
    }

    pub fn set_dither_origin(&mut self, origin: Point) {
        self.dither_origin = origin;
    }

    pub fn dither_origin(&self) -> Point {
        self.dither_origin
    }

    /// Quantize solid colors through `mode` before writing; `None` disables
    pub fn set_user_display_mode(&mut self, mode: Option<DisplayMode>) {
        self.user_mode = mode;
        self.user_palette = mode.and_then(Palette::default_for);
    }

    pub fn user_display_mode(&self) -> Option<DisplayMode> {
        self.user_mode
    }

    pub fn set_shadow_mode(&mut self, mode: ShadowMode) {
        if mode != self.shadow.mode {
            log::debug!("shadow mode {:?}", mode);
        }
        self.shadow.mode = mode;
    }

    pub fn shadow_mode(&self) -> ShadowMode {
        self.shadow.mode
    }

    pub fn set_fading_parameters(&mut self, black_map: u8, white_map: u8) {
        self.shadow.fade = FadeParams::new(black_map, white_map);
    }

    pub fn fading_parameters(&self) -> FadeParams {
        self.shadow.fade
    }

    /// Reinterpret the bitmap as height x width
    ///
    /// Scaling, origin and dither origin return to their defaults. Fails
    /// without side effects when the memory cannot hold the new layout.
    pub fn swap_width_and_height(&mut self) -> Result<(), DrawError> {
        if self.is_screen() {
            violation(ContractViolation::InvalidMethodCall);
        }
        let size = self.surface.size().swapped();
        let stride = self.surface.mode().scan_line_bytes(size.width);
        let needed = stride * size.height as usize;
        if needed > self.surface.capacity() {
            if self.surface.is_external() {
                return Err(DrawError::BadArgument(format!(
                    "caller buffer too small for {}x{}",
                    size.width, size.height
                )));
            }
            let mut bits = surface::try_alloc(needed)?;
            let old = self.surface.bytes();
            let keep = old.len().min(needed);
            bits[..keep].copy_from_slice(&old[..keep]);
            self.surface.replace(bits, size, stride);
        } else {
            self.surface.relayout(size, stride);
        }
        self.scaling = Scaling::default();
        self.dither_origin = Point::ORIGIN;
        log::debug!("swapped to {}x{}, stride {}", size.width, size.height, stride);
        Ok(())
    }

    /// Initialise the display and show the whole buffer; no-op for bitmaps
    pub fn init_screen(&mut self) -> Result<(), DrawError> {
        let DeviceKind::Screen(state) = &mut self.kind else {
            return Ok(());
        };
        state.sink.init()?;
        let frame = frame(&self.surface, self.palette.as_ref());
        let all = Rect::from_size(frame.size);
        state.flush(&frame, all)
    }

    /// Present every write immediately; no-op for bitmaps
    pub fn set_auto_update(&mut self, auto_update: bool) {
        if let DeviceKind::Screen(state) = &mut self.kind {
            state.auto_update = auto_update;
        }
    }

    /// Present everything written since the last update
    pub fn update(&mut self) -> Result<(), DrawError> {
        self.flush(Rect::default())
    }

    /// Present the given logical rectangles as well as pending writes
    pub fn update_with(&mut self, region: &[Rect]) -> Result<(), DrawError> {
        let t = self.transform();
        let extra = region
            .iter()
            .fold(Rect::default(), |acc, r| acc.bounding(&t.logical_rect_to_physical(*r)));
        self.flush(extra)
    }

    pub fn update_region(&mut self, rect: Rect) -> Result<(), DrawError> {
        self.update_with(&[rect])
    }

    fn flush(&mut self, extra: Rect) -> Result<(), DrawError> {
        let DeviceKind::Screen(state) = &mut self.kind else {
            return Ok(());
        };
        let frame = frame(&self.surface, self.palette.as_ref());
        state.flush(&frame, extra)
    }

    /// Record a physical area as changed and present it under auto-update
    pub(crate) fn touched_physical(&mut self, area: Rect) {
        let DeviceKind::Screen(state) = &mut self.kind else {
            return;
        };
        state.touch(area);
        if state.auto_update {
            let frame = frame(&self.surface, self.palette.as_ref());
            if let Err(e) = state.flush(&frame, Rect::default()) {
                log::warn!("auto update failed: {}", e);
            }
        }
    }

    pub(crate) fn touched(&mut self, logical: Rect) {
        if self.is_screen() {
            let area = self.transform().logical_rect_to_physical(logical);
            self.touched_physical(area);
        }
    }

    /// Snapshot of the caller-settable state
    pub fn config(&self) -> DeviceConfig {
        DeviceConfig {
            orientation: self.orientation,
            scaling: self.scaling,
            dither_origin: self.dither_origin,
            user_display_mode: self.user_mode,
            shadow: self.shadow,
        }
    }

    /// Apply all settings or none
    pub fn apply_config(&mut self, cfg: &DeviceConfig) -> Result<(), DrawError> {
        if !self.orientations[cfg.orientation.index()] {
            return Err(DrawError::NotSupported);
        }
        let s = cfg.scaling;
        Scaling::new(s.origin, s.factor_x, s.factor_y)?;
        self.orientation = cfg.orientation;
        self.scaling = s;
        self.dither_origin = cfg.dither_origin;
        self.set_user_display_mode(cfg.user_display_mode);
        self.shadow = cfg.shadow;
        log::debug!("applied {:?}", cfg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::draw_mode::DrawMode;
    use crate::screen::{MemoryScreen, ScreenInfo};
    use test_log::test;

    #[test]
    fn test_bitmap_queries() {
        let dev = DrawDevice::new_bitmap(Size::new(5, 3), DisplayMode::Color64K).unwrap();
        assert_eq!(dev.display_mode(), DisplayMode::Color64K);
        assert_eq!(dev.scan_line_bytes(), 12);
        assert_eq!(dev.scan_line_words(), 3);
        assert_eq!(dev.long_width(), 6);
        assert_eq!(dev.size_in_pixels(), Size::new(5, 3));
        assert_eq!(dev.get_draw_rect(), Rect::from_xywh(0, 0, 5, 3));
        assert_eq!(dev.horz_twips_per_thousand_pixels(), 0);
        assert!(!dev.capabilities().contains(Capabilities::SCREEN_UPDATE));
        assert!(dev.capabilities().contains(Capabilities::ORIENTATION));
    }

    #[test]
    fn test_bad_construction() {
        assert!(matches!(
            DrawDevice::new_bitmap(Size::new(0, 3), DisplayMode::Gray2),
            Err(DrawError::BadArgument(_))
        ));
        assert!(matches!(
            DrawDevice::new_bitmap_with_stride(Size::new(4, 1), DisplayMode::Color16MU, Some(12)),
            Err(DrawError::BadArgument(_))
        ));
    }

    #[test]
    fn test_orientation_swaps_size() {
        let mut dev = DrawDevice::new_bitmap(Size::new(5, 3), DisplayMode::Gray256).unwrap();
        assert!(dev.set_orientation(Orientation::Rotated90));
        assert_eq!(dev.size_in_pixels(), Size::new(3, 5));
        assert_eq!(dev.get_draw_rect(), Rect::from_xywh(0, 0, 3, 5));
        assert!(dev.set_orientation(Orientation::Normal));
        assert_eq!(dev.size_in_pixels(), Size::new(5, 3));
    }

    #[test]
    fn test_unavailable_orientation_is_refused() {
        let info = ScreenInfo::new(Size::new(4, 4), vec![DisplayMode::Color16MU])
            .with_orientations([true, false, true, false]);
        let mut dev = DrawDevice::new_screen(Box::new(MemoryScreen::new(info)), DisplayMode::Color16MU).unwrap();
        assert!(!dev.set_orientation(Orientation::Rotated90));
        assert_eq!(dev.orientation(), Orientation::Normal);
        assert!(dev.set_orientation(Orientation::Rotated180));
    }

    #[test]
    fn test_screen_rejects_unsupported_mode() {
        let info = ScreenInfo::new(Size::new(4, 4), vec![DisplayMode::Color64K]);
        let res = DrawDevice::new_screen(Box::new(MemoryScreen::new(info)), DisplayMode::Gray2);
        assert!(matches!(res, Err(DrawError::NotSupported)));
    }

    #[test]
    fn test_screen_twips_follow_orientation() {
        let info = ScreenInfo::new(Size::new(4, 2), vec![DisplayMode::Color64K]).with_twips(100, 200);
        let mut dev = DrawDevice::new_screen(Box::new(MemoryScreen::new(info)), DisplayMode::Color64K).unwrap();
        assert_eq!(dev.horz_twips_per_thousand_pixels(), 100);
        dev.set_orientation(Orientation::Rotated270);
        assert_eq!(dev.horz_twips_per_thousand_pixels(), 200);
        assert_eq!(dev.vert_twips_per_thousand_pixels(), 100);
    }

    #[test]
    fn test_palette_only_for_indexed_modes() {
        let mut dev = DrawDevice::new_bitmap(Size::new(2, 2), DisplayMode::Color64K).unwrap();
        assert_eq!(dev.set_custom_palette(None), Err(DrawError::NotSupported));
        assert_eq!(dev.get_custom_palette(), Err(DrawError::NotSupported));

        let mut dev = DrawDevice::new_bitmap(Size::new(2, 2), DisplayMode::Color16).unwrap();
        assert_eq!(dev.get_custom_palette(), Ok(Palette::standard_16()));
        let custom = Palette::new(vec![Rgb::BLACK, Rgb::new(1, 2, 3)]).unwrap();
        dev.set_custom_palette(Some(&custom)).unwrap();
        assert_eq!(dev.get_custom_palette(), Ok(custom));
        assert!(dev.set_custom_palette(Some(&Palette::standard_256())).is_err());
        dev.set_custom_palette(None).unwrap();
        assert_eq!(dev.get_custom_palette(), Ok(Palette::standard_16()));
    }

    #[test]
    fn test_set_display_mode_converts_pixels() {
        let mut old = DrawDevice::new_bitmap(Size::new(3, 2), DisplayMode::Color16MU).unwrap();
        old.write_rgb(1, 1, Rgb::RED, DrawMode::PEN);
        old.set_shadow_mode(ShadowMode::FADE);
        old.set_dither_origin(Point::new(1, 1));

        let mut new = DrawDevice::new_bitmap(Size::new(3, 2), DisplayMode::Color64K).unwrap();
        new.set_display_mode(&old).unwrap();
        assert_eq!(new.read_pixel(1, 1), Rgb::RED);
        assert_eq!(new.read_pixel(0, 0), Rgb::BLACK);
        assert_eq!(new.shadow_mode(), ShadowMode::FADE);
        assert_eq!(new.dither_origin(), Point::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "incompatible previous device")]
    fn test_set_display_mode_size_mismatch() {
        let old = DrawDevice::new_bitmap(Size::new(3, 2), DisplayMode::Color16MU).unwrap();
        let mut new = DrawDevice::new_bitmap(Size::new(2, 3), DisplayMode::Color16MU).unwrap();
        let _ = new.set_display_mode(&old);
    }

    #[test]
    fn test_swap_width_and_height_resets_scaling() {
        let mut dev = DrawDevice::new_bitmap(Size::new(6, 2), DisplayMode::Gray256).unwrap();
        dev.apply_config(&DeviceConfig {
            scaling: Scaling::new(Point::new(1, 0), 2, 1).unwrap(),
            dither_origin: Point::new(1, 1),
            ..DeviceConfig::default()
        })
        .unwrap();
        dev.swap_width_and_height().unwrap();
        assert_eq!(dev.size_in_pixels(), Size::new(2, 6));
        assert_eq!(dev.scan_line_bytes(), 4);
        assert_eq!(dev.config().scaling, Scaling::default());
        assert_eq!(dev.dither_origin(), Point::ORIGIN);
        assert_eq!(dev.get_draw_rect(), Rect::from_xywh(0, 0, 2, 6));
    }

    #[test]
    fn test_swap_external_too_small_keeps_state() {
        // 3x1 fits one 4-byte row, 1x3 needs three
        let mut bits = [0u8; 4];
        let mut dev = DrawDevice::with_bits(Size::new(3, 1), DisplayMode::Gray256, None, &mut bits).unwrap();
        assert!(matches!(dev.swap_width_and_height(), Err(DrawError::BadArgument(_))));
        assert_eq!(dev.size_in_pixels(), Size::new(3, 1));
    }

    #[test]
    #[should_panic(expected = "invalid method call")]
    fn test_swap_on_screen_is_violation() {
        let info = ScreenInfo::new(Size::new(2, 2), vec![DisplayMode::Color16MU]);
        let mut dev = DrawDevice::new_screen(Box::new(MemoryScreen::new(info)), DisplayMode::Color16MU).unwrap();
        let _ = dev.swap_width_and_height();
    }

    #[test]
    fn test_set_bits_redirects_writes() {
        let mut first = [0u8; 8];
        let mut second = [0u8; 8];
        {
            let mut dev = DrawDevice::with_bits(Size::new(2, 1), DisplayMode::Color16MU, None, &mut first).unwrap();
            dev.set_bits(&mut second);
            dev.write_rgb(0, 0, Rgb::new(1, 2, 3), DrawMode::PEN);
        }
        assert_eq!(first, [0; 8]);
        assert_eq!(&second[0..4], &[3, 2, 1, 0xff]);
    }

    #[test]
    #[should_panic(expected = "invalid size")]
    fn test_set_bits_too_small() {
        let mut small = [0u8; 4];
        let mut dev = DrawDevice::new_bitmap(Size::new(2, 1), DisplayMode::Color16MU).unwrap();
        dev.set_bits(&mut small);
    }

    #[test]
    fn test_update_presents_pending_area() {
        let info = ScreenInfo::new(Size::new(4, 4), vec![DisplayMode::Color16MU]);
        let mut screen = MemoryScreen::new(info);
        {
            let mut dev = DrawDevice::new_screen(Box::new(&mut screen), DisplayMode::Color16MU).unwrap();
            dev.init_screen().unwrap();
            dev.write_rgb_multi(1, 1, 2, 1, Rgb::GREEN, DrawMode::PEN);
            dev.update().unwrap();
            dev.update().unwrap();
        }
        assert!(screen.is_initialized());
        assert_eq!(
            screen.presented(),
            &[Rect::from_xywh(0, 0, 4, 4), Rect::from_xywh(1, 1, 2, 1)]
        );
        assert_eq!(screen.pixel(2, 1), Some(Rgb::GREEN));
    }

    #[test]
    fn test_auto_update_presents_each_write() {
        let info = ScreenInfo::new(Size::new(4, 4), vec![DisplayMode::Color64K]);
        let mut screen = MemoryScreen::new(info);
        {
            let mut dev = DrawDevice::new_screen(Box::new(&mut screen), DisplayMode::Color64K).unwrap();
            dev.set_auto_update(true);
            dev.write_rgb(3, 3, Rgb::BLUE, DrawMode::PEN);
            dev.write_rgb(0, 0, Rgb::BLUE, DrawMode::PEN);
        }
        assert_eq!(screen.presented().len(), 2);
        assert_eq!(screen.pixel(3, 3), Some(Rgb::BLUE));
    }

    #[test]
    fn test_update_region_maps_through_orientation() {
        let info = ScreenInfo::new(Size::new(4, 2), vec![DisplayMode::Color16MU]);
        let mut screen = MemoryScreen::new(info);
        {
            let mut dev = DrawDevice::new_screen(Box::new(&mut screen), DisplayMode::Color16MU).unwrap();
            dev.set_orientation(Orientation::Rotated180);
            dev.update_region(Rect::from_xywh(0, 0, 1, 1)).unwrap();
        }
        assert_eq!(screen.presented(), &[Rect::from_xywh(3, 1, 1, 1)]);
    }

    #[test]
    fn test_bitmap_updates_are_noops() {
        let mut dev = DrawDevice::new_bitmap(Size::new(2, 2), DisplayMode::Gray4).unwrap();
        dev.set_auto_update(true);
        assert_eq!(dev.update(), Ok(()));
        assert_eq!(dev.init_screen(), Ok(()));
        assert!(dev.capabilities().contains(Capabilities::DITHER));
    }

    #[test]
    fn test_apply_config_is_atomic() {
        let info = ScreenInfo::new(Size::new(4, 4), vec![DisplayMode::Color16MU])
            .with_orientations([true, false, false, false]);
        let mut dev = DrawDevice::new_screen(Box::new(MemoryScreen::new(info)), DisplayMode::Color16MU).unwrap();
        let cfg = DeviceConfig {
            orientation: Orientation::Rotated90,
            shadow: ShadowFade {
                mode: ShadowMode::SHADOW,
                fade: FadeParams::default(),
            },
            ..DeviceConfig::default()
        };
        assert_eq!(dev.apply_config(&cfg), Err(DrawError::NotSupported));
        assert_eq!(dev.shadow_mode(), ShadowMode::empty());

        let flat = DeviceConfig {
            scaling: Scaling {
                origin: Point::ORIGIN,
                factor_x: 0,
                factor_y: 1,
            },
            ..DeviceConfig::default()
        };
        assert!(matches!(dev.apply_config(&flat), Err(DrawError::BadArgument(_))));
        assert_eq!(dev.config(), DeviceConfig::default());
    }
}
