//! Displays that a screen device presents its pixels to
//!
//! A [`ScreenSink`] is handed a read-only [`Frame`] of the device buffer and
//! the physical rectangle that changed. [`MemoryScreen`] keeps the presented
//! image in memory; `SdlScreen` (feature `sdl`) shows it in a window.

#[cfg(feature = "sdl")]
pub mod sdl;

use crate::codec::PixelCodec;
use crate::color::Rgb;
use crate::error::DrawError;
use crate::format::{self, DisplayMode};
use crate::geometry::{Rect, Size};
use crate::palette::Palette;

/// Twips per thousand pixels at 96 dpi
pub const DEFAULT_TWIPS_PER_THOUSAND: i32 = 15_000;

/// Static description of a physical display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenInfo {
    /// Physical size in pixels
    pub size: Size,
    pub twips_per_thousand_x: i32,
    pub twips_per_thousand_y: i32,
    /// Availability per orientation, indexed by `Orientation::index`
    pub orientations: [bool; 4],
    pub modes: Vec<DisplayMode>,
}

impl ScreenInfo {
    pub fn new(size: Size, modes: Vec<DisplayMode>) -> Self {
        Self {
            size,
            twips_per_thousand_x: DEFAULT_TWIPS_PER_THOUSAND,
            twips_per_thousand_y: DEFAULT_TWIPS_PER_THOUSAND,
            orientations: [true; 4],
            modes,
        }
    }

    pub fn with_orientations(mut self, orientations: [bool; 4]) -> Self {
        self.orientations = orientations;
        self
    }

    pub fn with_twips(mut self, x: i32, y: i32) -> Self {
        self.twips_per_thousand_x = x;
        self.twips_per_thousand_y = y;
        self
    }

    pub fn supports(&self, mode: DisplayMode) -> bool {
        self.modes.contains(&mode)
    }

    /// True-color mode of this display, if it has one
    pub fn display_mode_16m(&self) -> Option<DisplayMode> {
        format::display_mode_16m(&self.modes)
    }
}

/// Borrowed view of a device buffer in physical layout
pub struct Frame<'f> {
    pub bytes: &'f [u8],
    pub size: Size,
    /// Bytes per physical row
    pub stride: usize,
    pub mode: DisplayMode,
    pub palette: Option<&'f Palette>,
}

impl Frame<'_> {
    pub fn codec(&self) -> Result<PixelCodec<'_>, DrawError> {
        PixelCodec::new(self.mode, self.palette)
    }

    pub fn row(&self, y: i32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.bytes[start..start + self.stride]
    }

    /// Decoded physical pixel; callers stay inside `size`
    pub fn pixel(&self, x: i32, y: i32) -> Rgb {
        self.codec()
            .map_or(Rgb::BLACK, |codec| codec.read(self.row(y), x as usize))
    }
}

/// A display a screen device can present to
pub trait ScreenSink {
    fn info(&self) -> ScreenInfo;

    /// Prepare the display for the first present
    fn init(&mut self) -> Result<(), DrawError> {
        Ok(())
    }

    /// Show `area` (physical pixels) of `frame`
    fn present(&mut self, frame: &Frame<'_>, area: Rect) -> Result<(), DrawError>;
}

impl<S: ScreenSink + ?Sized> ScreenSink for &mut S {
    fn info(&self) -> ScreenInfo {
        (**self).info()
    }

    fn init(&mut self) -> Result<(), DrawError> {
        (**self).init()
    }

    fn present(&mut self, frame: &Frame<'_>, area: Rect) -> Result<(), DrawError> {
        (**self).present(frame, area)
    }
}

/// Headless display that records what was presented
#[derive(Debug, Clone)]
pub struct MemoryScreen {
    info: ScreenInfo,
    pixels: Vec<Rgb>,
    presented: Vec<Rect>,
    initialized: bool,
}

impl MemoryScreen {
    pub fn new(info: ScreenInfo) -> Self {
        let len = info.size.area().max(0) as usize;
        Self {
            info,
            pixels: vec![Rgb::BLACK; len],
            presented: Vec::new(),
            initialized: false,
        }
    }

    /// Last presented color at a physical position
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        let size = self.info.size;
        if x < 0 || y < 0 || x >= size.width || y >= size.height {
            return None;
        }
        self.pixels.get((y * size.width + x) as usize).copied()
    }

    /// Rectangles passed to `present`, oldest first
    pub fn presented(&self) -> &[Rect] {
        &self.presented
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl ScreenSink for MemoryScreen {
    fn info(&self) -> ScreenInfo {
        self.info.clone()
    }

    fn init(&mut self) -> Result<(), DrawError> {
        self.initialized = true;
        Ok(())
    }

    fn present(&mut self, frame: &Frame<'_>, area: Rect) -> Result<(), DrawError> {
        let area = area
            .intersection(&Rect::from_size(self.info.size))
            .intersection(&Rect::from_size(frame.size));
        if area.is_empty() {
            return Ok(());
        }
        let codec = frame.codec()?;
        let width = self.info.size.width;
        for y in area.tl.y..area.br.y {
            let row = frame.row(y);
            for x in area.tl.x..area.br.x {
                self.pixels[(y * width + x) as usize] = codec.read(row, x as usize);
            }
        }
        self.presented.push(area);
        Ok(())
    }
}

/// Screen-side state of a device
pub(crate) struct ScreenState<'a> {
    pub sink: Box<dyn ScreenSink + 'a>,
    pub info: ScreenInfo,
    /// Physical area written since the last present
    pub pending: Rect,
    pub auto_update: bool,
}

impl<'a> ScreenState<'a> {
    pub fn new(sink: Box<dyn ScreenSink + 'a>) -> Self {
        let info = sink.info();
        Self {
            sink,
            info,
            pending: Rect::default(),
            auto_update: false,
        }
    }

    pub fn touch(&mut self, area: Rect) {
        self.pending = self.pending.bounding(&area);
    }

    /// Present the pending area plus `extra`, clearing it on success
    pub fn flush(&mut self, frame: &Frame<'_>, extra: Rect) -> Result<(), DrawError> {
        let area = self
            .pending
            .bounding(&extra)
            .intersection(&Rect::from_size(frame.size));
        if area.is_empty() {
            self.pending = Rect::default();
            return Ok(());
        }
        log::trace!("presenting {:?}", area);
        self.sink.present(frame, area)?;
        self.pending = Rect::default();
        Ok(())
    }
}
