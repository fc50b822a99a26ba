//! Packed pixel formats
//!
//! Layout of each mode inside a scan line:
//! - 1, 2 and 4 bpp pixels are packed LSB-first within each byte
//! - 8 bpp is one byte per pixel
//! - 12 and 16 bpp are little-endian 16-bit words (4K keeps the top nibble clear)
//! - 24 bpp is three bytes, blue first
//! - 32 bpp is a little-endian `0xAARRGGBB` word
//!
//! Precision kept on encode:
//! - gray modes keep luminance `(2r + 5g + b) / 8`, truncated to the level count
//! - `Color16` / `Color256` keep the nearest palette entry
//! - `Color4K` keeps 4 bits per channel, `Color64K` keeps 5/6/5
//! - `Color16M` and `Color16MU` keep all color bits and drop alpha
//! - `Color16MA` is lossless
//! - `Color16MAP` stores premultiplied color, losing precision as alpha falls

use serde::{Deserialize, Serialize};

/// Bytes in one scan-line word
pub const WORD_BYTES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    /// 1 bpp monochrome
    Gray2,
    /// 2 bpp, four gray levels
    Gray4,
    /// 4 bpp, sixteen gray levels
    Gray16,
    /// 8 bpp gray
    Gray256,
    /// 4 bpp palette index
    Color16,
    /// 8 bpp palette index
    Color256,
    /// 12 bpp 0x0RGB, stored in 16 bits
    Color4K,
    /// 16 bpp 5-6-5
    Color64K,
    /// 24 bpp packed BGR
    Color16M,
    /// 32 bpp with an unused alpha byte
    Color16MU,
    /// 32 bpp with alpha
    Color16MA,
    /// 32 bpp with premultiplied alpha
    Color16MAP,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 12] = [
        DisplayMode::Gray2,
        DisplayMode::Gray4,
        DisplayMode::Gray16,
        DisplayMode::Gray256,
        DisplayMode::Color16,
        DisplayMode::Color256,
        DisplayMode::Color4K,
        DisplayMode::Color64K,
        DisplayMode::Color16M,
        DisplayMode::Color16MU,
        DisplayMode::Color16MA,
        DisplayMode::Color16MAP,
    ];

    /// Significant bits per pixel
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            DisplayMode::Gray2 => 1,
            DisplayMode::Gray4 => 2,
            DisplayMode::Gray16 | DisplayMode::Color16 => 4,
            DisplayMode::Gray256 | DisplayMode::Color256 => 8,
            DisplayMode::Color4K => 12,
            DisplayMode::Color64K => 16,
            DisplayMode::Color16M => 24,
            DisplayMode::Color16MU | DisplayMode::Color16MA | DisplayMode::Color16MAP => 32,
        }
    }

    /// Bits each pixel occupies in memory
    pub const fn storage_bits(self) -> u32 {
        match self {
            DisplayMode::Color4K => 16,
            other => other.bits_per_pixel(),
        }
    }

    /// Bits of a raw pixel value that the compositor may change
    pub const fn value_mask(self) -> u32 {
        match self {
            DisplayMode::Color16MU => 0x00ff_ffff,
            DisplayMode::Color16MA | DisplayMode::Color16MAP => u32::MAX,
            other => (1u32 << other.bits_per_pixel()) - 1,
        }
    }

    pub const fn is_palettized(self) -> bool {
        matches!(self, DisplayMode::Color16 | DisplayMode::Color256)
    }

    pub const fn is_gray(self) -> bool {
        matches!(
            self,
            DisplayMode::Gray2 | DisplayMode::Gray4 | DisplayMode::Gray16 | DisplayMode::Gray256
        )
    }

    pub const fn has_alpha(self) -> bool {
        matches!(self, DisplayMode::Color16MA | DisplayMode::Color16MAP)
    }

    /// Number of representable gray levels, for gray modes
    pub const fn gray_levels(self) -> Option<u32> {
        if self.is_gray() {
            Some(1 << self.bits_per_pixel())
        } else {
            None
        }
    }

    /// Entries a palette needs to cover every index
    pub const fn palette_size(self) -> Option<usize> {
        match self {
            DisplayMode::Color16 => Some(16),
            DisplayMode::Color256 => Some(256),
            _ => None,
        }
    }

    /// Minimum bytes for `width` pixels, without word rounding
    pub fn min_line_bytes(self, width: i32) -> usize {
        let bits = self.storage_bits() as usize * width.max(0) as usize;
        bits.div_ceil(8)
    }

    /// Bytes per scan line of `width` pixels, rounded up to a whole word
    pub fn scan_line_bytes(self, width: i32) -> usize {
        self.min_line_bytes(width).div_ceil(WORD_BYTES) * WORD_BYTES
    }

    /// Pixels that fit in `stride_bytes`
    pub fn pixels_per_stride(self, stride_bytes: usize) -> i32 {
        (stride_bytes * 8 / self.storage_bits() as usize) as i32
    }
}

/// The 16M-color mode available among `supported`, if any
///
/// Prefers the word-aligned [`DisplayMode::Color16MU`]. `None` means the
/// hardware has no true-color mode; it is not an error.
pub fn display_mode_16m(supported: &[DisplayMode]) -> Option<DisplayMode> {
    [DisplayMode::Color16MU, DisplayMode::Color16M]
        .into_iter()
        .find(|m| supported.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_line_bytes_word_rounded() {
        assert_eq!(DisplayMode::Gray2.scan_line_bytes(1), 4);
        assert_eq!(DisplayMode::Gray2.scan_line_bytes(33), 8);
        assert_eq!(DisplayMode::Gray4.scan_line_bytes(16), 4);
        assert_eq!(DisplayMode::Color4K.scan_line_bytes(3), 8);
        assert_eq!(DisplayMode::Color16M.scan_line_bytes(5), 16);
        assert_eq!(DisplayMode::Color16MU.scan_line_bytes(4), 16);
        assert_eq!(DisplayMode::Color64K.scan_line_bytes(0), 0);
    }

    #[test]
    fn test_scan_line_covers_every_pixel() {
        for mode in DisplayMode::ALL {
            for width in 1..70 {
                let bytes = mode.scan_line_bytes(width);
                assert_eq!(bytes % WORD_BYTES, 0);
                assert!(bytes * 8 >= mode.storage_bits() as usize * width as usize);
                assert!(mode.pixels_per_stride(bytes) >= width);
            }
        }
    }

    #[test]
    fn test_value_masks() {
        assert_eq!(DisplayMode::Gray2.value_mask(), 0x1);
        assert_eq!(DisplayMode::Color4K.value_mask(), 0x0fff);
        assert_eq!(DisplayMode::Color64K.value_mask(), 0xffff);
        assert_eq!(DisplayMode::Color16M.value_mask(), 0x00ff_ffff);
        assert_eq!(DisplayMode::Color16MU.value_mask(), 0x00ff_ffff);
        assert_eq!(DisplayMode::Color16MA.value_mask(), u32::MAX);
    }

    #[test]
    fn test_display_mode_16m() {
        use DisplayMode::*;
        assert_eq!(display_mode_16m(&[Color64K, Color16M]), Some(Color16M));
        assert_eq!(
            display_mode_16m(&[Color16M, Color16MU, Color16MA]),
            Some(Color16MU)
        );
        assert_eq!(display_mode_16m(&[Gray4, Color64K]), None);
    }
}
