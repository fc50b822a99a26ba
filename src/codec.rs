//! Conversion between canonical [`Rgb`] values and packed pixels

use crate::color::Rgb;
use crate::error::DrawError;
use crate::format::DisplayMode;
use crate::palette::Palette;

/// Read the raw value of pixel `index` from a scan line
///
/// Panics if the row is too short; callers validate bounds first.
#[inline]
pub fn read_raw(row: &[u8], mode: DisplayMode, index: usize) -> u32 {
    match mode.storage_bits() {
        bits @ (1 | 2 | 4) => {
            let bit = index * bits as usize;
            let byte = row[bit / 8];
            ((byte >> (bit % 8)) as u32) & ((1 << bits) - 1)
        },
        8 => row[index] as u32,
        16 => {
            let i = index * 2;
            u16::from_le_bytes([row[i], row[i + 1]]) as u32
        },
        24 => {
            let i = index * 3;
            (row[i + 2] as u32) << 16 | (row[i + 1] as u32) << 8 | row[i] as u32
        },
        _ => {
            let i = index * 4;
            u32::from_le_bytes([row[i], row[i + 1], row[i + 2], row[i + 3]])
        },
    }
}

/// Store a raw value as pixel `index` of a scan line
#[inline]
pub fn write_raw(row: &mut [u8], mode: DisplayMode, index: usize, raw: u32) {
    match mode.storage_bits() {
        bits @ (1 | 2 | 4) => {
            let bit = index * bits as usize;
            let shift = bit % 8;
            let mask = (((1u32 << bits) - 1) << shift) as u8;
            let byte = &mut row[bit / 8];
            *byte = (*byte & !mask) | (((raw << shift) as u8) & mask);
        },
        8 => row[index] = raw as u8,
        16 => {
            let i = index * 2;
            row[i..i + 2].copy_from_slice(&(raw as u16).to_le_bytes());
        },
        24 => {
            let i = index * 3;
            row[i] = raw as u8;
            row[i + 1] = (raw >> 8) as u8;
            row[i + 2] = (raw >> 16) as u8;
        },
        _ => {
            let raw = if mode == DisplayMode::Color16MU {
                raw | 0xff00_0000
            } else {
                raw
            };
            let i = index * 4;
            row[i..i + 4].copy_from_slice(&raw.to_le_bytes());
        },
    }
}

/// Expand a 5-bit channel to 8 bits
#[inline]
fn expand5(v: u32) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

#[inline]
fn expand6(v: u32) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

#[inline]
fn premultiply(c: u8, a: u8) -> u8 {
    ((c as u32 * a as u32 + 127) / 255) as u8
}

#[inline]
fn unpremultiply(c: u8, a: u8) -> u8 {
    ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8
}

/// Encoder/decoder for one display mode
///
/// Palette modes carry the lookup table they resolve indices against.
#[derive(Debug, Clone, Copy)]
pub struct PixelCodec<'p> {
    mode: DisplayMode,
    palette: Option<&'p Palette>,
}

impl<'p> PixelCodec<'p> {
    /// Codec for `mode`; palette modes without a palette are not supported
    pub fn new(mode: DisplayMode, palette: Option<&'p Palette>) -> Result<Self, DrawError> {
        if mode.is_palettized() && palette.is_none() {
            return Err(DrawError::NotSupported);
        }
        Ok(Self { mode, palette })
    }

    #[inline]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn palette(&self) -> Option<&'p Palette> {
        self.palette
    }

    /// Pack a canonical color
    pub fn encode(&self, c: Rgb) -> u32 {
        match self.mode {
            DisplayMode::Gray2 | DisplayMode::Gray4 | DisplayMode::Gray16 | DisplayMode::Gray256 => {
                (c.gray256() >> (8 - self.mode.bits_per_pixel())) as u32
            },
            DisplayMode::Color16 | DisplayMode::Color256 => {
                self.palette.map_or(0, |p| p.nearest_index(c) as u32)
            },
            DisplayMode::Color4K => {
                (c.red() as u32 >> 4) << 8 | (c.green() as u32 >> 4) << 4 | c.blue() as u32 >> 4
            },
            DisplayMode::Color64K => {
                (c.red() as u32 >> 3) << 11 | (c.green() as u32 >> 2) << 5 | c.blue() as u32 >> 3
            },
            DisplayMode::Color16M => c.rgb(),
            DisplayMode::Color16MU => 0xff00_0000 | c.rgb(),
            DisplayMode::Color16MA => c.argb(),
            DisplayMode::Color16MAP => {
                let a = c.alpha();
                Rgb::with_alpha(
                    premultiply(c.red(), a),
                    premultiply(c.green(), a),
                    premultiply(c.blue(), a),
                    a,
                )
                .argb()
            },
        }
    }

    /// Unpack a raw pixel value
    pub fn decode(&self, raw: u32) -> Rgb {
        match self.mode {
            DisplayMode::Gray2 | DisplayMode::Gray4 | DisplayMode::Gray16 | DisplayMode::Gray256 => {
                let max = (1u32 << self.mode.bits_per_pixel()) - 1;
                let level = raw & max;
                Rgb::from_gray256((level * 255 / max) as u8)
            },
            DisplayMode::Color16 | DisplayMode::Color256 => self
                .palette
                .and_then(|p| p.get((raw & self.mode.value_mask()) as usize))
                .unwrap_or(Rgb::BLACK),
            DisplayMode::Color4K => Rgb::new(
                ((raw >> 8) & 0xf) as u8 * 17,
                ((raw >> 4) & 0xf) as u8 * 17,
                (raw & 0xf) as u8 * 17,
            ),
            DisplayMode::Color64K => Rgb::new(
                expand5((raw >> 11) & 0x1f),
                expand6((raw >> 5) & 0x3f),
                expand5(raw & 0x1f),
            ),
            DisplayMode::Color16M | DisplayMode::Color16MU => Rgb::from_argb(raw).opaque(),
            DisplayMode::Color16MA => Rgb::from_argb(raw),
            DisplayMode::Color16MAP => {
                let p = Rgb::from_argb(raw);
                match p.alpha() {
                    0 => Rgb::TRANSPARENT,
                    255 => p,
                    a => p.map_channels(|c| unpremultiply(c, a)),
                }
            },
        }
    }

    /// Decode pixel `index` of `row`
    #[inline]
    pub fn read(&self, row: &[u8], index: usize) -> Rgb {
        self.decode(read_raw(row, self.mode, index))
    }

    /// Encode `c` into pixel `index` of `row`
    #[inline]
    pub fn write(&self, row: &mut [u8], index: usize, c: Rgb) {
        write_raw(row, self.mode, index, self.encode(c));
    }

    /// Round-trip `c` through this format
    pub fn quantize(&self, c: Rgb) -> Rgb {
        self.decode(self.encode(c))
    }
}

/// Decode pixel `index` of `buffer` stored in `mode`
pub fn decode(
    buffer: &[u8],
    mode: DisplayMode,
    palette: Option<&Palette>,
    index: usize,
) -> Result<Rgb, DrawError> {
    Ok(PixelCodec::new(mode, palette)?.read(buffer, index))
}

/// Pack `color` for `mode`
pub fn encode(color: Rgb, mode: DisplayMode, palette: Option<&Palette>) -> Result<u32, DrawError> {
    Ok(PixelCodec::new(mode, palette)?.encode(color))
}

/// Convert `len` pixels between two formats
///
/// Identical modes copy raw values so nothing is lost to quantization.
pub fn convert_run(src: &[u8], from: &PixelCodec<'_>, dst: &mut [u8], to: &PixelCodec<'_>, len: usize) {
    let mode = from.mode();
    if mode == to.mode() && !mode.is_palettized() && mode.storage_bits() >= 8 {
        let bytes = mode.min_line_bytes(len as i32);
        dst[..bytes].copy_from_slice(&src[..bytes]);
        return;
    }
    for i in 0..len {
        to.write(dst, i, from.read(src, i));
    }
}
