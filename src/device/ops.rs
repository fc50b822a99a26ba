//! Pixel operations
//!
//! Every operation validates all of its arguments before the first pixel is
//! touched, so a contract violation never leaves a half-written buffer.
//! Coordinates are logical; with scaling on, a write fills the whole block
//! of a logical pixel and a read samples its top-left anchor.

use super::surface::Surface;
use super::{codec_for, DrawDevice};
use crate::blend::blend_rgb;
use crate::codec::{self, PixelCodec};
use crate::color::Rgb;
use crate::draw_mode::DrawMode;
use crate::error::{ensure, violation, ContractViolation, DrawError};
use crate::format::DisplayMode;
use crate::geometry::{Point, Rect};
use crate::mapper::{Axis, PhysicalRun, Transform};
use crate::shadow::ShadowFade;
use std::mem;

/// 2x2 ordered dither matrix
const DITHER: [[u32; 2]; 2] = [[0, 2], [3, 1]];

fn checked<T>(result: Result<T, ContractViolation>) -> T {
    match result {
        Ok(v) => v,
        Err(reason) => violation(reason),
    }
}

#[inline]
fn mask_bit(masks: &[u32], i: usize) -> bool {
    masks[i / 32] >> (i % 32) & 1 != 0
}

/// The parts of a device a pixel loop needs, borrowed side by side
struct Painter<'d, 'a> {
    surface: &'d mut Surface<'a>,
    codec: PixelCodec<'d>,
    user: Option<PixelCodec<'d>>,
    shadow: ShadowFade,
    transform: Transform,
    dither: Option<Point>,
}

impl Painter<'_, '_> {
    /// Solid color as the user display mode would show it
    fn prepare(&self, c: Rgb) -> Rgb {
        self.user.map_or(c, |u| u.quantize(c))
    }

    /// Packed value of solid `c` at physical `q`, dithered on 1 and 2 bpp gray
    fn solid_raw(&self, c: Rgb, q: Point) -> u32 {
        let Some(origin) = self.dither else {
            return self.codec.encode(c);
        };
        let max = (1u32 << self.codec.mode().bits_per_pixel()) - 1;
        let scaled = c.gray256() as u32 * max;
        let (level, frac) = (scaled / 255, scaled % 255);
        let m = DITHER[q.y.wrapping_add(origin.y).rem_euclid(2) as usize]
            [q.x.wrapping_add(origin.x).rem_euclid(2) as usize];
        if frac > (m * 2 + 1) * 255 / 8 {
            level + 1
        } else {
            level
        }
    }

    /// Combine `raw` into the pixel at `q`, then shadow if asked
    #[inline]
    fn plot(&mut self, q: Point, raw: u32, mode: DrawMode, shadowed: bool) {
        let dst = self.surface.get_raw(q);
        let mut out = mode.combine(raw, dst, self.codec.mode().value_mask());
        if shadowed && self.shadow.is_active() {
            out = self.codec.encode(self.shadow.apply(self.codec.decode(out)));
        }
        self.surface.set_raw(q, out);
    }

    fn fill_solid(&mut self, x: i32, y: i32, c: Rgb, mode: DrawMode) {
        let t = self.transform;
        for q in t.block(x, y) {
            let raw = self.solid_raw(c, q);
            self.plot(q, raw, mode, true);
        }
    }

    fn fill_raw(&mut self, x: i32, y: i32, raw: u32, mode: DrawMode, shadowed: bool) {
        let t = self.transform;
        for q in t.block(x, y) {
            self.plot(q, raw, mode, shadowed);
        }
    }

    /// Blend `src` over each pixel of the block with coverage `alpha`
    fn blend_block(&mut self, x: i32, y: i32, src: Rgb, alpha: u8, mode: DrawMode) {
        let t = self.transform;
        for q in t.block(x, y) {
            let dst = self.codec.decode(self.surface.get_raw(q));
            let raw = self.codec.encode(blend_rgb(src, dst, alpha));
            self.plot(q, raw, mode, false);
        }
    }

    fn anchor(&self, x: i32, y: i32) -> Point {
        self.transform
            .map_point(x, y)
            .unwrap_or_else(|| violation(ContractViolation::OutOfBounds))
    }
}

impl<'a> DrawDevice<'a> {
    fn painter(&mut self) -> Painter<'_, 'a> {
        let transform = self.transform();
        let mode = self.surface.mode();
        let dither = matches!(mode, DisplayMode::Gray2 | DisplayMode::Gray4).then_some(self.dither_origin);
        Painter {
            codec: codec_for(mode, self.palette.as_ref()),
            user: self.user_mode.map(|m| codec_for(m, self.user_palette.as_ref())),
            shadow: self.shadow,
            transform,
            dither,
            surface: &mut self.surface,
        }
    }

    fn check_run(&self, x: i32, y: i32, len: i32, axis: Axis) -> PhysicalRun {
        checked(self.transform().map_run(x, y, len, axis))
    }

    fn check_rect(&self, x: i32, y: i32, len: i32, height: i32) {
        ensure(height > 0, ContractViolation::ZeroLength);
        self.check_run(x, y, len, Axis::Horizontal);
        let last = i32::try_from(y as i64 + height as i64 - 1)
            .unwrap_or_else(|_| violation(ContractViolation::OutOfBounds));
        self.check_run(x, last, len, Axis::Horizontal);
    }

    /// Record logical pixels (x, y) ..= (x + len - 1, y + height - 1) as changed
    ///
    /// The span has passed validation, so its last pixel is addressable even
    /// where `x + len` itself would not fit an `i32`.
    fn touched_span(&mut self, x: i32, y: i32, len: i32, height: i32) {
        if !self.is_screen() {
            return;
        }
        let t = self.transform();
        let area = t
            .block(x, y)
            .chain(t.block(x + (len - 1), y + (height - 1)))
            .fold(Rect::default(), |acc, q| acc.bounding(&Rect::from_xywh(q.x, q.y, 1, 1)));
        self.touched_physical(area);
    }

    /// Set one logical pixel
    pub fn write_rgb(&mut self, x: i32, y: i32, color: Rgb, mode: DrawMode) {
        self.check_run(x, y, 1, Axis::Horizontal);
        let mut p = self.painter();
        let c = p.prepare(color);
        p.fill_solid(x, y, c, mode);
        self.touched_span(x, y, 1, 1);
    }

    /// Fill a `len` x `height` rectangle with one color
    pub fn write_rgb_multi(&mut self, x: i32, y: i32, len: i32, height: i32, color: Rgb, mode: DrawMode) {
        self.check_rect(x, y, len, height);
        let mut p = self.painter();
        let c = p.prepare(color);
        for dy in 0..height {
            for dx in 0..len {
                p.fill_solid(x + dx, y + dy, c, mode);
            }
        }
        self.touched_span(x, y, len, height);
    }

    /// Write `len` pixels packed in the device's own format
    pub fn write_line(&mut self, x: i32, y: i32, len: i32, buffer: &[u8], mode: DrawMode) {
        ensure(!buffer.is_empty(), ContractViolation::NullPointer);
        self.check_run(x, y, len, Axis::Horizontal);
        let dev_mode = self.surface.mode();
        ensure(buffer.len() >= dev_mode.min_line_bytes(len), ContractViolation::InvalidParameter);
        let mut p = self.painter();
        for i in 0..len {
            let mut raw = codec::read_raw(buffer, dev_mode, i as usize);
            if let Some(user) = p.user {
                raw = p.codec.encode(user.quantize(p.codec.decode(raw)));
            }
            p.fill_raw(x + i, y, raw, mode, true);
        }
        self.touched_span(x, y, len, 1);
    }

    /// Write `color` where mask bits are set; one mask word per row, LSB leftmost
    pub fn write_binary(&mut self, x: i32, y: i32, masks: &[u32], len: i32, color: Rgb, mode: DrawMode) {
        ensure(!masks.is_empty(), ContractViolation::NullPointer);
        ensure(len > 0, ContractViolation::ZeroLength);
        ensure(len <= 32, ContractViolation::OutOfBounds);
        let height = masks.len() as i32;
        self.check_rect(x, y, len, height);
        let mut p = self.painter();
        let c = p.prepare(color);
        for (dy, &bits) in masks.iter().enumerate() {
            for i in 0..len {
                if bits >> i & 1 != 0 {
                    p.fill_solid(x + i, y + dy as i32, c, mode);
                }
            }
        }
        self.touched_span(x, y, len, height);
    }

    /// Single-row bitmask write of any length, bits consumed across words
    pub fn write_binary_line(&mut self, x: i32, y: i32, masks: &[u32], len: i32, color: Rgb, mode: DrawMode) {
        ensure(!masks.is_empty(), ContractViolation::NullPointer);
        self.check_run(x, y, len, Axis::Horizontal);
        ensure(masks.len() * 32 >= len as usize, ContractViolation::InvalidParameter);
        let mut p = self.painter();
        let c = p.prepare(color);
        for i in 0..len {
            if mask_bit(masks, i as usize) {
                p.fill_solid(x + i, y, c, mode);
            }
        }
        self.touched_span(x, y, len, 1);
    }

    /// Single-column bitmask write; `up` runs from (x, y) toward smaller y
    pub fn write_binary_line_vertical(
        &mut self,
        x: i32,
        y: i32,
        masks: &[u32],
        height: i32,
        color: Rgb,
        mode: DrawMode,
        up: bool,
    ) {
        ensure(!masks.is_empty(), ContractViolation::NullPointer);
        ensure(height > 0, ContractViolation::ZeroLength);
        let top = if up {
            i32::try_from(y as i64 - height as i64 + 1).unwrap_or_else(|_| violation(ContractViolation::OutOfBounds))
        } else {
            y
        };
        self.check_run(x, top, height, Axis::Vertical);
        ensure(masks.len() * 32 >= height as usize, ContractViolation::InvalidParameter);
        let mut p = self.painter();
        let c = p.prepare(color);
        for i in 0..height {
            if mask_bit(masks, i as usize) {
                let row = if up { y - i } else { y + i };
                p.fill_solid(x, row, c, mode);
            }
        }
        self.touched_span(x, top, 1, height);
    }

    /// Blend a run of colors over the current pixels through an alpha mask
    ///
    /// With shadowing on, the source colors are shadowed before blending.
    pub fn write_rgb_alpha_line(&mut self, x: i32, y: i32, len: i32, src: &[Rgb], mask: &[u8], mode: DrawMode) {
        if src.is_empty() || mask.is_empty() {
            violation(ContractViolation::NullPointer);
        }
        self.check_run(x, y, len, Axis::Horizontal);
        let n = len as usize;
        if src.len() < n || mask.len() < n {
            violation(ContractViolation::InvalidParameter);
        }
        let mut p = self.painter();
        for (i, (&color, &alpha)) in src[..n].iter().zip(&mask[..n]).enumerate() {
            // zero coverage leaves the destination as it is, whatever the mode
            if alpha == 0 {
                continue;
            }
            let s = p.shadow.apply(color);
            p.blend_block(x + i as i32, y, s, alpha, mode);
        }
        self.touched_span(x, y, len, 1);
    }

    /// Blend `src1` over `src2` (device format) through `mask` and write the result
    ///
    /// The blended color is shadowed before it is combined with `mode`.
    pub fn write_rgb_alpha_line_pair(
        &mut self,
        x: i32,
        y: i32,
        len: i32,
        src1: &[Rgb],
        src2: &[u8],
        mask: &[u8],
        mode: DrawMode,
    ) {
        if src1.is_empty() || src2.is_empty() || mask.is_empty() {
            violation(ContractViolation::NullPointer);
        }
        self.check_run(x, y, len, Axis::Horizontal);
        let n = len as usize;
        if src1.len() < n || mask.len() < n || src2.len() < self.surface.mode().min_line_bytes(len) {
            violation(ContractViolation::InvalidParameter);
        }
        let mut p = self.painter();
        for i in 0..n {
            let under = p.codec.read(src2, i);
            let out = p.shadow.apply(blend_rgb(src1[i], under, mask[i]));
            let raw = p.codec.encode(out);
            p.fill_raw(x + i as i32, y, raw, mode, false);
        }
        self.touched_span(x, y, len, 1);
    }

    /// Blend one color over a run through an alpha mask
    pub fn write_rgb_alpha_multi(&mut self, x: i32, y: i32, len: i32, color: Rgb, mask: &[u8]) {
        ensure(!mask.is_empty(), ContractViolation::NullPointer);
        self.check_run(x, y, len, Axis::Horizontal);
        ensure(mask.len() >= len as usize, ContractViolation::InvalidParameter);
        let mut p = self.painter();
        let s = p.shadow.apply(p.prepare(color));
        for (i, &alpha) in mask[..len as usize].iter().enumerate() {
            if alpha != 0 {
                p.blend_block(x + i as i32, y, s, alpha, DrawMode::PEN);
            }
        }
        self.touched_span(x, y, len, 1);
    }

    /// Replace colors in `rect` by (match, replacement) pairs
    ///
    /// Each pixel is compared with its value before the call and the first
    /// matching pair wins. `forward == false` swaps the roles within a pair.
    pub fn map_colors(&mut self, rect: Rect, pairs: &[(Rgb, Rgb)], forward: bool) {
        if pairs.is_empty() || rect.is_empty() {
            violation(ContractViolation::ZeroLength);
        }
        self.check_rect(rect.tl.x, rect.tl.y, rect.width(), rect.height());
        let mut p = self.painter();
        let with_alpha = p.codec.mode().has_alpha();
        let same = |a: Rgb, b: Rgb| if with_alpha { a == b } else { a.rgb() == b.rgb() };
        for y in rect.tl.y..rect.br.y {
            for x in rect.tl.x..rect.br.x {
                let current = p.codec.decode(p.surface.get_raw(p.anchor(x, y)));
                let hit = pairs.iter().find_map(|&(a, b)| {
                    let (from, to) = if forward { (a, b) } else { (b, a) };
                    same(from, current).then_some(to)
                });
                if let Some(to) = hit {
                    let raw = p.codec.encode(to);
                    p.fill_raw(x, y, raw, DrawMode::PEN, false);
                }
            }
        }
        self.touched(rect);
    }

    pub fn read_pixel(&self, x: i32, y: i32) -> Rgb {
        let q = self
            .transform()
            .map_point(x, y)
            .unwrap_or_else(|| violation(ContractViolation::OutOfBounds));
        codec_for(self.surface.mode(), self.palette.as_ref()).decode(self.surface.get_raw(q))
    }

    /// Copy `len` logical pixels into `dest`, converted to `dest_mode`
    ///
    /// An indexed `dest_mode` needs a device palette that fits it.
    pub fn read_line(&self, x: i32, y: i32, len: i32, dest: &mut [u8], dest_mode: DisplayMode) -> Result<(), DrawError> {
        ensure(!dest.is_empty(), ContractViolation::NullPointer);
        let run = self.check_run(x, y, len, Axis::Horizontal);
        ensure(dest.len() >= dest_mode.min_line_bytes(len), ContractViolation::InvalidParameter);
        let dest_palette = match dest_mode.palette_size() {
            None => None,
            Some(max) => match self.palette.as_ref() {
                Some(p) if p.len() <= max => Some(p),
                _ => return Err(DrawError::NotSupported),
            },
        };
        let to = PixelCodec::new(dest_mode, dest_palette)?;
        let mode = self.surface.mode();
        let from = codec_for(mode, self.palette.as_ref());
        for (i, q) in run.points().enumerate() {
            let raw = self.surface.get_raw(q);
            if dest_mode == mode {
                codec::write_raw(dest, mode, i, raw);
            } else {
                to.write(dest, i, from.decode(raw));
            }
        }
        Ok(())
    }

    /// [`DrawDevice::read_line`] into the device's scan-line buffer
    pub fn read_line_to_scan_buffer(
        &mut self,
        x: i32,
        y: i32,
        len: i32,
        dest_mode: DisplayMode,
    ) -> Result<&[u8], DrawError> {
        let mut buffer = mem::take(&mut self.scan_line);
        let result = self.read_line(x, y, len, &mut buffer, dest_mode);
        self.scan_line = buffer;
        result?;
        Ok(&self.scan_line[..dest_mode.min_line_bytes(len)])
    }

    /// [`DrawDevice::write_line`] from the device's scan-line buffer
    pub fn write_scan_line(&mut self, x: i32, y: i32, len: i32, mode: DrawMode) {
        let buffer = mem::take(&mut self.scan_line);
        self.write_line(x, y, len, &buffer, mode);
        self.scan_line = buffer;
    }

    /// Reusable buffer, long enough for any line of this device at 32 bpp
    ///
    /// Its contents are overwritten by the scan-line operations.
    pub fn scan_line_buffer(&mut self) -> &mut [u8] {
        &mut self.scan_line
    }

    /// Apply the current shadow/fade transform to a rectangle in place
    pub fn shadow_area(&mut self, rect: Rect) {
        ensure(!rect.is_empty(), ContractViolation::ZeroLength);
        self.check_rect(rect.tl.x, rect.tl.y, rect.width(), rect.height());
        if !self.shadow.is_active() {
            return;
        }
        let mut p = self.painter();
        let t = p.transform;
        for y in rect.tl.y..rect.br.y {
            for x in rect.tl.x..rect.br.x {
                for q in t.block(x, y) {
                    let c = p.codec.decode(p.surface.get_raw(q));
                    let raw = p.codec.encode(p.shadow.apply(c));
                    p.surface.set_raw(q, raw);
                }
            }
        }
        self.touched(rect);
    }

    /// Apply the current shadow/fade transform to `len` pixels in device format
    pub fn shadow_buffer(&self, len: i32, buffer: &mut [u8]) {
        ensure(!buffer.is_empty(), ContractViolation::NullPointer);
        ensure(len > 0, ContractViolation::ZeroLength);
        let mode = self.surface.mode();
        ensure(buffer.len() >= mode.min_line_bytes(len), ContractViolation::InvalidParameter);
        if !self.shadow.is_active() {
            return;
        }
        let codec = codec_for(mode, self.palette.as_ref());
        for i in 0..len as usize {
            let c = codec.read(buffer, i);
            codec.write(buffer, i, self.shadow.apply(c));
        }
    }
}
