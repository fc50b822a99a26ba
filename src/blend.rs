//! Per-channel alpha blending

use crate::color::Rgb;

/// `(src * a + dst * (255 - a)) / 255`, truncated
#[inline]
pub fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a)) / 255) as u8
}

/// Blend `src` over `dst` with coverage `alpha`
///
/// Resulting alpha accumulates as `a + dst.a * (255 - a) / 255`, so an
/// opaque destination stays opaque.
#[inline]
pub fn blend_rgb(src: Rgb, dst: Rgb, alpha: u8) -> Rgb {
    match alpha {
        0 => dst,
        255 => src.set_alpha(255),
        a => Rgb::with_alpha(
            blend_channel(src.red(), dst.red(), a),
            blend_channel(src.green(), dst.green(), a),
            blend_channel(src.blue(), dst.blue(), a),
            (a as u32 + dst.alpha() as u32 * (255 - a as u32) / 255) as u8,
        ),
    }
}

/// Blend each element of `src` into `dst` through `mask`
pub fn blend_run(src: &[Rgb], dst: &mut [Rgb], mask: &[u8]) {
    for ((d, &s), &a) in dst.iter_mut().zip(src).zip(mask) {
        *d = blend_rgb(s, *d, a);
    }
}
