//! Raster combination of a source pen with the existing screen value

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// How a source value is combined with the destination pixel
    ///
    /// Operators are tried in priority order AND, OR, XOR, PEN. With none of
    /// them set the (possibly inverted) screen value is kept, so the empty
    /// mode leaves the buffer untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DrawMode: u32 {
        const INVERT_SCREEN = 0x01;
        const XOR = 0x02;
        const OR = 0x04;
        const AND = 0x08;
        const INVERT_PEN = 0x10;
        const PEN = 0x20;
        const WRITE_ALPHA = 0x40;

        const NOT_SCREEN = Self::INVERT_SCREEN.bits();
        const NOT_AND = Self::INVERT_SCREEN.bits() | Self::AND.bits();
        const NOT_OR = Self::INVERT_SCREEN.bits() | Self::OR.bits();
        const NOT_XOR = Self::INVERT_SCREEN.bits() | Self::XOR.bits();
        const AND_NOT = Self::AND.bits() | Self::INVERT_PEN.bits();
        const OR_NOT = Self::OR.bits() | Self::INVERT_PEN.bits();
        const NOT_AND_NOT = Self::INVERT_SCREEN.bits() | Self::AND.bits() | Self::INVERT_PEN.bits();
        const NOT_OR_NOT = Self::INVERT_SCREEN.bits() | Self::OR.bits() | Self::INVERT_PEN.bits();
        const NOT_PEN = Self::INVERT_PEN.bits() | Self::PEN.bits();
    }
}

impl DrawMode {
    /// Plain replacement of the destination
    pub fn is_replace(self) -> bool {
        self == DrawMode::PEN || self == DrawMode::WRITE_ALPHA
    }

    /// Combine packed `src` into packed `dst`; bits outside `mask` keep their
    /// destination value
    #[inline]
    pub fn combine(self, src: u32, dst: u32, mask: u32) -> u32 {
        let pen = if self.contains(DrawMode::INVERT_PEN) { !src } else { src };
        let screen = if self.contains(DrawMode::INVERT_SCREEN) { !dst } else { dst };
        let out = if self.contains(DrawMode::AND) {
            pen & screen
        } else if self.contains(DrawMode::OR) {
            pen | screen
        } else if self.contains(DrawMode::XOR) {
            pen ^ screen
        } else if self.intersects(DrawMode::PEN | DrawMode::WRITE_ALPHA) {
            pen
        } else {
            screen
        };
        (out & mask) | (dst & !mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASK: u32 = 0xffff;

    #[test]
    fn test_named_combinations() {
        let (src, dst) = (0b1100, 0b1010);
        assert_eq!(DrawMode::PEN.combine(src, dst, MASK), 0b1100);
        assert_eq!(DrawMode::AND.combine(src, dst, MASK), 0b1000);
        assert_eq!(DrawMode::OR.combine(src, dst, MASK), 0b1110);
        assert_eq!(DrawMode::XOR.combine(src, dst, MASK), 0b0110);
        assert_eq!(DrawMode::NOT_SCREEN.combine(src, dst, MASK), !dst & MASK);
        assert_eq!(DrawMode::NOT_PEN.combine(src, dst, MASK), !src & MASK);
        assert_eq!(DrawMode::AND_NOT.combine(src, dst, MASK), !src & dst & MASK);
        assert_eq!(DrawMode::NOT_OR.combine(src, dst, MASK), (src | !dst) & MASK);
        assert_eq!(DrawMode::NOT_XOR.combine(src, dst, MASK), (src ^ !dst) & MASK);
        assert_eq!(DrawMode::NOT_OR_NOT.combine(src, dst, MASK), (!src | !dst) & MASK);
    }

    #[test]
    fn test_empty_mode_is_noop() {
        assert_eq!(DrawMode::empty().combine(0x1234, 0x5678, MASK), 0x5678);
    }

    #[test]
    fn test_xor_twice_restores() {
        let dst = 0x00ab_cdef;
        let once = DrawMode::XOR.combine(0x0012_3456, dst, 0x00ff_ffff);
        assert_eq!(DrawMode::XOR.combine(0x0012_3456, once, 0x00ff_ffff), dst);
    }

    #[test]
    fn test_mask_preserves_unused_bits() {
        let out = DrawMode::NOT_SCREEN.combine(0, 0xff00_0000, 0x00ff_ffff);
        assert_eq!(out, 0xffff_ffff);
    }

    #[test]
    fn test_is_replace() {
        assert!(DrawMode::PEN.is_replace());
        assert!(DrawMode::WRITE_ALPHA.is_replace());
        assert!(!DrawMode::XOR.is_replace());
        assert!(!DrawMode::NOT_PEN.is_replace());
    }
}
