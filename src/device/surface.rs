//! Physical pixel storage of a device

use crate::codec;
use crate::error::DrawError;
use crate::format::DisplayMode;
use crate::geometry::{Point, Size};

/// Pixel memory, owned or borrowed from the caller
pub(crate) enum Bits<'a> {
    Owned(Vec<u8>),
    External(&'a mut [u8]),
}

impl Bits<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Bits::Owned(v) => v,
            Bits::External(s) => s,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Bits::Owned(v) => v,
            Bits::External(s) => s,
        }
    }
}

/// Zeroed buffer of `len` bytes, or `NoMemory`
pub(crate) fn try_alloc(len: usize) -> Result<Vec<u8>, DrawError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| DrawError::NoMemory)?;
    v.resize(len, 0);
    Ok(v)
}

/// Stride for `size` in `mode`, checking a caller-supplied one
pub(crate) fn checked_stride(size: Size, mode: DisplayMode, stride: Option<usize>) -> Result<usize, DrawError> {
    if size.is_empty() {
        return Err(DrawError::BadArgument(format!(
            "empty size {}x{}",
            size.width, size.height
        )));
    }
    let min = mode.scan_line_bytes(size.width);
    match stride {
        None => Ok(min),
        Some(s) if s >= min && s % crate::format::WORD_BYTES == 0 => Ok(s),
        Some(s) => Err(DrawError::BadArgument(format!(
            "stride {} below minimum {} or not word aligned",
            s, min
        ))),
    }
}

/// Rows of packed pixels in physical layout
pub(crate) struct Surface<'a> {
    bits: Bits<'a>,
    mode: DisplayMode,
    size: Size,
    stride: usize,
}

impl<'a> Surface<'a> {
    pub fn allocate(size: Size, mode: DisplayMode, stride: Option<usize>) -> Result<Self, DrawError> {
        let stride = checked_stride(size, mode, stride)?;
        let bits = try_alloc(stride * size.height as usize)?;
        Ok(Self {
            bits: Bits::Owned(bits),
            mode,
            size,
            stride,
        })
    }

    pub fn external(
        size: Size,
        mode: DisplayMode,
        stride: Option<usize>,
        bits: &'a mut [u8],
    ) -> Result<Self, DrawError> {
        let stride = checked_stride(size, mode, stride)?;
        let needed = stride * size.height as usize;
        if bits.len() < needed {
            return Err(DrawError::BadArgument(format!(
                "buffer of {} bytes, need {}",
                bits.len(),
                needed
            )));
        }
        Ok(Self {
            bits: Bits::External(bits),
            mode,
            size,
            stride,
        })
    }

    #[inline]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn byte_len(&self) -> usize {
        self.stride * self.size.height as usize
    }

    pub fn is_external(&self) -> bool {
        matches!(self.bits, Bits::External(_))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bits.as_slice()[..self.byte_len()]
    }

    /// Point to new caller memory, keeping size and stride
    pub fn rebind(&mut self, bits: &'a mut [u8]) {
        self.bits = Bits::External(bits);
    }

    /// Adopt a new layout; the caller has allocated `bits` to fit it
    pub fn replace(&mut self, bits: Vec<u8>, size: Size, stride: usize) {
        self.bits = Bits::Owned(bits);
        self.size = size;
        self.stride = stride;
    }

    /// Reinterpret the existing memory with a new size and stride
    pub fn relayout(&mut self, size: Size, stride: usize) {
        self.size = size;
        self.stride = stride;
    }

    pub fn capacity(&self) -> usize {
        self.bits.as_slice().len()
    }

    #[inline]
    pub fn row(&self, y: i32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.bits.as_slice()[start..start + self.stride]
    }

    #[inline]
    pub fn row_mut(&mut self, y: i32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let stride = self.stride;
        &mut self.bits.as_mut_slice()[start..start + stride]
    }

    #[inline]
    pub fn get_raw(&self, p: Point) -> u32 {
        codec::read_raw(self.row(p.y), self.mode, p.x as usize)
    }

    #[inline]
    pub fn set_raw(&mut self, p: Point, raw: u32) {
        let mode = self.mode;
        codec::write_raw(self.row_mut(p.y), mode, p.x as usize, raw);
    }
}
