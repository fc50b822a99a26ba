//! Color lookup tables for the indexed display modes

use crate::color::Rgb;
use crate::error::DrawError;
use crate::format::DisplayMode;
use serde::{Deserialize, Serialize};

/// Steps of the 6x6x6 color cube in the standard 256-entry palette
const CUBE_STEP: u8 = 0x33;
const CUBE_SIZE: usize = 6;
const CUBE_ENTRIES: usize = CUBE_SIZE * CUBE_SIZE * CUBE_SIZE;

const STANDARD_16: [u32; 16] = [
    0x000000, // black
    0x555555, // dark gray
    0x800000, // dark red
    0x808000, // dark yellow
    0x008000, // dark green
    0xff0000, // red
    0xffff00, // yellow
    0x00ff00, // green
    0xff00ff, // magenta
    0x0000ff, // blue
    0x00ffff, // cyan
    0x000080, // dark blue
    0x800080, // dark magenta
    0x008080, // dark cyan
    0xaaaaaa, // gray
    0xffffff, // white
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    entries: Vec<Rgb>,
}

impl Palette {
    /// Build a palette of 1 to 256 entries
    pub fn new(entries: Vec<Rgb>) -> Result<Self, DrawError> {
        if entries.is_empty() || entries.len() > 256 {
            return Err(DrawError::BadArgument(format!(
                "palette needs 1..=256 entries, got {}",
                entries.len()
            )));
        }
        Ok(Self { entries })
    }

    /// Classic 16-color palette
    pub fn standard_16() -> Self {
        Self {
            entries: STANDARD_16
                .iter()
                .map(|&v| Rgb::from_argb(0xff00_0000 | v))
                .collect(),
        }
    }

    /// 6x6x6 color cube followed by a 40-step gray ramp
    pub fn standard_256() -> Self {
        let mut entries = Vec::with_capacity(256);
        for i in 0..CUBE_ENTRIES {
            let r = (i % CUBE_SIZE) as u8 * CUBE_STEP;
            let g = (i / CUBE_SIZE % CUBE_SIZE) as u8 * CUBE_STEP;
            let b = (i / (CUBE_SIZE * CUBE_SIZE)) as u8 * CUBE_STEP;
            entries.push(Rgb::new(r, g, b));
        }
        for k in 0..(256 - CUBE_ENTRIES) as u32 {
            entries.push(Rgb::from_gray256(((k + 1) * 255 / 41) as u8));
        }
        Self { entries }
    }

    /// Palette a freshly created device of `mode` starts with
    pub fn default_for(mode: DisplayMode) -> Option<Self> {
        match mode {
            DisplayMode::Color16 => Some(Self::standard_16()),
            DisplayMode::Color256 => Some(Self::standard_256()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.entries.get(index).copied()
    }

    pub fn set_entry(&mut self, index: usize, color: Rgb) -> Result<(), DrawError> {
        match self.entries.get_mut(index) {
            Some(slot) => {
                *slot = color;
                Ok(())
            },
            None => Err(DrawError::BadArgument(format!(
                "palette index {} out of range",
                index
            ))),
        }
    }

    /// Index of the closest entry; exact matches win, ties go to the lower index
    pub fn nearest_index(&self, color: Rgb) -> usize {
        if let Some(i) = self.entries.iter().position(|e| e.rgb() == color.rgb()) {
            return i;
        }
        let dist = |e: &Rgb| {
            let dr = e.red() as i32 - color.red() as i32;
            let dg = e.green() as i32 - color.green() as i32;
            let db = e.blue() as i32 - color.blue() as i32;
            dr * dr + dg * dg + db * db
        };
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, e)| dist(e))
            .map_or(0, |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_sizes() {
        assert_eq!(Palette::standard_16().len(), 16);
        assert_eq!(Palette::standard_256().len(), 256);
    }

    #[test]
    fn test_cube_layout() {
        let p = Palette::standard_256();
        assert_eq!(p.get(0), Some(Rgb::BLACK));
        assert_eq!(p.get(5), Some(Rgb::RED));
        assert_eq!(p.get(30), Some(Rgb::GREEN));
        assert_eq!(p.get(180), Some(Rgb::BLUE));
        assert_eq!(p.get(215), Some(Rgb::WHITE));
    }

    #[test]
    fn test_nearest_exact_and_approximate() {
        let p = Palette::standard_16();
        assert_eq!(p.nearest_index(Rgb::RED), 5);
        assert_eq!(p.nearest_index(Rgb::new(250, 5, 5)), 5);
        assert_eq!(p.nearest_index(Rgb::new(0xa0, 0xa0, 0xa0)), 14);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(Palette::new(Vec::new()).is_err());
        assert!(Palette::new(vec![Rgb::BLACK; 257]).is_err());
        assert!(Palette::new(vec![Rgb::BLACK; 3]).is_ok());
    }

    #[test]
    fn test_set_entry_bounds() {
        let mut p = Palette::standard_16();
        p.set_entry(0, Rgb::WHITE).unwrap();
        assert_eq!(p.get(0), Some(Rgb::WHITE));
        assert!(p.set_entry(16, Rgb::WHITE).is_err());
    }

    #[test]
    fn test_default_for_direct_modes_is_none() {
        assert!(Palette::default_for(DisplayMode::Color64K).is_none());
        assert!(Palette::default_for(DisplayMode::Color256).is_some());
    }
}
