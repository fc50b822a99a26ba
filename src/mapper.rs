//! Logical to physical coordinate mapping
//!
//! A logical point is first scaled and offset into oriented space, then
//! rotated into the physical buffer:
//!
//! ```text
//! oriented = origin + logical * factor
//! Normal     (x, y)
//! Rotated90  (W-1-y, x)
//! Rotated180 (W-1-x, H-1-y)
//! Rotated270 (y, H-1-x)
//! ```
//!
//! `W x H` is the physical buffer size. Everything here is a pure function of
//! [`Transform`].

use crate::error::{ContractViolation, DrawError};
use crate::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Normal,
    Rotated90,
    Rotated180,
    Rotated270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Normal,
        Orientation::Rotated90,
        Orientation::Rotated180,
        Orientation::Rotated270,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether logical width runs along the physical height
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Orientation::Rotated90 | Orientation::Rotated270)
    }

    /// Next orientation clockwise
    pub const fn rotated_cw(self) -> Self {
        match self {
            Orientation::Normal => Orientation::Rotated90,
            Orientation::Rotated90 => Orientation::Rotated180,
            Orientation::Rotated180 => Orientation::Rotated270,
            Orientation::Rotated270 => Orientation::Normal,
        }
    }

    /// Physical step for one oriented pixel along +x and +y
    const fn unit_steps(self) -> (Point, Point) {
        match self {
            Orientation::Normal => (Point::new(1, 0), Point::new(0, 1)),
            Orientation::Rotated90 => (Point::new(0, 1), Point::new(-1, 0)),
            Orientation::Rotated180 => (Point::new(-1, 0), Point::new(0, -1)),
            Orientation::Rotated270 => (Point::new(0, -1), Point::new(1, 0)),
        }
    }
}

/// Integer scale factors and the oriented position of logical (0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scaling {
    pub origin: Point,
    pub factor_x: i32,
    pub factor_y: i32,
}

impl Default for Scaling {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            factor_x: 1,
            factor_y: 1,
        }
    }
}

impl Scaling {
    pub fn new(origin: Point, factor_x: i32, factor_y: i32) -> Result<Self, DrawError> {
        if factor_x < 1 || factor_y < 1 {
            return Err(DrawError::BadArgument(format!(
                "scale factors must be >= 1, got {}x{}",
                factor_x, factor_y
            )));
        }
        Ok(Self {
            origin,
            factor_x,
            factor_y,
        })
    }

    /// Unit factors, whatever the origin
    pub fn is_off(&self) -> bool {
        self.factor_x == 1 && self.factor_y == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A run of logical pixels resolved to physical addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalRun {
    /// Physical anchor of the first logical pixel
    pub start: Point,
    /// Physical offset between consecutive logical pixels
    pub step: Point,
    pub len: i32,
}

impl PhysicalRun {
    #[inline]
    pub fn point(&self, i: i32) -> Point {
        self.start.offset(self.step.x * i, self.step.y * i)
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.len).map(|i| self.point(i))
    }
}

/// Complete logical to physical mapping of one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    pub phys: Size,
    pub orientation: Orientation,
    pub scaling: Scaling,
}

impl Transform {
    pub fn new(phys: Size, orientation: Orientation, scaling: Scaling) -> Self {
        Self {
            phys,
            orientation,
            scaling,
        }
    }

    /// Buffer size seen through the orientation
    pub fn oriented_size(&self) -> Size {
        if self.orientation.swaps_axes() {
            self.phys.swapped()
        } else {
            self.phys
        }
    }

    #[inline]
    fn oriented_contains(&self, x: i64, y: i64) -> bool {
        let size = self.oriented_size();
        x >= 0 && y >= 0 && x < size.width as i64 && y < size.height as i64
    }

    /// Rotate an oriented point into the physical buffer
    #[inline]
    pub fn to_physical(&self, p: Point) -> Point {
        let (w, h) = (self.phys.width, self.phys.height);
        match self.orientation {
            Orientation::Normal => p,
            Orientation::Rotated90 => Point::new(w - 1 - p.y, p.x),
            Orientation::Rotated180 => Point::new(w - 1 - p.x, h - 1 - p.y),
            Orientation::Rotated270 => Point::new(p.y, h - 1 - p.x),
        }
    }

    /// Inverse of [`Transform::to_physical`]
    pub fn to_oriented(&self, p: Point) -> Point {
        let (w, h) = (self.phys.width, self.phys.height);
        match self.orientation {
            Orientation::Normal => p,
            Orientation::Rotated90 => Point::new(p.y, w - 1 - p.x),
            Orientation::Rotated180 => Point::new(w - 1 - p.x, h - 1 - p.y),
            Orientation::Rotated270 => Point::new(h - 1 - p.y, p.x),
        }
    }

    #[inline]
    fn logical_to_oriented(&self, x: i32, y: i32) -> (i64, i64) {
        let s = &self.scaling;
        (
            s.origin.x as i64 + x as i64 * s.factor_x as i64,
            s.origin.y as i64 + y as i64 * s.factor_y as i64,
        )
    }

    /// Physical anchor of logical (x, y), if it lies in the buffer
    pub fn map_point(&self, x: i32, y: i32) -> Option<Point> {
        let (ox, oy) = self.logical_to_oriented(x, y);
        self.oriented_contains(ox, oy)
            .then(|| self.to_physical(Point::new(ox as i32, oy as i32)))
    }

    /// Validate a run of `len` logical pixels from (x, y) and resolve it
    pub fn map_run(&self, x: i32, y: i32, len: i32, axis: Axis) -> Result<PhysicalRun, ContractViolation> {
        if len <= 0 {
            return Err(ContractViolation::ZeroLength);
        }
        let (ex, ey) = match axis {
            Axis::Horizontal => (x as i64 + len as i64 - 1, y as i64),
            Axis::Vertical => (x as i64, y as i64 + len as i64 - 1),
        };
        let end_ok = i32::try_from(ex)
            .ok()
            .zip(i32::try_from(ey).ok())
            .and_then(|(ex, ey)| self.map_point(ex, ey));
        let start = self.map_point(x, y);
        match (start, end_ok) {
            (Some(start), Some(_)) => {
                let (ux, uy) = self.orientation.unit_steps();
                let step = match axis {
                    Axis::Horizontal => Point::new(ux.x * self.scaling.factor_x, ux.y * self.scaling.factor_x),
                    Axis::Vertical => Point::new(uy.x * self.scaling.factor_y, uy.y * self.scaling.factor_y),
                };
                Ok(PhysicalRun { start, step, len })
            },
            _ => Err(ContractViolation::OutOfBounds),
        }
    }

    /// Physical pixels covered by logical (x, y), clipped at the buffer edge
    pub fn block(&self, x: i32, y: i32) -> impl Iterator<Item = Point> + '_ {
        let (ox, oy) = self.logical_to_oriented(x, y);
        let (fx, fy) = (self.scaling.factor_x as i64, self.scaling.factor_y as i64);
        (oy..oy + fy)
            .flat_map(move |py| (ox..ox + fx).map(move |px| (px, py)))
            .filter(|&(px, py)| self.oriented_contains(px, py))
            .map(|(px, py)| self.to_physical(Point::new(px as i32, py as i32)))
    }

    /// Logical rectangle whose anchors lie inside the buffer
    pub fn draw_rect(&self) -> Rect {
        let size = self.oriented_size();
        let s = &self.scaling;
        // first anchor >= 0 and last anchor < extent, per axis
        let first = |origin: i32, f: i32| ceil_div(-(origin as i64), f as i64);
        let past = |origin: i32, f: i32, extent: i32| (extent as i64 - 1 - origin as i64).div_euclid(f as i64) + 1;
        let tl = Point::new(
            saturate(first(s.origin.x, s.factor_x)),
            saturate(first(s.origin.y, s.factor_y)),
        );
        let br = Point::new(
            saturate(past(s.origin.x, s.factor_x, size.width)),
            saturate(past(s.origin.y, s.factor_y, size.height)),
        );
        if br.x <= tl.x || br.y <= tl.y {
            return Rect::new(tl, tl);
        }
        Rect::new(tl, br)
    }

    /// Physical bounding rectangle of a logical rectangle, clipped to the buffer
    pub fn logical_rect_to_physical(&self, rect: Rect) -> Rect {
        if rect.is_empty() {
            return Rect::default();
        }
        let size = self.oriented_size();
        let (x0, y0) = self.logical_to_oriented(rect.tl.x, rect.tl.y);
        let (x1, y1) = self.logical_to_oriented(rect.br.x, rect.br.y);
        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(size.width as i64);
        let y1 = y1.min(size.height as i64);
        if x1 <= x0 || y1 <= y0 {
            return Rect::default();
        }
        let a = self.to_physical(Point::new(x0 as i32, y0 as i32));
        let b = self.to_physical(Point::new(x1 as i32 - 1, y1 as i32 - 1));
        Rect::spanning(a, b)
    }
}

fn ceil_div(n: i64, d: i64) -> i64 {
    n.div_euclid(d) + i64::from(n.rem_euclid(d) != 0)
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
