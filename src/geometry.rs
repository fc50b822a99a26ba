//! Integer points, sizes and rectangles
//!
//! Rectangles are half-open: `tl` is inside, `br` is one past the last
//! column and row.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn swapped(self) -> Self {
        Self::new(self.height, self.width)
    }

    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub const fn area(self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub tl: Point,
    pub br: Point,
}

impl Rect {
    pub const fn new(tl: Point, br: Point) -> Self {
        Self { tl, br }
    }

    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(Point::new(x, y), Point::new(x + width, y + height))
    }

    pub const fn from_size(size: Size) -> Self {
        Self::from_xywh(0, 0, size.width, size.height)
    }

    /// Smallest rectangle holding both corners, whichever order they come in
    pub fn spanning(a: Point, b: Point) -> Self {
        Self::new(
            Point::new(a.x.min(b.x), a.y.min(b.y)),
            Point::new(a.x.max(b.x) + 1, a.y.max(b.y) + 1),
        )
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.br.x - self.tl.x
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.br.y - self.tl.y
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub const fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.br.x && p.y >= self.tl.y && p.y < self.br.y
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        Rect::new(
            Point::new(self.tl.x.max(other.tl.x), self.tl.y.max(other.tl.y)),
            Point::new(self.br.x.min(other.br.x), self.br.y.min(other.br.y)),
        )
    }

    /// Bounding rectangle of both; an empty operand is ignored
    pub fn bounding(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            Point::new(self.tl.x.min(other.tl.x), self.tl.y.min(other.tl.y)),
            Point::new(self.br.x.max(other.br.x), self.br.y.max(other.br.y)),
        )
    }
}
