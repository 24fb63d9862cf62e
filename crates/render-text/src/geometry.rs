//! Minimal 2D geometry used for text-space and view-space coordinates.

use core::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Round both dimensions up to whole pixels.
    pub fn ceil(self) -> Self {
        Self::new(self.width.ceil(), self.height.ceil())
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn offset(&self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Shrink the rectangle by the given per-edge insets (negative grows).
    pub fn inset(&self, insets: Insets) -> Self {
        Self::new(
            self.x + insets.left,
            self.y + insets.top,
            (self.width - insets.left - insets.right).max(0.0),
            (self.height - insets.top - insets.bottom).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

/// Horizontal pixel span. Reversed (`start > end`) for right-to-left glyphs
/// so that `start` is always the leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeF {
    pub start: f32,
    pub end: f32,
}

impl RangeF {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub const fn point(x: f32) -> Self {
        Self { start: x, end: x }
    }

    pub fn min(&self) -> f32 {
        self.start.min(self.end)
    }

    pub fn max(&self) -> f32 {
        self.start.max(self.end)
    }

    pub fn len(&self) -> f32 {
        (self.end - self.start).abs()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }
}
