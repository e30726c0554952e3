//! Point, size and rectangle value types.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A location in a 2D coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Divide both coordinates by `factor`.
    #[inline]
    pub fn scaled_down(self, factor: f64) -> Self {
        Self::new(self.x / factor, self.y / factor)
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

/// A width/height pair. Dimensions are expected to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative or NaN.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Multiply both dimensions by `factor`.
    #[inline]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Grow (or shrink, for negative values) both dimensions by `2 * margin`.
    #[inline]
    pub fn outset(self, margin: f64) -> Self {
        Self::new(self.width + margin * 2.0, self.height + margin * 2.0)
    }

    /// Component-wise minimum.
    pub fn min(self, other: Size) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// A rectangle of `size` anchored at the origin.
    pub fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// Build a rectangle from its four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Translate by `delta`.
    pub fn offset_by(self, delta: Point) -> Self {
        Self::from_origin_size(self.origin + delta, self.size)
    }

    /// True when `point` lies inside the rectangle (edges inclusive).
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// True when `other` lies fully inside this rectangle, allowing `epsilon`
    /// of floating-point slack on every edge.
    pub fn contains_rect(&self, other: &Rect, epsilon: f64) -> bool {
        other.min_x() >= self.min_x() - epsilon
            && other.min_y() >= self.min_y() - epsilon
            && other.max_x() <= self.max_x() + epsilon
            && other.max_y() <= self.max_y() + epsilon
    }
}
