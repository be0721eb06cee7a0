//! Integer geometric primitives for pixel grids.
//!
//! Every coordinate is a named field: `x` is the column, `y` is the row.

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};

/// Pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Extent of a grid or block in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check whether a block of this size fits inside `outer`.
    #[inline]
    pub fn fits_in(self, outer: Size) -> bool {
        self.width <= outer.width && self.height <= outer.height
    }
}

/// Axis-aligned rectangle with unsigned origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(self) -> u32 {
        self.y + self.height
    }

    /// Check if `other` lies entirely inside this rectangle.
    pub fn contains_rect(self, other: Rect) -> bool {
        let right = |r: Rect| r.x as u64 + r.width as u64;
        let bottom = |r: Rect| r.y as u64 + r.height as u64;
        other.x >= self.x
            && other.y >= self.y
            && right(other) <= right(self)
            && bottom(other) <= bottom(self)
    }
}

/// Object bounding box `(x0, y0, x1, y1)` with exclusive upper corner.
///
/// Construction and deserialization normalize the corners so that
/// `x0 <= x1` and `y0 <= y1`. Coordinates are signed because boxes come from
/// user input and may be partially off-frame until validated with
/// [`BoundingBox::to_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "BoxCorners")]
pub struct BoundingBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// Corners as written in a settings file, in any order.
#[derive(Deserialize)]
struct BoxCorners {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl From<BoxCorners> for BoundingBox {
    fn from(c: BoxCorners) -> Self {
        Self::new(c.x0, c.y0, c.x1, c.y1)
    }
}

impl BoundingBox {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x0: rect.x as i32,
            y0: rect.y as i32,
            x1: rect.right() as i32,
            y1: rect.bottom() as i32,
        }
    }

    #[inline]
    pub fn width(self) -> u32 {
        self.x1.abs_diff(self.x0)
    }

    #[inline]
    pub fn height(self) -> u32 {
        self.y1.abs_diff(self.y0)
    }

    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Validate against a frame and convert to a pixel rectangle.
    ///
    /// Corners are re-ordered first, since the fields can be written directly.
    pub fn to_rect(self, frame: Size) -> Result<Rect> {
        let b = Self::new(self.x0, self.y0, self.x1, self.y1);
        if b.is_degenerate() {
            return Err(MotionError::InvalidParameter(format!(
                "bounding box ({}, {}, {}, {}) has zero area",
                b.x0, b.y0, b.x1, b.y1
            )));
        }
        let inside = b.x0 >= 0
            && b.y0 >= 0
            && b.x1 as i64 <= frame.width as i64
            && b.y1 as i64 <= frame.height as i64;
        if !inside {
            return Err(MotionError::BoxOutOfBounds {
                x0: b.x0,
                y0: b.y0,
                x1: b.x1,
                y1: b.y1,
                frame_width: frame.width,
                frame_height: frame.height,
            });
        }
        Ok(Rect::new(b.x0 as u32, b.y0 as u32, b.width(), b.height()))
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}

impl From<[i32; 4]> for BoundingBox {
    fn from(c: [i32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}
