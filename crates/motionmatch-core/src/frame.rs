//! 8-bit intensity frames in CPU memory.

use crate::error::{MotionError, Result};
use crate::geometry::{Point, Rect, Size};

/// A greyscale frame: `height` rows of `width` samples, row-major.
///
/// Frames are treated as read-only inputs by the matching code; outputs such
/// as reconstructions are always separate `GrayFrame`s owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    data: Vec<u8>,
}

impl GrayFrame {
    /// Create a black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create a frame with every sample set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Wrap existing row-major samples.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(MotionError::InvalidFrameData {
                len: data.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rectangle covering the whole frame.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Sample at `(x, y)`. The coordinate must be inside the frame.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Write a sample; coordinates outside the frame are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.data[y as usize * self.width as usize + x as usize] = value;
        }
    }

    /// One row of samples.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Samples of row `y` covering columns `x..x + len`.
    #[inline]
    pub fn row_span(&self, x: u32, y: u32, len: u32) -> &[u8] {
        let start = y as usize * self.width as usize + x as usize;
        &self.data[start..start + len as usize]
    }

    #[inline]
    fn row_span_mut(&mut self, x: u32, y: u32, len: u32) -> &mut [u8] {
        let start = y as usize * self.width as usize + x as usize;
        &mut self.data[start..start + len as usize]
    }

    /// Copy out a rectangular region as a new frame.
    pub fn region(&self, rect: Rect) -> Result<GrayFrame> {
        self.check_inside(rect)?;
        let mut data = Vec::with_capacity(rect.width as usize * rect.height as usize);
        for y in rect.y..rect.bottom() {
            data.extend_from_slice(self.row_span(rect.x, y, rect.width));
        }
        Ok(GrayFrame {
            width: rect.width,
            height: rect.height,
            data,
        })
    }

    /// Copy `src_rect` of `src` into this frame with its top-left corner at `dst`.
    pub fn blit(&mut self, src: &GrayFrame, src_rect: Rect, dst: Point) -> Result<()> {
        src.check_inside(src_rect)?;
        self.check_inside(Rect::from_origin_size(dst, src_rect.size()))?;
        for row in 0..src_rect.height {
            let from = src.row_span(src_rect.x, src_rect.y + row, src_rect.width);
            self.row_span_mut(dst.x, dst.y + row, src_rect.width)
                .copy_from_slice(from);
        }
        Ok(())
    }

    /// Draw a one-pixel line with Bresenham's algorithm. Off-frame pixels are clipped.
    pub fn draw_line(&mut self, from: Point, to: Point, value: u8) {
        let (mut x, mut y) = (from.x as i64, from.y as i64);
        let (x1, y1) = (to.x as i64, to.y as i64);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if x >= 0 && y >= 0 {
                self.set(x as u32, y as u32, value);
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw the one-pixel outline of `rect`.
    pub fn draw_rect_outline(&mut self, rect: Rect, value: u8) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;
        self.draw_line(rect.origin(), Point::new(right, rect.y), value);
        self.draw_line(Point::new(right, rect.y), Point::new(right, bottom), value);
        self.draw_line(Point::new(right, bottom), Point::new(rect.x, bottom), value);
        self.draw_line(Point::new(rect.x, bottom), rect.origin(), value);
    }

    fn check_inside(&self, rect: Rect) -> Result<()> {
        if self.bounds().contains_rect(rect) {
            Ok(())
        } else {
            Err(MotionError::BlockExceedsFrame {
                block_width: rect.width,
                block_height: rect.height,
                frame_width: self.width,
                frame_height: self.height,
            })
        }
    }
}
