//! Boundary-safe search windows.
//!
//! A window is first laid out at its desired position and size, then clamped
//! per axis: it is shifted back inside the frame when it hangs over an edge,
//! and only shrunk when the desired extent is larger than the frame itself.

use motionmatch_core::{Point, Rect, Size};

/// Region of a target frame in which candidate blocks are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    rect: Rect,
}

impl SearchWindow {
    /// Clamp the desired window `(x, y, width, height)` into `frame`.
    pub fn clamped(x: i64, y: i64, width: u64, height: u64, frame: Size) -> Self {
        let (x, width) = clamp_axis(x, width, frame.width);
        let (y, height) = clamp_axis(y, height, frame.height);
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }

    /// Window covering every block anchor within `radius` of `anchor`.
    pub fn around_anchor(anchor: Point, block: Size, radius: u32, frame: Size) -> Self {
        let r = radius as i64;
        Self::clamped(
            anchor.x as i64 - r,
            anchor.y as i64 - r,
            block.width as u64 + 2 * radius as u64,
            block.height as u64 + 2 * radius as u64,
            frame,
        )
    }

    /// Window centered on `object`, reaching one object width/height to each side.
    ///
    /// The center of an odd-sized box is rounded down.
    pub fn around_box(object: Rect, frame: Size) -> Self {
        let cx = object.x as i64 + object.width as i64 / 2;
        let cy = object.y as i64 + object.height as i64 / 2;
        Self::clamped(
            cx - object.width as i64,
            cy - object.height as i64,
            2 * object.width as u64,
            2 * object.height as u64,
            frame,
        )
    }

    /// Window spanning the whole frame.
    pub fn whole(frame: Size) -> Self {
        Self {
            rect: Rect::new(0, 0, frame.width, frame.height),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Whether at least one block of `block` size fits in the window.
    #[inline]
    pub fn fits(&self, block: Size) -> bool {
        !block.is_empty() && block.fits_in(self.rect.size())
    }

    /// Number of candidate positions for a block of `block` size.
    pub fn candidate_count(&self, block: Size) -> u64 {
        if !self.fits(block) {
            return 0;
        }
        (self.rect.width - block.width + 1) as u64 * (self.rect.height - block.height + 1) as u64
    }
}

/// Returns `(start, len)` of the clamped span on one axis.
fn clamp_axis(start: i64, len: u64, frame_len: u32) -> (u32, u32) {
    let len = len.min(frame_len as u64) as u32;
    let max_start = (frame_len - len) as i64;
    (start.clamp(0, max_start) as u32, len)
}
