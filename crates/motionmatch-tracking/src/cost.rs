//! Pixel-difference cost functions for block matching.

use motionmatch_core::{GrayFrame, MotionError, Point, Rect, Result};
use serde::{Deserialize, Serialize};

/// Cost used to compare a reference block with a candidate region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    /// Sum of absolute differences.
    #[default]
    Sad,
    /// Sum of squared differences.
    Ssd,
}

impl CostFunction {
    /// Cost of one row of samples.
    #[inline]
    pub fn row_cost(self, a: &[u8], b: &[u8]) -> u64 {
        match self {
            Self::Sad => sad(a, b),
            Self::Ssd => ssd(a, b),
        }
    }

    /// Cost between `reference` and the region of `target` with its
    /// top-left corner at `at`. The region must lie inside `target`.
    pub fn block_cost(self, reference: &GrayFrame, target: &GrayFrame, at: Point) -> u64 {
        debug_assert!(target
            .bounds()
            .contains_rect(Rect::from_origin_size(at, reference.size())));
        (0..reference.height)
            .map(|row| {
                self.row_cost(
                    reference.row(row),
                    target.row_span(at.x, at.y + row, reference.width),
                )
            })
            .sum()
    }

    /// Cost between two frames of identical size.
    pub fn cost(self, a: &GrayFrame, b: &GrayFrame) -> Result<u64> {
        if a.size() != b.size() {
            return Err(MotionError::FrameSizeMismatch {
                expected_width: a.width,
                expected_height: a.height,
                width: b.width,
                height: b.height,
            });
        }
        Ok(self.block_cost(a, b, Point::new(0, 0)))
    }
}

/// Sum of absolute differences between two equal-length sample runs.
#[inline]
pub fn sad(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&p, &q)| p.abs_diff(q) as u64)
        .sum()
}

/// Sum of squared differences between two equal-length sample runs.
#[inline]
pub fn ssd(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&p, &q)| {
            let d = p.abs_diff(q) as u64;
            d * d
        })
        .sum()
}
