//! Dense block-matching motion field with motion-compensated reconstruction.

use motionmatch_core::{GrayFrame, MotionError, Point, Rect, Result, Size};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::{BlockMatcher, MatchOutcome, MatchParams};
use crate::window::SearchWindow;

/// Displacement of a block between two frames, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MotionVector {
    pub dx: i32,
    pub dy: i32,
}

impl MotionVector {
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    #[inline]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Vector pointing from `from` to `to`.
    #[inline]
    pub fn between(from: Point, to: Point) -> Self {
        Self {
            dx: to.x as i32 - from.x as i32,
            dy: to.y as i32 - from.y as i32,
        }
    }

    /// Euclidean length.
    #[inline]
    pub fn magnitude(self) -> f32 {
        ((self.dx * self.dx + self.dy * self.dy) as f32).sqrt()
    }
}

/// Parameters for dense motion estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenseFieldParams {
    /// Tile width in pixels.
    pub block_width: u32,
    /// Tile height in pixels.
    pub block_height: u32,
    /// Distance between consecutive tile anchors; smaller than the block for overlap.
    pub step: u32,
    /// Search reach around each tile anchor.
    pub search_radius: u32,
    pub matching: MatchParams,
}

impl Default for DenseFieldParams {
    fn default() -> Self {
        Self {
            block_width: 8,
            block_height: 8,
            step: 8,
            search_radius: 8,
            matching: MatchParams::default(),
        }
    }
}

impl DenseFieldParams {
    #[inline]
    pub fn block_size(&self) -> Size {
        Size::new(self.block_width, self.block_height)
    }

    /// Reject zero sizes.
    pub fn validate(&self) -> Result<()> {
        if self.block_width == 0 || self.block_height == 0 {
            return Err(MotionError::InvalidParameter(format!(
                "block size must be positive, got {}x{}",
                self.block_width, self.block_height
            )));
        }
        if self.step == 0 {
            return Err(MotionError::InvalidParameter(
                "tile step must be positive".into(),
            ));
        }
        if self.search_radius == 0 {
            return Err(MotionError::InvalidParameter(
                "search radius must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Line from a tile anchor to the position it was matched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionSegment {
    pub from: Point,
    pub to: Point,
}

/// Match result for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEntry {
    /// Top-left corner of the tile in the source frame.
    pub anchor: Point,
    pub outcome: MatchOutcome,
}

impl FieldEntry {
    /// Motion of the tile, or `None` when no match was found.
    pub fn vector(&self) -> Option<MotionVector> {
        self.outcome
            .position()
            .map(|to| MotionVector::between(self.anchor, to))
    }

    pub fn segment(&self) -> Option<MotionSegment> {
        self.outcome.position().map(|to| MotionSegment {
            from: self.anchor,
            to,
        })
    }
}

/// Per-tile motion of one frame pair, in tiling order.
#[derive(Debug, Clone)]
pub struct MotionField {
    pub width: u32,
    pub height: u32,
    pub block: Size,
    entries: Vec<FieldEntry>,
}

impl MotionField {
    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry of the tile anchored at `anchor`.
    pub fn get(&self, anchor: Point) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.anchor == anchor)
    }

    /// Motion vectors in tiling order; unmatched tiles yield `None`.
    pub fn vectors(&self) -> impl Iterator<Item = Option<MotionVector>> + '_ {
        self.entries.iter().map(FieldEntry::vector)
    }

    /// Number of tiles that found a match.
    pub fn found_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_found()).count()
    }

    /// Mean vector length over matched tiles.
    pub fn mean_magnitude(&self) -> f32 {
        let (sum, count) = self
            .vectors()
            .flatten()
            .fold((0.0f32, 0usize), |(s, n), v| (s + v.magnitude(), n + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }
}

/// Output of dense estimation for one frame pair.
#[derive(Debug, Clone)]
pub struct DenseField {
    pub field: MotionField,
    /// Source frame rebuilt from matched regions of the target frame.
    pub reconstruction: GrayFrame,
    /// One segment per matched tile, for drawing.
    pub segments: Vec<MotionSegment>,
}

impl DenseField {
    /// Estimate the motion of every tile of `source` into `target`.
    ///
    /// Tiles are searched in parallel, but the reconstruction is written in
    /// tiling order so that overlapping tiles resolve the same way every run.
    pub fn estimate(
        source: &GrayFrame,
        target: &GrayFrame,
        params: &DenseFieldParams,
    ) -> Result<Self> {
        params.validate()?;
        if source.size() != target.size() {
            return Err(MotionError::FrameSizeMismatch {
                expected_width: source.width,
                expected_height: source.height,
                width: target.width,
                height: target.height,
            });
        }
        let block = params.block_size();
        if !block.fits_in(source.size()) {
            return Err(MotionError::BlockExceedsFrame {
                block_width: block.width,
                block_height: block.height,
                frame_width: source.width,
                frame_height: source.height,
            });
        }

        let xs = tile_anchors(source.width, block.width, params.step);
        let ys = tile_anchors(source.height, block.height, params.step);
        let anchors: Vec<Point> = ys
            .iter()
            .flat_map(|&y| xs.iter().map(move |&x| Point::new(x, y)))
            .collect();

        let matcher = BlockMatcher::new(params.matching);
        let entries = anchors
            .par_iter()
            .map(|&anchor| -> Result<FieldEntry> {
                let reference = source.region(Rect::from_origin_size(anchor, block))?;
                let window =
                    SearchWindow::around_anchor(anchor, block, params.search_radius, target.size());
                Ok(FieldEntry {
                    anchor,
                    outcome: matcher.find(&reference, anchor, target, window),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Unmatched tiles keep their source pixels.
        let mut reconstruction = source.clone();
        let mut segments = Vec::with_capacity(entries.len());
        for entry in &entries {
            if let Some(position) = entry.outcome.position() {
                reconstruction.blit(target, Rect::from_origin_size(position, block), entry.anchor)?;
            }
            segments.extend(entry.segment());
        }

        let field = MotionField {
            width: source.width,
            height: source.height,
            block,
            entries,
        };
        debug!(
            tiles = field.len(),
            found = field.found_count(),
            mean_magnitude = field.mean_magnitude(),
            "dense motion field computed"
        );

        Ok(Self {
            field,
            reconstruction,
            segments,
        })
    }

    /// Draw every segment in black on a white frame.
    pub fn render_vectors(&self) -> GrayFrame {
        let mut canvas = GrayFrame::filled(self.field.width, self.field.height, 255);
        for segment in &self.segments {
            canvas.draw_line(segment.from, segment.to, 0);
        }
        canvas
    }
}

/// Anchors of tiles along one axis.
///
/// Anchors advance by `step`; one that would let the block run past the end
/// is pulled back so the block ends exactly at the frame edge.
pub fn tile_anchors(frame_len: u32, block_len: u32, step: u32) -> Vec<u32> {
    if block_len == 0 || block_len > frame_len || step == 0 {
        return Vec::new();
    }
    let last = frame_len - block_len;
    let mut anchors: Vec<u32> = (0..frame_len)
        .step_by(step as usize)
        .map(|a| a.min(last))
        .collect();
    anchors.dedup();
    anchors
}
