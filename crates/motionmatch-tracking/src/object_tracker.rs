//! Single-object bounding box tracker.
//!
//! The box selected on the first frame is matched into each following frame
//! with the block matcher. Every match must also pass a histogram
//! intersection check; the first failure marks the object as lost for good.

use motionmatch_core::{BoundingBox, GrayFrame, MotionError, Rect, Result, Size};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cost::CostFunction;
use crate::histogram::Histogram;
use crate::matcher::{BlockMatcher, MatchOutcome, MatchParams};
use crate::window::SearchWindow;

/// Co-located cost below which the object is assumed not to have moved.
pub const DEFAULT_FAST_PATH_THRESHOLD: u64 = 5000;

/// Minimum histogram intersection for a match to be accepted.
pub const DEFAULT_MIN_HISTOGRAM_INTERSECTION: f64 = 0.5;

/// Parameters for single-object tracking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    pub fast_path_threshold: u64,
    pub min_histogram_intersection: f64,
    pub cost: CostFunction,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            fast_path_threshold: DEFAULT_FAST_PATH_THRESHOLD,
            min_histogram_intersection: DEFAULT_MIN_HISTOGRAM_INTERSECTION,
            cost: CostFunction::Sad,
        }
    }
}

impl TrackerParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_histogram_intersection) {
            return Err(MotionError::InvalidParameter(format!(
                "histogram intersection threshold must be within [0, 1], got {}",
                self.min_histogram_intersection
            )));
        }
        Ok(())
    }

    fn match_params(&self) -> MatchParams {
        MatchParams {
            cost: self.cost,
            zero_motion_threshold: Some(self.fast_path_threshold),
            scan_stop_threshold: None,
        }
    }
}

/// Why the tracker stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LossReason {
    /// The search window held no candidate.
    NoCandidate,
    /// The best candidate's histogram differed too much from the object's.
    HistogramMismatch { ratio: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerState {
    Tracking,
    /// Terminal. `frame` is the first frame without a box.
    Lost { frame: usize, reason: LossReason },
}

/// One box slot per requested frame.
///
/// Slot 0 holds the seed. Once a slot is `None`, every later slot is too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    boxes: Vec<Option<BoundingBox>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, frame: usize) -> Option<BoundingBox> {
        self.boxes.get(frame).copied().flatten()
    }

    pub fn as_slice(&self) -> &[Option<BoundingBox>] {
        &self.boxes
    }

    /// Boxes up to the first frame where the object was lost.
    pub fn tracked(&self) -> impl Iterator<Item = (usize, BoundingBox)> + '_ {
        self.boxes
            .iter()
            .enumerate()
            .map_while(|(i, b)| b.map(|b| (i, b)))
    }

    /// Index of the first frame without a box.
    pub fn lost_at(&self) -> Option<usize> {
        self.boxes.iter().position(Option::is_none)
    }

    /// Copies of the tracked frames with the box outline drawn in `value`.
    pub fn overlay(&self, frames: &[GrayFrame], value: u8) -> Vec<GrayFrame> {
        self.tracked()
            .filter_map(|(i, b)| {
                let mut frame = frames.get(i)?.clone();
                if let Ok(rect) = b.to_rect(frame.size()) {
                    frame.draw_rect_outline(rect, value);
                }
                Some(frame)
            })
            .collect()
    }
}

/// Follows one bounding box from frame to frame.
pub struct ObjectTracker {
    params: TrackerParams,
    matcher: BlockMatcher,
    frame_size: Size,
    current: Rect,
    frame_index: usize,
    state: TrackerState,
}

impl ObjectTracker {
    /// Start tracking `seed` on a frame of `frame_size`.
    pub fn new(seed: BoundingBox, frame_size: Size, params: TrackerParams) -> Result<Self> {
        params.validate()?;
        let current = seed.to_rect(frame_size)?;
        Ok(Self {
            matcher: BlockMatcher::new(params.match_params()),
            params,
            frame_size,
            current,
            frame_index: 0,
            state: TrackerState::Tracking,
        })
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_lost(&self) -> bool {
        matches!(self.state, TrackerState::Lost { .. })
    }

    /// Index of the frame the current box belongs to.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Box on the current frame, or `None` once lost.
    pub fn current_box(&self) -> Option<BoundingBox> {
        match self.state {
            TrackerState::Tracking => Some(BoundingBox::from_rect(self.current)),
            TrackerState::Lost { .. } => None,
        }
    }

    /// Advance from `prev` (the current frame) to `next`.
    ///
    /// Returns the box on `next`, or `None` if the object is lost. A lost
    /// tracker performs no further matching.
    pub fn step(&mut self, prev: &GrayFrame, next: &GrayFrame) -> Result<Option<BoundingBox>> {
        if self.is_lost() {
            return Ok(None);
        }
        for frame in [prev, next] {
            if frame.size() != self.frame_size {
                return Err(MotionError::FrameSizeMismatch {
                    expected_width: self.frame_size.width,
                    expected_height: self.frame_size.height,
                    width: frame.width,
                    height: frame.height,
                });
            }
        }

        let reference = prev.region(self.current)?;
        let window = SearchWindow::around_box(self.current, next.size());
        let outcome = self
            .matcher
            .find(&reference, self.current.origin(), next, window);

        let (position, cost, early_exit) = match outcome {
            MatchOutcome::Found {
                position,
                cost,
                early_exit,
            } => (position, cost, early_exit),
            MatchOutcome::NotFound => {
                self.lose(LossReason::NoCandidate);
                return Ok(None);
            }
        };

        let candidate = Rect::from_origin_size(position, self.current.size());
        let ratio = Histogram::from_frame(&reference)
            .intersection_ratio(&Histogram::from_region(next, candidate)?);
        if ratio < self.params.min_histogram_intersection {
            self.lose(LossReason::HistogramMismatch { ratio });
            return Ok(None);
        }

        self.current = candidate;
        self.frame_index += 1;
        debug!(
            frame = self.frame_index,
            x = position.x,
            y = position.y,
            cost,
            early_exit,
            ratio,
            "object matched"
        );
        Ok(Some(BoundingBox::from_rect(candidate)))
    }

    fn lose(&mut self, reason: LossReason) {
        let frame = self.frame_index + 1;
        info!(frame, ?reason, "object lost");
        self.state = TrackerState::Lost { frame, reason };
    }
}

/// Track `seed` across the first `frame_count` frames.
///
/// The trajectory always has `frame_count` slots; slots after the object is
/// lost are `None`.
pub fn track_object(
    frames: &[GrayFrame],
    seed: BoundingBox,
    frame_count: usize,
    params: &TrackerParams,
) -> Result<Trajectory> {
    if frame_count == 0 {
        return Err(MotionError::InvalidParameter(
            "frame count must be positive".into(),
        ));
    }
    if frames.len() < frame_count {
        return Err(MotionError::NotEnoughFrames {
            requested: frame_count,
            available: frames.len(),
        });
    }
    let frames = &frames[..frame_count];
    let size = frames[0].size();
    if let Some(odd) = frames.iter().find(|f| f.size() != size) {
        return Err(MotionError::FrameSizeMismatch {
            expected_width: size.width,
            expected_height: size.height,
            width: odd.width,
            height: odd.height,
        });
    }

    let mut tracker = ObjectTracker::new(seed, size, *params)?;
    let mut boxes = vec![None; frame_count];
    boxes[0] = tracker.current_box();

    for (i, pair) in frames.windows(2).enumerate() {
        match tracker.step(&pair[0], &pair[1])? {
            Some(next) => boxes[i + 1] = Some(next),
            None => break,
        }
    }

    Ok(Trajectory { boxes })
}
