//! Exhaustive block matcher with a zero-motion shortcut.

use motionmatch_core::{GrayFrame, Point, Rect};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::cost::CostFunction;
use crate::window::SearchWindow;

/// Zero-motion cost below which a block is considered not to have moved.
pub const DEFAULT_ZERO_MOTION_THRESHOLD: u64 = 10;

/// Result of a block search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Best candidate, as the top-left corner of the matched region.
    Found {
        position: Point,
        cost: u64,
        /// The search stopped before visiting every candidate.
        early_exit: bool,
    },
    /// The window could not hold a single candidate block.
    NotFound,
}

impl MatchOutcome {
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Found { position, .. } => Some(position),
            Self::NotFound => None,
        }
    }

    pub fn cost(&self) -> Option<u64> {
        match *self {
            Self::Found { cost, .. } => Some(cost),
            Self::NotFound => None,
        }
    }
}

/// Parameters shared by every block search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    /// Cost function used to rank candidates.
    pub cost: CostFunction,
    /// Accept the unshifted position outright when its cost is below this.
    pub zero_motion_threshold: Option<u64>,
    /// Stop the scan at the first improvement whose cost is below this.
    pub scan_stop_threshold: Option<u64>,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            cost: CostFunction::Sad,
            zero_motion_threshold: Some(DEFAULT_ZERO_MOTION_THRESHOLD),
            scan_stop_threshold: None,
        }
    }
}

/// Finds the region of a target frame that best matches a reference block.
#[derive(Debug, Clone, Default)]
pub struct BlockMatcher {
    params: MatchParams,
}

impl BlockMatcher {
    pub fn new(params: MatchParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MatchParams {
        &self.params
    }

    /// Match `reference`, taken at `origin` in the source frame, against `target`.
    ///
    /// The co-located candidate at `origin` is tried first; if it is cheap
    /// enough the search ends there. Otherwise every position in `window` is
    /// scanned row by row and the first candidate with the lowest cost wins.
    pub fn find(
        &self,
        reference: &GrayFrame,
        origin: Point,
        target: &GrayFrame,
        window: SearchWindow,
    ) -> MatchOutcome {
        if let Some(threshold) = self.params.zero_motion_threshold {
            let colocated = Rect::from_origin_size(origin, reference.size());
            if !reference.size().is_empty() && target.bounds().contains_rect(colocated) {
                let cost = self.params.cost.block_cost(reference, target, origin);
                if cost < threshold {
                    trace!(x = origin.x, y = origin.y, cost, "zero-motion early exit");
                    return MatchOutcome::Found {
                        position: origin,
                        cost,
                        early_exit: true,
                    };
                }
            }
        }
        self.scan(reference, target, window)
    }

    /// Scan every candidate position in `window`, ignoring the shortcut.
    pub fn scan(
        &self,
        reference: &GrayFrame,
        target: &GrayFrame,
        window: SearchWindow,
    ) -> MatchOutcome {
        let block = reference.size();
        let area = window.rect();
        if !window.fits(block) || !target.bounds().contains_rect(area) {
            warn!(
                block_width = block.width,
                block_height = block.height,
                window = ?area,
                "search window cannot hold the block"
            );
            return MatchOutcome::NotFound;
        }

        let last_x = area.right() - block.width;
        let last_y = area.bottom() - block.height;
        let mut best: Option<(Point, u64)> = None;

        for y in area.y..=last_y {
            for x in area.x..=last_x {
                let position = Point::new(x, y);
                let cost = self.params.cost.block_cost(reference, target, position);
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((position, cost));
                    if self
                        .params
                        .scan_stop_threshold
                        .is_some_and(|stop| cost < stop)
                    {
                        return MatchOutcome::Found {
                            position,
                            cost,
                            early_exit: true,
                        };
                    }
                }
            }
        }

        match best {
            Some((position, cost)) => MatchOutcome::Found {
                position,
                cost,
                early_exit: false,
            },
            None => MatchOutcome::NotFound,
        }
    }
}
