//! MotionMatch Tracking - Block-matching motion estimation and object tracking.

pub mod config;
pub mod cost;
pub mod histogram;
pub mod matcher;
pub mod motion_field;
pub mod object_tracker;
pub mod window;

pub use config::MotionConfig;
pub use cost::CostFunction;
pub use histogram::Histogram;
pub use matcher::{BlockMatcher, MatchOutcome, MatchParams};
pub use motion_field::{
    tile_anchors, DenseField, DenseFieldParams, FieldEntry, MotionField, MotionSegment,
    MotionVector,
};
pub use object_tracker::{
    track_object, LossReason, ObjectTracker, TrackerParams, TrackerState, Trajectory,
};
pub use window::SearchWindow;
