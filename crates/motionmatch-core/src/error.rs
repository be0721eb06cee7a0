//! Error types for MotionMatch.

use thiserror::Error;

/// Main error type for MotionMatch operations.
///
/// Only configuration problems are errors. A block without a match or a
/// tracker that lost its object are ordinary results, not failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Block {block_width}x{block_height} does not fit in frame {frame_width}x{frame_height}")]
    BlockExceedsFrame {
        block_width: u32,
        block_height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Bounding box ({x0}, {y0}, {x1}, {y1}) lies outside frame {frame_width}x{frame_height}")]
    BoxOutOfBounds {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Frame size mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    FrameSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Requested {requested} frames but only {available} were supplied")]
    NotEnoughFrames { requested: usize, available: usize },

    #[error("Frame data has {len} samples, expected {expected}")]
    InvalidFrameData { len: usize, expected: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for MotionMatch operations.
pub type Result<T> = std::result::Result<T, MotionError>;
