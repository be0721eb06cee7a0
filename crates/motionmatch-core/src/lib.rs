//! MotionMatch Core - Foundation types for block-matching motion estimation
//!
//! This crate provides the passive data shared by the matching algorithms:
//! - Greyscale frames (GrayFrame)
//! - Integer geometry (Point, Size, Rect, BoundingBox)
//! - The error type and Result alias

pub mod error;
pub mod frame;
pub mod geometry;

pub use error::{MotionError, Result};
pub use frame::GrayFrame;
pub use geometry::{BoundingBox, Point, Rect, Size};
