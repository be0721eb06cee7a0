//! Integration test crate for MotionMatch.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives the matching core through its public API the way frame
//! decoders and viewers would.


#[cfg(test)]
mod dense;

#[cfg(test)]
mod tracking;
