//! Intensity histograms and histogram intersection.

use motionmatch_core::{GrayFrame, Rect, Result};

/// 256-bin intensity histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u32; 256],
}

impl Histogram {
    /// Histogram of every sample in `frame`.
    pub fn from_frame(frame: &GrayFrame) -> Self {
        let mut bins = [0u32; 256];
        for &v in frame.as_slice() {
            bins[v as usize] += 1;
        }
        Self { bins }
    }

    /// Histogram of the samples of `frame` inside `rect`.
    pub fn from_region(frame: &GrayFrame, rect: Rect) -> Result<Self> {
        Ok(Self::from_frame(&frame.region(rect)?))
    }

    #[inline]
    pub fn bin(&self, value: u8) -> u32 {
        self.bins[value as usize]
    }

    /// Number of samples counted.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// `Σ min(self[k], other[k])`.
    pub fn intersection(&self, other: &Histogram) -> u64 {
        self.bins
            .iter()
            .zip(other.bins.iter())
            .map(|(&a, &b)| a.min(b) as u64)
            .sum()
    }

    /// Intersection normalized by this histogram's total, in `[0, 1]`.
    ///
    /// An empty histogram has no overlap with anything and yields 0.
    pub fn intersection_ratio(&self, other: &Histogram) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.intersection(other) as f64 / total as f64
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self { bins: [0; 256] }
    }
}
