#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Dominant-color extraction from flat RGBA pixel buffers.
//!
//! The caller supplies an already-decoded, interleaved RGBA buffer; this crate
//! filters out near-extreme and low-opacity samples, clusters the rest with
//! either recursive median-cut box splitting or an octree with online
//! reduction, and returns a ranked palette of mean colors.
//!
//! ```
//! use colorsnap::{Algorithm, ExtractConfig};
//!
//! // Two opaque pixels: red and green.
//! let buffer = [255, 0, 0, 255, 0, 255, 0, 255];
//! let config = ExtractConfig::new()
//!     .algorithm(Algorithm::MedianCut)
//!     .cut_time(2)
//!     .result_num(2);
//! let colors = colorsnap::extract(&buffer, &config).unwrap();
//! assert_eq!(colors.len(), 2);
//! assert_eq!(colors[0].pixel_count, 1);
//! ```
//!
//! Every call owns its own working state, so whole invocations can be moved
//! freely across threads.

extern crate alloc;

pub mod error;
pub mod filter;
pub mod median_cut;
pub mod octree;
pub mod palette;

pub use error::ExtractError;
pub use palette::ThemeColor;

use alloc::vec::Vec;

/// Which quantization engine clusters the filtered pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Recursive median-cut box splitting, bounded by `cut_time` boxes.
    MedianCut,
    /// Depth-8 octree with online reduction to `max_leaf_num` leaves.
    OcTree,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::MedianCut
    }
}

/// Configuration for one extraction call.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Maximum number of ranked colors to return.
    pub result_num: usize,
    /// Quantization engine.
    pub algorithm: Algorithm,
    /// Median-cut target box count.
    pub cut_time: usize,
    /// Octree live-leaf budget.
    pub max_leaf_num: usize,
    /// [lo, hi] inclusion band for the pixel filter.
    pub filter_range: (u8, u8),
    /// Minimum alpha for a pixel to participate.
    pub alpha_min: u8,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            result_num: 5,
            algorithm: Algorithm::MedianCut,
            cut_time: 16,
            max_leaf_num: 256,
            filter_range: (8, 247),
            alpha_min: 128,
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result_num(mut self, n: usize) -> Self {
        self.result_num = n;
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn cut_time(mut self, n: usize) -> Self {
        self.cut_time = n;
        self
    }

    pub fn max_leaf_num(mut self, n: usize) -> Self {
        self.max_leaf_num = n;
        self
    }

    pub fn filter_range(mut self, lo: u8, hi: u8) -> Self {
        self.filter_range = (lo, hi);
        self
    }

    pub fn alpha_min(mut self, alpha: u8) -> Self {
        self.alpha_min = alpha;
        self
    }
}

/// Extract the dominant colors of an interleaved RGBA buffer.
///
/// Returns at most `result_num` colors, descending by pixel count. Fewer
/// clusters than asked for is not an error; a filter that rejects every pixel
/// is ([`ExtractError::EmptyResult`]).
pub fn extract(buffer: &[u8], config: &ExtractConfig) -> Result<Vec<ThemeColor>, ExtractError> {
    validate_inputs(buffer, config)?;

    let pixels = filter::filter_pixels(buffer, config.filter_range, config.alpha_min);
    if pixels.is_empty() {
        return Err(ExtractError::EmptyResult);
    }

    let ranked = match config.algorithm {
        Algorithm::MedianCut => {
            median_cut::median_cut(pixels, config.cut_time, config.result_num)
        }
        Algorithm::OcTree => octree::octree(&pixels, config.max_leaf_num, config.result_num),
    };

    Ok(palette::build_theme_colors(ranked))
}

fn validate_inputs(buffer: &[u8], config: &ExtractConfig) -> Result<(), ExtractError> {
    if buffer.len() % 4 != 0 {
        return Err(ExtractError::BufferLength { len: buffer.len() });
    }
    let (lo, hi) = config.filter_range;
    if lo > hi {
        return Err(ExtractError::FilterRange { lo, hi });
    }
    if config.result_num == 0 {
        return Err(ExtractError::ZeroResultNum);
    }
    if config.cut_time == 0 {
        return Err(ExtractError::ZeroCutTime);
    }
    if config.max_leaf_num == 0 {
        return Err(ExtractError::ZeroMaxLeafNum);
    }
    Ok(())
}
