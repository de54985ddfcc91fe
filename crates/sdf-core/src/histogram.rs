//! Fixed-width counters over `[0, nBin·w)`.
//!
//! The bin count is `floor(max / w)` and the effective maximum is redefined as
//! `nBin·w`, so a requested cutoff that is not a multiple of the width shrinks.

use crate::error::{SdfError, SdfResult};

fn bin_layout(requested_max: f64, width: f64, what: &str) -> SdfResult<(usize, f64)> {
    if !width.is_finite() || width <= 0.0 {
        return Err(SdfError::Config(format!(
            "bin width must be positive, got {width}"
        )));
    }
    if !requested_max.is_finite() || requested_max <= 0.0 {
        return Err(SdfError::Config(format!(
            "{what} must be positive, got {requested_max}"
        )));
    }
    let n_bins = (requested_max / width).floor() as usize;
    if n_bins == 0 {
        return Err(SdfError::Config(format!(
            "bin width {width} is larger than {what} {requested_max}"
        )));
    }
    Ok((n_bins, n_bins as f64 * width))
}

#[inline]
fn bin_index(value: f64, width: f64, n_bins: usize) -> Option<usize> {
    let idx = (value / width).floor();
    if idx >= 0.0 && idx < n_bins as f64 {
        Some(idx as usize)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    width: f64,
    max: f64,
    counts: Vec<u64>,
    dropped: u64,
}

impl Histogram {
    pub fn new(requested_max: f64, width: f64) -> SdfResult<Self> {
        let (n_bins, max) = bin_layout(requested_max, width, "histogram maximum")?;
        Ok(Self {
            width,
            max,
            counts: vec![0; n_bins],
            dropped: 0,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Effective maximum, `n_bins() * width()`.
    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Samples that fell outside `[0, max)` and were discarded.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn bin_of(&self, value: f64) -> Option<usize> {
        bin_index(value, self.width, self.counts.len())
    }

    pub fn accumulate(&mut self, value: f64) {
        match self.bin_of(value) {
            Some(idx) => self.counts[idx] += 1,
            None => self.dropped += 1,
        }
    }

    pub fn center(&self, bin: usize) -> f64 {
        (bin as f64 + 0.5) * self.width
    }
}

/// Two independent axes sharing one bin width, counts stored x-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram2D {
    width: f64,
    n_x: usize,
    n_y: usize,
    x_max: f64,
    y_max: f64,
    counts: Vec<u64>,
    dropped: u64,
}

impl Histogram2D {
    pub fn new(x_extent: f64, y_extent: f64, width: f64) -> SdfResult<Self> {
        let (n_x, x_max) = bin_layout(x_extent, width, "x extent")?;
        let (n_y, y_max) = bin_layout(y_extent, width, "y extent")?;
        Ok(Self {
            width,
            n_x,
            n_y,
            x_max,
            y_max,
            counts: vec![0; n_x * n_y],
            dropped: 0,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_x, self.n_y)
    }

    pub fn extents(&self) -> (f64, f64) {
        (self.x_max, self.y_max)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn count(&self, bin_x: usize, bin_y: usize) -> u64 {
        self.counts[bin_x * self.n_y + bin_y]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Returns `false` when the point falls outside the grid and is dropped.
    pub fn accumulate(&mut self, x: f64, y: f64) -> bool {
        match (
            bin_index(x, self.width, self.n_x),
            bin_index(y, self.width, self.n_y),
        ) {
            (Some(bx), Some(by)) => {
                self.counts[bx * self.n_y + by] += 1;
                true
            }
            _ => {
                self.dropped += 1;
                false
            }
        }
    }

    pub fn center(&self, bin: usize) -> f64 {
        (bin as f64 + 0.5) * self.width
    }
}
