//! Raw counts to distribution functions.
//!
//! All RDF branches divide by an ideal-gas pair count and then by the shell
//! volume `4π·w³·(k+0.5)²`. The operation order is fixed so that
//! printed values stay stable to the last digit.

use std::f64::consts::PI;

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::histogram::{Histogram, Histogram2D};
use sdf_core::table::{Row, Table};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RdfNormalization {
    /// No box: `0.5 · frames`, independent of group sizes.
    Open,
    /// `2·V / (n(n-1) · frames)`.
    PeriodicMono { volume: f64, n_atoms: usize },
    /// `2·V / (2·n1·n2 · frames)`.
    PeriodicMulti {
        volume: f64,
        n_atoms1: usize,
        n_atoms2: usize,
    },
}

impl RdfNormalization {
    fn scale(self, frames: usize) -> SdfResult<f64> {
        if frames == 0 {
            return Err(SdfError::EmptySample(
                "no frames in the selected range, cannot normalize".into(),
            ));
        }
        match self {
            RdfNormalization::Open => Ok(1.0 / (0.5 * frames as f64)),
            RdfNormalization::PeriodicMono { volume, n_atoms } => {
                let n = n_atoms as u64;
                let n_pairs = n * n.saturating_sub(1);
                periodic_scale(volume, n_pairs, frames)
            }
            RdfNormalization::PeriodicMulti {
                volume,
                n_atoms1,
                n_atoms2,
            } => {
                let n_pairs = n_atoms1 as u64 * n_atoms2 as u64 * 2;
                periodic_scale(volume, n_pairs, frames)
            }
        }
    }
}

fn periodic_scale(volume: f64, n_pairs: u64, frames: usize) -> SdfResult<f64> {
    if n_pairs == 0 {
        return Err(SdfError::EmptySample(
            "selected groups hold no atom pairs, cannot normalize".into(),
        ));
    }
    Ok((2.0 * volume) / ((n_pairs * frames as u64) as f64))
}

/// Per-bin g(r) values, without the synthetic boundary rows.
pub fn rdf_values(
    hist: &Histogram,
    frames: usize,
    norm: RdfNormalization,
) -> SdfResult<Vec<f64>> {
    let scale = norm.scale(frames)?;
    let prefact = 4.0 * PI * hist.width().powf(3.0);
    let open = matches!(norm, RdfNormalization::Open);
    let values = hist
        .counts()
        .iter()
        .enumerate()
        .map(|(k, &count)| {
            let scaled = if open {
                count as f64 / (0.5 * frames as f64)
            } else {
                count as f64 * scale
            };
            let shell = prefact * (k as f64 + 0.5).powi(2);
            scaled / shell
        })
        .collect();
    Ok(values)
}

pub fn normalize_rdf(
    hist: &Histogram,
    frames: usize,
    norm: RdfNormalization,
) -> SdfResult<Table> {
    let values = rdf_values(hist, frames, norm)?;
    let mut table = Table::with_capacity(values.len() + 2);
    table.push(Row::Origin);
    for (k, &value) in values.iter().enumerate() {
        table.push(Row::Bin {
            coord: hist.center(k),
            value,
        });
    }
    if matches!(norm, RdfNormalization::Open) {
        if let Some(&last) = values.last() {
            table.push(Row::Cutoff {
                coord: hist.max(),
                value: last,
            });
        }
    }
    Ok(table)
}

/// Areal density per cell: `count / frames / dxy²`, rows x-major.
pub fn normalize_pdf(grid: &Histogram2D, frames: usize) -> SdfResult<Table> {
    if frames == 0 {
        return Err(SdfError::EmptySample(
            "no frames in the selected range, cannot normalize".into(),
        ));
    }
    let area = grid.width() * grid.width();
    let (n_x, n_y) = grid.shape();
    let mut table = Table::with_capacity(n_x * n_y);
    for bx in 0..n_x {
        for by in 0..n_y {
            let value = grid.count(bx, by) as f64 / frames as f64 / area;
            table.push(Row::Cell {
                x: grid.center(bx),
                y: grid.center(by),
                value,
            });
        }
    }
    Ok(table)
}
