pub mod bond_length;
pub mod pdf;
pub mod rdf;

pub use bond_length::BondLengthPlan;
pub use pdf::PdfPlan;
pub use rdf::{RdfGeometry, RdfPlan};

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::Trajectory;

use crate::accumulator::FrameStats;

/// Which groups are compared: one species against itself, or two species.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeciesPair {
    Mono(String),
    Multi(String, String),
}

impl SpeciesPair {
    pub fn labels(&self) -> Vec<String> {
        match self {
            SpeciesPair::Mono(a) => vec![a.clone()],
            SpeciesPair::Multi(a, b) => vec![a.clone(), b.clone()],
        }
    }

    pub fn n_groups(&self) -> usize {
        match self {
            SpeciesPair::Mono(_) => 1,
            SpeciesPair::Multi(..) => 2,
        }
    }
}

/// Resolves a label, warning when the trajectory never mentions it.
pub(crate) fn lookup_species(traj: &Trajectory, label: &str, plan: &str) -> Option<u32> {
    let id = traj.species().id(label);
    if id.is_none() {
        tracing::warn!(plan, species = label, "species not present in trajectory");
    }
    id
}

/// Fails when a group never matched a single atom over the processed frames.
/// An empty frame range is left to the normalizer to report.
pub(crate) fn require_population(
    stats: &FrameStats,
    labels: &[String],
    plan: &str,
) -> SdfResult<()> {
    if stats.frames() == 0 {
        return Ok(());
    }
    for (group, label) in labels.iter().enumerate() {
        if stats.population_sum(group) == 0 {
            return Err(SdfError::EmptySample(format!(
                "{plan}: no '{label}' atoms matched in any of the {} selected frames",
                stats.frames()
            )));
        }
    }
    Ok(())
}
