use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::Trajectory;
use sdf_core::geom::Vec3;

use crate::executor::{BondLengthOutput, Plan, PlanOutput};
use crate::plans::{lookup_species, SpeciesPair};
use crate::sampler::{NoCorrection, PairSampler, Pairing};

/// Mean and spread of every pair distance within `cutoff`. Identical labels
/// pair atoms of one species (`i < j`); different labels take the full cross
/// product.
pub struct BondLengthPlan {
    species: SpeciesPair,
    cutoff: f64,
    ids: [Option<u32>; 2],
    distances: Vec<f64>,
    frames: usize,
    first: Vec<Vec3>,
    second: Vec<Vec3>,
}

impl BondLengthPlan {
    pub fn new(first: impl Into<String>, second: impl Into<String>, cutoff: f64) -> Self {
        let (first, second) = (first.into(), second.into());
        let species = if first == second {
            SpeciesPair::Mono(first)
        } else {
            SpeciesPair::Multi(first, second)
        };
        Self {
            species,
            cutoff,
            ids: [None; 2],
            distances: Vec::new(),
            frames: 0,
            first: Vec::new(),
            second: Vec::new(),
        }
    }

    fn labels(&self) -> [String; 2] {
        match &self.species {
            SpeciesPair::Mono(a) => [a.clone(), a.clone()],
            SpeciesPair::Multi(a, b) => [a.clone(), b.clone()],
        }
    }
}

/// Mean and population standard deviation (`ddof = 0`).
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Some((mean, var.sqrt()))
}

impl Plan for BondLengthPlan {
    fn name(&self) -> &'static str {
        "bond_length"
    }

    fn init(&mut self, traj: &Trajectory) -> SdfResult<()> {
        if !self.cutoff.is_finite() || self.cutoff <= 0.0 {
            return Err(SdfError::Config(format!(
                "bond cutoff must be positive, got {}",
                self.cutoff
            )));
        }
        self.ids = match &self.species {
            SpeciesPair::Mono(a) => [lookup_species(traj, a, "bond_length"), None],
            SpeciesPair::Multi(a, b) => [
                lookup_species(traj, a, "bond_length"),
                lookup_species(traj, b, "bond_length"),
            ],
        };
        self.distances.clear();
        self.frames = 0;
        Ok(())
    }

    fn process_frame(&mut self, traj: &Trajectory, frame: usize) -> SdfResult<()> {
        let sampler = PairSampler::new(NoCorrection, self.cutoff);
        traj.select(frame, self.ids[0], None, &mut self.first);
        match self.species {
            SpeciesPair::Mono(_) => {
                sampler.sample(Pairing::Mono(&self.first), &mut self.distances);
            }
            SpeciesPair::Multi(..) => {
                traj.select(frame, self.ids[1], None, &mut self.second);
                sampler.sample(Pairing::Multi(&self.first, &self.second), &mut self.distances);
            }
        }
        self.frames += 1;
        Ok(())
    }

    fn finalize(&mut self) -> SdfResult<PlanOutput> {
        let labels = self.labels();
        let (mean, std) = mean_std(&self.distances).ok_or_else(|| {
            SdfError::EmptySample(format!(
                "no {}-{} pair within {} Angstrom",
                labels[0], labels[1], self.cutoff
            ))
        })?;
        tracing::info!(pairs = self.distances.len(), mean, std, "bond lengths collected");
        Ok(PlanOutput::BondLength(BondLengthOutput {
            labels,
            count: self.distances.len(),
            mean,
            std,
            frames: self.frames,
        }))
    }
}
