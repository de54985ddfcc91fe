use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::{Slab, Trajectory};
use sdf_core::geom::Vec3;
use sdf_core::histogram::Histogram;
use sdf_core::pbc::PbcDims;

use crate::accumulator::FrameStats;
use crate::executor::{Plan, PlanOutput, RdfOutput};
use crate::normalize::{normalize_rdf, RdfNormalization};
use crate::plans::{lookup_species, require_population, SpeciesPair};
use crate::sampler::{MinimumImage, NoCorrection, PairCount, PairSampler, Pairing};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RdfGeometry {
    /// Every atom of the species, periodic images folded on all three axes.
    Bulk,
    /// Atoms inside a height slab. Only x and y are periodic, and the
    /// reference volume is `Lx·Ly·(Hmax-Hmin)`.
    Slab(Slab),
}

impl RdfGeometry {
    fn dims(self) -> PbcDims {
        match self {
            RdfGeometry::Bulk => PbcDims::Xyz,
            RdfGeometry::Slab(_) => PbcDims::Xy,
        }
    }

    fn slab(self) -> Option<Slab> {
        match self {
            RdfGeometry::Bulk => None,
            RdfGeometry::Slab(slab) => Some(slab),
        }
    }
}

pub struct RdfPlan {
    species: SpeciesPair,
    cutoff: f64,
    bin_width: f64,
    pbc: bool,
    geometry: RdfGeometry,
    ids: [Option<u32>; 2],
    correction: Option<MinimumImage>,
    volume: f64,
    clamped_from: Option<f64>,
    hist: Option<Histogram>,
    stats: FrameStats,
    first: Vec<Vec3>,
    second: Vec<Vec3>,
}

impl RdfPlan {
    pub fn new(species: SpeciesPair, cutoff: f64, bin_width: f64) -> Self {
        let n_groups = species.n_groups();
        Self {
            species,
            cutoff,
            bin_width,
            pbc: false,
            geometry: RdfGeometry::Bulk,
            ids: [None; 2],
            correction: None,
            volume: 0.0,
            clamped_from: None,
            hist: None,
            stats: FrameStats::new(n_groups),
            first: Vec::new(),
            second: Vec::new(),
        }
    }

    pub fn with_pbc(mut self, pbc: bool) -> Self {
        self.pbc = pbc;
        self
    }

    pub fn with_geometry(mut self, geometry: RdfGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Requested cutoff, when `init` had to clamp it to the box.
    pub fn clamped_from(&self) -> Option<f64> {
        self.clamped_from
    }

    fn normalization(&self) -> RdfNormalization {
        if self.correction.is_none() {
            return RdfNormalization::Open;
        }
        match self.species {
            SpeciesPair::Mono(_) => RdfNormalization::PeriodicMono {
                volume: self.volume,
                n_atoms: self.stats.last_population(0),
            },
            SpeciesPair::Multi(..) => RdfNormalization::PeriodicMulti {
                volume: self.volume,
                n_atoms1: self.stats.last_population(0),
                n_atoms2: self.stats.last_population(1),
            },
        }
    }
}

fn sample_into(
    correction: Option<MinimumImage>,
    cutoff: f64,
    pairing: Pairing<'_>,
    hist: &mut Histogram,
) -> PairCount {
    match correction {
        Some(image) => PairSampler::new(image, cutoff).sample(pairing, hist),
        None => PairSampler::new(NoCorrection, cutoff).sample(pairing, hist),
    }
}

impl Plan for RdfPlan {
    fn name(&self) -> &'static str {
        "rdf"
    }

    fn init(&mut self, traj: &Trajectory) -> SdfResult<()> {
        let mut cutoff = self.cutoff;
        self.clamped_from = None;
        self.correction = None;
        self.volume = 0.0;
        if self.pbc {
            let box_ = traj.box_().ok_or_else(|| {
                SdfError::Config(
                    "periodic RDF needs box lengths but the trajectory has none".into(),
                )
            })?;
            let dims = self.geometry.dims();
            let limit = box_.half_min_edge(dims);
            if cutoff > limit {
                tracing::warn!(
                    requested = cutoff,
                    limit,
                    "cutoff exceeds half the smallest periodic box edge, clamping"
                );
                self.clamped_from = Some(cutoff);
                cutoff = limit;
            }
            self.correction = Some(MinimumImage::new(box_, dims));
            self.volume = match self.geometry {
                RdfGeometry::Bulk => box_.volume(),
                RdfGeometry::Slab(slab) => box_.lx * box_.ly * slab.thickness(),
            };
        }
        let hist = Histogram::new(cutoff, self.bin_width)?;
        tracing::debug!(
            bins = hist.n_bins(),
            cutoff = hist.max(),
            pbc = self.pbc,
            "rdf histogram ready"
        );
        self.hist = Some(hist);
        self.ids = match &self.species {
            SpeciesPair::Mono(a) => [lookup_species(traj, a, "rdf"), None],
            SpeciesPair::Multi(a, b) => [
                lookup_species(traj, a, "rdf"),
                lookup_species(traj, b, "rdf"),
            ],
        };
        self.stats = FrameStats::new(self.species.n_groups());
        Ok(())
    }

    fn process_frame(&mut self, traj: &Trajectory, frame: usize) -> SdfResult<()> {
        let hist = self
            .hist
            .as_mut()
            .ok_or_else(|| SdfError::Config("rdf plan used before init".into()))?;
        let cutoff = hist.max();
        let slab = self.geometry.slab();
        traj.select(frame, self.ids[0], slab, &mut self.first);
        match self.species {
            SpeciesPair::Mono(_) => {
                sample_into(self.correction, cutoff, Pairing::Mono(&self.first), hist);
                self.stats.record_frame(&[self.first.len()]);
            }
            SpeciesPair::Multi(..) => {
                traj.select(frame, self.ids[1], slab, &mut self.second);
                let pairing = Pairing::Multi(&self.first, &self.second);
                sample_into(self.correction, cutoff, pairing, hist);
                self.stats.record_frame(&[self.first.len(), self.second.len()]);
            }
        }
        Ok(())
    }

    fn finalize(&mut self) -> SdfResult<PlanOutput> {
        let norm = self.normalization();
        let hist = self
            .hist
            .take()
            .ok_or_else(|| SdfError::Config("rdf plan finalized before init".into()))?;
        let labels = self.species.labels();
        require_population(&self.stats, &labels, "rdf")?;
        if norm == RdfNormalization::Open && self.stats.frames() > 0 && hist.total() == 0 {
            return Err(SdfError::EmptySample(format!(
                "rdf: no {} pair within {} Angstrom in the selected frames",
                labels.join("-"),
                hist.max()
            )));
        }
        let table = normalize_rdf(&hist, self.stats.frames(), norm)?;
        if hist.dropped() > 0 {
            tracing::warn!(dropped = hist.dropped(), "distances outside the histogram range");
        }
        tracing::info!(
            frames = self.stats.frames(),
            pairs = hist.total(),
            "rdf accumulated"
        );
        let stats = std::mem::replace(&mut self.stats, FrameStats::new(self.species.n_groups()));
        Ok(PlanOutput::Rdf(RdfOutput {
            table,
            cutoff: hist.max(),
            histogram: hist,
            stats,
            labels,
            clamped_from: self.clamped_from,
        }))
    }
}
