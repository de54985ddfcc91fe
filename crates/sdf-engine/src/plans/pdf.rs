use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::{Slab, Trajectory};
use sdf_core::geom::Vec3;
use sdf_core::histogram::Histogram2D;
use sdf_core::pbc::OrthoBox;

use crate::accumulator::FrameStats;
use crate::executor::{PdfOutput, Plan, PlanOutput};
use crate::normalize::normalize_pdf;
use crate::plans::{lookup_species, require_population};
use crate::sampler::sample_positions;

/// One-body areal density of a species inside a height slab, binned over the
/// box's x/y extents.
pub struct PdfPlan {
    species: String,
    slab: Slab,
    bin_width: f64,
    id: Option<u32>,
    box_: Option<OrthoBox>,
    grid: Option<Histogram2D>,
    stats: FrameStats,
    selected: Vec<Vec3>,
}

impl PdfPlan {
    pub fn new(species: impl Into<String>, slab: Slab, bin_width: f64) -> Self {
        Self {
            species: species.into(),
            slab,
            bin_width,
            id: None,
            box_: None,
            grid: None,
            stats: FrameStats::new(1),
            selected: Vec::new(),
        }
    }
}

impl Plan for PdfPlan {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn init(&mut self, traj: &Trajectory) -> SdfResult<()> {
        let box_ = traj.box_().ok_or_else(|| {
            SdfError::Config(
                "planar distribution needs box lengths but the trajectory has none".into(),
            )
        })?;
        let grid = Histogram2D::new(box_.lx, box_.ly, self.bin_width)?;
        let (n_x, n_y) = grid.shape();
        tracing::debug!(n_x, n_y, "pdf grid ready");
        self.box_ = Some(box_);
        self.grid = Some(grid);
        self.id = lookup_species(traj, &self.species, "pdf");
        self.stats = FrameStats::new(1);
        Ok(())
    }

    fn process_frame(&mut self, traj: &Trajectory, frame: usize) -> SdfResult<()> {
        let grid = self
            .grid
            .as_mut()
            .ok_or_else(|| SdfError::Config("pdf plan used before init".into()))?;
        traj.select(frame, self.id, Some(self.slab), &mut self.selected);
        sample_positions(&self.selected, self.box_, grid);
        self.stats.record_frame(&[self.selected.len()]);
        Ok(())
    }

    fn finalize(&mut self) -> SdfResult<PlanOutput> {
        let grid = self
            .grid
            .take()
            .ok_or_else(|| SdfError::Config("pdf plan finalized before init".into()))?;
        require_population(&self.stats, std::slice::from_ref(&self.species), "pdf")?;
        let table = normalize_pdf(&grid, self.stats.frames())?;
        if grid.dropped() > 0 {
            tracing::warn!(
                dropped = grid.dropped(),
                "positions beyond the truncated grid extents"
            );
        }
        tracing::info!(frames = self.stats.frames(), atoms = grid.total(), "pdf accumulated");
        Ok(PlanOutput::Pdf(PdfOutput {
            table,
            grid,
            stats: std::mem::replace(&mut self.stats, FrameStats::new(1)),
            label: self.species.clone(),
        }))
    }
}
