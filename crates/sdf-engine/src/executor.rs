use std::ops::Range;

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::Trajectory;
use sdf_core::histogram::{Histogram, Histogram2D};
use sdf_core::table::Table;

use crate::accumulator::FrameStats;

/// Frame window as given on the command line: `start` is 1-based (0 is
/// accepted as "first frame"), `end` is the exclusive 0-based end, and `-1`
/// means "through the last frame".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameWindow {
    pub start: i64,
    pub end: i64,
}

impl Default for FrameWindow {
    fn default() -> Self {
        Self { start: 0, end: -1 }
    }
}

impl FrameWindow {
    pub const LAST: i64 = -1;

    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn resolve(self, n_frames: usize) -> SdfResult<Range<usize>> {
        if self.start < 0 {
            return Err(SdfError::Range(format!(
                "frames start must be >= 0, got {}",
                self.start
            )));
        }
        let start = if self.start == 0 {
            0
        } else {
            (self.start - 1) as usize
        };
        let end = match self.end {
            Self::LAST => n_frames,
            e if e < 0 => {
                return Err(SdfError::Range(format!(
                    "frames end must be >= 0 or -1 for the last frame, got {e}"
                )))
            }
            e => e as usize,
        };
        if end > n_frames {
            return Err(SdfError::Range(format!(
                "frames end {end} exceeds the {n_frames} frames in the trajectory"
            )));
        }
        if start > end {
            return Err(SdfError::Range(format!(
                "frames start {} lies after frames end {end}",
                self.start
            )));
        }
        Ok(start..end)
    }
}

pub trait Plan {
    fn name(&self) -> &'static str;
    fn init(&mut self, traj: &Trajectory) -> SdfResult<()>;
    fn process_frame(&mut self, traj: &Trajectory, frame: usize) -> SdfResult<()>;
    fn finalize(&mut self) -> SdfResult<PlanOutput>;
}

#[derive(Debug)]
pub enum PlanOutput {
    Rdf(RdfOutput),
    Pdf(PdfOutput),
    BondLength(BondLengthOutput),
}

#[derive(Debug)]
pub struct RdfOutput {
    pub table: Table,
    pub histogram: Histogram,
    pub stats: FrameStats,
    pub labels: Vec<String>,
    /// Effective cutoff after clamping and bin truncation.
    pub cutoff: f64,
    /// Set when the requested cutoff was clamped to half the box.
    pub clamped_from: Option<f64>,
}

#[derive(Debug)]
pub struct PdfOutput {
    pub table: Table,
    pub grid: Histogram2D,
    pub stats: FrameStats,
    pub label: String,
}

#[derive(Debug)]
pub struct BondLengthOutput {
    pub labels: [String; 2],
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub frames: usize,
}

#[derive(Debug, Default)]
pub struct Executor {
    window: FrameWindow,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: FrameWindow) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> FrameWindow {
        self.window
    }

    pub fn run_plan<P: Plan + ?Sized>(
        &mut self,
        plan: &mut P,
        traj: &Trajectory,
    ) -> SdfResult<PlanOutput> {
        let range = self.window.resolve(traj.n_frames())?;
        tracing::debug!(
            plan = plan.name(),
            start = range.start,
            end = range.end,
            total = traj.n_frames(),
            "running plan"
        );
        plan.init(traj)?;
        for frame in range {
            plan.process_frame(traj, frame)?;
        }
        plan.finalize()
    }
}
