use sdf_core::error::{SdfError, SdfResult};

/// Per-run frame bookkeeping: processed frame count plus running and
/// last-frame populations of each sampled group.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStats {
    frames: usize,
    population_sums: Vec<u64>,
    last_populations: Vec<usize>,
}

impl FrameStats {
    pub fn new(n_groups: usize) -> Self {
        Self {
            frames: 0,
            population_sums: vec![0; n_groups],
            last_populations: vec![0; n_groups],
        }
    }

    pub fn n_groups(&self) -> usize {
        self.population_sums.len()
    }

    /// Counts one frame, including frames where no atom matched.
    pub fn record_frame(&mut self, populations: &[usize]) {
        debug_assert_eq!(populations.len(), self.population_sums.len());
        self.frames += 1;
        for ((sum, last), &n) in self
            .population_sums
            .iter_mut()
            .zip(self.last_populations.iter_mut())
            .zip(populations)
        {
            *sum += n as u64;
            *last = n;
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn population_sum(&self, group: usize) -> u64 {
        self.population_sums[group]
    }

    pub fn last_population(&self, group: usize) -> usize {
        self.last_populations[group]
    }

    pub fn average_population(&self, group: usize) -> SdfResult<f64> {
        if self.frames == 0 {
            return Err(SdfError::EmptySample(
                "no frames processed, average population undefined".into(),
            ));
        }
        Ok(self.population_sums[group] as f64 / self.frames as f64)
    }
}
