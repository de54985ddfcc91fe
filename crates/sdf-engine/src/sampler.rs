//! Exhaustive pair enumeration for one frame.
//!
//! Every unordered same-group pair (`i < j`) or every cross-group pair is
//! visited exactly once; the normalization constants depend on it.

use sdf_core::geom::Vec3;
use sdf_core::histogram::{Histogram, Histogram2D};
use sdf_core::pbc::{OrthoBox, PbcDims};

pub trait Displacement {
    fn correct(&self, d: Vec3) -> Vec3;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoCorrection;

impl Displacement for NoCorrection {
    #[inline]
    fn correct(&self, d: Vec3) -> Vec3 {
        d
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MinimumImage {
    pub box_: OrthoBox,
    pub dims: PbcDims,
}

impl MinimumImage {
    pub fn new(box_: OrthoBox, dims: PbcDims) -> Self {
        Self { box_, dims }
    }
}

impl Displacement for MinimumImage {
    #[inline]
    fn correct(&self, d: Vec3) -> Vec3 {
        self.box_.minimum_image(d, self.dims)
    }
}

/// Receives every distance that passes the cutoff.
pub trait DistanceSink {
    fn push(&mut self, r: f64);
}

impl DistanceSink for Histogram {
    #[inline]
    fn push(&mut self, r: f64) {
        self.accumulate(r);
    }
}

impl DistanceSink for Vec<f64> {
    #[inline]
    fn push(&mut self, r: f64) {
        Vec::push(self, r);
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Pairing<'a> {
    /// Triangular self pairs within one group.
    Mono(&'a [Vec3]),
    /// Full cross product between two groups.
    Multi(&'a [Vec3], &'a [Vec3]),
}

impl Pairing<'_> {
    pub fn n_pairs(&self) -> u64 {
        match *self {
            Pairing::Mono(a) => {
                let n = a.len() as u64;
                n * n.saturating_sub(1) / 2
            }
            Pairing::Multi(a, b) => a.len() as u64 * b.len() as u64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PairCount {
    /// Pairs enumerated before the cutoff test.
    pub visited: u64,
    /// Pairs handed to the sink.
    pub accepted: u64,
}

pub struct PairSampler<D> {
    correction: D,
    cutoff2: f64,
}

impl<D: Displacement> PairSampler<D> {
    pub fn new(correction: D, cutoff: f64) -> Self {
        Self {
            correction,
            cutoff2: cutoff * cutoff,
        }
    }

    pub fn sample<S: DistanceSink>(&self, pairing: Pairing<'_>, sink: &mut S) -> PairCount {
        let mut count = PairCount::default();
        match pairing {
            Pairing::Mono(group) => {
                for (i, &ri) in group.iter().enumerate() {
                    for &rj in &group[i + 1..] {
                        self.visit(ri, rj, sink, &mut count);
                    }
                }
            }
            Pairing::Multi(first, second) => {
                for &ri in first {
                    for &rj in second {
                        self.visit(ri, rj, sink, &mut count);
                    }
                }
            }
        }
        count
    }

    #[inline]
    fn visit<S: DistanceSink>(&self, ri: Vec3, rj: Vec3, sink: &mut S, count: &mut PairCount) {
        count.visited += 1;
        let d2 = self.correction.correct(ri.sub(rj)).norm2();
        if d2 <= self.cutoff2 {
            count.accepted += 1;
            sink.push(d2.sqrt());
        }
    }
}

/// One-body planar binning: each position is folded into the box (when one is
/// given) and its `(x, y)` counted. Returns the number of atoms binned.
pub fn sample_positions(
    positions: &[Vec3],
    box_: Option<OrthoBox>,
    grid: &mut Histogram2D,
) -> usize {
    let mut binned = 0;
    for &pos in positions {
        let p = match box_ {
            Some(b) => b.wrap(pos),
            None => pos,
        };
        if grid.accumulate(p.x, p.y) {
            binned += 1;
        }
    }
    binned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_group(rng: &mut StdRng, n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(0.0..10.0),
                    rng.gen_range(0.0..10.0),
                    rng.gen_range(0.0..10.0),
                )
            })
            .collect()
    }

    #[test]
    fn two_atom_pair_lands_in_bin_two() {
        let atoms = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)];
        let mut hist = Histogram::new(2.0, 0.5).unwrap();
        let count =
            PairSampler::new(NoCorrection, hist.max()).sample(Pairing::Mono(&atoms), &mut hist);
        assert_eq!(count, PairCount { visited: 1, accepted: 1 });
        assert_eq!(hist.counts(), &[0, 0, 1, 0]);
    }

    #[test]
    fn visit_counts_match_pair_formulas() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in [0usize, 1, 2, 7, 20] {
            let group = random_group(&mut rng, n);
            let mut sink: Vec<f64> = Vec::new();
            let pairing = Pairing::Mono(&group);
            let count = PairSampler::new(NoCorrection, 100.0).sample(pairing, &mut sink);
            assert_eq!(count.visited, (n * n.saturating_sub(1) / 2) as u64);
            assert_eq!(count.visited, pairing.n_pairs());
            assert_eq!(sink.len() as u64, count.accepted);
        }
        let a = random_group(&mut rng, 6);
        let b = random_group(&mut rng, 9);
        let mut sink: Vec<f64> = Vec::new();
        let box_ = OrthoBox::new(10.0, 10.0, 10.0).unwrap();
        let count = PairSampler::new(MinimumImage::new(box_, PbcDims::Xyz), 100.0)
            .sample(Pairing::Multi(&a, &b), &mut sink);
        assert_eq!(count.visited, 54);
        assert_eq!(count.accepted, 54);
    }

    #[test]
    fn cutoff_is_inclusive_in_squared_space() {
        let atoms = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0)];
        let mut sink: Vec<f64> = Vec::new();
        let count = PairSampler::new(NoCorrection, 2.0).sample(Pairing::Mono(&atoms), &mut sink);
        assert_eq!(count.visited, 3);
        assert_eq!(sink, vec![2.0]);
    }

    #[test]
    fn minimum_image_brings_far_pairs_inside_cutoff() {
        let box_ = OrthoBox::new(10.0, 10.0, 10.0).unwrap();
        let a = [Vec3::new(0.5, 5.0, 5.0)];
        let b = [Vec3::new(9.5, 5.0, 5.0)];
        let mut plain: Vec<f64> = Vec::new();
        PairSampler::new(NoCorrection, 4.0).sample(Pairing::Multi(&a, &b), &mut plain);
        assert!(plain.is_empty());
        let mut periodic: Vec<f64> = Vec::new();
        PairSampler::new(MinimumImage::new(box_, PbcDims::Xyz), 4.0)
            .sample(Pairing::Multi(&a, &b), &mut periodic);
        assert_eq!(periodic.len(), 1);
        assert!((periodic[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn slab_correction_ignores_z_images() {
        let box_ = OrthoBox::new(10.0, 10.0, 10.0).unwrap();
        let group = [Vec3::new(1.0, 1.0, 0.5), Vec3::new(1.0, 1.0, 9.5)];
        let mut sink: Vec<f64> = Vec::new();
        PairSampler::new(MinimumImage::new(box_, PbcDims::Xy), 5.0)
            .sample(Pairing::Mono(&group), &mut sink);
        assert!(sink.is_empty());
        PairSampler::new(MinimumImage::new(box_, PbcDims::Xyz), 5.0)
            .sample(Pairing::Mono(&group), &mut sink);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn positions_are_wrapped_before_binning() {
        let box_ = OrthoBox::new(4.0, 4.0, 4.0).unwrap();
        let mut grid = Histogram2D::new(4.0, 4.0, 1.0).unwrap();
        let positions = [Vec3::new(-0.5, 0.5, 0.0), Vec3::new(4.5, 1.5, 0.0)];
        let binned = sample_positions(&positions, Some(box_), &mut grid);
        assert_eq!(binned, 2);
        assert_eq!(grid.count(3, 0), 1);
        assert_eq!(grid.count(0, 1), 1);
    }

    #[test]
    fn positions_past_truncated_grid_are_not_counted() {
        let box_ = OrthoBox::new(4.5, 4.0, 4.0).unwrap();
        let mut grid = Histogram2D::new(4.5, 4.0, 1.0).unwrap();
        let positions = [Vec3::new(4.2, 0.5, 0.0), Vec3::new(1.5, 1.5, 0.0)];
        assert_eq!(sample_positions(&positions, Some(box_), &mut grid), 1);
        assert_eq!(sample_positions(&positions[1..], Some(box_), &mut grid), 1);
        assert_eq!(grid.total(), 2);
        assert_eq!(grid.dropped(), 1);
    }
}
