use crate::error::{SdfError, SdfResult};
use crate::geom::Vec3;

/// Axes that take part in the periodic correction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PbcDims {
    Xyz,
    /// Slab geometry: z is never folded.
    Xy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthoBox {
    pub lx: f64,
    pub ly: f64,
    pub lz: f64,
}

impl OrthoBox {
    pub fn new(lx: f64, ly: f64, lz: f64) -> SdfResult<Self> {
        if [lx, ly, lz].iter().any(|&v| !v.is_finite() || v <= 0.0) {
            return Err(SdfError::Config(format!(
                "box edges must be positive, got ({lx}, {ly}, {lz})"
            )));
        }
        Ok(Self { lx, ly, lz })
    }

    pub fn volume(self) -> f64 {
        self.lx * self.ly * self.lz
    }

    /// Largest cutoff that still sees a single image of every neighbour.
    pub fn half_min_edge(self, dims: PbcDims) -> f64 {
        match dims {
            PbcDims::Xyz => 0.5 * self.lx.min(self.ly).min(self.lz),
            PbcDims::Xy => 0.5 * self.lx.min(self.ly),
        }
    }

    pub fn minimum_image(self, d: Vec3, dims: PbcDims) -> Vec3 {
        match dims {
            PbcDims::Xyz => minimum_image(d, self.lx, self.ly, self.lz),
            PbcDims::Xy => Vec3::new(fold(d.x, self.lx), fold(d.y, self.ly), d.z),
        }
    }

    pub fn wrap(self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.rem_euclid(self.lx),
            point.y.rem_euclid(self.ly),
            point.z.rem_euclid(self.lz),
        )
    }
}

/// Folds each component with `d - L * trunc(2d / L)`.
///
/// Truncation toward zero is deliberate: a component of exactly `L/2` maps to
/// `-L/2` and keeps its magnitude, and the result is only guaranteed to lie in
/// `[-L/2, L/2]` for displacements between two points inside the box.
pub fn minimum_image(d: Vec3, lx: f64, ly: f64, lz: f64) -> Vec3 {
    Vec3::new(fold(d.x, lx), fold(d.y, ly), fold(d.z, lz))
}

#[inline]
fn fold(d: f64, l: f64) -> f64 {
    d - l * (2.0 * d / l).trunc()
}
