use crate::error::{SdfError, SdfResult};
use crate::geom::Vec3;
use crate::interner::SpeciesTable;
use crate::pbc::OrthoBox;

/// Height window `[min, max)` along z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slab {
    pub min: f64,
    pub max: f64,
}

impl Slab {
    pub fn new(min: f64, max: f64) -> SdfResult<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(SdfError::Config(format!(
                "slab height window must satisfy Hmin < Hmax, got [{min}, {max})"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn thickness(self) -> f64 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(self, z: f64) -> bool {
        self.min <= z && z < self.max
    }
}

/// Fully parsed trajectory, frames stored back to back.
#[derive(Clone, Debug)]
pub struct Trajectory {
    n_atoms: usize,
    n_frames: usize,
    species: SpeciesTable,
    labels: Vec<u32>,
    coords: Vec<Vec3>,
    box_: Option<OrthoBox>,
}

impl Trajectory {
    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn box_(&self) -> Option<OrthoBox> {
        self.box_
    }

    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    pub fn frame_coords(&self, frame: usize) -> &[Vec3] {
        let start = frame * self.n_atoms;
        &self.coords[start..start + self.n_atoms]
    }

    pub fn frame_labels(&self, frame: usize) -> &[u32] {
        let start = frame * self.n_atoms;
        &self.labels[start..start + self.n_atoms]
    }

    /// Collects the coordinates of `species` in `frame`, optionally restricted
    /// to a height slab. `out` is cleared first. An unknown species (`None`)
    /// selects nothing.
    pub fn select(
        &self,
        frame: usize,
        species: Option<u32>,
        slab: Option<Slab>,
        out: &mut Vec<Vec3>,
    ) {
        out.clear();
        let Some(species) = species else {
            return;
        };
        let labels = self.frame_labels(frame);
        let coords = self.frame_coords(frame);
        for (&label, &pos) in labels.iter().zip(coords.iter()) {
            if label != species {
                continue;
            }
            if let Some(slab) = slab {
                if !slab.contains(pos.z) {
                    continue;
                }
            }
            out.push(pos);
        }
    }

    pub fn count_species(&self, frame: usize, species: u32) -> usize {
        self.frame_labels(frame)
            .iter()
            .filter(|&&label| label == species)
            .count()
    }
}

#[derive(Debug)]
pub struct TrajectoryBuilder {
    n_atoms: Option<usize>,
    n_frames: usize,
    frame_len: usize,
    species: SpeciesTable,
    labels: Vec<u32>,
    coords: Vec<Vec3>,
    box_: Option<OrthoBox>,
}

impl Default for TrajectoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrajectoryBuilder {
    pub fn new() -> Self {
        Self {
            n_atoms: None,
            n_frames: 0,
            frame_len: 0,
            species: SpeciesTable::default(),
            labels: Vec::new(),
            coords: Vec::new(),
            box_: None,
        }
    }

    pub fn with_capacity(n_atoms: usize, max_frames: usize) -> Self {
        let mut builder = Self::new();
        builder.labels.reserve(n_atoms * max_frames);
        builder.coords.reserve(n_atoms * max_frames);
        builder
    }

    pub fn set_box(&mut self, box_: Option<OrthoBox>) {
        self.box_ = box_;
    }

    pub fn start_frame(&mut self) -> SdfResult<()> {
        if self.n_frames > 0 {
            self.close_frame()?;
        }
        self.n_frames += 1;
        self.frame_len = 0;
        Ok(())
    }

    pub fn push_atom(&mut self, label: &str, pos: Vec3) {
        let id = self.species.intern(label);
        self.labels.push(id);
        self.coords.push(pos);
        self.frame_len += 1;
    }

    fn close_frame(&mut self) -> SdfResult<()> {
        match self.n_atoms {
            None => {
                self.n_atoms = Some(self.frame_len);
                Ok(())
            }
            Some(n) if n == self.frame_len => Ok(()),
            Some(n) => Err(SdfError::Mismatch(format!(
                "frame {} has {} atoms, expected {n}",
                self.n_frames, self.frame_len
            ))),
        }
    }

    pub fn finish(mut self) -> SdfResult<Trajectory> {
        if self.n_frames > 0 {
            self.close_frame()?;
        }
        let n_atoms = self.n_atoms.unwrap_or(0);
        if self.coords.len() != n_atoms * self.n_frames {
            return Err(SdfError::Parse("trajectory buffer size mismatch".into()));
        }
        Ok(Trajectory {
            n_atoms,
            n_frames: self.n_frames,
            species: self.species,
            labels: self.labels,
            coords: self.coords,
            box_: self.box_,
        })
    }
}
