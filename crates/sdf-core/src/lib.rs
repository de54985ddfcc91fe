#![forbid(unsafe_code)]

pub mod error;
pub mod frame;
pub mod geom;
pub mod histogram;
pub mod interner;
pub mod pbc;
pub mod table;

pub use error::{SdfError, SdfResult};
pub use frame::{Slab, Trajectory, TrajectoryBuilder};
pub use geom::Vec3;
pub use histogram::{Histogram, Histogram2D};
pub use interner::SpeciesTable;
pub use pbc::{minimum_image, OrthoBox, PbcDims};
pub use table::{Row, Table};
