pub mod table;
pub mod xsf;
pub mod xyz;

use std::path::Path;

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::Trajectory;

pub use table::write_table;
pub use xsf::{parse_xsf_reader, XsfReader};
pub use xyz::{parse_xyz_reader, XyzReader};

pub trait TrajectoryReader {
    fn read_trajectory(&mut self) -> SdfResult<Trajectory>;
}

/// Picks a reader from the file extension (`.xsf`, `.axsf`, `.xyz`).
pub fn open_trajectory(path: &Path) -> SdfResult<Box<dyn TrajectoryReader>> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "xsf" | "axsf" => Ok(Box::new(XsfReader::new(path))),
        "xyz" => Ok(Box::new(XyzReader::new(path))),
        _ => Err(SdfError::Unsupported(format!(
            "unknown trajectory format for '{}' (expected .xsf, .axsf or .xyz)",
            path.display()
        ))),
    }
}

pub(crate) fn parse_f64(token: &str, what: &str, line_no: usize) -> SdfResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| SdfError::Parse(format!("line {line_no}: invalid {what} '{token}'")))
}

pub(crate) fn parse_usize(token: &str, what: &str, line_no: usize) -> SdfResult<usize> {
    token
        .parse::<usize>()
        .map_err(|_| SdfError::Parse(format!("line {line_no}: invalid {what} '{token}'")))
}
