use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::{Trajectory, TrajectoryBuilder};
use sdf_core::geom::Vec3;

use crate::{parse_f64, parse_usize, TrajectoryReader};

/// Plain XYZ: count line, comment line, `count` atom lines. Concatenated
/// snapshots are read as successive frames. XYZ carries no box.
pub struct XyzReader {
    path: PathBuf,
}

impl XyzReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrajectoryReader for XyzReader {
    fn read_trajectory(&mut self) -> SdfResult<Trajectory> {
        let file = File::open(&self.path)?;
        parse_xyz_reader(BufReader::new(file))
    }
}

pub fn parse_xyz_reader<R: BufRead>(reader: R) -> SdfResult<Trajectory> {
    let mut lines = reader.lines().enumerate().map(|(idx, line)| (idx + 1, line));
    let mut builder = TrajectoryBuilder::new();
    let mut frames = 0usize;

    while let Some((line_no, line)) = lines.next() {
        let line = line?;
        let count = line.trim();
        if count.is_empty() {
            continue;
        }
        let n_atoms = parse_usize(count, "atom count", line_no)?;
        // comment line, may be blank
        match lines.next() {
            Some((_, comment)) => {
                comment?;
            }
            None => {
                return Err(SdfError::Parse(format!(
                    "line {line_no}: missing comment line after atom count"
                )))
            }
        }
        builder.start_frame()?;
        for _ in 0..n_atoms {
            let (line_no, line) = lines.next().ok_or_else(|| {
                SdfError::Parse(format!("frame {}: expected {n_atoms} atom lines", frames + 1))
            })?;
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 4 {
                return Err(SdfError::Parse(format!(
                    "line {line_no}: atom record needs a label and three coordinates"
                )));
            }
            let pos = Vec3::new(
                parse_f64(tokens[1], "x coordinate", line_no)?,
                parse_f64(tokens[2], "y coordinate", line_no)?,
                parse_f64(tokens[3], "z coordinate", line_no)?,
            );
            builder.push_atom(tokens[0], pos);
        }
        frames += 1;
    }

    if frames == 0 {
        return Err(SdfError::Parse("xyz input holds no frames".into()));
    }
    builder.finish()
}
