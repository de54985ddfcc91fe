//! XCrySDen structure files, single snapshot or `ANIMSTEPS` animation.
//!
//! Periodic files carry `PRIMVEC` lattice vectors followed by one
//! `PRIMCOORD` block per frame; molecular files use `ATOMS` blocks and have
//! no box. Only orthorhombic lattices are accepted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::Peekable;
use std::path::PathBuf;

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::{Trajectory, TrajectoryBuilder};
use sdf_core::geom::Vec3;
use sdf_core::pbc::OrthoBox;

use crate::{parse_f64, parse_usize, TrajectoryReader};

pub struct XsfReader {
    path: PathBuf,
}

impl XsfReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TrajectoryReader for XsfReader {
    fn read_trajectory(&mut self) -> SdfResult<Trajectory> {
        let file = File::open(&self.path)?;
        parse_xsf_reader(BufReader::new(file))
    }
}

const KEYWORDS: &[&str] = &[
    "ANIMSTEPS",
    "CRYSTAL",
    "SLAB",
    "POLYMER",
    "MOLECULE",
    "PRIMVEC",
    "CONVVEC",
    "PRIMCOORD",
    "CONVCOORD",
    "ATOMS",
];

fn is_keyword(token: &str) -> bool {
    KEYWORDS.iter().any(|k| token.eq_ignore_ascii_case(k))
}

type Lines = Vec<(usize, String)>;

fn content_lines<R: BufRead>(reader: R) -> SdfResult<Lines> {
    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        lines.push((idx + 1, trimmed.to_string()));
    }
    Ok(lines)
}

fn next_line<I: Iterator<Item = (usize, String)>>(
    lines: &mut I,
    what: &str,
) -> SdfResult<(usize, String)> {
    lines
        .next()
        .ok_or_else(|| SdfError::Parse(format!("unexpected end of file while reading {what}")))
}

fn read_vectors<I: Iterator<Item = (usize, String)>>(
    lines: &mut I,
) -> SdfResult<[[f64; 3]; 3]> {
    let mut m = [[0.0; 3]; 3];
    for row in m.iter_mut() {
        let (line_no, line) = next_line(lines, "lattice vectors")?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(SdfError::Parse(format!(
                "line {line_no}: lattice vector needs three components"
            )));
        }
        for (k, value) in row.iter_mut().enumerate() {
            *value = parse_f64(tokens[k], "lattice component", line_no)?;
        }
    }
    Ok(m)
}

fn box_from_vectors(m: [[f64; 3]; 3]) -> SdfResult<OrthoBox> {
    let off_diag = [m[0][1], m[0][2], m[1][0], m[1][2], m[2][0], m[2][1]];
    if off_diag.iter().any(|&v| v != 0.0) {
        return Err(SdfError::Unsupported(
            "triclinic cells are not supported, PRIMVEC must be diagonal".into(),
        ));
    }
    OrthoBox::new(m[0][0], m[1][1], m[2][2])
}

fn parse_atom(line_no: usize, line: &str) -> SdfResult<(String, Vec3)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(SdfError::Parse(format!(
            "line {line_no}: atom record needs a label and three coordinates"
        )));
    }
    let x = parse_f64(tokens[1], "x coordinate", line_no)?;
    let y = parse_f64(tokens[2], "y coordinate", line_no)?;
    let z = parse_f64(tokens[3], "z coordinate", line_no)?;
    Ok((tokens[0].to_string(), Vec3::new(x, y, z)))
}

fn read_primcoord<I: Iterator<Item = (usize, String)>>(
    lines: &mut I,
    out: &mut TrajectoryBuilder,
) -> SdfResult<()> {
    let (line_no, header) = next_line(lines, "PRIMCOORD header")?;
    let count_token = header.split_whitespace().next().unwrap_or("");
    let n_atoms = parse_usize(count_token, "atom count", line_no)?;
    out.start_frame()?;
    for _ in 0..n_atoms {
        let (line_no, line) = next_line(lines, "PRIMCOORD atoms")?;
        let (label, pos) = parse_atom(line_no, &line)?;
        out.push_atom(&label, pos);
    }
    Ok(())
}

fn read_atoms_block<I: Iterator<Item = (usize, String)>>(
    lines: &mut Peekable<I>,
    out: &mut TrajectoryBuilder,
) -> SdfResult<()> {
    out.start_frame()?;
    while let Some((_, line)) = lines.peek() {
        let first = line.split_whitespace().next().unwrap_or("");
        if is_keyword(first) {
            break;
        }
        let (line_no, line) = next_line(lines, "ATOMS block")?;
        let (label, pos) = parse_atom(line_no, &line)?;
        out.push_atom(&label, pos);
    }
    Ok(())
}

pub fn parse_xsf_reader<R: BufRead>(reader: R) -> SdfResult<Trajectory> {
    let mut lines = content_lines(reader)?.into_iter().peekable();
    let mut builder = TrajectoryBuilder::new();
    let mut declared_steps: Option<usize> = None;
    let mut box_: Option<OrthoBox> = None;
    let mut frames = 0usize;

    while let Some((line_no, line)) = lines.next() {
        let mut tokens = line.split_whitespace();
        let keyword = tokens.next().unwrap_or("").to_ascii_uppercase();
        match keyword.as_str() {
            "ANIMSTEPS" => {
                let token = tokens.next().ok_or_else(|| {
                    SdfError::Parse(format!("line {line_no}: ANIMSTEPS needs a count"))
                })?;
                declared_steps = Some(parse_usize(token, "ANIMSTEPS count", line_no)?);
            }
            "CRYSTAL" | "SLAB" | "POLYMER" | "MOLECULE" => {}
            "PRIMVEC" => {
                let cell = box_from_vectors(read_vectors(&mut lines)?)?;
                match box_ {
                    None => box_ = Some(cell),
                    Some(existing) if existing == cell => {}
                    Some(_) => {
                        return Err(SdfError::Unsupported(format!(
                            "line {line_no}: variable-cell animations are not supported"
                        )))
                    }
                }
            }
            "CONVVEC" => {
                read_vectors(&mut lines)?;
            }
            "PRIMCOORD" => {
                read_primcoord(&mut lines, &mut builder)?;
                frames += 1;
            }
            "CONVCOORD" => {
                return Err(SdfError::Unsupported(format!(
                    "line {line_no}: CONVCOORD blocks are not supported, use PRIMCOORD"
                )));
            }
            "ATOMS" => {
                read_atoms_block(&mut lines, &mut builder)?;
                frames += 1;
            }
            other => {
                return Err(SdfError::Parse(format!(
                    "line {line_no}: unexpected token '{other}'"
                )));
            }
        }
    }

    if frames == 0 {
        return Err(SdfError::Parse("no PRIMCOORD or ATOMS block found".into()));
    }
    if let Some(steps) = declared_steps {
        if steps != frames {
            return Err(SdfError::Mismatch(format!(
                "ANIMSTEPS declares {steps} frames but {frames} were read"
            )));
        }
    }
    builder.set_box(box_);
    let traj = builder.finish()?;
    tracing::debug!(
        frames = traj.n_frames(),
        atoms = traj.n_atoms(),
        periodic = traj.box_().is_some(),
        "parsed xsf"
    );
    Ok(traj)
}
