#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const ARGON_PAIR_XYZ: &str = "2\nargon dimer\nAr 0.0 0.0 0.0\nAr 1.0 0.0 0.0\n";

pub const WATER_XYZ: &str = "\
4
water plus a stray hydrogen
O 0.0 0.0 0.0
H 0.96 0.0 0.0
H 0.0 1.0 0.0
H 5.0 5.0 5.0
";

/// Three oxygens in a 10 Angstrom cube.
pub const OXYGEN_AXSF: &str = "\
CRYSTAL
PRIMVEC
  10.0 0.0 0.0
  0.0 10.0 0.0
  0.0 0.0 10.0
PRIMCOORD
3 1
O 1.0 1.0 1.0
O 9.0 1.0 1.0
O 1.0 4.0 1.0
";

pub fn write_text(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write fixture");
    path
}
