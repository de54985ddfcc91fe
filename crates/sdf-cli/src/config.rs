use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::Slab;
use sdf_engine::{FrameWindow, SpeciesPair};

use crate::job::{Analysis, Job};

/// Job file for `sdf run`. YAML or JSON, picked by extension.
///
/// ```yaml
/// input: water.axsf
/// frames: [0, -1]
/// analysis:
///   kind: rdf
///   species: [O, H]
///   rcut: 8.0
///   dr: 0.05
///   pbc: true
///   slab: [10.0, 15.0]
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_frames")]
    pub frames: [i64; 2],
    pub analysis: AnalysisSpec,
}

fn default_frames() -> [i64; 2] {
    [0, FrameWindow::LAST]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisSpec {
    Rdf {
        species: Vec<String>,
        rcut: f64,
        dr: f64,
        #[serde(default)]
        pbc: bool,
        #[serde(default)]
        slab: Option<[f64; 2]>,
    },
    Pdf {
        species: String,
        dxy: f64,
        slab: [f64; 2],
    },
    BondLength {
        atoms: [String; 2],
        rcut: f64,
    },
}

impl JobConfig {
    /// Validates the file contents and resolves relative paths against
    /// `base` (the job file's directory).
    pub fn into_job(self, base: Option<&Path>) -> SdfResult<Job> {
        let resolve = |p: PathBuf| match base {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p,
        };
        let analysis = match self.analysis {
            AnalysisSpec::Rdf {
                species,
                rcut,
                dr,
                pbc,
                slab,
            } => {
                let mut labels = species.into_iter();
                let species = match (labels.next(), labels.next(), labels.next()) {
                    (Some(a), None, None) => SpeciesPair::Mono(a),
                    (Some(a), Some(b), None) => SpeciesPair::Multi(a, b),
                    _ => {
                        return Err(SdfError::Config(
                            "rdf species must list one label (mono) or two labels (multi)".into(),
                        ))
                    }
                };
                let slab = slab.map(|[min, max]| Slab::new(min, max)).transpose()?;
                Analysis::Rdf {
                    species,
                    cutoff: rcut,
                    bin_width: dr,
                    pbc,
                    slab,
                }
            }
            AnalysisSpec::Pdf { species, dxy, slab } => Analysis::Pdf {
                species,
                slab: Slab::new(slab[0], slab[1])?,
                bin_width: dxy,
            },
            AnalysisSpec::BondLength { atoms, rcut } => {
                let [first, second] = atoms;
                Analysis::BondLength {
                    first,
                    second,
                    cutoff: rcut,
                }
            }
        };
        Ok(Job {
            input: resolve(self.input),
            output: self.output.map(resolve),
            window: FrameWindow::new(self.frames[0], self.frames[1]),
            analysis,
        })
    }
}

pub fn load_job(path: &Path) -> SdfResult<Job> {
    let content = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    let cfg: JobConfig = if ext == "yaml" || ext == "yml" {
        serde_yaml::from_str(&content)
            .map_err(|e| SdfError::Config(format!("yaml parse error: {e}")))?
    } else {
        serde_json::from_str(&content)
            .map_err(|e| SdfError::Config(format!("json parse error: {e}")))?
    };
    cfg.into_job(path.parent())
}
