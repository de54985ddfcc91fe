use std::path::{Path, PathBuf};
use std::time::Instant;

use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::Slab;
use sdf_core::pbc::PbcDims;
use sdf_core::table::Table;
use sdf_engine::{
    BondLengthPlan, Executor, FrameStats, FrameWindow, PdfPlan, PlanOutput, RdfGeometry, RdfPlan,
    SpeciesPair,
};
use sdf_io::{open_trajectory, write_table};

/// A fully validated analysis request, built from CLI flags or a job file.
#[derive(Clone, Debug)]
pub struct Job {
    pub input: PathBuf,
    /// Output stem; `.csv` is appended when missing. `None` picks
    /// [`default_output_name`].
    pub output: Option<PathBuf>,
    pub window: FrameWindow,
    pub analysis: Analysis,
}

#[derive(Clone, Debug)]
pub enum Analysis {
    Rdf {
        species: SpeciesPair,
        cutoff: f64,
        bin_width: f64,
        pbc: bool,
        slab: Option<Slab>,
    },
    Pdf {
        species: String,
        slab: Slab,
        bin_width: f64,
    },
    BondLength {
        first: String,
        second: String,
        cutoff: f64,
    },
}

/// Console lines for a finished job, plus the table written (bond length
/// writes none).
#[derive(Clone, Debug, Default)]
pub struct Report {
    pub lines: Vec<String>,
    pub output: Option<PathBuf>,
}

impl Report {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

fn pair_name(species: &SpeciesPair) -> (String, String) {
    match species {
        SpeciesPair::Mono(a) => (a.clone(), a.clone()),
        SpeciesPair::Multi(a, b) => (a.clone(), b.clone()),
    }
}

/// Output stem used when the job names none, e.g.
/// `RDF2D_O-H_z-10.00-15.00_PBC` or `PDF_C_z-1.00-3.00`.
pub fn default_output_name(analysis: &Analysis) -> Option<PathBuf> {
    let name = match analysis {
        Analysis::Rdf {
            species, pbc, slab, ..
        } => {
            let (a, b) = pair_name(species);
            let mut name = match slab {
                Some(slab) => format!("RDF2D_{a}-{b}_z-{:.2}-{:.2}", slab.min, slab.max),
                None => format!("RDF_{a}-{b}"),
            };
            if *pbc {
                name.push_str("_PBC");
            }
            name
        }
        Analysis::Pdf { species, slab, .. } => {
            format!("PDF_{species}_z-{:.2}-{:.2}", slab.min, slab.max)
        }
        Analysis::BondLength { .. } => return None,
    };
    Some(PathBuf::from(name))
}

fn population_line(stats: &FrameStats, labels: &[String], where_: &str) -> SdfResult<String> {
    match labels {
        [a] => Ok(format!(
            "There are {:.2} {a} atoms on average{where_}.",
            stats.average_population(0)?
        )),
        [a, b] => Ok(format!(
            "There are {:.2} {a} atoms and {:.2} {b} atoms on average{where_}.",
            stats.average_population(0)?,
            stats.average_population(1)?
        )),
        _ => Err(SdfError::Mismatch(format!(
            "expected one or two species groups, got {}",
            labels.len()
        ))),
    }
}

fn unexpected(plan: &str) -> SdfError {
    SdfError::Mismatch(format!("{plan} plan produced a different output kind"))
}

/// Reads the trajectory, runs the analysis over the job's frame window and
/// writes the resulting table.
pub fn run_job(job: &Job) -> SdfResult<Report> {
    let start = Instant::now();
    let mut reader = open_trajectory(&job.input)?;
    let traj = reader.read_trajectory()?;
    tracing::debug!(
        input = %job.input.display(),
        atoms = traj.n_atoms(),
        frames = traj.n_frames(),
        "trajectory loaded"
    );
    let mut executor = Executor::new().with_window(job.window);
    let mut report = Report::default();
    match &job.analysis {
        Analysis::Rdf {
            species,
            cutoff,
            bin_width,
            pbc,
            slab,
        } => {
            let (a, b) = pair_name(species);
            let dim = if slab.is_some() { "2D" } else { "3D" };
            let with = if *pbc { "with" } else { "without" };
            report.line(match species {
                SpeciesPair::Mono(_) => format!("Running {dim} RDF between {a} atoms {with} PBC."),
                SpeciesPair::Multi(..) => {
                    format!("Running {dim} RDF between {a} and {b} atoms {with} PBC.")
                }
            });
            let geometry = match slab {
                Some(slab) => RdfGeometry::Slab(*slab),
                None => RdfGeometry::Bulk,
            };
            let mut plan = RdfPlan::new(species.clone(), *cutoff, *bin_width)
                .with_pbc(*pbc)
                .with_geometry(geometry);
            let PlanOutput::Rdf(out) = executor.run_plan(&mut plan, &traj)? else {
                return Err(unexpected("rdf"));
            };
            if out.clamped_from.is_some() {
                let dims = if slab.is_some() { PbcDims::Xy } else { PbcDims::Xyz };
                if let Some(limit) = traj.box_().map(|b| b.half_min_edge(dims)) {
                    report.line(format!("Cannot choose Rcut greater than {limit:.3}."));
                    report.line("This will be the new Rcut value.");
                }
            }
            let written = write_output(job, &out.table)?;
            report.line(format!("Job done in {:.3} seconds!", start.elapsed().as_secs_f64()));
            report.line(format!("Output file: {}", written.display()));
            let where_ = if slab.is_some() { " within this slab" } else { "" };
            report.line(population_line(&out.stats, &out.labels, where_)?);
            report.output = Some(written);
        }
        Analysis::Pdf {
            species,
            slab,
            bin_width,
        } => {
            report.line(format!("Running PDF for {species} atoms."));
            let mut plan = PdfPlan::new(species.clone(), *slab, *bin_width);
            let PlanOutput::Pdf(out) = executor.run_plan(&mut plan, &traj)? else {
                return Err(unexpected("pdf"));
            };
            let written = write_output(job, &out.table)?;
            report.line(format!("Job done in {:.3} seconds!", start.elapsed().as_secs_f64()));
            report.line(format!("Output file: {}", written.display()));
            report.line(population_line(
                &out.stats,
                std::slice::from_ref(&out.label),
                " within this slab",
            )?);
            report.output = Some(written);
        }
        Analysis::BondLength {
            first,
            second,
            cutoff,
        } => {
            report.line(format!("Running bond length between {first} and {second}."));
            let mut plan = BondLengthPlan::new(first.clone(), second.clone(), *cutoff);
            let PlanOutput::BondLength(out) = executor.run_plan(&mut plan, &traj)? else {
                return Err(unexpected("bond length"));
            };
            report.line(format!("Job done in {:.3} seconds!", start.elapsed().as_secs_f64()));
            report.line(format!(
                "The average bond length between {first} and {second} is {:.4} Angstrom with a standard deviation of {:.4} Angstrom.",
                out.mean, out.std
            ));
        }
    }
    Ok(report)
}

fn write_output(job: &Job, table: &Table) -> SdfResult<PathBuf> {
    let stem = match &job.output {
        Some(path) => path.clone(),
        None => default_output_name(&job.analysis)
            .ok_or_else(|| SdfError::Config("no output name for this analysis".into()))?,
    };
    ensure_parent(&stem)?;
    write_table(&stem, table)
}

fn ensure_parent(path: &Path) -> SdfResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
