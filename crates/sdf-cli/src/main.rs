use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sdf_cli::{load_job, run_job, Analysis, Job};
use sdf_core::error::{SdfError, SdfResult};
use sdf_core::frame::Slab;
use sdf_engine::{FrameWindow, SpeciesPair};

#[derive(Parser)]
#[command(
    name = "sdf",
    version,
    about = "Radial and planar distribution functions for MD trajectories"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Radial distribution function, 3D or restricted to a slab.
    Rdf(RdfArgs),
    /// Planar distribution function of one species inside a slab.
    Pdf(PdfArgs),
    /// Mean and standard deviation of pair distances under a cutoff.
    BondLength(BondLengthArgs),
    /// Run a job described in a YAML or JSON file.
    Run {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SpeciesArgs {
    /// Pairs within one species.
    #[arg(long)]
    mono: Option<String>,
    /// Pairs between two species.
    #[arg(long, num_args = 2, value_names = ["AT1", "AT2"])]
    multi: Option<Vec<String>>,
}

impl SpeciesArgs {
    fn into_pair(self) -> SdfResult<SpeciesPair> {
        match (self.mono, self.multi) {
            (Some(a), None) => Ok(SpeciesPair::Mono(a)),
            (None, Some(labels)) => match <[String; 2]>::try_from(labels) {
                Ok([a, b]) => Ok(SpeciesPair::Multi(a, b)),
                Err(_) => Err(SdfError::Config("--multi takes two labels".into())),
            },
            _ => Err(SdfError::Config(
                "choose --mono or --multi and the species to compare".into(),
            )),
        }
    }
}

#[derive(Args)]
struct RdfArgs {
    /// Trajectory file (.xsf, .axsf or .xyz).
    input: PathBuf,
    /// Maximum distance in Angstrom.
    rcut: f64,
    /// Bin width in Angstrom.
    dr: f64,
    #[command(flatten)]
    species: SpeciesArgs,
    /// Fold distances with the minimum image convention.
    #[arg(long)]
    pbc: bool,
    /// Restrict to atoms with Hmin <= z < Hmax (2D RDF).
    #[arg(long, num_args = 2, value_names = ["HMIN", "HMAX"], allow_negative_numbers = true)]
    hcut: Option<Vec<f64>>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct PdfArgs {
    /// Trajectory file (.xsf or .axsf).
    input: PathBuf,
    /// Species to bin.
    species: String,
    /// Cell edge in Angstrom.
    dxy: f64,
    /// Slab bounds, Hmin <= z < Hmax.
    #[arg(num_args = 2, value_names = ["HMIN", "HMAX"], allow_negative_numbers = true)]
    hcut: Vec<f64>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct BondLengthArgs {
    /// Structure file (.xyz).
    input: PathBuf,
    /// Maximum bond length in Angstrom.
    rcut: f64,
    /// The two species forming the bond.
    #[arg(num_args = 2, value_names = ["AT1", "AT2"])]
    atoms: Vec<String>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// First frame (1-based, 0 also means the first) and exclusive end (-1 for the last).
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["START", "END"],
        default_values_t = [0, -1],
        allow_negative_numbers = true
    )]
    frames: Vec<i64>,
    /// Output path. `.csv` is appended unless the name already ends in `.csv`,
    /// so `-o out.csv` writes `out.csv`, not `out.csv.csv`.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl CommonArgs {
    fn window(&self) -> SdfResult<FrameWindow> {
        match self.frames.as_slice() {
            [start, end] => Ok(FrameWindow::new(*start, *end)),
            _ => Err(SdfError::Config("--frames takes a start and an end".into())),
        }
    }
}

fn slab_from(bounds: &[f64]) -> SdfResult<Slab> {
    match bounds {
        [min, max] => Slab::new(*min, *max),
        _ => Err(SdfError::Config("slab needs Hmin and Hmax".into())),
    }
}

fn main() -> Result<(), String> {
    if let Err(err) = run_cli() {
        return Err(err.to_string());
    }
    Ok(())
}

fn run_cli() -> SdfResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let job = build_job(cli.command)?;
    let report = run_job(&job)?;
    for line in &report.lines {
        println!("{line}");
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_job(command: Command) -> SdfResult<Job> {
    match command {
        Command::Rdf(args) => Ok(Job {
            window: args.common.window()?,
            input: args.input,
            output: args.common.output,
            analysis: Analysis::Rdf {
                species: args.species.into_pair()?,
                cutoff: args.rcut,
                bin_width: args.dr,
                pbc: args.pbc,
                slab: args.hcut.as_deref().map(slab_from).transpose()?,
            },
        }),
        Command::Pdf(args) => Ok(Job {
            window: args.common.window()?,
            input: args.input,
            output: args.common.output,
            analysis: Analysis::Pdf {
                species: args.species,
                slab: slab_from(&args.hcut)?,
                bin_width: args.dxy,
            },
        }),
        Command::BondLength(args) => {
            let window = args.common.window()?;
            let [first, second] = <[String; 2]>::try_from(args.atoms)
                .map_err(|_| SdfError::Config("bond length takes two species".into()))?;
            Ok(Job {
                input: args.input,
                output: args.common.output,
                window,
                analysis: Analysis::BondLength {
                    first,
                    second,
                    cutoff: args.rcut,
                },
            })
        }
        Command::Run { config } => load_job(&config),
    }
}
