//! tunnelcad CLI
//!
//! Builds tunnels and coal seams into an in-memory drawing and writes the
//! result as JSON.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tunnelcad::forms::{SeamForm, TunnelForm};
use tunnelcad::{build_coal_seam, build_tunnel, run_job, JobFile, MemoryEmitter};

#[derive(Parser)]
#[command(name = "tunnelcad")]
#[command(about = "Mine tunnel and coal seam layout", long_about = None)]
struct Cli {
    /// Log geometric detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write the resulting drawing as JSON
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Print command reports as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep a section along a path file
    Tunnel {
        /// Section type (three-star, half-circle, trapezoid)
        #[arg(short = 't', long = "type")]
        tunnel_type: String,
        /// Section dimensions in slot order
        #[arg(short, long, num_args = 1.., allow_hyphen_values = true)]
        dimensions: Vec<String>,
        /// Path file with one `x y z` point per line
        #[arg(short, long)]
        path: PathBuf,
        /// Center the section on the path
        #[arg(long)]
        auto_center: bool,
    },
    /// Lay out a tilted coal seam with a sampling grid
    Seam(SeamArgs),
    /// Run a TOML job file
    Run {
        /// Job file
        job: PathBuf,
    },
}

#[derive(Args)]
struct SeamArgs {
    /// Frame origin, `x,y,z`
    #[arg(long, default_value = "0,0,0", allow_hyphen_values = true)]
    origin: String,
    /// Frame X axis, `x,y,z`
    #[arg(long, default_value = "1,0,0", allow_hyphen_values = true)]
    x_axis: String,
    /// Frame Y axis, `x,y,z`
    #[arg(long, default_value = "0,1,0", allow_hyphen_values = true)]
    y_axis: String,
    /// Distance to the seam along local Z
    #[arg(long, allow_hyphen_values = true)]
    towards: String,
    /// Extent along local X
    #[arg(long)]
    length: String,
    /// Extent along local Y
    #[arg(long)]
    width: String,
    /// Extent along local Z
    #[arg(long)]
    thickness: String,
    /// Tilt about local X, degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    angle_x: String,
    /// Tilt about local Y, degrees
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    angle_y: String,
    /// Grid spacing along X
    #[arg(long)]
    grid_length: String,
    /// Grid spacing along Y
    #[arg(long)]
    grid_width: String,
    /// Write grid crossings to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,
}

impl From<SeamArgs> for SeamForm {
    fn from(args: SeamArgs) -> Self {
        SeamForm {
            origin: args.origin,
            x_axis: args.x_axis,
            y_axis: args.y_axis,
            towards: args.towards,
            length: args.length,
            width: args.width,
            thickness: args.thickness,
            angle_x: args.angle_x,
            angle_y: args.angle_y,
            grid_length: args.grid_length,
            grid_width: args.grid_width,
            export: args
                .export
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut emitter = MemoryEmitter::new();

    match cli.command {
        Commands::Tunnel {
            tunnel_type,
            dimensions,
            path,
            auto_center,
        } => {
            let form = TunnelForm {
                tunnel_type,
                dimensions,
                path_file: path.display().to_string(),
                auto_center,
            };
            let request = form.validate()?.into_request(None)?;
            let report = build_tunnel(&mut emitter, &request)?;
            print_report(&report, cli.json)?;
        }
        Commands::Seam(args) => {
            let request = SeamForm::from(args).validate()?;
            let report = build_coal_seam(&mut emitter, &request)?;
            print_report(&report, cli.json)?;
        }
        Commands::Run { job } => {
            let file = JobFile::load(&job)?;
            let base_dir = job.parent().unwrap_or_else(|| Path::new("."));
            let report = run_job(&mut emitter, &file, base_dir)
                .with_context(|| format!("job {} failed", job.display()))?;
            if let Some(tunnel) = &report.tunnel {
                print_report(tunnel, cli.json)?;
            }
            if let Some(seam) = &report.seam {
                print_report(seam, cli.json)?;
            }
        }
    }

    if let Some(output) = &cli.output {
        write_document(&emitter, output)?;
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_report<R: std::fmt::Display + Serialize>(report: &R, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn write_document(emitter: &MemoryEmitter, output: &Path) -> Result<()> {
    let doc = emitter.document();
    let json = doc.to_json().context("failed to serialize drawing")?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;
    debug!(entities = doc.len(), "drawing serialized");
    info!("Drawing written to {}", output.display());
    Ok(())
}
