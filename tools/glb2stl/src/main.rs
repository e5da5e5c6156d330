//! glb2stl - binary glTF to STL converter
//!
//! Converts the first triangle mesh of a .glb file into binary or ASCII STL.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use glb2stl::batch::{self, BatchReport, Job};
use glb2stl::config::{BatchConfig, DEFAULT_CONFIG_FILE};
use glb2stl::convert::{self, GlbReport};
use glb2stl::{ConvertOptions, StlEncoding};

#[derive(Parser)]
#[command(name = "glb2stl")]
#[command(about = "Binary glTF (GLB) to STL converter")]
#[command(version)]
struct Cli {
    /// Config file with output/decode defaults (glb2stl.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single GLB file
    Convert {
        /// Input .glb file
        input: PathBuf,

        /// Output .stl file (default: input with .stl extension)
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,

        /// Binary STL header text (max 80 bytes)
        #[arg(long)]
        header: Option<String>,

        /// ASCII STL solid name
        #[arg(long)]
        solid_name: Option<String>,
    },

    /// Convert every .glb file under a directory
    Batch {
        /// Directory to search recursively
        dir: PathBuf,

        /// Output directory (default: next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Run the jobs listed in a manifest
    Build {
        /// Path to glb2stl.toml manifest
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        manifest: PathBuf,
    },

    /// Print the structure of a GLB file
    Inspect {
        /// Input .glb file
        input: PathBuf,

        /// Reject container versions other than 2
        #[arg(long)]
        strict_version: bool,
    },
}

/// Flags shared by `convert` and `batch`
#[derive(clap::Args)]
struct Overrides {
    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Reject container versions other than 2
    #[arg(long)]
    strict_version: bool,
}

impl Overrides {
    fn apply(&self, options: &mut ConvertOptions) {
        if self.ascii {
            options.stl.encoding = StlEncoding::Ascii;
        }
        if self.strict_version {
            options.decode.strict_version = true;
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BatchConfig::load(path)?,
        None => BatchConfig::default(),
    };

    match cli.command {
        Commands::Convert {
            input,
            output,
            overrides,
            header,
            solid_name,
        } => {
            let mut options = config.convert_options();
            overrides.apply(&mut options);
            if let Some(header) = header {
                options.stl.header = header;
            }
            if let Some(solid_name) = solid_name {
                options.stl.solid_name = solid_name;
            }
            options.stl.validate()?;

            let output = output.unwrap_or_else(|| convert::default_output_path(&input));
            tracing::info!("Converting {:?} -> {:?}", input, output);
            convert::convert_glb(&input, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::Batch {
            dir,
            output,
            overrides,
        } => {
            let mut options = config.convert_options();
            overrides.apply(&mut options);

            let jobs = batch::collect_directory_jobs(&dir, output.as_deref(), &options)?;
            if jobs.is_empty() {
                tracing::warn!("No .glb files found under {:?}", dir);
                return Ok(());
            }
            run_jobs(&jobs)?;
        }

        Commands::Build { manifest } => {
            tracing::info!("Building from {:?}", manifest);
            let manifest_config = BatchConfig::load(&manifest)?;
            if manifest_config.jobs.is_empty() {
                anyhow::bail!("{:?} lists no [[jobs]]", manifest);
            }
            let base_dir = manifest.parent().unwrap_or(Path::new("."));
            let jobs = batch::collect_config_jobs(&manifest_config, base_dir)?;
            run_jobs(&jobs)?;
        }

        Commands::Inspect {
            input,
            strict_version,
        } => {
            let mut options = config.convert_options().decode;
            options.strict_version |= strict_version;
            let report = convert::inspect_glb(&input, &options)?;
            print_report(&input, &report);
        }
    }

    Ok(())
}

fn run_jobs(jobs: &[Job]) -> Result<()> {
    tracing::info!("Converting {} file(s)", jobs.len());
    let report = batch::run_batch(jobs);
    print_batch_summary(&report);
    if !report.is_success() {
        anyhow::bail!(
            "{} of {} conversion(s) failed",
            report.failed.len(),
            report.total()
        );
    }
    Ok(())
}

fn print_batch_summary(report: &BatchReport) {
    for summary in &report.converted {
        println!(
            "  ok    {} -> {} ({} triangles)",
            summary.input.display(),
            summary.output.display(),
            summary.triangle_count
        );
    }
    for (input, error) in &report.failed {
        println!("  FAIL  {}: {:#}", input.display(), error);
    }
    println!(
        "{} converted, {} failed",
        report.converted.len(),
        report.failed.len()
    );
}

fn print_report(input: &Path, report: &GlbReport) {
    println!("{}", input.display());
    println!("  glTF version:  {}", report.version);
    println!(
        "  Total length:  {} bytes (file is {} bytes)",
        report.declared_length, report.actual_length
    );
    for chunk in &report.chunks {
        println!(
            "  {} chunk:     {} bytes at offset {}",
            chunk.kind, chunk.length, chunk.offset
        );
    }
    if let Some(version) = &report.asset_version {
        println!("  Asset version: {}", version);
    }
    if let Some(generator) = &report.generator {
        println!("  Generator:     {}", generator);
    }
    for (i, (byte_length, uri)) in report.buffers.iter().enumerate() {
        match uri {
            Some(uri) => println!("  Buffer {}:      {} bytes, external {:?}", i, byte_length, uri),
            None => println!("  Buffer {}:      {} bytes, embedded", i, byte_length),
        }
    }
    println!("  Buffer views:  {}", report.buffer_views);
    println!("  Accessors:     {}", report.accessors);
    println!("  Meshes:        {}", report.meshes.len());
    for (i, (name, primitives)) in report.meshes.iter().enumerate() {
        println!(
            "    [{}] {} ({} primitive(s))",
            i,
            name.as_deref().unwrap_or("<unnamed>"),
            primitives
        );
    }
    if !report.extensions_used.is_empty() {
        println!("  Extensions used: {}", report.extensions_used.join(", "));
    }
    if !report.extensions_required.is_empty() {
        println!(
            "  Required extensions: {}",
            report.extensions_required.join(", ")
        );
    }
    match &report.extraction {
        Ok((triangles, bounds)) => {
            println!("  Triangles:     {}", triangles);
            if let Some(b) = bounds {
                println!(
                    "  Bounds:        X({:.3} to {:.3}) Y({:.3} to {:.3}) Z({:.3} to {:.3})",
                    b.min[0], b.max[0], b.min[1], b.max[1], b.min[2], b.max[2]
                );
            }
        }
        Err(e) => println!("  Not convertible: {}", e),
    }
}
