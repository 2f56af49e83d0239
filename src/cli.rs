//
// cli.rs
// dicom2bmp
//
// Defines the CLI surface with Clap, sets up logging and runs the conversion with the resulting configuration.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::batch;
use crate::config::{ConverterConfig, VoiPolicy, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use crate::models::BatchReport;

/// Command-line arguments. Every flag is optional; the folders default to the usual layout.
#[derive(Parser, Debug)]
#[command(name = "dicom2bmp")]
#[command(about = "Convert a folder of DICOM images to BMP", long_about = None)]
pub struct Cli {
    /// Folder containing the DICOM files
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,
    /// Folder receiving the BMP files (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,
    /// Frame to export from multi-frame files
    #[arg(long)]
    pub frame: Option<u32>,
    #[arg(long, allow_hyphen_values = true)]
    pub window_center: Option<f64>,
    #[arg(long)]
    pub window_width: Option<f64>,
    /// Always stretch the pixel range to 0-255
    #[arg(long)]
    pub normalize: bool,
    #[arg(long)]
    pub disable_modality_lut: bool,
    #[arg(long, conflicts_with_all = ["normalize", "window_center", "window_width"])]
    pub disable_voi_lut: bool,
    /// Also convert files in sub-folders, mirroring them in the output
    #[arg(short, long)]
    pub recursive: bool,
    /// Worker threads; 1 processes files one after another
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
    /// Write a JSON summary of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn to_config(&self) -> anyhow::Result<ConverterConfig> {
        let voi = if self.disable_voi_lut {
            VoiPolicy::Identity
        } else if let Some((center, width)) = parse_window(self.window_center, self.window_width)? {
            VoiPolicy::Window { center, width }
        } else if self.normalize {
            VoiPolicy::MinMax
        } else {
            VoiPolicy::Auto
        };

        Ok(ConverterConfig::new(self.input.clone(), self.output.clone())
            .with_frame(self.frame)
            .with_voi(voi)
            .with_modality_lut(!self.disable_modality_lut)
            .recursive(self.recursive)
            .with_jobs(self.jobs))
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = cli.to_config()?;
    let report = batch::convert_directory(&config)?;
    print_summary(&report);

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json).with_context(|| format!("Failed to write report to {:?}", path))?;
    }

    Ok(())
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_summary(report: &BatchReport) {
    if report.total() == 0 {
        println!("No files found in {:?}", report.input_dir);
        return;
    }

    if report.all_succeeded() {
        println!(
            "All {} files converted successfully into {:?}",
            report.converted.len(),
            report.output_dir
        );
        return;
    }

    println!(
        "Conversion completed: {} successful, {} failed",
        report.converted.len(),
        report.failed.len()
    );
    for failed in &report.failed {
        println!("  - {:?}: {}", failed.source, failed.reason);
    }
}

fn parse_window(center: Option<f64>, width: Option<f64>) -> anyhow::Result<Option<(f64, f64)>> {
    // Window requires both center and width to make sense; reject mismatched input early.
    match (center, width) {
        (Some(_), Some(w)) if w <= 0.0 => bail!("--window-width must be greater than zero"),
        (Some(c), Some(w)) => Ok(Some((c, w))),
        (None, None) => Ok(None),
        _ => Err(anyhow!(
            "Provide both --window-center and --window-width, or neither"
        )),
    }
}
