//! Command-line interface for the calibration pipeline.

use clap::Parser;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::logging::RunLogger;
use crate::processors::{run_calibration, RunSummary};
use crate::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "pathloss-cal")]
#[command(about = "Normalize path-loss calibration sweeps and plot comparisons", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbose {
            0 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<62} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 39 {
            format!("{}...", value.chars().take(36).collect::<String>())
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<39} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

/// Data directory: the directory of the running executable.
fn resolve_data_dir() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        )
    })
}

pub fn run() {
    let cli = Cli::parse();

    // The logger lives for this run only and is handed down explicitly.
    let log = RunLogger::console(cli.level_filter());

    let config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                log.info(format_args!("Loaded config from: {}", path.display()));
                cfg
            }
            Err(e) => {
                log.warn(format_args!(
                    "Failed to load config from {}: {}, using defaults",
                    path.display(),
                    e
                ));
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    let data_dir = match resolve_data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log.error(format_args!("Cannot locate data directory: {}", e));
            return;
        }
    };

    let start = Instant::now();

    match run_calibration(&data_dir, &config.plot, &log) {
        Ok(summary) if summary.sources.is_empty() => {}
        Ok(summary) => report(&data_dir, &summary, start),
        Err(e) => log.error(format_args!("Run failed: {:#}", e)),
    }
}

fn report(data_dir: &Path, summary: &RunSummary, start: Instant) {
    print_summary(
        "Calibration Complete",
        &[
            ("Directory", data_dir.display().to_string()),
            ("Source files", summary.sources.len().to_string()),
            ("Skipped", summary.skipped.len().to_string()),
            ("Failed", summary.failed.len().to_string()),
            ("Outputs written", summary.written.len().to_string()),
            ("Plots", summary.plots.len().to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );
}
