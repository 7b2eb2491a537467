//! Calibration run: source discovery, normalization, grouping and plotting.
//!
//! A run walks through [`RunPhase`]s in order. Failures while processing a
//! single source are logged and the run moves on to the next source; only
//! listing and plotting failures abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::PlotConfig;
use crate::core::loaders::load_sweep;
use crate::core::naming::output_names;
use crate::core::writers::write_curve;
use crate::logging::RunLogger;
use crate::processors::grouping::FileGroups;
use crate::visualization;

/// Phases of a calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Listing,
    Processing,
    Plotting,
    Done,
}

/// What a run did.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Source CSV file names, in processing order.
    pub sources: Vec<String>,
    /// Sources whose names match no naming rule.
    pub skipped: Vec<String>,
    /// Sources that failed, with the error text.
    pub failed: Vec<(String, String)>,
    /// Every file written, `SG2_` twins included.
    pub written: Vec<PathBuf>,
    /// Comparison plots written.
    pub plots: Vec<PathBuf>,
}

/// List `*.csv` file names directly inside `dir`, sorted.
///
/// Names that are not valid UTF-8 are kept in lossy form; they match no
/// naming rule and are skipped later with a log entry.
pub fn list_sources(dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list '{}'", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list '{}'", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".csv") {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// State of a single run over one data directory.
pub struct CalibrationRun<'a> {
    dir: &'a Path,
    plot: &'a PlotConfig,
    log: &'a RunLogger,
    phase: RunPhase,
    groups: FileGroups,
    summary: RunSummary,
}

impl<'a> CalibrationRun<'a> {
    pub fn new(dir: &'a Path, plot: &'a PlotConfig, log: &'a RunLogger) -> Self {
        Self {
            dir,
            plot,
            log,
            phase: RunPhase::Init,
            groups: FileGroups::new(),
            summary: RunSummary::default(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn groups(&self) -> &FileGroups {
        &self.groups
    }

    fn enter(&mut self, phase: RunPhase) {
        self.log
            .debug(format_args!("{:?} -> {:?}", self.phase, phase));
        self.phase = phase;
    }

    /// Drive the run to completion.
    ///
    /// Returns `Ok` with an empty summary when the directory holds no CSV
    /// files; nothing is written in that case.
    pub fn execute(mut self) -> Result<RunSummary> {
        self.enter(RunPhase::Listing);
        let sources = list_sources(self.dir)?;
        if sources.is_empty() {
            self.log.warn(format_args!(
                "No CSV files found in {}",
                self.dir.display()
            ));
            self.enter(RunPhase::Done);
            return Ok(self.summary);
        }

        self.enter(RunPhase::Processing);
        for source in &sources {
            self.process_source(source);
        }
        self.summary.sources = sources;

        self.enter(RunPhase::Plotting);
        self.summary.plots = visualization::plot_comparisons(self.dir, self.plot)
            .context("failed to generate comparison plots")?;
        for plot in &self.summary.plots {
            self.log.debug(format_args!("Saved {}", plot.display()));
        }
        self.log.info(format_args!("Generated all comparison plots"));

        self.enter(RunPhase::Done);
        Ok(self.summary)
    }

    /// Normalize one source file into its outputs.
    ///
    /// Outputs written before a failure stay on disk and stay grouped.
    pub fn process_source(&mut self, source: &str) {
        let targets = output_names(source);
        if targets.is_empty() {
            self.log.info(format_args!(
                "Skipping {} - does not match naming convention",
                source
            ));
            self.summary.skipped.push(source.to_string());
            return;
        }

        if let Err(e) = self.write_targets(source, &targets) {
            self.log
                .error(format_args!("Error processing {}: {:#}", source, e));
            self.summary
                .failed
                .push((source.to_string(), format!("{:#}", e)));
        }
    }

    fn write_targets(&mut self, source: &str, targets: &[String]) -> Result<()> {
        let samples = load_sweep(self.dir.join(source))?;

        for target in targets {
            let target_path = self.dir.join(target);
            let written = write_curve(&target_path, &samples)?;
            self.log
                .info(format_args!("Processed {} -> {}", source, target));

            self.groups.record(&target_path);
            self.summary.written.extend(written);
        }

        Ok(())
    }
}

/// Run the full pipeline over `dir`.
pub fn run_calibration(dir: &Path, plot: &PlotConfig, log: &RunLogger) -> Result<RunSummary> {
    CalibrationRun::new(dir, plot, log).execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loaders::SWEEP_HEADER;
    use crate::logging::testing::CapturedLog;
    use crate::processors::grouping::Category;
    use log::Level;
    use tempfile::TempDir;

    fn textless() -> PlotConfig {
        PlotConfig {
            draw_text: false,
            ..PlotConfig::default()
        }
    }

    fn capture() -> (CapturedLog, RunLogger) {
        let capture = CapturedLog::default();
        let logger = RunLogger::with_sink(Box::new(capture.clone()));
        (capture, logger)
    }

    fn write_source(dir: &Path, name: &str, rows: &[&str]) {
        let mut content = format!("!Instrument export\n{}\n", SWEEP_HEADER);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(dir.join(name), content).unwrap();
    }

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_list_sources() {
        let dir = TempDir::new().unwrap();
        for name in ["RX1.csv", "0.csv", "notes.txt", "data.CSV", "07.csv"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("1.csv"), "").unwrap();

        let sources = list_sources(dir.path()).unwrap();
        assert_eq!(sources, vec!["0.csv", "07.csv", "RX1.csv"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_source_is_listed_and_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"RX\xff.csv")), "").unwrap();
        let (capture, logger) = capture();

        let summary = run_calibration(dir.path(), &textless(), &logger).unwrap();

        assert_eq!(summary.sources, vec!["RX\u{FFFD}.csv"]);
        assert_eq!(summary.skipped, vec!["RX\u{FFFD}.csv"]);
        assert!(capture
            .at(Level::Info)
            .iter()
            .any(|m| m.starts_with("Skipping RX\u{FFFD}.csv")));
    }

    #[test]
    fn test_list_sources_missing_dir() {
        assert!(list_sources(Path::new("/nonexistent/cal")).is_err());
    }

    #[test]
    fn test_empty_directory_only_warns() {
        let dir = TempDir::new().unwrap();
        let (capture, logger) = capture();

        let summary = run_calibration(dir.path(), &textless(), &logger).unwrap();

        assert!(summary.sources.is_empty());
        assert!(summary.plots.is_empty());
        assert!(dir_names(dir.path()).is_empty());

        let records: Vec<(Level, String)> = capture
            .records()
            .into_iter()
            .filter(|(level, _)| *level != Level::Debug)
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, Level::Warn);
        assert!(records[0].1.starts_with("No CSV files found"));
    }

    #[test]
    fn test_single_digit_source() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "0.csv", &["1000000,-3.456,10"]);
        let (_capture, logger) = capture();

        let summary = run_calibration(dir.path(), &textless(), &logger).unwrap();

        for name in ["TXA_NF_SPEC.txt", "TXA1_NF_SPEC.txt"] {
            let content = fs::read_to_string(dir.path().join(name)).unwrap();
            assert_eq!(content, "1000000,-3.46");
        }
        assert_eq!(summary.written.len(), 2);
        assert_eq!(summary.plots.len(), 3);
        for category in Category::ALL {
            assert!(dir.path().join(category.plot_file_name()).exists());
        }
    }

    #[test]
    fn test_rx_source_writes_four_identical_outputs() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "RX3.csv", &["1000000,-1.5,0", "2000000,-1.75,0"]);
        let (_capture, logger) = capture();

        let summary = run_calibration(dir.path(), &textless(), &logger).unwrap();

        let expected = "1000000,-1.50\n2000000,-1.75";
        for name in ["SG1_RXD.txt", "SG2_RXD.txt", "SG1_RXA4.txt", "SG2_RXA4.txt"] {
            let content = fs::read_to_string(dir.path().join(name)).unwrap();
            assert_eq!(content, expected, "{}", name);
        }
        // Each SG1_ output also rewrites its SG2_ twin.
        assert_eq!(summary.written.len(), 6);
    }

    #[test]
    fn test_process_source_groups_targets() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "RX0.csv", &["1,1.0,0"]);
        write_source(dir.path(), "02.csv", &["1,2.0,0"]);
        let plot = textless();
        let (_capture, logger) = capture();

        let mut run = CalibrationRun::new(dir.path(), &plot, &logger);
        run.process_source("RX0.csv");
        run.process_source("02.csv");

        assert_eq!(run.phase(), RunPhase::Init);
        assert_eq!(run.groups().get(Category::Rx).len(), 4);
        assert_eq!(
            run.groups().get(Category::NfOsc),
            &[dir.path().join("TXC_NF_OSC.txt")]
        );
        assert!(run.groups().get(Category::NfSpec).is_empty());
    }

    #[test]
    fn test_unrecognized_source_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "foo.csv", &["1,1.0,0"]);
        write_source(dir.path(), "8.csv", &["1,1.0,0"]);
        let (capture, logger) = capture();

        let summary = run_calibration(dir.path(), &textless(), &logger).unwrap();

        assert_eq!(summary.skipped, vec!["8.csv", "foo.csv"]);
        assert!(summary.written.is_empty());
        let infos = capture.at(Level::Info);
        assert!(infos.iter().any(|m| m.contains("Skipping foo.csv")));
        assert!(infos.iter().any(|m| m.contains("Skipping 8.csv")));
    }

    #[test]
    fn test_bad_source_does_not_stop_run() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "1.csv", &["1000000,oops,0"]);
        write_source(dir.path(), "2.csv", &["1000000,-2.004,0"]);
        let (capture, logger) = capture();

        let summary = run_calibration(dir.path(), &textless(), &logger).unwrap();

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "1.csv");
        assert!(!dir.path().join("TXB_NF_SPEC.txt").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("TXC_NF_SPEC.txt")).unwrap(),
            "1000000,-2.00"
        );

        let errors = capture.at(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("1.csv"));
        assert!(errors[0].contains("oops"));
        assert_eq!(
            capture.at(Level::Info).last().map(String::as_str),
            Some("Generated all comparison plots")
        );
    }

    #[test]
    fn test_each_output_is_logged() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "RX3.csv", &["1000000,-1.5,0"]);
        let (capture, logger) = capture();

        run_calibration(dir.path(), &textless(), &logger).unwrap();

        let processed: Vec<String> = capture
            .at(Level::Info)
            .into_iter()
            .filter(|m| m.starts_with("Processed "))
            .collect();
        assert_eq!(
            processed,
            vec![
                "Processed RX3.csv -> SG1_RXD.txt",
                "Processed RX3.csv -> SG2_RXD.txt",
                "Processed RX3.csv -> SG1_RXA4.txt",
                "Processed RX3.csv -> SG2_RXA4.txt",
            ]
        );
    }

    #[test]
    fn test_plot_failure_fails_run_after_outputs_are_written() {
        let dir = TempDir::new().unwrap();
        write_source(dir.path(), "00.csv", &["1000000,-0.5,0"]);
        // Left over from an earlier run and no longer parseable.
        fs::write(dir.path().join("TXB_NF_OSC.txt"), "1000000,garbage").unwrap();
        let (capture, logger) = capture();

        let result = run_calibration(dir.path(), &textless(), &logger);

        let err = result.expect_err("plotting a malformed curve must fail the run");
        assert!(format!("{:#}", err).contains("garbage"));
        assert_eq!(
            fs::read_to_string(dir.path().join("TXA_NF_OSC.txt")).unwrap(),
            "1000000,-0.50"
        );
        // Categories are plotted in order; NF_OSC is where it stops.
        assert!(dir.path().join("RX_comparison.png").exists());
        assert!(dir.path().join("NF_SPEC_comparison.png").exists());
        assert!(!dir.path().join("NF_OSC_comparison.png").exists());
        assert!(!capture
            .at(Level::Info)
            .iter()
            .any(|m| m == "Generated all comparison plots"));
    }

    #[test]
    fn test_source_without_header_is_parsed_from_start() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("05.csv"), "100,1.234,0\n200,5.678,0").unwrap();
        let (_capture, logger) = capture();

        run_calibration(dir.path(), &textless(), &logger).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("TXF_NF_OSC.txt")).unwrap(),
            "100,1.23\n200,5.68"
        );
    }
}
