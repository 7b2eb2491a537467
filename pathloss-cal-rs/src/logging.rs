//! Run-scoped logging handle.
//!
//! The pipeline never logs through the global `log` facade. A [`RunLogger`]
//! is built for each run and passed down explicitly; it can wrap an
//! `env_logger` console logger or any other [`log::Log`] sink.

use std::fmt;
use std::io::Write;

use log::{Level, LevelFilter, Log, Record};

/// Target attached to every record emitted by the pipeline.
pub const LOG_TARGET: &str = "pathloss_cal";

/// Logger handle owned by a single run.
pub struct RunLogger {
    sink: Box<dyn Log>,
}

impl RunLogger {
    /// Console logger: `"{timestamp} - {LEVEL} - {message}"` lines on stdout.
    pub fn console(level: LevelFilter) -> Self {
        let logger = env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stdout)
            .format(|buf, record| {
                let ts = buf.timestamp_seconds();
                writeln!(buf, "{} - {} - {}", ts, record.level(), record.args())
            })
            .build();
        Self::with_sink(Box::new(logger))
    }

    /// Wrap an arbitrary sink.
    pub fn with_sink(sink: Box<dyn Log>) -> Self {
        Self { sink }
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        self.sink.log(
            &Record::builder()
                .level(level)
                .target(LOG_TARGET)
                .args(args)
                .build(),
        );
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn flush(&self) {
        self.sink.flush();
    }
}

impl fmt::Debug for RunLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLogger").finish_non_exhaustive()
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.sink.flush();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory sink for asserting on emitted records.

    use std::sync::{Arc, Mutex};

    use log::{Level, Log, Metadata, Record};

    #[derive(Clone, Default)]
    pub struct CapturedLog {
        records: Arc<Mutex<Vec<(Level, String)>>>,
    }

    impl CapturedLog {
        pub fn records(&self) -> Vec<(Level, String)> {
            self.records.lock().unwrap().clone()
        }

        pub fn at(&self, level: Level) -> Vec<String> {
            self.records()
                .into_iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, msg)| msg)
                .collect()
        }
    }

    impl Log for CapturedLog {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.records
                .lock()
                .unwrap()
                .push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }
}
