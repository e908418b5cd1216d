//! Diagnostic log of protocol traffic.
//!
//! Inputs are logged with a `>> ` prefix and outputs with `<< `, so a log
//! file reads as a transcript of the session.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// A `log` backend writing one line per record, prefixed with the seconds
/// elapsed since the logger was created.
pub struct LineLogger<W: Write + Send> {
    start: Instant,
    level: LevelFilter,
    out: Mutex<W>,
}

impl<W: Write + Send> LineLogger<W> {
    pub fn new(out: W, level: LevelFilter) -> Self {
        LineLogger {
            start: Instant::now(),
            level,
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write + Send> Log for LineLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let mut out = self.out.lock();
        // Nowhere left to report a failing log write.
        let _ = writeln!(
            out,
            "{elapsed:>10.3} {:<5} {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
        let _ = out.flush();
    }

    fn flush(&self) {
        let _ = self.out.lock().flush();
    }
}

/// Install a [`LineLogger`] appending to `path` as the global logger.
pub fn init(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    log::set_boxed_logger(Box::new(LineLogger::new(BufWriter::new(file), level)))
        .context("logger already installed")?;
    log::set_max_level(level);
    log::info!("logging to {} at level {level}", path.display());
    Ok(())
}
