//! Console logger behind the `log` facade.
//!
//! `info` goes to stdout, `warn` and `error` to stderr. Debug output from
//! dependencies is dropped; only this workspace's crates log at debug level.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use indicatif::ProgressBar;
use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::CliError;

/// Bar currently on screen; log lines are printed around it.
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

struct CliLogger {
    level: LevelFilter,
    timestamps: bool,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    fn format(&self, record: &Record<'_>) -> String {
        if self.timestamps {
            format!(
                "{} {:<5} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        } else {
            record.args().to_string()
        }
    }

    fn emit(&self, level: Level, line: &str) {
        if level == Level::Info {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{line}");
        } else {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{line}");
        }
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        metadata.level() <= Level::Info || metadata.target().starts_with("nfo_scout")
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record);

        let bar = ACTIVE_BAR.lock().unwrap_or_else(|e| e.into_inner());
        match bar.as_ref() {
            Some(bar) => bar.suspend(|| self.emit(record.level(), &line)),
            None => self.emit(record.level(), &line),
        }
        drop(bar);

        if let Some(file) = &self.file {
            let mut file = file.lock().unwrap_or_else(|e| e.into_inner());
            let _ = writeln!(file, "{}", strip_ansi_escapes::strip_str(&line));
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        if let Some(file) = &self.file {
            let mut file = file.lock().unwrap_or_else(|e| e.into_inner());
            let _ = file.flush();
        }
    }
}

/// Install the logger. `quiet` wins over `verbose`.
pub(crate) fn init(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let file = logfile.map(File::create).transpose()?.map(Mutex::new);

    let logger = CliLogger {
        level,
        timestamps: verbose && !quiet,
        file,
    };
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| CliError::config(format!("logger already installed: {e}")))?;
    log::set_max_level(level);
    Ok(())
}

/// Route log output around `bar` until [`clear_progress_bar`] is called.
pub(crate) fn set_progress_bar(bar: &ProgressBar) {
    *ACTIVE_BAR.lock().unwrap_or_else(|e| e.into_inner()) = Some(bar.clone());
}

pub(crate) fn clear_progress_bar() {
    *ACTIVE_BAR.lock().unwrap_or_else(|e| e.into_inner()) = None;
}
