use std::path::{Path, PathBuf};

use crate::batch::{BatchOutcome, ItemReport, ItemStatus};

/// A single entry in the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Success {
        file: String,
        identifier: String,
        title: String,
        source: String,
        files_written: Vec<String>,
    },
    Partial {
        file: String,
        identifier: String,
        title: String,
        warnings: Vec<String>,
    },
    Failed {
        file: String,
        identifier: String,
        errors: Vec<String>,
    },
    Skipped {
        file: String,
        identifier: String,
        descriptor: String,
    },
    Duplicate {
        file: String,
        identifier: String,
        kept: String,
    },
    /// Media file without a recognizable identifier
    Unmatched { file: String },
}

/// Counts per entry kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSummary {
    pub succeeded: usize,
    pub partial: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duplicates: usize,
    pub unmatched: usize,
    /// Descriptors and assets written by successful and partial items
    pub files_written: usize,
}

impl LogSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Collects per-item results and writes a log file.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from a finished batch plus the files discovery skipped.
    pub fn from_outcome(outcome: &BatchOutcome, unmatched: &[PathBuf]) -> Self {
        let mut log = Self::new();
        for report in &outcome.reports {
            log.add_report(report);
        }
        for dup in &outcome.duplicates {
            log.add(LogEntry::Duplicate {
                file: file_label(&dup.path),
                identifier: dup.identifier.to_string(),
                kept: file_label(&dup.kept),
            });
        }
        for path in unmatched {
            log.add(LogEntry::Unmatched {
                file: file_label(path),
            });
        }
        log
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn add_report(&mut self, report: &ItemReport) {
        let file = report.label();
        let identifier = report.identifier.to_string();
        let title = report
            .record
            .as_ref()
            .map(|r| r.title.clone())
            .unwrap_or_default();
        let messages = report.errors.iter().map(ToString::to_string).collect();

        let entry = match report.status {
            ItemStatus::Success => LogEntry::Success {
                file,
                identifier,
                title,
                source: report.source.clone().unwrap_or_default(),
                files_written: written_files(report),
            },
            ItemStatus::PartialFailure => LogEntry::Partial {
                file,
                identifier,
                title,
                warnings: messages,
            },
            ItemStatus::Failure => LogEntry::Failed {
                file,
                identifier,
                errors: messages,
            },
            ItemStatus::Skipped => LogEntry::Skipped {
                file,
                identifier,
                descriptor: report
                    .descriptor
                    .as_deref()
                    .map(file_label)
                    .unwrap_or_default(),
            },
        };
        self.add(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> LogSummary {
        let mut summary = LogSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Success { files_written, .. } => {
                    summary.succeeded += 1;
                    summary.files_written += files_written.len();
                }
                LogEntry::Partial { .. } => summary.partial += 1,
                LogEntry::Failed { .. } => summary.failed += 1,
                LogEntry::Skipped { .. } => summary.skipped += 1,
                LogEntry::Duplicate { .. } => summary.duplicates += 1,
                LogEntry::Unmatched { .. } => summary.unmatched += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== nfo-scout run ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Successful: {}", summary.succeeded)?;
        writeln!(file, "Partial: {}", summary.partial)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file, "Skipped (existing): {}", summary.skipped)?;
        writeln!(file, "Duplicates: {}", summary.duplicates)?;
        writeln!(file, "Unmatched: {}", summary.unmatched)?;
        writeln!(file, "Files written: {}", summary.files_written)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Success {
                    file: f,
                    identifier,
                    title,
                    source,
                    files_written,
                } => {
                    writeln!(file, "[OK] {} -> {} \"{}\" (from {})", f, identifier, title, source)?;
                    if !files_written.is_empty() {
                        writeln!(file, "     Files: {}", files_written.join(", "))?;
                    }
                }
                LogEntry::Partial {
                    file: f,
                    identifier,
                    title,
                    warnings,
                } => {
                    writeln!(file, "[PARTIAL] {} -> {} \"{}\"", f, identifier, title)?;
                    for w in warnings {
                        writeln!(file, "     Warning: {}", w)?;
                    }
                }
                LogEntry::Failed {
                    file: f,
                    identifier,
                    errors,
                } => {
                    writeln!(file, "[FAILED] {} ({})", f, identifier)?;
                    for e in errors {
                        writeln!(file, "     Error: {}", e)?;
                    }
                }
                LogEntry::Skipped {
                    file: f,
                    identifier,
                    descriptor,
                } => {
                    writeln!(file, "[SKIPPED] {} ({}): {} exists", f, identifier, descriptor)?;
                }
                LogEntry::Duplicate {
                    file: f,
                    identifier,
                    kept,
                } => {
                    writeln!(file, "[DUPLICATE] {} ({}) same as {}", f, identifier, kept)?;
                }
                LogEntry::Unmatched { file: f } => {
                    writeln!(file, "[UNMATCHED] {}", f)?;
                }
            }
        }

        Ok(())
    }
}

fn written_files(report: &ItemReport) -> Vec<String> {
    report
        .descriptor
        .iter()
        .chain(report.assets.iter())
        .map(|p| file_label(p))
        .collect()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
#[path = "tests/log_tests.rs"]
mod tests;
