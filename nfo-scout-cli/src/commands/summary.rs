//! Shared output helpers for records and run results.

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_core::MetadataRecord;
use nfo_scout_scraper::{LogEntry, RunLog};

/// Print the fields of a record, one per line.
pub(crate) fn print_record(record: &MetadataRecord) {
    log::info!(
        "{} {}",
        record.identifier.canonical().if_supports_color(Stdout, |t| t.bold()),
        record.title,
    );
    let line = |label: &str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            log::info!(
                "  {:<13} {}",
                label.if_supports_color(Stdout, |t| t.dimmed()),
                value
            );
        }
    };
    let joined = |values: &[String]| (!values.is_empty()).then(|| values.join(", "));
    let performers: Vec<String> = record.performers.iter().map(|p| p.name.clone()).collect();
    let runtime = record.runtime_minutes.map(|m| format!("{m} min"));

    line("Original:", record.original_title.as_deref());
    line("Content ID:", record.content_id.as_deref());
    line("Released:", record.release_date.as_deref());
    line("Runtime:", runtime.as_deref());
    line("Studio:", record.studio.as_deref());
    line("Label:", record.label.as_deref());
    line("Series:", record.series.as_deref());
    line("Director:", joined(&record.directors).as_deref());
    line("Actresses:", joined(&performers).as_deref());
    line("Genres:", joined(&record.genres).as_deref());
    line("Cover:", record.cover_url.as_deref());
    line("Poster:", record.poster_url.as_deref());
    line(
        "Source:",
        Some(format!("{} ({})", record.source, record.language).as_str()),
    );
    if let Some(plot) = record.plot.as_deref().filter(|p| !p.trim().is_empty()) {
        crate::log_blank();
        log::info!("  {}", plot);
    }
}

/// Print the end-of-run summary, then details for problem entries.
pub(crate) fn print_run_summary(log: &RunLog) {
    let summary = log.summary();
    crate::log_blank();
    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    log::info!(
        "  {} {} succeeded ({} files written)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.succeeded,
        summary.files_written,
    );
    if summary.skipped > 0 {
        log::info!(
            "  {} {} skipped (descriptor exists)",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            summary.skipped,
        );
    }
    if summary.duplicates > 0 {
        log::info!(
            "  {} {} duplicates",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            summary.duplicates,
        );
    }
    if summary.partial > 0 {
        log::warn!(
            "  {} {} partial",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.partial,
        );
    }
    if summary.failed > 0 {
        log::warn!(
            "  {} {} failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failed,
        );
    }
    if summary.unmatched > 0 {
        log::warn!(
            "  {} {} files without a recognizable code",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            summary.unmatched,
        );
    }

    for entry in log.entries() {
        match entry {
            LogEntry::Partial {
                file,
                identifier,
                warnings,
                ..
            } => {
                log::warn!("  ~ {} ({}):", file, identifier);
                for w in warnings {
                    log::warn!("      {}", w);
                }
            }
            LogEntry::Failed {
                file,
                identifier,
                errors,
            } => {
                log::warn!("  {} {} ({}):", "\u{2718}", file, identifier);
                for e in errors {
                    log::warn!("      {}", e);
                }
            }
            LogEntry::Unmatched { file } => {
                log::debug!("  ? {}: no code found", file);
            }
            _ => {}
        }
    }
}
