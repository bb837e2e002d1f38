use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_core::extract;
use nfo_scout_lib::Settings;
use nfo_scout_scraper::{BatchOptions, BatchOrchestrator, ItemStatus};

use super::summary::print_record;
use crate::CliError;
use crate::cli_types::FeatureArgs;
use crate::session::Session;

/// Look up one code and write its descriptor.
pub(crate) fn run_search(
    mut settings: Settings,
    raw: &str,
    source: Option<&str>,
    output: Option<PathBuf>,
    features: FeatureArgs,
    no_nfo: bool,
) -> Result<(), CliError> {
    let id = extract(raw)?;
    if raw.trim() != id.canonical() {
        log::debug!("Read \"{}\" as {}", raw, id);
    }
    settings.output.dir = output
        .or(settings.output.dir)
        .or_else(|| Some(crate::current_dir()));

    let mut session = Session::open(settings, features)?;
    log::info!(
        "Searching {} {}",
        id.canonical().if_supports_color(Stdout, |t| t.cyan()),
        format!("[{}]", session.describe()).if_supports_color(Stdout, |t| t.dimmed()),
    );

    let options = BatchOptions::from_settings(&session.settings);
    let pipeline = session.pipeline(source, !no_nfo)?;
    let report = BatchOrchestrator::new(pipeline, options).process(&id);

    if report.status == ItemStatus::Failure && report.record.is_none() {
        for e in &report.errors {
            log::error!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e.message,
            );
        }
        return Err(CliError::ItemsFailed(1));
    }

    if let Some(record) = &report.record {
        crate::log_blank();
        print_record(record);
        crate::log_blank();
    }
    if let Some(path) = &report.descriptor {
        log::info!(
            "{} Wrote {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        );
    }
    for path in &report.assets {
        log::info!(
            "{} Saved {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display(),
        );
    }
    for e in &report.errors {
        log::warn!(
            "{} {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            e,
        );
    }

    match report.status {
        ItemStatus::Failure => Err(CliError::ItemsFailed(1)),
        _ => Ok(()),
    }
}
