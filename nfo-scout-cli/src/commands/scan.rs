use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_lib::{DirectoryWalker, Settings, discover};
use nfo_scout_scraper::{BatchOptions, BatchOutcome, RunLog, run_batch};

use super::summary::print_run_summary;
use crate::CliError;
use crate::cli_types::ScanArgs;
use crate::progress::run_with_progress;
use crate::session::Session;

/// Scan `root` and run every discovered video through the pipeline.
pub(crate) fn run_scan(
    mut settings: Settings,
    root: PathBuf,
    mut scan: ScanArgs,
    quiet: bool,
) -> Result<(), CliError> {
    if let Some(output) = scan.output.take() {
        settings.output.dir = Some(output);
    }

    log::info!(
        "Scanning {} {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
        format!("(depth {})", scan.depth).if_supports_color(Stdout, |t| t.dimmed()),
    );
    let discovery = discover(DirectoryWalker::videos(&root, scan.depth).walk()?);
    log::info!(
        "Found {} video(s) with a code{}",
        discovery.items.len(),
        match (discovery.duplicates.len(), discovery.unmatched.len()) {
            (0, 0) => String::new(),
            (d, u) => format!(", {d} duplicate(s), {u} without a code"),
        },
    );
    for path in &discovery.unmatched {
        log::debug!("No code in {}", path.display());
    }
    if discovery.items.is_empty() {
        let outcome = BatchOutcome {
            duplicates: discovery.duplicates,
            ..BatchOutcome::default()
        };
        return finish(&RunLog::from_outcome(&outcome, &discovery.unmatched), &scan);
    }

    let mut session = Session::open(settings, scan.features)?;
    log::info!(
        "{}",
        session.describe().if_supports_color(Stdout, |t| t.dimmed()),
    );
    if let Some(dir) = &session.settings.output.dir {
        log::info!(
            "Output: {}",
            dir.display().if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let mut options = BatchOptions::from_settings(&session.settings);
    options.force = scan.force;
    let pipeline = session.pipeline(None, true)?;
    let mut outcome =
        run_with_progress(quiet, |tx| run_batch(discovery.items, pipeline, options, tx));
    outcome.duplicates.splice(0..0, discovery.duplicates);

    finish(&RunLog::from_outcome(&outcome, &discovery.unmatched), &scan)
}

/// Print the summary, write the report if asked, and map failures to the exit status.
fn finish(run_log: &RunLog, scan: &ScanArgs) -> Result<(), CliError> {
    print_run_summary(run_log);

    if let Some(report) = &scan.report {
        match run_log.write_to_file(report) {
            Ok(()) => log::info!("Report written to {}", report.display()),
            Err(e) => log::warn!(
                "{} Could not write report {}: {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                report.display(),
                e,
            ),
        }
    }

    let summary = run_log.summary();
    if summary.has_failures() {
        return Err(CliError::ItemsFailed(summary.failed));
    }
    Ok(())
}
