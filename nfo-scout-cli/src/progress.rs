//! Progress bar fed by batch events.
//!
//! The batch runs on the calling thread; a scoped thread drains the event
//! channel and draws the bar.

use std::sync::mpsc;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_scraper::{BatchEvent, ItemStatus};

use crate::logging;

/// Run `work` with a live progress display. Hidden when `quiet`.
pub(crate) fn run_with_progress<T>(
    quiet: bool,
    work: impl FnOnce(&mpsc::Sender<BatchEvent>) -> T,
) -> T {
    let (tx, rx) = mpsc::channel();
    std::thread::scope(|s| {
        let display = s.spawn(move || show(rx, quiet));
        let out = work(&tx);
        drop(tx);
        let _ = display.join();
        out
    })
}

fn show(rx: mpsc::Receiver<BatchEvent>, quiet: bool) {
    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {wide_msg}")
                .expect("static pattern")
                .progress_chars("=> "),
        );
        bar
    };
    logging::set_progress_bar(&bar);

    let mut current = String::new();
    for event in rx {
        match event {
            BatchEvent::Started { total, duplicates } => {
                bar.set_length(total as u64);
                if duplicates > 0 {
                    log::debug!("{} duplicate(s) dropped before processing", duplicates);
                }
            }
            BatchEvent::ItemStarted { identifier, .. } => {
                bar.set_message(identifier.clone());
                current = identifier;
            }
            BatchEvent::ItemStage { stage, .. } => {
                bar.set_message(format!("{current} ({stage})"));
            }
            BatchEvent::ItemFinished {
                identifier, status, ..
            } => {
                bar.inc(1);
                item_line(&identifier, status);
            }
            BatchEvent::Done => {}
        }
    }

    bar.finish_and_clear();
    logging::clear_progress_bar();
}

fn item_line(identifier: &str, status: ItemStatus) {
    match status {
        ItemStatus::Success => log::info!(
            "  {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            identifier,
        ),
        ItemStatus::Skipped => log::info!(
            "  {} {} {}",
            "-".if_supports_color(Stdout, |t| t.dimmed()),
            identifier,
            "(descriptor exists)".if_supports_color(Stdout, |t| t.dimmed()),
        ),
        ItemStatus::PartialFailure => log::warn!(
            "  {} {} (partial)",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            identifier,
        ),
        ItemStatus::Failure => log::warn!(
            "  {} {} failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            identifier,
        ),
    }
}
