use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_core::extract;
use nfo_scout_lib::Settings;
use nfo_scout_scraper::{ScraperRegistry, store_content_id};

use super::summary::print_record;
use crate::CliError;

/// List every known metadata source and whether it is enabled.
pub(crate) fn run_list(settings: &Settings) -> Result<(), CliError> {
    let registry = ScraperRegistry::builtin(settings)?;
    let enabled = &settings.scrapers.enabled;

    log::info!(
        "{}",
        "Metadata sources:".if_supports_color(Stdout, |t| t.bold()),
    );
    for name in registry.list() {
        let source = registry.get(name)?;
        let position = enabled.iter().position(|e| e.eq_ignore_ascii_case(name));
        let state = match position {
            Some(i) => format!("(enabled, #{})", i + 1),
            None => "(disabled)".to_string(),
        };
        log::info!(
            "  {} {} {}",
            format!("{name:<8}").if_supports_color(Stdout, |t| t.cyan()),
            source.description(),
            state.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Fetch one code from one source, bypassing fallback, cache and output.
pub(crate) fn run_test(settings: &Settings, scraper: &str, raw: &str) -> Result<(), CliError> {
    let registry = ScraperRegistry::builtin(settings)?;
    let source = registry.get(scraper)?;
    let id = extract(raw)?;

    log::info!(
        "Testing {} with {} {}",
        source.name().if_supports_color(Stdout, |t| t.cyan()),
        id.canonical().if_supports_color(Stdout, |t| t.bold()),
        format!("(content id {})", store_content_id(&id)).if_supports_color(Stdout, |t| t.dimmed()),
    );
    let record = source.fetch(&id)?;
    crate::log_blank();
    print_record(&record);
    crate::log_blank();
    log::info!(
        "{} {} returned metadata for {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        source.name(),
        id,
    );
    Ok(())
}
