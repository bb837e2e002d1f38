use std::fs;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_core::Field;
use nfo_scout_lib::util::format_bytes;
use nfo_scout_lib::{MergePolicy, Settings, TranslationCache};

use crate::CliError;
use crate::cli_types::CacheAction;

pub(crate) fn run(settings: &Settings, action: CacheAction) -> Result<(), CliError> {
    let path = settings.cache.resolved_file();
    match action {
        CacheAction::Stats => run_cache_stats(&path),
        CacheAction::Clear { field } => run_cache_clear(&path, field),
        CacheAction::Export { file } => run_cache_export(&path, &file),
        CacheAction::Import { file, overwrite } => run_cache_import(&path, &file, overwrite),
    }
}

/// Show entry counts per field.
fn run_cache_stats(path: &Path) -> Result<(), CliError> {
    let cache = TranslationCache::load(path)?;
    let stats = cache.stats();

    log::info!(
        "Translation cache: {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if let Ok(meta) = fs::metadata(path) {
        log::info!(
            "{}",
            format!("Size: {}", format_bytes(meta.len())).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    if stats.total == 0 {
        log::info!(
            "{}",
            "No cached translations.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }
    for (field, count) in &stats.per_field {
        log::info!(
            "  {} {}",
            format!("{:<10}", field.as_str()).if_supports_color(Stdout, |t| t.bold()),
            count,
        );
    }
    crate::log_blank();
    log::info!("Total: {} entries", stats.total);
    Ok(())
}

/// Clear one field, or reset the whole file without reading it.
fn run_cache_clear(path: &Path, field: Option<Field>) -> Result<(), CliError> {
    match field {
        Some(field) => {
            let mut cache = TranslationCache::load(path)?;
            let removed = cache.clear(Some(field));
            cache.flush()?;
            log::info!(
                "{} Removed {} {} entries",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                removed,
                field,
            );
        }
        None => {
            let backup = TranslationCache::reset(path)?;
            log::info!(
                "{} Translation cache cleared",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            );
            if let Some(backup) = backup {
                log::warn!(
                    "{} The old file was unreadable and was kept as {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    backup.display(),
                );
            }
        }
    }
    Ok(())
}

fn run_cache_export(path: &Path, target: &Path) -> Result<(), CliError> {
    let cache = TranslationCache::load(path)?;
    let written = cache.export_to(target)?;
    log::info!(
        "{} Exported {} entries to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        written,
        target.display(),
    );
    Ok(())
}

fn run_cache_import(path: &Path, source: &Path, overwrite: bool) -> Result<(), CliError> {
    let policy = if overwrite {
        MergePolicy::Overwrite
    } else {
        MergePolicy::KeepLocal
    };
    let mut cache = TranslationCache::load(path)?;
    let summary = cache.import_from(source, policy)?;
    cache.flush()?;

    log::info!(
        "{} Imported {} new, {} replaced, {} kept local",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.added,
        summary.replaced,
        summary.kept_local,
    );
    if !summary.unknown_fields.is_empty() {
        log::warn!(
            "{} Skipped unknown fields: {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.unknown_fields.join(", "),
        );
    }
    Ok(())
}
