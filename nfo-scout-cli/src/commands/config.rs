use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_lib::Settings;

use crate::CliError;
use crate::cli_types::ConfigAction;

pub(crate) fn run(action: ConfigAction, path: &Path) -> Result<(), CliError> {
    match action {
        ConfigAction::Show => run_config_show(path),
        ConfigAction::Path => {
            log::info!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init { force } => run_config_init(path, force),
    }
}

fn mask_value(s: &str) -> String {
    match s.get(..2) {
        Some(head) if s.len() > 2 => format!("{head}****"),
        _ => "****".to_string(),
    }
}

/// Show the resolved settings and where they came from.
fn run_config_show(path: &Path) -> Result<(), CliError> {
    log::info!(
        "{}",
        "nfo-scout configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let mut settings = Settings::from_file(path)?;
    let applied = settings.apply_env(|key| std::env::var(key).ok())?;
    settings.validate()?;

    if applied.is_empty() {
        log::info!(
            "  Environment: {}",
            "no overrides".if_supports_color(Stdout, |t| t.dimmed()),
        );
    } else {
        log::info!(
            "  Environment: {}",
            applied.join(", ").if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    log::info!(
        "  Cache file:  {}",
        settings.cache.resolved_file().display().if_supports_color(Stdout, |t| t.cyan()),
    );
    crate::log_blank();

    if let Some(key) = settings.translation.api_key.as_mut() {
        *key = mask_value(key);
    }
    for line in settings.to_toml()?.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

/// Write the defaults to `path`.
fn run_config_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )));
    }
    Settings::default().save(path)?;
    log::info!(
        "{} Wrote default settings to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_value("abcdef"), "ab****");
        assert_eq!(mask_value("ab"), "****");
        assert_eq!(mask_value(""), "****");
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nfo-scout").join("config.toml");

        run_config_init(&path, false).unwrap();
        let written = Settings::from_file(&path).unwrap();
        assert_eq!(written.scrapers.enabled, Settings::default().scrapers.enabled);

        std::fs::write(&path, "[http]\nrequest_delay_secs = 3.0\n").unwrap();
        assert!(matches!(
            run_config_init(&path, false),
            Err(CliError::Config(_))
        ));
        run_config_init(&path, true).unwrap();
        let reset = Settings::from_file(&path).unwrap();
        assert_eq!(reset.http.request_delay_secs, 1.0);
    }
}
