//! Long-lived collaborators shared by the scraping commands.

use std::io::{BufRead, IsTerminal, Write};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use nfo_scout_frontend::{DescriptorWriter, NfoWriter};
use nfo_scout_lib::{CacheError, Settings, TranslationCache, Translator, translator_from_settings};
use nfo_scout_scraper::{
    AssetSource, ImageDownloader, Pipeline, ScraperRegistry, SubtitleDownloader,
};

use crate::CliError;
use crate::cli_types::FeatureArgs;

/// Everything a scraping command needs, built once from the settings.
pub(crate) struct Session {
    pub settings: Settings,
    registry: ScraperRegistry,
    translator: Option<Box<dyn Translator>>,
    cache: TranslationCache,
    images: Option<ImageDownloader>,
    subtitles: Option<SubtitleDownloader>,
    writer: NfoWriter,
}

impl Session {
    /// Apply the feature flags to `settings` and build every collaborator.
    ///
    /// Fails before any network work when a configured source is unknown,
    /// the translator cannot be built, or the cache file is unreadable.
    pub fn open(mut settings: Settings, features: FeatureArgs) -> Result<Self, CliError> {
        apply_features(&mut settings, features);

        let registry = ScraperRegistry::builtin(&settings)?;
        registry.select(&settings.scrapers.enabled)?;

        let translator = if settings.translation.enabled {
            log::debug!(
                "Translating {} -> {} with {}",
                settings.translation.source_lang,
                settings.translation.target_lang,
                settings.translation.service.as_str()
            );
            Some(translator_from_settings(&settings)?)
        } else {
            None
        };
        let cache = open_cache(&settings)?;

        let images = if settings.images.enabled {
            Some(ImageDownloader::new(&settings.http, &settings.images)?)
        } else {
            None
        };
        let subtitles = if settings.subtitles.enabled {
            Some(SubtitleDownloader::new(&settings.http, &settings.subtitles)?)
        } else {
            None
        };

        Ok(Self {
            settings,
            registry,
            translator,
            cache,
            images,
            subtitles,
            writer: NfoWriter::new(),
        })
    }

    /// Borrow the collaborators as a pipeline.
    ///
    /// `only` restricts fetching to one named source instead of the
    /// configured fallback chain.
    pub fn pipeline(
        &mut self,
        only: Option<&str>,
        write_descriptor: bool,
    ) -> Result<Pipeline<'_>, CliError> {
        let sources = match only {
            Some(name) => vec![self.registry.get(name)?],
            None => self.registry.select(&self.settings.scrapers.enabled)?,
        };

        let mut assets: Vec<&dyn AssetSource> = Vec::new();
        if let Some(images) = &self.images {
            assets.push(images);
        }
        if let Some(subtitles) = &self.subtitles {
            assets.push(subtitles);
        }
        let writer = write_descriptor.then_some(&self.writer as &dyn DescriptorWriter);

        Ok(Pipeline {
            sources,
            translator: self.translator.as_deref(),
            cache: &mut self.cache,
            assets,
            writer,
        })
    }

    /// One-line description of the enabled optional stages.
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("sources: {}", self.settings.scrapers.enabled.join(", "))];
        if self.translator.is_some() {
            parts.push(format!(
                "translation: {} ({})",
                self.settings.translation.service.as_str(),
                self.settings.translation.target_lang
            ));
        }
        if self.images.is_some() {
            parts.push("images".to_string());
        }
        if self.subtitles.is_some() {
            parts.push(format!("subtitles: {}", self.settings.subtitles.languages.join(",")));
        }
        parts.join(" | ")
    }
}

/// Flags only ever switch features on.
pub(crate) fn apply_features(settings: &mut Settings, features: FeatureArgs) {
    settings.translation.enabled |= features.translate;
    settings.images.enabled |= features.images;
    settings.subtitles.enabled |= features.subtitles;
}

/// Load the persistent cache, or a run-scoped one when caching is off.
///
/// An unreadable cache file stops the run. On a terminal the user is asked
/// whether to reset it.
fn open_cache(settings: &Settings) -> Result<TranslationCache, CliError> {
    if !settings.cache.enabled {
        return Ok(TranslationCache::in_memory());
    }
    let path = settings.cache.resolved_file();
    match TranslationCache::load(&path) {
        Ok(cache) => Ok(cache),
        Err(e @ CacheError::Corrupt { .. }) => {
            log::warn!(
                "{} {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                e,
            );
            if !confirm_reset()? {
                log::warn!("Run 'nfo-scout cache clear' to reset the translation cache.");
                return Err(e.into());
            }
            if let Some(backup) = TranslationCache::reset(&path)? {
                log::info!("Old cache kept as {}", backup.display());
            }
            Ok(TranslationCache::load(&path)?)
        }
        Err(e) => Err(e.into()),
    }
}

fn confirm_reset() -> Result<bool, CliError> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return Ok(false);
    }
    print!("Reset the translation cache? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
