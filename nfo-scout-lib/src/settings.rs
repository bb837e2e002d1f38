//! Typed application settings.
//!
//! Resolution order for every key: environment variable, then
//! `~/.config/nfo-scout/config.toml` (or the `--config` override), then the
//! built-in default. Settings are validated once after loading and passed
//! explicitly to whatever needs them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use nfo_scout_core::Field;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::util::{split_list, write_atomic};

/// Canonical path to the settings file: `~/.config/nfo-scout/config.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("nfo-scout").join("config.toml")
}

/// Default location of the translation cache file.
pub fn default_cache_path() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("nfo-scout").join("translation_cache.json")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub http: HttpSettings,
    pub output: OutputSettings,
    pub translation: TranslationSettings,
    pub genres: GenreSettings,
    pub cache: CacheSettings,
    pub images: ImageSettings,
    pub subtitles: SubtitleSettings,
    pub scrapers: ScraperSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    /// Minimum seconds between two metadata fetches
    pub request_delay_secs: f64,
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            request_delay_secs: 1.0,
            timeout_secs: 30,
        }
    }
}

impl HttpSettings {
    /// Saturates at `Duration::MAX`; [`Settings::validate`] rejects such values.
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where descriptors go; `None` means next to each video file
    pub dir: Option<PathBuf>,
    /// Subdirectory template, e.g. `<YEAR>/<ID>`; empty for a flat layout
    pub dir_template: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationService {
    #[default]
    Google,
    #[serde(rename = "deepl")]
    DeepL,
}

impl TranslationService {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::DeepL => "deepl",
        }
    }
}

impl std::str::FromStr for TranslationService {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "deepl" => Ok(Self::DeepL),
            other => Err(SettingsError::invalid(
                "translation.service",
                format!("unknown service '{other}' (expected google or deepl)"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    pub enabled: bool,
    pub service: TranslationService,
    pub api_key: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub fields: Vec<Field>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            service: TranslationService::Google,
            api_key: None,
            source_lang: "ja".to_string(),
            target_lang: "en".to_string(),
            fields: Field::all().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreSettings {
    /// Genres dropped from every record
    pub skip: Vec<String>,
}

impl Default for GenreSettings {
    fn default() -> Self {
        Self {
            skip: vec![
                "4K".to_string(),
                "ハイビジョン".to_string(),
                "独占配信".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Cache file; `None` uses [`default_cache_path`]
    pub file: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}

impl CacheSettings {
    pub fn resolved_file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(default_cache_path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub enabled: bool,
    pub cover: bool,
    pub poster: bool,
    pub cover_name: String,
    pub poster_name: String,
    pub timeout_secs: u64,
    /// Posters shorter than this are replaced by a crop of the cover
    pub min_poster_height: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            cover: true,
            poster: true,
            cover_name: "fanart".to_string(),
            poster_name: "folder".to_string(),
            timeout_secs: 15,
            min_poster_height: 300,
        }
    }
}

impl ImageSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleSettings {
    pub enabled: bool,
    /// Language codes to keep, in preference order
    pub languages: Vec<String>,
    /// File extension for saved subtitles
    pub format: String,
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            languages: vec!["en".to_string()],
            format: "srt".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    /// Source names, tried in order
    pub enabled: Vec<String>,
    /// "en" or "ja"
    pub r18dev_language: String,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            enabled: vec!["r18dev".to_string(), "fanza".to_string()],
            r18dev_language: "en".to_string(),
        }
    }
}

/// Environment variables recognized as overrides.
pub const ENV_VARS: &[&str] = &[
    "USER_AGENT",
    "REQUEST_DELAY",
    "REQUEST_TIMEOUT",
    "DEFAULT_OUTPUT_DIR",
    "OUTPUT_DIR_TEMPLATE",
    "TRANSLATION_ENABLED",
    "TRANSLATION_SERVICE",
    "TRANSLATION_API_KEY",
    "TRANSLATION_SOURCE_LANG",
    "TRANSLATION_TARGET_LANG",
    "TRANSLATION_FIELDS",
    "SKIP_GENRES",
    "CACHE_ENABLED",
    "CACHE_FILE",
    "IMAGE_DOWNLOAD_ENABLED",
    "IMAGE_DOWNLOAD_COVER",
    "IMAGE_DOWNLOAD_POSTER",
    "IMAGE_FILENAME_COVER",
    "IMAGE_FILENAME_POSTER",
    "IMAGE_DOWNLOAD_TIMEOUT",
    "IMAGE_MIN_POSTER_HEIGHT",
    "SUBTITLE_DOWNLOAD_ENABLED",
    "SUBTITLE_LANGUAGES",
    "SUBTITLE_FORMAT",
    "ENABLED_SCRAPERS",
    "R18DEV_LANGUAGE",
];

impl Settings {
    /// Load from `path` (or [`settings_path`]), apply environment overrides,
    /// and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(settings_path);
        let mut settings = Self::from_file(&path)?;
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read a settings file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write settings atomically.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        write_atomic(path, self.to_toml()?.as_bytes())?;
        Ok(())
    }

    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// Returns the names of the variables that were applied.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Vec<&'static str>, SettingsError> {
        let mut applied = Vec::new();
        for &key in ENV_VARS {
            let Some(value) = lookup(key) else {
                continue;
            };
            self.apply_one(key, &value)?;
            applied.push(key);
        }
        Ok(applied)
    }

    fn apply_one(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            "USER_AGENT" => self.http.user_agent = value.to_string(),
            "REQUEST_DELAY" => self.http.request_delay_secs = parse_number(key, value)?,
            "REQUEST_TIMEOUT" => self.http.timeout_secs = parse_number(key, value)?,
            "DEFAULT_OUTPUT_DIR" => self.output.dir = non_empty_path(value),
            "OUTPUT_DIR_TEMPLATE" => self.output.dir_template = value.trim().to_string(),
            "TRANSLATION_ENABLED" => self.translation.enabled = parse_bool(key, value)?,
            "TRANSLATION_SERVICE" => self.translation.service = value.parse()?,
            "TRANSLATION_API_KEY" => {
                self.translation.api_key = Some(value.trim().to_string()).filter(|k| !k.is_empty())
            }
            "TRANSLATION_SOURCE_LANG" => self.translation.source_lang = value.trim().to_string(),
            "TRANSLATION_TARGET_LANG" => self.translation.target_lang = value.trim().to_string(),
            "TRANSLATION_FIELDS" => {
                self.translation.fields = split_list(value)
                    .iter()
                    .map(|name| {
                        name.parse::<Field>()
                            .map_err(|e| SettingsError::invalid(key, e.to_string()))
                    })
                    .collect::<Result<_, _>>()?
            }
            "SKIP_GENRES" => self.genres.skip = split_list(value),
            "CACHE_ENABLED" => self.cache.enabled = parse_bool(key, value)?,
            "CACHE_FILE" => self.cache.file = non_empty_path(value),
            "IMAGE_DOWNLOAD_ENABLED" => self.images.enabled = parse_bool(key, value)?,
            "IMAGE_DOWNLOAD_COVER" => self.images.cover = parse_bool(key, value)?,
            "IMAGE_DOWNLOAD_POSTER" => self.images.poster = parse_bool(key, value)?,
            "IMAGE_FILENAME_COVER" => self.images.cover_name = value.trim().to_string(),
            "IMAGE_FILENAME_POSTER" => self.images.poster_name = value.trim().to_string(),
            "IMAGE_DOWNLOAD_TIMEOUT" => self.images.timeout_secs = parse_number(key, value)?,
            "IMAGE_MIN_POSTER_HEIGHT" => self.images.min_poster_height = parse_number(key, value)?,
            "SUBTITLE_DOWNLOAD_ENABLED" => self.subtitles.enabled = parse_bool(key, value)?,
            "SUBTITLE_LANGUAGES" => self.subtitles.languages = split_list(value),
            "SUBTITLE_FORMAT" => self.subtitles.format = value.trim().to_string(),
            "ENABLED_SCRAPERS" => self.scrapers.enabled = split_list(value),
            "R18DEV_LANGUAGE" => self.scrapers.r18dev_language = value.trim().to_string(),
            _ => {}
        }
        Ok(())
    }

    /// Check every value once; normalizes `r18dev_language`.
    pub fn validate(&mut self) -> Result<(), SettingsError> {
        let delay = self.http.request_delay_secs;
        if !delay.is_finite() || delay < 0.0 {
            return Err(SettingsError::invalid(
                "http.request_delay_secs",
                format!("must be a non-negative number, got {delay}"),
            ));
        }
        if Duration::try_from_secs_f64(delay).is_err() {
            return Err(SettingsError::invalid(
                "http.request_delay_secs",
                format!("{delay} is too large"),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(SettingsError::invalid("http.timeout_secs", "must be at least 1"));
        }
        if self.images.timeout_secs == 0 {
            return Err(SettingsError::invalid("images.timeout_secs", "must be at least 1"));
        }
        for (key, value) in [
            ("translation.source_lang", &self.translation.source_lang),
            ("translation.target_lang", &self.translation.target_lang),
            ("images.cover_name", &self.images.cover_name),
            ("images.poster_name", &self.images.poster_name),
            ("subtitles.format", &self.subtitles.format),
        ] {
            if value.trim().is_empty() {
                return Err(SettingsError::invalid(key, "must not be empty"));
            }
        }
        if self.scrapers.enabled.is_empty() {
            return Err(SettingsError::invalid(
                "scrapers.enabled",
                "at least one scraper must be enabled",
            ));
        }
        let language = self.scrapers.r18dev_language.to_lowercase();
        self.scrapers.r18dev_language = match language.as_str() {
            "en" => "en".to_string(),
            "ja" | "jp" => "ja".to_string(),
            other => {
                return Err(SettingsError::invalid(
                    "scrapers.r18dev_language",
                    format!("expected en or ja, got '{other}'"),
                ));
            }
        };
        Ok(())
    }

    /// Whether `field` is in the configured translation field list.
    pub fn translates(&self, field: Field) -> bool {
        self.translation.fields.contains(&field)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(SettingsError::invalid(key, format!("expected true/false, got '{other}'"))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SettingsError> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| SettingsError::invalid(key, format!("'{value}' is not a valid number")))
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
