//! Translation backends.
//!
//! [`Translator`] is the only thing the cache and the batch runner see. Two
//! HTTP backends are provided: the keyless Google endpoint and DeepL.

use std::time::Duration;

use nfo_scout_core::Field;
use serde::Deserialize;

use crate::error::TranslateError;
use crate::pacing::Pacer;
use crate::settings::{Settings, TranslationService};

const GOOGLE_URL: &str = "https://translate.googleapis.com/translate_a/single";
const DEEPL_FREE_URL: &str = "https://api-free.deepl.com/v2/translate";
const DEEPL_PRO_URL: &str = "https://api.deepl.com/v2/translate";

/// Minimum spacing between two backend calls.
const MIN_TRANSLATE_INTERVAL: Duration = Duration::from_millis(500);

/// A service that turns source text into the target language.
pub trait Translator {
    /// Short service name, recorded with every cached entry.
    fn name(&self) -> &str;

    /// Translate one piece of text. `field` is a hint; backends may ignore it.
    fn translate(&self, text: &str, field: Field) -> Result<String, TranslateError>;
}

/// Build the configured backend.
pub fn translator_from_settings(
    settings: &Settings,
) -> Result<Box<dyn Translator>, TranslateError> {
    let http = reqwest::blocking::Client::builder()
        .user_agent(settings.http.user_agent.clone())
        .timeout(settings.http.timeout())
        .build()?;
    let t = &settings.translation;

    Ok(match t.service {
        TranslationService::Google => Box::new(GoogleTranslator::new(
            http,
            &t.source_lang,
            &t.target_lang,
        )),
        TranslationService::DeepL => {
            let key = t
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| TranslateError::MissingApiKey("DeepL".to_string()))?;
            Box::new(DeepLTranslator::new(http, key, &t.source_lang, &t.target_lang))
        }
    })
}

/// Keyless Google Translate endpoint (`client=gtx`).
pub struct GoogleTranslator {
    http: reqwest::blocking::Client,
    source_lang: String,
    target_lang: String,
    pacer: Pacer,
}

impl GoogleTranslator {
    pub fn new(http: reqwest::blocking::Client, source_lang: &str, target_lang: &str) -> Self {
        Self {
            http,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            pacer: Pacer::new(MIN_TRANSLATE_INTERVAL),
        }
    }
}

impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    fn translate(&self, text: &str, _field: Field) -> Result<String, TranslateError> {
        let (status, body) = self.pacer.call(|| {
            let resp = self
                .http
                .get(GOOGLE_URL)
                .query(&[
                    ("client", "gtx"),
                    ("sl", self.source_lang.as_str()),
                    ("tl", self.target_lang.as_str()),
                    ("dt", "t"),
                    ("q", text),
                ])
                .send()?;
            let status = resp.status();
            Ok::<_, reqwest::Error>((status, resp.text()?))
        })?;
        if !status.is_success() {
            return Err(TranslateError::Service {
                service: self.name().to_string(),
                status: status.as_u16(),
                message: truncate(&body, 200),
            });
        }
        parse_google_response(&body)
    }
}

/// The response is a nested array; `[0]` holds `[translated, original, ...]`
/// segments whose first elements concatenate to the full translation.
fn parse_google_response(body: &str) -> Result<String, TranslateError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        TranslateError::unexpected(format!("{e}. Response: {}", truncate(body, 200)))
    })?;
    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::unexpected("missing translation segments"))?;

    let translated: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(|s| s.as_str()))
        .collect();
    Ok(translated)
}

/// DeepL REST API. Keys ending in `:fx` use the free endpoint.
pub struct DeepLTranslator {
    http: reqwest::blocking::Client,
    api_key: String,
    source_lang: String,
    target_lang: String,
    pacer: Pacer,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

impl DeepLTranslator {
    pub fn new(
        http: reqwest::blocking::Client,
        api_key: String,
        source_lang: &str,
        target_lang: &str,
    ) -> Self {
        Self {
            http,
            api_key,
            source_lang: source_lang.to_uppercase(),
            target_lang: target_lang.to_uppercase(),
            pacer: Pacer::new(MIN_TRANSLATE_INTERVAL),
        }
    }

    fn endpoint(&self) -> &'static str {
        if self.api_key.ends_with(":fx") {
            DEEPL_FREE_URL
        } else {
            DEEPL_PRO_URL
        }
    }
}

impl Translator for DeepLTranslator {
    fn name(&self) -> &str {
        "deepl"
    }

    fn translate(&self, text: &str, _field: Field) -> Result<String, TranslateError> {
        let (status, body) = self.pacer.call(|| {
            let resp = self
                .http
                .post(self.endpoint())
                .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
                .form(&[
                    ("text", text),
                    ("source_lang", self.source_lang.as_str()),
                    ("target_lang", self.target_lang.as_str()),
                ])
                .send()?;
            let status = resp.status();
            Ok::<_, reqwest::Error>((status, resp.text()?))
        })?;
        if !status.is_success() {
            return Err(TranslateError::Service {
                service: self.name().to_string(),
                status: status.as_u16(),
                message: truncate(&body, 200),
            });
        }
        parse_deepl_response(&body)
    }
}

fn parse_deepl_response(body: &str) -> Result<String, TranslateError> {
    let parsed: DeepLResponse = serde_json::from_str(body).map_err(|e| {
        TranslateError::unexpected(format!("{e}. Response: {}", truncate(body, 200)))
    })?;
    parsed
        .translations
        .into_iter()
        .next()
        .map(|t| t.text)
        .ok_or_else(|| TranslateError::unexpected("DeepL returned no translations"))
}

/// First `max` characters of `s`.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_segments_are_concatenated() {
        let body =
            r#"[[["High ","ハイ",null,null,10],["Definition","ビジョン",null,null,10]],null,"ja"]"#;
        assert_eq!(parse_google_response(body).unwrap(), "High Definition");
    }

    #[test]
    fn google_garbage_is_an_error() {
        assert!(parse_google_response("<html>").is_err());
        assert!(parse_google_response("{}").is_err());
    }

    #[test]
    fn deepl_first_translation_wins() {
        let body = r#"{"translations":[{"detected_source_language":"JA","text":"Rookie Debut"}]}"#;
        assert_eq!(parse_deepl_response(body).unwrap(), "Rookie Debut");
        assert!(parse_deepl_response(r#"{"translations":[]}"#).is_err());
    }

    #[test]
    fn deepl_endpoint_depends_on_key() {
        let http = reqwest::blocking::Client::new();
        let free = DeepLTranslator::new(http.clone(), "abc:fx".into(), "ja", "en");
        let pro = DeepLTranslator::new(http, "abc".into(), "ja", "en");
        assert_eq!(free.endpoint(), DEEPL_FREE_URL);
        assert_eq!(pro.endpoint(), DEEPL_PRO_URL);
        assert_eq!(free.target_lang, "EN");
    }

    #[test]
    fn deepl_without_key_is_rejected() {
        let mut settings = Settings::default();
        settings.translation.service = TranslationService::DeepL;
        settings.translation.api_key = None;
        assert!(matches!(
            translator_from_settings(&settings),
            Err(TranslateError::MissingApiKey(_))
        ));
    }
}
