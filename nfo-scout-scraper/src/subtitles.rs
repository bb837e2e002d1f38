use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use nfo_scout_core::MetadataRecord;
use nfo_scout_frontend::unique_path;
use nfo_scout_lib::Pacer;
use nfo_scout_lib::settings::{HttpSettings, SubtitleSettings};
use regex::Regex;
use reqwest::Url;

use crate::assets::{AssetOutcome, AssetSource, download};
use crate::error::ScrapeError;
use crate::source::http_client;

const BASE_URL: &str = "https://subtitlecat.com/";

/// Languages offered as `download_<lang>` links on a subtitle page.
const PAGE_LANGUAGES: &[&str] = &["en", "ja", "zh", "ko"];

static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>.*?</td>").expect("valid regex"));
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["']([^"']+)["']"#).expect("valid regex"));
static TRANSLATED_FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)translated from ([a-z]+)").expect("valid regex"));

/// A subtitle page found by searching for a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitlePage {
    pub url: String,
    /// Language the subtitle was machine-translated from
    pub source_lang: String,
}

/// A direct download link on a subtitle page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleLink {
    pub url: String,
    pub language: String,
}

/// Searches subtitlecat.com and saves matching subtitles.
pub struct SubtitleDownloader {
    http: reqwest::blocking::Client,
    settings: SubtitleSettings,
    pacer: Pacer,
    base_url: String,
}

impl SubtitleDownloader {
    pub fn new(http: &HttpSettings, subtitles: &SubtitleSettings) -> Result<Self, ScrapeError> {
        Ok(Self {
            http: http_client(http)?,
            settings: subtitles.clone(),
            pacer: Pacer::new(http.request_delay()),
            base_url: BASE_URL.to_string(),
        })
    }

    fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let bytes = self.pacer.call(|| download(&self.http, url))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn wants(&self, language: &str) -> bool {
        self.settings
            .languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }
}

impl AssetSource for SubtitleDownloader {
    fn name(&self) -> &str {
        "subtitles"
    }

    fn fetch(&self, record: &MetadataRecord, dest_dir: &Path) -> Result<AssetOutcome, ScrapeError> {
        let code = record.identifier.canonical();
        let search_url = format!("{}index.php?search={code}", self.base_url);
        let pages = pages_in(&self.get_text(&search_url)?, code, &self.base_url);
        log::debug!("subtitles: {} page(s) for {}", pages.len(), code);

        let mut out = AssetOutcome::default();
        let mut seen = HashSet::new();
        for page in pages {
            let links = match self.get_text(&page.url) {
                Ok(html) => parse_download_links(&html, &page.url),
                Err(e) => {
                    out.warnings.push(format!("{}: {e}", page.url));
                    continue;
                }
            };
            for link in links {
                if !self.wants(&link.language) || !seen.insert(link.url.clone()) {
                    continue;
                }
                let stem = format!(
                    "{code}.{}.translated_from_{}",
                    link.language, page.source_lang
                );
                match self.pacer.call(|| download(&self.http, &link.url)) {
                    Ok(bytes) => {
                        fs::create_dir_all(dest_dir)?;
                        let path = unique_path(dest_dir, &stem, &self.settings.format);
                        fs::write(&path, bytes)?;
                        out.files.push(path);
                    }
                    Err(e) => out.warnings.push(format!("{}: {e}", link.url)),
                }
            }
        }
        Ok(out)
    }
}

/// Subtitle pages from the search results table cells that mention `code`.
pub fn parse_search_results(html: &str, code: &str) -> Vec<SubtitlePage> {
    pages_in(html, code, BASE_URL)
}

fn pages_in(html: &str, code: &str, base_url: &str) -> Vec<SubtitlePage> {
    let needle = code.to_lowercase();
    let mut pages = Vec::new();
    for cell in CELL_RE.find_iter(html) {
        let cell = cell.as_str();
        if !cell.to_lowercase().contains(&needle) {
            continue;
        }
        let detected = TRANSLATED_FROM_RE
            .captures(cell)
            .map(|c| c[1].to_lowercase());
        for href in HREF_RE.captures_iter(cell) {
            let href = &href[1];
            if !href.starts_with("subs/") {
                continue;
            }
            let source_lang = detected
                .clone()
                .unwrap_or_else(|| guess_language(href).to_string());
            pages.push(SubtitlePage {
                url: format!("{base_url}{href}"),
                source_lang,
            });
        }
    }
    pages
}

/// Download links on a subtitle page, resolved against `page_url`.
pub fn parse_download_links(html: &str, page_url: &str) -> Vec<SubtitleLink> {
    let base = Url::parse(page_url).ok();
    let mut links = Vec::new();
    for lang in PAGE_LANGUAGES {
        let Ok(re) = Regex::new(&format!(r#"download_{lang}.*?href="([^"]+)""#)) else {
            continue;
        };
        for caps in re.captures_iter(html) {
            let href = &caps[1];
            let url = match base.as_ref().and_then(|b| b.join(href).ok()) {
                Some(url) => url.to_string(),
                None => href.to_string(),
            };
            links.push(SubtitleLink {
                url,
                language: lang.to_string(),
            });
        }
    }
    links
}

/// Source language from markers in a subtitle file name.
fn guess_language(href: &str) -> &'static str {
    let name = href.to_lowercase();
    if name.contains(".en") {
        "english"
    } else if name.contains(".ja") {
        "japanese"
    } else if name.contains("zh-tw") || name.contains(".zh") || name.contains("-c.html") {
        "chinese"
    } else if name.contains(".ko") {
        "korean"
    } else {
        "unknown"
    }
}

#[cfg(test)]
#[path = "tests/subtitles_tests.rs"]
mod tests;
