use nfo_scout_core::{Identifier, MetadataRecord, Performer};
use serde::Deserialize;

use crate::content_id::store_content_id;
use crate::error::ScrapeError;
use crate::source::{MetadataSource, first_present, response_text, snippet};

const DETAIL_URL: &str = "https://r18.dev/videos/vod/movies/detail/-/combined=";
const ACTRESS_IMAGE_BASE: &str = "https://pics.dmm.co.jp/mono/actjpgs/";

/// r18.dev combined detail endpoint (JSON).
pub struct R18DevSource {
    http: reqwest::blocking::Client,
    english: bool,
}

impl R18DevSource {
    /// `language` is "en" or "ja"; anything else means English.
    pub fn new(http: reqwest::blocking::Client, language: &str) -> Self {
        Self {
            http,
            english: !language.eq_ignore_ascii_case("ja"),
        }
    }

    fn detail_url(id: &Identifier) -> String {
        format!("{DETAIL_URL}{}/json", store_content_id(id))
    }
}

impl MetadataSource for R18DevSource {
    fn name(&self) -> &str {
        "r18dev"
    }

    fn description(&self) -> &str {
        "r18.dev JSON API (English or Japanese titles)"
    }

    fn fetch(&self, id: &Identifier) -> Result<MetadataRecord, ScrapeError> {
        let url = Self::detail_url(id);
        log::debug!("r18dev: GET {}", url);
        let resp = self.http.get(&url).send()?;
        let text = response_text(resp, id, self.name())?;
        parse_detail(&text, id, self.english)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Detail {
    content_id: Option<String>,
    title_en: Option<String>,
    title_ja: Option<String>,
    comment_en: Option<String>,
    release_date: Option<String>,
    runtime_mins: Option<u32>,
    jacket_full_url: Option<String>,
    jacket_thumb_url: Option<String>,
    actresses: Option<Vec<Person>>,
    directors: Option<Vec<Person>>,
    categories: Option<Vec<Category>>,
    maker_name_en: Option<String>,
    maker_name_ja: Option<String>,
    label_name_en: Option<String>,
    label_name_ja: Option<String>,
    series_name_en: Option<String>,
    series_name_ja: Option<String>,
    gallery: Option<Vec<GalleryImage>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Person {
    name_romaji: Option<String>,
    name_kanji: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Category {
    name_en: Option<String>,
    name_ja: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GalleryImage {
    image_full: Option<String>,
}

/// Pick the preferred-language value, falling back to the other one.
fn localized(english: bool, en: &Option<String>, ja: &Option<String>) -> Option<String> {
    if english {
        first_present(&[en.as_deref(), ja.as_deref()])
    } else {
        first_present(&[ja.as_deref(), en.as_deref()])
    }
}

fn parse_detail(text: &str, id: &Identifier, english: bool) -> Result<MetadataRecord, ScrapeError> {
    let detail: Detail = serde_json::from_str(text).map_err(|e| {
        ScrapeError::api(format!("Failed to parse r18dev detail: {e}. Response: {}", snippet(text)))
    })?;

    let title = localized(english, &detail.title_en, &detail.title_ja);
    let (Some(content_id), Some(title)) = (first_present(&[detail.content_id.as_deref()]), title)
    else {
        return Err(ScrapeError::not_found(id.canonical(), "r18dev"));
    };

    let mut record = MetadataRecord::new(id.clone(), "r18dev", if english { "en" } else { "ja" });
    record.content_id = Some(content_id);
    record.original_title = first_present(&[detail.title_ja.as_deref()]).filter(|ja| *ja != title);
    record.title = title;
    record.plot = first_present(&[detail.comment_en.as_deref()]);
    record.release_date = detail
        .release_date
        .as_deref()
        .and_then(|d| d.get(..10))
        .map(str::to_string);
    record.runtime_minutes = detail.runtime_mins.filter(|m| *m > 0);
    record.cover_url = first_present(&[detail.jacket_full_url.as_deref()]);
    record.poster_url = first_present(&[detail.jacket_thumb_url.as_deref()]);

    record.performers = detail
        .actresses
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| performer(p, english))
        .collect();
    record.directors = detail
        .directors
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| localized(english, &p.name_romaji, &p.name_kanji))
        .collect();
    record.genres = detail
        .categories
        .unwrap_or_default()
        .into_iter()
        .filter_map(|c| localized(english, &c.name_en, &c.name_ja))
        .collect();
    record.studio = localized(english, &detail.maker_name_en, &detail.maker_name_ja);
    record.label = localized(english, &detail.label_name_en, &detail.label_name_ja);
    record.series = localized(english, &detail.series_name_en, &detail.series_name_ja);
    record.gallery = detail
        .gallery
        .unwrap_or_default()
        .into_iter()
        .filter_map(|g| g.image_full.filter(|u| !u.is_empty()))
        .collect();

    Ok(record)
}

fn performer(person: Person, english: bool) -> Option<Performer> {
    let name = localized(english, &person.name_romaji, &person.name_kanji)?;
    let mut performer = Performer::new(name);
    performer.original_name = first_present(&[person.name_kanji.as_deref()])
        .filter(|kanji| *kanji != performer.name);
    performer.image_url = person
        .image_url
        .filter(|u| !u.is_empty())
        .map(|u| {
            if u.starts_with("http") {
                u
            } else {
                format!("{ACTRESS_IMAGE_BASE}{u}")
            }
        });
    Some(performer)
}

#[cfg(test)]
#[path = "tests/r18dev_tests.rs"]
mod tests;
