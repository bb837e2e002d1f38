use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::identifier::Identifier;

/// A performer credited on a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    /// Name in the record's language
    pub name: String,
    /// Name in the original script, when the source provides both
    pub original_name: Option<String>,
    /// Headshot URL
    pub image_url: Option<String>,
}

impl Performer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Metadata for one release as returned by a source.
///
/// Records are never edited in place by the pipeline; translation builds a
/// new record with [`MetadataRecord::with_field`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub identifier: Identifier,
    /// Storefront content id, which can differ from `identifier.content_id()`
    pub content_id: Option<String>,
    pub title: String,
    /// Title in the source language before any translation
    pub original_title: Option<String>,
    pub plot: Option<String>,
    pub genres: Vec<String>,
    pub performers: Vec<Performer>,
    pub directors: Vec<String>,
    pub studio: Option<String>,
    pub label: Option<String>,
    pub series: Option<String>,
    /// Release date as `YYYY-MM-DD`
    pub release_date: Option<String>,
    pub runtime_minutes: Option<u32>,
    /// Full-size cover (landscape jacket)
    pub cover_url: Option<String>,
    /// Portrait poster
    pub poster_url: Option<String>,
    pub gallery: Vec<String>,
    /// Source name this record was fetched from
    pub source: String,
    /// Language of the text fields, e.g. "ja" or "en"
    pub language: String,
}

impl MetadataRecord {
    pub fn new(
        identifier: Identifier,
        source: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            identifier,
            content_id: None,
            title: String::new(),
            original_title: None,
            plot: None,
            genres: Vec::new(),
            performers: Vec::new(),
            directors: Vec::new(),
            studio: None,
            label: None,
            series: None,
            release_date: None,
            runtime_minutes: None,
            cover_url: None,
            poster_url: None,
            gallery: Vec::new(),
            source: source.into(),
            language: language.into(),
        }
    }

    /// Release year taken from `release_date`.
    pub fn year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .filter(|y| y.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Text values of a field, one entry per atomic term.
    ///
    /// Single-valued fields yield at most one value.
    pub fn field_values(&self, field: Field) -> Vec<&str> {
        match field {
            Field::Title => non_empty(Some(self.title.as_str())),
            Field::Plot => non_empty(self.plot.as_deref()),
            Field::Genres => self.genres.iter().map(String::as_str).collect(),
            Field::Actresses => self.performers.iter().map(|p| p.name.as_str()).collect(),
            Field::Directors => self.directors.iter().map(String::as_str).collect(),
            Field::Studio => non_empty(self.studio.as_deref()),
            Field::Label => non_empty(self.label.as_deref()),
            Field::Series => non_empty(self.series.as_deref()),
        }
    }

    /// Copy of this record with `field` replaced by `values`.
    ///
    /// `values` must line up with [`field_values`](Self::field_values).
    pub fn with_field(&self, field: Field, values: Vec<String>) -> Self {
        let mut next = self.clone();
        let first = values.first().cloned();
        match field {
            Field::Title => {
                if let Some(title) = first {
                    if next.original_title.is_none() && title != next.title {
                        next.original_title = Some(next.title.clone());
                    }
                    next.title = title;
                }
            }
            Field::Plot => next.plot = first.or(next.plot),
            Field::Genres => next.genres = values,
            Field::Actresses => {
                for (performer, name) in next.performers.iter_mut().zip(values) {
                    if performer.original_name.is_none() && performer.name != name {
                        performer.original_name = Some(performer.name.clone());
                    }
                    performer.name = name;
                }
            }
            Field::Directors => next.directors = values,
            Field::Studio => next.studio = first.or(next.studio),
            Field::Label => next.label = first.or(next.label),
            Field::Series => next.series = first.or(next.series),
        }
        next
    }

    /// Drop genres that appear in `skip` (exact match after trimming).
    pub fn without_genres(&self, skip: &[String]) -> Self {
        let mut next = self.clone();
        next.genres
            .retain(|g| !skip.iter().any(|s| s.trim() == g.trim()));
        next
    }
}

fn non_empty(value: Option<&str>) -> Vec<&str> {
    value
        .filter(|v| !v.trim().is_empty())
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
