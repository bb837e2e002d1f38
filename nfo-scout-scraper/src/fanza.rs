use nfo_scout_core::{Identifier, MetadataRecord, Performer};
use serde::Deserialize;

use crate::content_id::store_content_id;
use crate::error::ScrapeError;
use crate::source::{MetadataSource, first_present, response_text, snippet};

const GRAPHQL_URL: &str = "https://api.video.dmm.co.jp/graphql";

const CONTENT_QUERY: &str = r#"
query ContentPageData($id: ID!) {
  ppvContent(id: $id) {
    id
    title
    description
    packageImage { largeUrl mediumUrl }
    sampleImages { number imageUrl largeImageUrl }
    deliveryStartDate
    makerReleasedAt
    duration
    actresses { id name nameRuby imageUrl }
    directors { id name }
    series { id name }
    maker { id name }
    label { id name }
    genres { id name }
    makerContentId
  }
}
"#;

/// DMM/FANZA GraphQL `ppvContent` query (Japanese).
pub struct FanzaSource {
    http: reqwest::blocking::Client,
}

impl FanzaSource {
    pub fn new(http: reqwest::blocking::Client) -> Self {
        Self { http }
    }
}

impl MetadataSource for FanzaSource {
    fn name(&self) -> &str {
        "fanza"
    }

    fn description(&self) -> &str {
        "FANZA GraphQL API (Japanese)"
    }

    fn fetch(&self, id: &Identifier) -> Result<MetadataRecord, ScrapeError> {
        let content_id = store_content_id(id);
        let payload = serde_json::json!({
            "operationName": "ContentPageData",
            "query": CONTENT_QUERY,
            "variables": { "id": content_id },
        });
        log::debug!("fanza: ppvContent({})", content_id);

        let resp = self.http.post(GRAPHQL_URL).json(&payload).send()?;
        let text = response_text(resp, id, self.name())?;
        parse_content(&text, id)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ContentData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentData {
    ppv_content: Option<PpvContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PpvContent {
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    package_image: Option<PackageImage>,
    sample_images: Option<Vec<SampleImage>>,
    delivery_start_date: Option<String>,
    maker_released_at: Option<String>,
    /// Seconds
    duration: Option<u64>,
    actresses: Option<Vec<Named>>,
    directors: Option<Vec<Named>>,
    series: Option<Named>,
    maker: Option<Named>,
    label: Option<Named>,
    genres: Option<Vec<Named>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PackageImage {
    large_url: Option<String>,
    medium_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SampleImage {
    large_image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Named {
    name: Option<String>,
    image_url: Option<String>,
}

fn name_of(named: Option<Named>) -> Option<String> {
    named.and_then(|n| first_present(&[n.name.as_deref()]))
}

fn names(list: Option<Vec<Named>>) -> Vec<String> {
    list.unwrap_or_default()
        .into_iter()
        .filter_map(|n| first_present(&[n.name.as_deref()]))
        .collect()
}

fn parse_content(text: &str, id: &Identifier) -> Result<MetadataRecord, ScrapeError> {
    let response: GraphQlResponse = serde_json::from_str(text).map_err(|e| {
        ScrapeError::api(format!(
            "Failed to parse FANZA response: {e}. Response: {}",
            snippet(text)
        ))
    })?;

    let content = match response.data.and_then(|d| d.ppv_content) {
        Some(content) => content,
        None if !response.errors.is_empty() => {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(ScrapeError::api(messages.join("; ")));
        }
        None => return Err(ScrapeError::not_found(id.canonical(), "fanza")),
    };
    let Some(title) = first_present(&[content.title.as_deref()]) else {
        return Err(ScrapeError::not_found(id.canonical(), "fanza"));
    };

    let mut record = MetadataRecord::new(id.clone(), "fanza", "ja");
    record.content_id = content.id.map(|c| c.to_lowercase());
    record.title = title;
    record.plot = first_present(&[content.description.as_deref()]);
    record.release_date = first_present(&[
        content.delivery_start_date.as_deref(),
        content.maker_released_at.as_deref(),
    ])
    .and_then(|d| d.get(..10).map(str::to_string));
    record.runtime_minutes = content
        .duration
        .filter(|d| *d > 0)
        .map(|d| (d / 60) as u32);

    if let Some(images) = content.package_image {
        record.cover_url = first_present(&[images.large_url.as_deref()]);
        record.poster_url = first_present(&[images.medium_url.as_deref()]);
    }
    record.gallery = content
        .sample_images
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| first_present(&[s.large_image_url.as_deref()]))
        .collect();

    record.performers = content
        .actresses
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| {
            let mut performer = Performer::new(first_present(&[a.name.as_deref()])?);
            performer.image_url = first_present(&[a.image_url.as_deref()]);
            Some(performer)
        })
        .collect();
    record.directors = names(content.directors);
    record.genres = names(content.genres);
    record.series = name_of(content.series);
    record.studio = name_of(content.maker);
    record.label = name_of(content.label);

    Ok(record)
}

#[cfg(test)]
#[path = "tests/fanza_tests.rs"]
mod tests;
