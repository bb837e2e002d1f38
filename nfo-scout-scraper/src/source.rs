use nfo_scout_core::{Identifier, MetadataRecord};
use nfo_scout_lib::settings::HttpSettings;

use crate::error::ScrapeError;

/// A remote catalog that can produce a record for an identifier.
pub trait MetadataSource {
    /// Registry name, e.g. "r18dev".
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str {
        ""
    }

    /// Fetch the record for `id`. Implementations report a missing entry as
    /// [`ScrapeError::NotFound`].
    fn fetch(&self, id: &Identifier) -> Result<MetadataRecord, ScrapeError>;
}

/// Blocking HTTP client configured from settings.
pub fn http_client(settings: &HttpSettings) -> Result<reqwest::blocking::Client, ScrapeError> {
    Ok(reqwest::blocking::Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(settings.timeout())
        .build()?)
}

/// Read a response body, mapping error statuses to `ScrapeError`.
pub(crate) fn response_text(
    resp: reqwest::blocking::Response,
    id: &Identifier,
    source_name: &str,
) -> Result<String, ScrapeError> {
    let status = resp.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ScrapeError::not_found(id.canonical(), source_name));
    }
    let text = resp.text()?;
    if !status.is_success() {
        return Err(ScrapeError::ServerError {
            status: status.as_u16(),
            message: snippet(&text),
        });
    }
    Ok(text)
}

/// First 200 characters of a response, for error messages.
pub(crate) fn snippet(text: &str) -> String {
    text.chars().take(200).collect()
}

/// First non-blank value.
pub(crate) fn first_present(values: &[Option<&str>]) -> Option<String> {
    values
        .iter()
        .flatten()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}
