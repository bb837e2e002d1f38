use std::path::{Path, PathBuf};

use nfo_scout_core::MetadataRecord;
use nfo_scout_frontend::Artwork;

use crate::error::ScrapeError;

/// Files produced by one asset fetcher for one item.
#[derive(Debug, Clone, Default)]
pub struct AssetOutcome {
    /// Every file written
    pub files: Vec<PathBuf>,
    /// Images the descriptor should reference
    pub artwork: Artwork,
    /// Non-fatal problems, e.g. one image that failed to download
    pub warnings: Vec<String>,
}

impl AssetOutcome {
    pub fn merge(&mut self, other: AssetOutcome) {
        self.files.extend(other.files);
        self.warnings.extend(other.warnings);
        if other.artwork.poster.is_some() {
            self.artwork.poster = other.artwork.poster;
        }
        if other.artwork.cover.is_some() {
            self.artwork.cover = other.artwork.cover;
        }
    }
}

/// Retrieves auxiliary files (images, subtitles) for a record.
pub trait AssetSource {
    fn name(&self) -> &str;

    /// Save assets for `record` into `dest_dir`. An `Err` means the whole
    /// fetcher failed; partial problems go into `AssetOutcome::warnings`.
    fn fetch(&self, record: &MetadataRecord, dest_dir: &Path) -> Result<AssetOutcome, ScrapeError>;
}

/// GET `url` and return the body, failing on error statuses.
pub(crate) fn download(
    http: &reqwest::blocking::Client,
    url: &str,
) -> Result<Vec<u8>, ScrapeError> {
    let resp = http.get(url).send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ScrapeError::ServerError {
            status: status.as_u16(),
            message: format!("GET {url}"),
        });
    }
    Ok(resp.bytes()?.to_vec())
}
