use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageFormat};
use nfo_scout_core::MetadataRecord;
use nfo_scout_frontend::unique_path;
use nfo_scout_lib::settings::{HttpSettings, ImageSettings};

use crate::assets::{AssetOutcome, AssetSource, download};
use crate::error::ScrapeError;

/// Cover width divided by this gives the left edge of the poster half.
pub const POSTER_CROP_RATIO: f64 = 1.895734597;

/// Downloads cover and poster images next to the descriptor.
pub struct ImageDownloader {
    http: reqwest::blocking::Client,
    settings: ImageSettings,
}

impl ImageDownloader {
    pub fn new(http: &HttpSettings, images: &ImageSettings) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(images.timeout())
            .build()?;
        Ok(Self {
            http: client,
            settings: images.clone(),
        })
    }

    fn target(&self, dest_dir: &Path, code: &str, name: &str) -> PathBuf {
        unique_path(dest_dir, &format!("{code}-{name}"), "jpg")
    }

    /// Poster bytes when the poster URL is usable and tall enough.
    fn remote_poster(&self, url: &str) -> Result<Option<Vec<u8>>, ScrapeError> {
        let bytes = download(&self.http, url)?;
        let (_, height) = image::load_from_memory(&bytes)?.dimensions();
        if height < self.settings.min_poster_height {
            log::debug!(
                "poster {} is {}px tall, below {}px",
                url,
                height,
                self.settings.min_poster_height
            );
            return Ok(None);
        }
        Ok(Some(bytes))
    }
}

impl AssetSource for ImageDownloader {
    fn name(&self) -> &str {
        "images"
    }

    fn fetch(&self, record: &MetadataRecord, dest_dir: &Path) -> Result<AssetOutcome, ScrapeError> {
        let mut out = AssetOutcome::default();
        let code = record.identifier.canonical();
        let wants_cover = self.settings.cover || self.settings.poster;

        let cover_bytes = match record.cover_url.as_deref() {
            Some(url) if wants_cover => match download(&self.http, url) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    out.warnings.push(format!("cover: {e}"));
                    None
                }
            },
            _ => None,
        };

        if cover_bytes.is_none() && !self.settings.poster {
            return Ok(out);
        }
        fs::create_dir_all(dest_dir)?;

        if let Some(bytes) = cover_bytes.as_ref().filter(|_| self.settings.cover) {
            let path = self.target(dest_dir, code, &self.settings.cover_name);
            fs::write(&path, bytes)?;
            out.files.push(path.clone());
            out.artwork.cover = Some(path);
        }

        if !self.settings.poster {
            return Ok(out);
        }

        let remote = match record.poster_url.as_deref() {
            Some(url) => self.remote_poster(url).unwrap_or_else(|e| {
                log::debug!("poster download failed for {}: {}", code, e);
                None
            }),
            None => None,
        };
        let path = self.target(dest_dir, code, &self.settings.poster_name);
        if let Some(bytes) = remote {
            fs::write(&path, bytes)?;
        } else if let Some(cover) = &cover_bytes {
            match crop_poster(cover, self.settings.min_poster_height)? {
                Some(poster) => save_jpeg(&poster, &path)?,
                None => {
                    out.warnings
                        .push("poster: cover too small to crop a poster".to_string());
                    return Ok(out);
                }
            }
        } else {
            out.warnings.push("poster: no usable poster or cover".to_string());
            return Ok(out);
        }
        out.files.push(path.clone());
        out.artwork.poster = Some(path);
        Ok(out)
    }
}

/// Crop the right-hand (front) side of a landscape cover into a poster.
///
/// Returns `None` when the result would be shorter than `min_height`.
pub fn crop_poster(cover: &[u8], min_height: u32) -> Result<Option<DynamicImage>, ScrapeError> {
    let img = image::load_from_memory(cover)?;
    let (width, height) = img.dimensions();
    let left = (f64::from(width) / POSTER_CROP_RATIO) as u32;
    if left >= width || height < min_height {
        return Ok(None);
    }
    Ok(Some(img.crop_imm(left, 0, width - left, height)))
}

fn save_jpeg(img: &DynamicImage, path: &Path) -> Result<(), ScrapeError> {
    DynamicImage::ImageRgb8(img.to_rgb8()).save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/images_tests.rs"]
mod tests;
