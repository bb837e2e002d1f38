pub mod error;
pub mod layout;
pub mod nfo;

pub use error::FrontendError;
pub use layout::{render_dir_template, sanitize_component, unique_path};
pub use nfo::NfoWriter;

use std::fs;
use std::path::{Path, PathBuf};

use nfo_scout_core::{Identifier, MetadataRecord};

/// Local image files saved next to a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artwork {
    /// Portrait poster
    pub poster: Option<PathBuf>,
    /// Landscape cover, used as fanart
    pub cover: Option<PathBuf>,
}

/// Trait for media-manager descriptor generators.
pub trait DescriptorWriter {
    fn name(&self) -> &'static str;

    /// File name of the descriptor for `id`, without any directory.
    fn file_name(&self, id: &Identifier) -> String;

    /// Serialize `record` for a descriptor placed in `dest_dir`.
    fn render(
        &self,
        record: &MetadataRecord,
        artwork: &Artwork,
        dest_dir: &Path,
    ) -> Result<String, FrontendError>;

    /// Where the descriptor for `id` lands inside `dest_dir`.
    fn path_for(&self, id: &Identifier, dest_dir: &Path) -> PathBuf {
        dest_dir.join(self.file_name(id))
    }

    /// Render and write the descriptor, replacing any existing file.
    fn write(
        &self,
        record: &MetadataRecord,
        artwork: &Artwork,
        dest_dir: &Path,
    ) -> Result<PathBuf, FrontendError> {
        let contents = self.render(record, artwork, dest_dir)?;
        fs::create_dir_all(dest_dir)?;
        let path = self.path_for(&record.identifier, dest_dir);
        fs::write(&path, contents)?;
        Ok(path)
    }
}
