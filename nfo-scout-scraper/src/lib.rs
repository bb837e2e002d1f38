pub mod assets;
pub mod batch;
pub mod content_id;
pub mod error;
pub mod fanza;
pub mod images;
pub mod log;
pub mod r18dev;
pub mod registry;
pub mod source;
pub mod subtitles;

pub use assets::{AssetOutcome, AssetSource};
pub use batch::{
    BatchEvent, BatchOptions, BatchOrchestrator, BatchOutcome, ItemError, ItemReport, ItemStatus,
    Pipeline, Stage, fetch_record, run_batch,
};
pub use content_id::store_content_id;
pub use error::ScrapeError;
pub use fanza::FanzaSource;
pub use images::{ImageDownloader, crop_poster};
pub use log::{LogEntry, LogSummary, RunLog};
pub use r18dev::R18DevSource;
pub use registry::ScraperRegistry;
pub use source::{MetadataSource, http_client};
pub use subtitles::SubtitleDownloader;
