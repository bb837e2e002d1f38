pub mod cache;
pub mod error;
pub mod pacing;
pub mod scanner;
pub mod settings;
pub mod translate;
pub mod util;

pub use cache::{CacheEntry, CacheStats, ImportSummary, MergePolicy, TranslationCache};
pub use error::{CacheError, ScanError, SettingsError, TranslateError};
pub use pacing::Pacer;
pub use scanner::{
    DirectoryWalker, DiscoveredItem, Discovery, Duplicate, VIDEO_EXTENSIONS, WalkEntry,
    dedup_items, discover,
};
pub use settings::{Settings, TranslationService, settings_path};
pub use translate::{DeepLTranslator, GoogleTranslator, Translator, translator_from_settings};

// Re-export core types so frontends only need one import
pub use nfo_scout_core::{
    ExtractionError, Field, FieldParseError, Identifier, MetadataRecord, Performer, extract,
};
