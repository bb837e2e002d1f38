pub mod error;
pub mod field;
pub mod identifier;
pub mod record;

pub use error::ExtractionError;
pub use field::{Field, FieldParseError};
pub use identifier::{CANONICAL_MIN_WIDTH, CONTENT_ID_WIDTH, Identifier, extract};
pub use record::{MetadataRecord, Performer};
