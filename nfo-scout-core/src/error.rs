/// Errors raised while turning free-form text into an [`Identifier`](crate::Identifier).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("No identifier found in \"{0}\"")]
    NoMatch(String),

    #[error("Invalid identifier part: {0}")]
    InvalidPart(String),
}

impl ExtractionError {
    pub fn no_match(input: impl Into<String>) -> Self {
        Self::NoMatch(input.into())
    }

    pub fn invalid_part(msg: impl Into<String>) -> Self {
        Self::InvalidPart(msg.into())
    }
}
