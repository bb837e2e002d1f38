use nfo_scout_frontend::FrontendError;

/// Errors that can occur while fetching metadata or assets.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{identifier} not found on {source_name}")]
    NotFound {
        identifier: String,
        source_name: String,
    },

    #[error("Unknown metadata source '{0}'")]
    UnknownSource(String),

    #[error("No source returned metadata for {identifier} ({})", attempts.join("; "))]
    Unavailable {
        identifier: String,
        attempts: Vec<String>,
    },

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] FrontendError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn not_found(identifier: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
            source_name: source_name.into(),
        }
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
