use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid grid reference: {input}")]
    InvalidGridReference { input: String },

    #[error("Grid fetch failed: {reason}")]
    GridFetchFailed { reason: HttpFailure },

    #[error("Grid document is not parseable: {message}")]
    MalformedGridDocument { message: String },

    #[error("Presentation generation failed: {reason}")]
    PresentationGenerationFailed { reason: HttpFailure },

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// How an HTTP interaction failed: a non-200 response carrying the status and
/// body text, or a transport fault carrying the elapsed time.
#[derive(Debug)]
pub enum HttpFailure {
    Status { status: u16, body: String },
    Transport { elapsed: Duration, detail: String },
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpFailure::Status { status, body } => write!(f, "status {status}: {body}"),
            HttpFailure::Transport { elapsed, detail } => write!(
                f,
                "transport fault after {:.1}s: {detail}",
                elapsed.as_secs_f64()
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
