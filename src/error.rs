//! Error types shared by the transport, the account facade and the tool layer.
//!
//! Every fallible operation in the crate returns [`SpotifyError`]. Only the
//! tool surface turns these into strings; everything below it propagates the
//! typed error with `?`.

/// Crate-wide result alias.
pub type Res<T> = std::result::Result<T, SpotifyError>;

#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    /// The Spotify Web API answered with a non-success status.
    #[error("http status: {status} - {message}")]
    Service { status: u16, message: String },

    #[error("{0}")]
    MissingParameter(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Unknown query type: {0}")]
    UnsupportedKind(String),

    #[error("No active device. Is Spotify open?")]
    NoDevice,

    #[error("{0}")]
    EmptyResult(String),

    #[error("No track_id provided and no current playback to resume.")]
    NoResumableState,

    #[error("Invalid Spotify URI: {0}")]
    InvalidUri(String),

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpotifyError {
    /// True when the remote API itself reported the failure.
    pub fn is_service(&self) -> bool {
        matches!(self, SpotifyError::Service { .. })
    }

    /// True for failures raised by the HTTP layer before a response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, SpotifyError::Http(_))
    }

    /// Short variant name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            SpotifyError::Service { .. } => "ServiceError",
            SpotifyError::MissingParameter(_) => "MissingParameterError",
            SpotifyError::InvalidParameter(_) => "InvalidParameterError",
            SpotifyError::UnsupportedKind(_) => "UnsupportedKindError",
            SpotifyError::NoDevice => "NoDeviceError",
            SpotifyError::EmptyResult(_) => "EmptyResultError",
            SpotifyError::NoResumableState => "NoResumableStateError",
            SpotifyError::InvalidUri(_) => "InvalidUriError",
            SpotifyError::NotAuthenticated(_) => "NotAuthenticatedError",
            SpotifyError::Config(_) => "ConfigError",
            SpotifyError::Http(_) => "HttpError",
            SpotifyError::Json(_) => "JsonError",
            SpotifyError::Io(_) => "IoError",
        }
    }
}
