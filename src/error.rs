use reqwest::StatusCode;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    RemoteFetch { status: u16, message: String },

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("No rated results found. Try adjusting the filters or media type.")]
    NoRatedCandidates,

    #[error("Failed to load title details: {0}")]
    Enrichment(#[source] Box<AppError>),

    #[error("{0}")]
    NoCandidates(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A discovery is already in progress.")]
    Busy,

    #[error("Genre configuration error: {0}")]
    GenreConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a `RemoteFetch` error whose message depends on the status code.
    ///
    /// Rate limiting and authentication failures get their own wording so the
    /// user can tell "wait a moment" apart from "the key is wrong".
    pub fn remote_fetch(status: StatusCode) -> Self {
        let message = match status {
            StatusCode::TOO_MANY_REQUESTS => {
                "Rate limit exceeded. Please try again in a moment.".to_string()
            }
            StatusCode::UNAUTHORIZED => {
                "Unable to authenticate with the movie database. Please check back later."
                    .to_string()
            }
            other => format!("API request failed with status {}", other.as_u16()),
        };

        AppError::RemoteFetch {
            status: status.as_u16(),
            message,
        }
    }

    /// Text shown to the user by the top-level handler
    pub fn user_message(&self) -> String {
        match self {
            AppError::Enrichment(inner) => inner.user_message(),
            AppError::InvalidInput(message) => message.clone(),
            AppError::HttpClient(e) if e.is_timeout() => {
                "The movie database took too long to respond.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Stable tag used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::RemoteFetch { .. } => "remote_fetch",
            AppError::MalformedResponse(_) => "malformed_response",
            AppError::NoRatedCandidates => "no_rated_candidates",
            AppError::Enrichment(_) => "enrichment_fetch",
            AppError::NoCandidates(_) => "no_candidates",
            AppError::Cache(_) => "cache",
            AppError::HttpClient(_) => "http_client",
            AppError::Io(_) => "io",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Busy => "busy",
            AppError::GenreConfig(_) => "genre_config",
            AppError::Internal(_) => "internal",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
