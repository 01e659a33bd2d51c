use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

pub type AppResult<T> = Result<T, AppError>;

/// Shown when playback resolution fails unexpectedly.
pub const INVALID_SESSION_MESSAGE: &str = "Error: Invalid Trakt access_token or refresh_token. \
     Possibly the token revoked. Please re-login at /api/login";

/// A plain-text error response. The message is shown to the caller as is,
/// so it never carries internal detail.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Resolution fault: rendered with a 200 so badge embeds show the text.
    pub fn invalid_session() -> Self {
        Self::new(StatusCode::OK, INVALID_SESSION_MESSAGE)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

/// Startup and CLI failures.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Core(#[from] nowwatching_core::CoreError),
    #[error("trakt client: {0}")]
    Trakt(#[from] nowwatching_api::trakt::TraktError),
    #[error("tmdb client: {0}")]
    Tmdb(#[from] nowwatching_api::tmdb::TmdbError),
    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
