//! Error taxonomy for MEATER Cloud calls.

use thiserror::Error;

/// Error type for client operations.
///
/// Every variant is surfaced to the caller as-is; nothing is retried.
#[derive(Debug, Error)]
pub enum MeaterError {
    /// A device call was made before `login` / `init_with_token`.
    #[error("not authorized; log in or supply a token first")]
    AuthRequired,

    /// Backend answered 401. The session has already been cleared.
    #[error("authorization expired; log in again")]
    AuthExpired,

    /// 400 Bad Request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 404 Not Found
    #[error("not found: {0}")]
    NotFound(String),

    /// 429 Too Many Requests
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// 500 Internal Server Error
    #[error("server error: {0}")]
    ServerError(String),

    /// Any other non-success status
    #[error("unhandled HTTP status {0}: {1}")]
    UnhandledStatus(u16, String),

    /// The configured API root is not an absolute http(s) URL
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Network-level failure (DNS, connect, TLS, timeout, body read)
    #[error("transport failure: {0}")]
    Transport(String),
}

impl MeaterError {
    /// HTTP status that produced this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            MeaterError::AuthExpired => Some(401),
            MeaterError::BadRequest(_) => Some(400),
            MeaterError::NotFound(_) => Some(404),
            MeaterError::RateLimited(_) => Some(429),
            MeaterError::ServerError(_) => Some(500),
            MeaterError::UnhandledStatus(code, _) => Some(*code),
            MeaterError::AuthRequired
            | MeaterError::InvalidBaseUrl(_)
            | MeaterError::Transport(_) => None,
        }
    }
}

impl From<reqwest::Error> for MeaterError {
    fn from(err: reqwest::Error) -> Self {
        MeaterError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MeaterError>;
