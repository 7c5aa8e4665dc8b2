use reqwest::StatusCode;
use shared::error::{ApiErrorBody, ErrorCode, FieldErrors};
use thiserror::Error;

/// Failure of a single call against the resource API.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("invalid resource url: {0}")]
    InvalidUrl(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("resource not found at {url}")]
    NotFound { url: String },
    #[error("request to {url} rejected with status {status}: {message}")]
    Rejected {
        url: String,
        status: u16,
        message: String,
        violations: Option<FieldErrors>,
    },
    #[error("resource api returned status {status} for {url}")]
    Server { url: String, status: u16 },
    #[error("unexpected response body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl RemoteError {
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Worth retrying later; the request may not have reached a healthy server.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Server { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Rejected { .. } => ErrorCode::Rejected,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Server { .. } => {
                ErrorCode::Unavailable
            }
            Self::InvalidUrl(_) | Self::Decode { .. } => ErrorCode::Internal,
        }
    }

    pub fn violations(&self) -> Option<&FieldErrors> {
        match self {
            Self::Rejected { violations, .. } => violations.as_ref(),
            _ => None,
        }
    }
}

/// Maps a non-success status and its body to the failure taxonomy.
pub(crate) fn classify_status(url: &str, status: StatusCode, body: &[u8]) -> RemoteError {
    if status == StatusCode::NOT_FOUND {
        return RemoteError::NotFound {
            url: url.to_string(),
        };
    }

    if status.is_server_error() {
        return RemoteError::Server {
            url: url.to_string(),
            status: status.as_u16(),
        };
    }

    let parsed = serde_json::from_slice::<ApiErrorBody>(body).unwrap_or_default();
    let message = parsed
        .message
        .clone()
        .or_else(|| {
            status
                .canonical_reason()
                .map(|reason| reason.to_ascii_lowercase())
        })
        .unwrap_or_else(|| "request rejected".to_string());
    RemoteError::Rejected {
        url: url.to_string(),
        status: status.as_u16(),
        message,
        violations: parsed.field_errors(),
    }
}
