use serde_json::Value;

use crate::storage::StorageError;

/// Fallback shown when the server does not explain a failure.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Error raised by calls against the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not signed in or session expired; please log in")]
    Unauthenticated,
    #[error("request rejected with status {status}: {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid request payload: {0}")]
    Payload(String),
    #[error("session storage failure: {0}")]
    Session(#[from] StorageError),
}

impl ApiError {
    /// Build the error for a non-2xx response from its status and raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthenticated;
        }
        ApiError::Rejected {
            status,
            message: server_message(body),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
    }

    /// Text suitable for showing to the applicant: the server's own message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthenticated => "Please log in to continue.".to_string(),
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ApiError::Decode(value.to_string())
        } else {
            ApiError::Transport(value.to_string())
        }
    }
}

/// Pull a human readable message out of a JSON error body (`message`, `error`, then `detail`).
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error", "detail"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}
