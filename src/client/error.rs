//! Errors returned by the lists API

use serde::Deserialize;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure of a remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` comes from the response body
    #[error("{message}")]
    Remote { status: u16, message: String },
    /// The request never produced a response
    #[error("{0}")]
    Transport(String),
    /// 2xx response that did not carry the expected data
    #[error("response did not include the {0}")]
    Incomplete(&'static str),
}

/// Error body shapes the API is known to send
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        ApiError::Remote {
            status,
            message: message.into(),
        }
    }

    /// Build an error from a non-2xx status and its raw body
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty() && text.len() <= 200 && !text.starts_with('<')).then_some(text)
            })
            .unwrap_or_else(|| default_message(status));

        ApiError::Remote { status, message }
    }

    /// HTTP status, `0` when no response was received
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Remote { status, .. } => *status,
            ApiError::Incomplete(_) => 200,
            ApiError::Transport(_) => 0,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

fn default_message(status: u16) -> String {
    match status {
        400 => "Bad request".to_string(),
        401 => "You must be signed in".to_string(),
        403 => "You are not allowed to do that".to_string(),
        404 => "Not found".to_string(),
        _ => format!("Request failed with status {}", status),
    }
}
