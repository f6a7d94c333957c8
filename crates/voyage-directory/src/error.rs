//! Directory-specific error types.

use thiserror::Error;
use voyage_core::{NetworkError, ReqwestErrorExt};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        DirectoryError::Network(err.into_network_error())
    }
}

impl DirectoryError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Nothing matched that request.",
            Self::Api { status, .. } if *status >= 500 => {
                "The travel directory is having issues. Please try again later."
            }
            Self::Api { .. } => "The search request was rejected.",
            Self::Parse(_) => "Received an unexpected response. Please try again.",
            Self::InvalidUrl(_) => "The travel directory address is misconfigured.",
            Self::Network(e) => e.user_message(),
        }
    }
}
