use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures of the location store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was absent or empty in a write payload.
    #[error("missing required field `{0}`")]
    Validation(&'static str),

    #[error("no location file at {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read location file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write location file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("location file {} is malformed", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize location record")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// Failures talking to a third-party provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to send request to {provider}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status. `body` is truncated
    /// and only meant for logs.
    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {provider} response")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider} response is missing {what}")]
    Shape {
        provider: &'static str,
        what: &'static str,
    },
}

impl UpstreamError {
    /// Status code returned by the provider, when the failure was a status error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
