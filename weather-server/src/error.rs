//! Unified server error type.
//!
//! Handlers return `Result<T, ServerError>`. Client errors expose their
//! message; storage and upstream failures are logged in full and answered
//! with a generic body so paths and provider details never reach the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use weather_widget_core::{StoreError, UpstreamError};

#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller sent an invalid or incomplete request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The location file couldn't be read or written. `context` is the
    /// message returned to the client.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },

    /// Any other failure behind a generic body, e.g. coordinates the
    /// provider could never answer for.
    #[error("{context}: {message}")]
    Internal {
        context: &'static str,
        message: String,
    },
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Storage { context, source } => {
                error!(error = %source, cause = ?source, "{context}");
                (StatusCode::INTERNAL_SERVER_ERROR, (*context).to_owned())
            }
            ServerError::Upstream { context, source } => {
                error!(error = %source, status = ?source.status(), "{context}");
                (StatusCode::INTERNAL_SERVER_ERROR, (*context).to_owned())
            }
            ServerError::Internal { context, message } => {
                error!(detail = %message, "{context}");
                (StatusCode::INTERNAL_SERVER_ERROR, (*context).to_owned())
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_exposes_message() {
        let res = ServerError::BadRequest("Missing required fields: city".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_error_is_internal() {
        let res = ServerError::Storage {
            context: "Error fetching location data",
            source: StoreError::Missing { path: "/nope/location.json".into() },
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_error_is_generic_500() {
        let res = ServerError::Internal {
            context: "Error fetching weather data",
            message: "invalid `lat` parameter: north".into(),
        }
        .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
