//! Error types for proglog-server

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use proglog_log::LogError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors raised while configuring or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Config file could not be read or parsed
    #[error("config ({context}): {detail}")]
    Config {
        context: &'static str,
        detail: String,
    },

    /// Listener could not be bound
    #[error("bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error
    #[error("serve: {0}")]
    Serve(#[source] std::io::Error),
}

/// Errors returned by the HTTP handlers
///
/// Each variant maps to exactly one status code: malformed requests are a
/// client error, a missing offset is 404 and any other log failure is a
/// server error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be decoded
    #[error("{0}")]
    BadRequest(String),

    /// The log rejected the operation
    #[error(transparent)]
    Log(#[from] LogError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Log(LogError::OffsetNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Log(LogError::CapacityExceeded { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, format!("{}\n", self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let err = ApiError::BadRequest("expected value".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_offset_not_found_status() {
        let err = ApiError::from(LogError::OffsetNotFound(3));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "offset out of range: 3");
    }

    #[test]
    fn test_capacity_exceeded_status() {
        let err = ApiError::from(LogError::CapacityExceeded { max_records: 1 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_json_error_is_bad_request() {
        let json_err = serde_json::from_str::<u64>("-1").unwrap_err();
        let err = ApiError::from(json_err);
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_into_response_sets_status() {
        let response = ApiError::from(LogError::OffsetNotFound(0)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_config_error_message() {
        let err = ServerError::Config {
            context: "parse",
            detail: "'proglog.toml': bad key".into(),
        };
        assert_eq!(err.to_string(), "config (parse): 'proglog.toml': bad key");
    }
}
