//! Unified error types for revisit.
//!
//! Messages carry a stable code prefix so that callers of the host can
//! match on them without parsing free text.

use std::time::Duration;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the revisit core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., unusable history path).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The history source could not be queried.
    #[error("HISTORY_ERROR: {0}")]
    History(String),

    /// The history source did not answer in time.
    #[error("HISTORY_TIMEOUT: no answer after {}ms", .0.as_millis())]
    HistoryTimeout(Duration),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A persisted value could not be encoded or decoded.
    #[error("STORE_ERROR: invalid value: {0}")]
    InvalidValue(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidValue(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::History(msg) => (-32001, msg.clone()),
            Error::HistoryTimeout(_) => (-32001, err.to_string()),
            Error::Database(e) => (-32002, e.to_string()),
            Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::InvalidValue(msg) => (-32002, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::History("locked".to_string());
        assert!(err.to_string().contains("HISTORY_ERROR"));
        assert!(err.to_string().contains("locked"));
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::HistoryTimeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "HISTORY_TIMEOUT: no answer after 1500ms");
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("empty domain".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_serde_error_maps_to_invalid_value() {
        let err: Error = serde_json::from_str::<Vec<String>>("{").unwrap_err().into();
        assert!(matches!(err, Error::InvalidValue(_)));
    }
}
