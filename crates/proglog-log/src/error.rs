//! Error types for proglog-log
//!
//! The log defines a small, closed set of failure conditions so that
//! callers (the HTTP transport in particular) can match on them exhaustively.

use thiserror::Error;

/// Errors that can occur in log operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    /// The requested offset lies outside the populated range `[0, len)`
    #[error("offset out of range: {0}")]
    OffsetNotFound(u64),

    /// The log has reached its configured maximum number of records
    #[error("log capacity exceeded ({max_records} records)")]
    CapacityExceeded {
        /// The configured bound that was hit
        max_records: u64,
    },
}

impl LogError {
    /// Create a new OffsetNotFound error
    pub fn offset_not_found(offset: u64) -> Self {
        Self::OffsetNotFound(offset)
    }

    /// Whether this error reports a missing offset
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OffsetNotFound(_))
    }
}
