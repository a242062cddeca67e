//! # Proglog Log
//!
//! In-memory, append-only record log.
//!
//! Producers append opaque records and receive the offset each record was
//! stored at; consumers read a record back by offset. Offsets start at zero
//! and are assigned without gaps, so after `N` appends exactly the offsets
//! `[0, N)` are readable.
//!
//! ## Features
//!
//! - **Log**: thread-safe in-memory log guarded by a single reader/writer lock
//! - **RecordLog trait**: the two-call contract (`append`/`read`) consumed by
//!   the transport layer, so logs can be injected as `Arc<dyn RecordLog>`
//! - **LogConfig**: optional capacity bound (`max_records`)
//! - **LogError**: tagged error kinds for exhaustive matching
//!
//! ## Example
//!
//! ```rust
//! use proglog_log::{Log, LogError, Record};
//!
//! let log = Log::new();
//!
//! assert_eq!(log.append(Record::new("hello")).unwrap(), 0);
//! assert_eq!(log.append(Record::new("world")).unwrap(), 1);
//!
//! assert_eq!(log.read(1).unwrap().value, "world");
//! assert_eq!(log.read(2), Err(LogError::OffsetNotFound(2)));
//! ```

pub mod error;
pub mod log;
pub mod record;

// Re-exports
pub use error::LogError;
pub use log::{Log, LogConfig};
pub use record::Record;

/// The append/read contract between a log and its callers
///
/// Implementations must assign offsets sequentially starting at zero and
/// must be safe to call from many threads at once.
pub trait RecordLog: Send + Sync {
    /// Append a record and return the offset it was stored at
    ///
    /// The offset carried by `record` is ignored.
    fn append(&self, record: Record) -> Result<u64, LogError>;

    /// Read the record stored at `offset`
    ///
    /// Fails with [`LogError::OffsetNotFound`] when `offset` has not been
    /// assigned yet.
    fn read(&self, offset: u64) -> Result<Record, LogError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    /// Test that the RecordLog trait is object-safe
    fn _assert_object_safe(_: &dyn RecordLog) {}

    #[test]
    fn test_log_through_trait_object() {
        let log: Arc<dyn RecordLog> = Arc::new(Log::new());

        assert_eq!(log.append(Record::new("hello")).unwrap(), 0);
        assert_eq!(log.append(Record::new("world")).unwrap(), 1);

        assert_eq!(log.read(0).unwrap().value, "hello");
        assert_eq!(log.read(1).unwrap().value, "world");
        assert!(log.read(2).unwrap_err().is_not_found());
    }

    #[test]
    fn test_independent_logs() {
        let first = Log::new();
        let second = Log::new();

        first.append_value("only in first").unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert!(second.read(0).is_err());
    }
}
