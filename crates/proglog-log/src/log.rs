//! Log implementation
//!
//! Provides an in-memory append-only log with gapless, sequential offsets.

use bytes::Bytes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::RecordLog;
use crate::error::LogError;
use crate::record::Record;

/// Configuration for a log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum number of records the log will accept (`None` = unbounded)
    pub max_records: Option<u64>,
}

impl LogConfig {
    /// Create an unbounded configuration
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Set the maximum number of records
    pub fn with_max_records(mut self, max_records: u64) -> Self {
        self.max_records = Some(max_records);
        self
    }
}

/// Append-only record log
///
/// Records are addressed by zero-based offsets. The offset of a record is
/// its index in the backing sequence, so the populated offsets are always
/// exactly `[0, len)`.
///
/// A single reader/writer lock guards the sequence. Appends hold the write
/// lock across reading the length and pushing the record, so no two appends
/// can be assigned the same offset and readers never see a length that
/// runs ahead of the stored records.
#[derive(Debug, Default)]
pub struct Log {
    /// Configuration
    config: LogConfig,
    /// Backing sequence; index == offset
    records: RwLock<Vec<Record>>,
}

impl Log {
    /// Create a new, empty, unbounded log
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new, empty log with the given configuration
    pub fn with_config(config: LogConfig) -> Self {
        debug!(max_records = ?config.max_records, "Creating log");
        Self {
            config,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Append a record, returning its assigned offset
    ///
    /// Any offset already set on `record` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::CapacityExceeded`] if the log is configured with
    /// `max_records` and is full. The log is left unchanged.
    pub fn append(&self, mut record: Record) -> Result<u64, LogError> {
        let mut records = self.records.write();
        let offset = records.len() as u64;

        if let Some(max_records) = self.config.max_records
            && offset >= max_records
        {
            debug!(max_records, "Rejecting append, log is full");
            return Err(LogError::CapacityExceeded { max_records });
        }

        record.offset = offset;
        records.push(record);

        trace!(offset, "Appended record");
        Ok(offset)
    }

    /// Append a raw payload, returning its assigned offset
    pub fn append_value(&self, value: impl Into<Bytes>) -> Result<u64, LogError> {
        self.append(Record::new(value))
    }

    /// Read the record stored at `offset`
    ///
    /// The returned record is a copy; it cannot be used to modify the log.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::OffsetNotFound`] if `offset >= len`.
    pub fn read(&self, offset: u64) -> Result<Record, LogError> {
        let records = self.records.read();
        let record = usize::try_from(offset)
            .ok()
            .and_then(|index| records.get(index))
            .cloned();

        match record {
            Some(record) => {
                trace!(offset, "Read record");
                Ok(record)
            }
            None => {
                trace!(offset, len = records.len(), "Offset not found");
                Err(LogError::OffsetNotFound(offset))
            }
        }
    }

    /// Number of records in the log
    pub fn len(&self) -> u64 {
        self.records.read().len() as u64
    }

    /// Whether the log holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// The offset the next successful append will receive
    pub fn next_offset(&self) -> u64 {
        self.len()
    }

    /// Get the configuration
    pub fn config(&self) -> &LogConfig {
        &self.config
    }
}

impl RecordLog for Log {
    fn append(&self, record: Record) -> Result<u64, LogError> {
        Log::append(self, record)
    }

    fn read(&self, offset: u64) -> Result<Record, LogError> {
        Log::read(self, offset)
    }
}
