//! Record type stored in the log

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single entry in the log
///
/// The payload is opaque to the log. On the wire it is carried as a
/// standard base64 string so that arbitrary bytes survive JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The record payload
    #[serde(with = "base64_value")]
    pub value: Bytes,
    /// Position in the log, assigned on append
    #[serde(default)]
    pub offset: u64,
}

impl Record {
    /// Create a record that has not been appended yet
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self {
            value: value.into(),
            offset: 0,
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

mod base64_value {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(de::Error::custom)
    }
}
