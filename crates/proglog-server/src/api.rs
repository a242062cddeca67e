//! Request and response bodies for the produce/consume API

use proglog_log::Record;
use serde::{Deserialize, Serialize};

/// Body of `POST /`: the record to append
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceRequest {
    pub record: Record,
}

/// Response to `POST /`: the offset the record was stored at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProduceResponse {
    pub offset: u64,
}

/// Body of `GET /`: the offset to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeRequest {
    pub offset: u64,
}

/// Response to `GET /`: the record stored at the requested offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeResponse {
    pub record: Record,
}
