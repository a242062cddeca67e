//! # Proglog Server
//!
//! HTTP transport for the proglog record log.
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | `POST` | `/` | `{"record": {"value": "<base64>"}}` | `{"offset": n}` |
//! | `GET` | `/` | `{"offset": n}` | `{"record": {"value": "<base64>", "offset": n}}` |
//!
//! Undecodable bodies are answered with `400`, unknown offsets with `404`
//! and any other log failure with `500`.
//!
//! The log is injected as an `Arc<dyn RecordLog>`, so each server (and each
//! test) owns an independent log.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use proglog_log::Log;
//! use proglog_server::{LogServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), proglog_server::ServerError> {
//!     let config = ServerConfig::default();
//!     let log = Arc::new(Log::with_config(config.log.clone()));
//!     LogServer::new(log, config).run().await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod http;

// Re-exports
pub use api::{ConsumeRequest, ConsumeResponse, ProduceRequest, ProduceResponse};
pub use config::{Cli, ServerConfig};
pub use error::{ApiError, ServerError};
pub use handlers::AppState;
pub use http::{LogServer, router};
