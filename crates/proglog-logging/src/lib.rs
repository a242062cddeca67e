//! Structured logging setup for proglog
//!
//! This crate wires the `tracing` ecosystem together for the proglog
//! binaries. Library crates only emit events through `tracing` macros;
//! binaries pick a [`LoggingConfig`] and install a subscriber once at
//! startup.
//!
//! # Features
//!
//! - **JSONL Output**: Structured JSON lines on the console (default)
//! - **Pretty Output**: Human-readable console output for development
//! - **File Output**: Daily/hourly/never rotation via tracing-appender
//! - **RUST_LOG**: Environment filter overrides the configured default level
//!
//! # Quick Start
//!
//! ```ignore
//! use proglog_logging::{LoggingConfig, ProglogSubscriberBuilder};
//!
//! // JSONL to console
//! let _guard = ProglogSubscriberBuilder::new().try_init()?;
//!
//! // Development mode with pretty human-readable output
//! let _guard = ProglogSubscriberBuilder::new()
//!     .with_config(LoggingConfig::development())
//!     .try_init()?;
//! ```

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LoggingConfig, RotationStrategy};
pub use tracing_appender::non_blocking::WorkerGuard;

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors that can occur while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log directory or file could not be created
    #[error("log file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rolling file appender could not be created
    #[error("log file appender error: {0}")]
    Appender(#[from] InitError),

    /// A global subscriber was already installed
    #[error("subscriber already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Builder for configuring and initializing the proglog logging subscriber
///
/// By default, console output uses JSONL format. Use
/// [`LoggingConfig::development`] for pretty output during development.
pub struct ProglogSubscriberBuilder {
    config: LoggingConfig,
}

impl ProglogSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LoggingConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LoggingConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Switch the console between pretty and JSONL output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.config.console.pretty = pretty;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// Install the subscriber globally
    ///
    /// When file output is configured, the returned guard must be kept
    /// alive for as long as logs should be flushed to disk.
    ///
    /// # Errors
    ///
    /// Fails if the log file cannot be opened or a global subscriber has
    /// already been set.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let (file_writer, guard) = match &self.config.file {
            Some(file_config) => {
                let (writer, guard) = create_file_writer(file_config)?;
                (Some(writer), Some(guard))
            }
            None => (None, None),
        };

        let console = &self.config.console;
        let jsonl = &self.config.jsonl;

        let pretty_console = (console.enabled && console.pretty)
            .then(|| fmt::layer().with_ansi(console.ansi).with_target(true));

        let jsonl_console = (console.enabled && !console.pretty).then(|| {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(jsonl.include_spans)
                .flatten_event(jsonl.flatten_events)
                .with_file(jsonl.include_location)
                .with_line_number(jsonl.include_location)
        });

        let file_layer = file_writer.map(|writer| {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(jsonl.include_spans)
                .flatten_event(jsonl.flatten_events)
                .with_file(jsonl.include_location)
                .with_line_number(jsonl.include_location)
                .with_writer(writer)
        });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(pretty_console)
            .with(jsonl_console)
            .with(file_layer)
            .try_init()?;

        tracing::debug!(
            level = %self.config.default_level,
            pretty = console.pretty,
            file = self.config.file.is_some(),
            "Logging initialized"
        );
        Ok(guard)
    }
}

impl Default for ProglogSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the non-blocking file writer for `file_config`
///
/// `Never` truncates a single `<prefix>.log`; the other strategies append
/// to rolling files named after the prefix.
fn create_file_writer(file_config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    let rotation = match file_config.rotation {
        RotationStrategy::Never => {
            fs::create_dir_all(&file_config.directory)?;
            let file_path = file_config
                .directory
                .join(format!("{}.log", file_config.prefix));
            let file = File::create(&file_path)?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&file_config.prefix)
        .build(&file_config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Initialize logging for testing (minimal output)
///
/// Safe to call from many tests; only the first call installs a subscriber.
pub fn init_testing() {
    let _ = ProglogSubscriberBuilder::new()
        .with_config(LoggingConfig::testing())
        .try_init();
}
