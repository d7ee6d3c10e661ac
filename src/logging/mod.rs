//! Logging System for Campus Compass
//!
//! Structured logs through `tracing`, written to the console, to a rolling
//! file, or both, as text or JSON.

mod config;


pub use config::{default_log_directory, FileRotation, LogFormat, LogLevel, LogOutput, LoggingConfig};

use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Logging system errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to initialize logging: {reason}")]
    Initialization { reason: String },

    #[error("Failed to create log directory: {reason}")]
    DirectoryCreation { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for logging operations
pub type LoggingResult<T> = Result<T, LoggingError>;

/// Installed global subscriber; dropping it flushes and stops file output
pub struct LoggingSystem {
    config: LoggingConfig,
    _guards: Vec<WorkerGuard>,
}

impl LoggingSystem {
    /// Install the global subscriber for `config`
    ///
    /// Fails if a global subscriber is already installed.
    pub fn init(config: LoggingConfig) -> LoggingResult<Self> {
        let env_filter = Self::build_env_filter(&config)?;

        if config.writes_files() {
            let log_dir = Self::resolve_log_directory(&config);
            std::fs::create_dir_all(&log_dir).map_err(|e| LoggingError::DirectoryCreation {
                reason: format!("Failed to create log directory {:?}: {}", log_dir, e),
            })?;
        }

        let mut guards = Vec::new();
        let registry = tracing_subscriber::registry();

        match config.output {
            LogOutput::Console => {
                registry
                    .with(env_filter)
                    .with(Self::create_console_layer(&config))
                    .try_init()
                    .map_err(|e| LoggingError::Initialization { reason: e.to_string() })?;
            }
            LogOutput::File => {
                let (file_layer, guard) = Self::create_file_layer(&config);
                guards.push(guard);
                registry
                    .with(env_filter)
                    .with(file_layer)
                    .try_init()
                    .map_err(|e| LoggingError::Initialization { reason: e.to_string() })?;
            }
            LogOutput::Both => {
                let (file_layer, guard) = Self::create_file_layer(&config);
                guards.push(guard);
                registry
                    .with(env_filter)
                    .with(Self::create_console_layer(&config))
                    .with(file_layer)
                    .try_init()
                    .map_err(|e| LoggingError::Initialization { reason: e.to_string() })?;
            }
        }

        Ok(Self {
            config,
            _guards: guards,
        })
    }

    /// Build environment filter from configuration
    ///
    /// A module level whose target is not a module path is rejected rather
    /// than silently dropped.
    pub fn build_env_filter(config: &LoggingConfig) -> LoggingResult<EnvFilter> {
        if config.respect_rust_log {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
        }

        let mut filter = EnvFilter::new(config.level.as_str());
        for (module, level) in &config.module_levels {
            if !is_module_path(module) {
                return Err(LoggingError::Initialization {
                    reason: format!("Invalid log target {:?}", module),
                });
            }
            let directive = format!("{}={}", module, level)
                .parse::<Directive>()
                .map_err(|e| LoggingError::Initialization {
                    reason: format!("Invalid log directive for {:?}: {}", module, e),
                })?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    fn resolve_log_directory(config: &LoggingConfig) -> PathBuf {
        config
            .log_directory
            .clone()
            .unwrap_or_else(default_log_directory)
    }

    /// Create console logging layer
    fn create_console_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_id)
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info);

        if config.format == LogFormat::Json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }

    /// Create file logging layer with rotation
    fn create_file_layer<S>(config: &LoggingConfig) -> (Box<dyn Layer<S> + Send + Sync>, WorkerGuard)
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        let log_dir = Self::resolve_log_directory(config);
        let rotation = match config.rotation {
            FileRotation::Hourly => Rotation::HOURLY,
            FileRotation::Daily => Rotation::DAILY,
            FileRotation::Never => Rotation::NEVER,
        };

        let file_appender = RollingFileAppender::new(rotation, &log_dir, &config.file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_id)
            .with_file(config.include_file_info)
            .with_line_number(config.include_file_info)
            .with_ansi(false);

        if config.format == LogFormat::Json {
            (layer.json().boxed(), guard)
        } else {
            (layer.boxed(), guard)
        }
    }

    /// Get current log directory, if files are written
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.config
            .writes_files()
            .then(|| Self::resolve_log_directory(&self.config))
    }

    /// Get current log level
    pub fn log_level(&self) -> LogLevel {
        self.config.level
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.config
    }
}

/// `crate::module` style target: word characters, `-` and `::` separators
fn is_module_path(target: &str) -> bool {
    !target.is_empty()
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'))
}
