#![deny(missing_docs)]
//! Shared logging utilities for the notifier workspace.
//!
//! This crate provides the `gem_*` logging macros used across the codebase,
//! the process logger used by the notifier binary (terminal plus an appending
//! log file, so fatal paths always leave a timestamped line behind) and a
//! minimal test initializer for the global logger.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Re-export of the `log` facade used by the `gem_*` macros.
#[doc(hidden)]
pub use log as __log;

/// Where and how verbosely the notifier logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Maximum level written to every destination.
    pub level: LevelFilter,
    /// Log file that is appended to across runs. `None` disables file output.
    pub log_file: Option<PathBuf>,
    /// Mirror log lines to the terminal.
    pub terminal: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            log_file: Some(PathBuf::from("gemstore.log")),
            terminal: true,
        }
    }
}

/// Installs the global logger described by `options`.
///
/// Returns `false` when no destination could be set up or a logger was
/// already installed.
pub fn initialize(options: &LogOptions) -> bool {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if options.terminal {
        loggers.push(TermLogger::new(
            options.level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if let Some(path) = options.log_file.as_deref() {
        if let Some(file_logger) = create_file_logger(path, options.level, config) {
            loggers.push(file_logger);
        }
    }
    if loggers.is_empty() {
        return false;
    }

    CombinedLogger::init(loggers).is_ok()
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", path, err);
            None
        }
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! gem_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! gem_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! gem_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! gem_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! gem_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
