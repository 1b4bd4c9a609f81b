//! Logging setup for the envset binary
//!
//! The library emits `tracing` events (bindings at debug, raw values at
//! trace, classified problems at warn). This module installs a subscriber
//! that writes them to stderr in one of three formats.

use crate::error::{EnvError, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - includes raw environment values
    Trace = 0,
    /// Debug level - every binding attempt
    Debug = 1,
    /// Info level - general information
    Info = 2,
    /// Warning level - classified environment problems
    Warn = 3,
    /// Error level - errors only
    Error = 4,
    /// Logging disabled
    Off = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Off => "OFF",
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "OFF" | "NONE" => Ok(LogLevel::Off),
            _ => Err(EnvError::config(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "console" | "pretty" => Ok(LogFormat::Console),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(EnvError::config(format!("Invalid log format: {}", s))),
        }
    }
}

/// Install the global subscriber; fails if one is already installed
pub fn init_logging(level: LogLevel, format: LogFormat, use_color: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level.to_level_filter())
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Console => builder.with_ansi(use_color).try_init(),
        LogFormat::Compact => builder.with_ansi(use_color).compact().try_init(),
        LogFormat::Json => builder.with_ansi(false).json().try_init(),
    };

    installed.map_err(|e| EnvError::internal(format!("failed to install log subscriber: {}", e)))
}
