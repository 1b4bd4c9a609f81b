//! Error handling for envset

pub mod parse;

pub use parse::{MalformedEntry, ParseError, UnclassifiedEntry};

use thiserror::Error;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum EnvError {
    /// Configuration errors (bad CLI input, invalid log settings, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A setting could not be declared as requested
    #[error("Declaration error: {0}")]
    Declaration(String),

    /// A setting with this name is already declared
    #[error("Setting {0:?} is already declared")]
    Duplicate(String),

    /// The environment did not satisfy the declared settings
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// I/O errors (writing output, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EnvError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new declaration error
    pub fn declaration<S: Into<String>>(message: S) -> Self {
        Self::Declaration(message.into())
    }

    /// Create a new duplicate-declaration error
    pub fn duplicate<S: Into<String>>(name: S) -> Self {
        Self::Duplicate(name.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Declaration(_) | Self::Duplicate(_) => "DECLARE",
            Self::Parse(_) => "ENV",
            Self::Io(_) => "IO",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Run with --help to see the accepted options.", msg)
            }
            Self::Declaration(msg) => {
                format!("Could not declare setting: {}\n\nSuggestion: Declarations use the form NAME=DEFAULT and the default must be valid for the setting's type.", msg)
            }
            Self::Duplicate(name) => {
                format!("Setting {:?} was declared twice.\n\nSuggestion: Give each setting a unique name.", name)
            }
            Self::Parse(report) => {
                format!("{}\n\nSuggestion: Fix every listed variable, then run again; all problems are reported at once.", report)
            }
            Self::Io(msg) => {
                format!("Output failed: {}\n\nSuggestion: Check that stdout and stderr are writable.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parse(_) => 1,  // Environment rejected
            Self::Config(_) | Self::Declaration(_) | Self::Duplicate(_) => 2,  // Invalid usage
            Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Parse(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Config(_) | Self::Declaration(_) | Self::Duplicate(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for EnvError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for EnvError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for EnvError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for envset
pub type Result<T> = std::result::Result<T, EnvError>;

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render an error the way `report_error` prints it
    pub fn render(&self, error: &EnvError) -> String {
        let mut out = error.format_for_console(self.use_color);
        if self.verbose {
            out.push_str("\n\n");
            out.push_str(&error.user_friendly_message());
        }
        out
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &EnvError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
