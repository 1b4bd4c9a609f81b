//! Value types a setting can hold and how they read from raw strings

use super::duration::{format_duration, parse_duration};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a raw string could not be applied to a setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The string is not a valid spelling for the setting's type
    #[error("{0}")]
    Malformed(String),

    /// The string parsed, but the value was refused for domain reasons
    #[error("{0}")]
    Rejected(String),
}

impl ValueError {
    /// Create a new malformed-value error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::Malformed(message.into())
    }

    /// Create a new rejected-value error
    pub fn rejected<S: Into<String>>(message: S) -> Self {
        Self::Rejected(message.into())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Malformed(reason) | Self::Rejected(reason) => reason,
        }
    }
}

impl From<std::num::ParseIntError> for ValueError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::malformed(error.to_string())
    }
}

impl From<std::num::ParseFloatError> for ValueError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::malformed(error.to_string())
    }
}

impl From<std::net::AddrParseError> for ValueError {
    fn from(error: std::net::AddrParseError) -> Self {
        Self::malformed(error.to_string())
    }
}

// Custom parsers can bail with anyhow for domain-level refusals.
impl From<anyhow::Error> for ValueError {
    fn from(error: anyhow::Error) -> Self {
        Self::rejected(format!("{:#}", error))
    }
}

/// The kind of value a declared setting holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    String,
    Int,
    Bool,
    Duration,
    List,
    Custom,
}

impl SettingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Duration => "duration",
            Self::List => "list",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A built-in type that knows its own environment spelling.
pub trait EnvValue: Clone + Send + Sync + 'static {
    const KIND: SettingKind;

    fn parse_env(raw: &str) -> Result<Self, ValueError>;

    fn format_env(&self) -> String;
}

impl EnvValue for String {
    const KIND: SettingKind = SettingKind::String;

    fn parse_env(raw: &str) -> Result<Self, ValueError> {
        Ok(raw.to_string())
    }

    fn format_env(&self) -> String {
        self.clone()
    }
}

impl EnvValue for i64 {
    const KIND: SettingKind = SettingKind::Int;

    fn parse_env(raw: &str) -> Result<Self, ValueError> {
        raw.parse::<i64>()
            .map_err(|e| ValueError::malformed(format!("invalid integer {:?}: {}", raw, e)))
    }

    fn format_env(&self) -> String {
        self.to_string()
    }
}

impl EnvValue for bool {
    const KIND: SettingKind = SettingKind::Bool;

    fn parse_env(raw: &str) -> Result<Self, ValueError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ValueError::malformed(format!("invalid boolean {:?}", raw))),
        }
    }

    fn format_env(&self) -> String {
        self.to_string()
    }
}

impl EnvValue for Duration {
    const KIND: SettingKind = SettingKind::Duration;

    fn parse_env(raw: &str) -> Result<Self, ValueError> {
        parse_duration(raw)
    }

    fn format_env(&self) -> String {
        format_duration(*self)
    }
}

/// Comma-separated list; items are trimmed and empty items dropped.
impl EnvValue for Vec<String> {
    const KIND: SettingKind = SettingKind::List;

    fn parse_env(raw: &str) -> Result<Self, ValueError> {
        Ok(raw
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn format_env(&self) -> String {
        self.join(",")
    }
}

/// Open-ended setting value: anything that can be set from a string and
/// displayed back.
///
/// Implementors decide the classification of their own failures: return
/// [`ValueError::Malformed`] when the spelling is wrong and
/// [`ValueError::Rejected`] when the value is well-formed but unacceptable.
pub trait Value: fmt::Display + Send + Sync {
    fn set(&mut self, raw: &str) -> Result<(), ValueError>;
}
