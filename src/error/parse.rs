//! Aggregated result of one parse pass

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// An environment entry whose value did not parse for its setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedEntry {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// An environment entry whose setting refused it for some other reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnclassifiedEntry {
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.key, self.value, self.reason)
    }
}

impl fmt::Display for UnclassifiedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.key, self.value, self.reason)
    }
}

/// Every problem found while scanning the environment once.
///
/// Only categories enabled by the active [`Policy`](crate::Policy) are ever
/// populated, except `unclassified`, which is always recorded. Keys are the
/// full environment variable names, prefix included.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{}", self.render())]
pub struct ParseError {
    missing_keys: Vec<String>,
    extra_keys: Vec<String>,
    malformed: Vec<MalformedEntry>,
    unclassified: Vec<UnclassifiedEntry>,
}

impl ParseError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing_keys(&self) -> &[String] {
        &self.missing_keys
    }

    pub fn extra_keys(&self) -> &[String] {
        &self.extra_keys
    }

    pub fn malformed(&self) -> &[MalformedEntry] {
        &self.malformed
    }

    pub fn unclassified(&self) -> &[UnclassifiedEntry] {
        &self.unclassified
    }

    /// True when at least one category holds an entry
    pub fn is_error(&self) -> bool {
        self.len() > 0
    }

    /// Total number of recorded problems
    pub fn len(&self) -> usize {
        self.missing_keys.len() + self.extra_keys.len() + self.malformed.len() + self.unclassified.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_error()
    }

    /// `Err(self)` if anything was recorded, `Ok(())` otherwise
    pub fn into_result(self) -> Result<(), ParseError> {
        if self.is_error() {
            Err(self)
        } else {
            Ok(())
        }
    }

    pub(crate) fn push_missing(&mut self, key: String) {
        self.missing_keys.push(key);
    }

    pub(crate) fn push_extra(&mut self, key: String) {
        self.extra_keys.push(key);
    }

    pub(crate) fn push_malformed(&mut self, key: &str, value: &str, reason: String) {
        self.malformed.push(MalformedEntry {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        });
    }

    pub(crate) fn push_unclassified(&mut self, key: &str, value: &str, reason: String) {
        self.unclassified.push(UnclassifiedEntry {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        });
    }

    /// Summary line followed by one line per populated category
    fn render(&self) -> String {
        if !self.is_error() {
            return "no environment problems".to_string();
        }

        let mut out = format!("found {} environment problem(s)", self.len());
        for (label, lines) in self.categories() {
            out.push_str(&format!("\n  {}: {}", label, lines.join(", ")));
        }
        out
    }

    /// One `(label, lines)` pair per populated category, in display order
    pub fn categories(&self) -> Vec<(&'static str, Vec<String>)> {
        let mut categories = Vec::new();
        if !self.missing_keys.is_empty() {
            categories.push(("missing keys", self.missing_keys.clone()));
        }
        if !self.extra_keys.is_empty() {
            categories.push(("unexpected keys", self.extra_keys.clone()));
        }
        if !self.malformed.is_empty() {
            categories.push((
                "malformed values",
                self.malformed.iter().map(ToString::to_string).collect(),
            ));
        }
        if !self.unclassified.is_empty() {
            categories.push((
                "rejected values",
                self.unclassified.iter().map(ToString::to_string).collect(),
            ));
        }
        categories
    }
}
