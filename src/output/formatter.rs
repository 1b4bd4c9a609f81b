//! Output formatter trait and the plain-text implementation

use super::SettingRow;
use crate::{
    env::EnvSet,
    error::{ParseError, Result},
};
use std::fmt::Write as _;

/// Renders the result of a run for the console or for scripts
pub trait OutputFormatter {
    /// Resolved settings, followed by any problems the parse found
    fn format_report(&self, env: &EnvSet, error: Option<&ParseError>) -> Result<String>;

    /// Example exports for every declared setting
    fn format_usage(&self, env: &EnvSet) -> Result<String>;
}

/// Plain text formatter for scripts and logs
#[derive(Debug, Clone, Default)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn key_width(rows: &[SettingRow]) -> usize {
        rows.iter().map(|row| row.env_key.len()).max().unwrap_or(0)
    }

    pub(crate) fn settings_header(env: &EnvSet) -> String {
        format!("Settings (prefix {:?}):", env.prefix())
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_report(&self, env: &EnvSet, error: Option<&ParseError>) -> Result<String> {
        let rows = SettingRow::collect(env);
        let width = Self::key_width(&rows);
        let mut out = String::new();

        writeln!(out, "{}", Self::settings_header(env)).ok();
        if rows.is_empty() {
            writeln!(out, "  (none declared)").ok();
        }
        for row in &rows {
            write!(out, "  {:<width$}  {:<8}  {}", row.env_key, row.kind.as_str(), row.value, width = width).ok();
            if row.value != row.default {
                write!(out, "  (default {})", row.default).ok();
            }
            out.push('\n');
        }

        if let Some(error) = error.filter(|error| error.is_error()) {
            writeln!(out, "\nProblems ({}):", error.len()).ok();
            for (label, entries) in error.categories() {
                writeln!(out, "  {}:", label).ok();
                for entry in entries {
                    writeln!(out, "    - {}", entry).ok();
                }
            }
        }

        Ok(out)
    }

    fn format_usage(&self, env: &EnvSet) -> Result<String> {
        Ok(env.usage())
    }
}
