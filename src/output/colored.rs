//! Colored formatter implementation with terminal color support

use super::formatter::{OutputFormatter, PlainFormatter};
use super::SettingRow;
use crate::{
    env::EnvSet,
    error::{ParseError, Result},
};
use colored::*;
use std::fmt::Write as _;

/// Colors used for each part of the report
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub key: Color,
    pub from_environment: Color,
    pub from_default: Color,
    pub problem: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            key: Color::White,
            from_environment: Color::Green,
            from_default: Color::BrightBlack,
            problem: Color::Red,
        }
    }
}

/// Console formatter: values that differ from their default are highlighted
#[derive(Debug, Clone, Default)]
pub struct ColoredFormatter {
    scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(scheme: ColorScheme) -> Self {
        Self { scheme }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_report(&self, env: &EnvSet, error: Option<&ParseError>) -> Result<String> {
        let rows = SettingRow::collect(env);
        let width = PlainFormatter::key_width(&rows);
        let mut out = String::new();

        writeln!(out, "{}", PlainFormatter::settings_header(env).color(self.scheme.header).bold()).ok();
        if rows.is_empty() {
            writeln!(out, "  {}", "(none declared)".color(self.scheme.from_default)).ok();
        }
        for row in &rows {
            let key = format!("{:<width$}", row.env_key, width = width);
            let kind = format!("{:<8}", row.kind.as_str());
            let value = if row.value != row.default {
                row.value.color(self.scheme.from_environment).bold()
            } else {
                row.value.color(self.scheme.from_default)
            };
            writeln!(out, "  {}  {}  {}", key.color(self.scheme.key), kind.dimmed(), value).ok();
        }

        if let Some(error) = error.filter(|error| error.is_error()) {
            let title = format!("Problems ({}):", error.len());
            writeln!(out, "\n{}", title.color(self.scheme.problem).bold()).ok();
            for (label, entries) in error.categories() {
                writeln!(out, "  {}:", label.color(self.scheme.problem)).ok();
                for entry in entries {
                    writeln!(out, "    {} {}", "\u{2717}".color(self.scheme.problem), entry).ok();
                }
            }
        }

        Ok(out)
    }

    fn format_usage(&self, env: &EnvSet) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "{}", "## Example Usage:".color(self.scheme.header).bold()).ok();
        env.store().visit_all(|info| {
            writeln!(out, "{}", format!("# {}", info.usage).dimmed()).ok();
            writeln!(
                out,
                "export {}{}={:?}",
                env.prefix(),
                info.name,
                info.default_value
            )
            .ok();
        });
        Ok(out)
    }
}
