//! Output formatting and display system
//!
//! Renders resolved settings, parse problems and usage listings as plain
//! text, colored text or JSON.

mod colored;
mod formatter;
mod json;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{OutputFormatter, PlainFormatter};
pub use json::JsonFormatter;

use crate::{env::EnvSet, store::SettingKind};
use serde::Serialize;

/// Owned snapshot of one declared setting, in display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingRow {
    pub env_key: String,
    pub name: String,
    pub kind: SettingKind,
    pub value: String,
    pub default: String,
    pub usage: String,
}

impl SettingRow {
    /// One row per declared setting, sorted by name
    pub fn collect(env: &EnvSet) -> Vec<SettingRow> {
        let mut rows = Vec::with_capacity(env.store().len());
        env.store().visit_all(|info| {
            rows.push(SettingRow {
                env_key: env.policy().env_key(info.name),
                name: info.name.to_string(),
                kind: info.kind,
                value: info.current_value,
                default: info.default_value.to_string(),
                usage: info.usage.to_string(),
            });
        });
        rows
    }
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on output mode and color support
    pub fn create_formatter(json: bool, enable_color: bool) -> Box<dyn OutputFormatter> {
        if json {
            Box::new(JsonFormatter::new())
        } else if enable_color {
            Box::new(ColoredFormatter::new())
        } else {
            Box::new(PlainFormatter::new())
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;

    #[test]
    fn test_collect_rows() {
        let mut env = EnvSet::new(Policy::new("APP_"));
        env.int("PORT", 8080, "listen port").unwrap();
        env.parse_from(&["APP_PORT=1"]).unwrap();

        let rows = SettingRow::collect(&env);
        assert_eq!(
            rows,
            vec![SettingRow {
                env_key: "APP_PORT".to_string(),
                name: "PORT".to_string(),
                kind: SettingKind::Int,
                value: "1".to_string(),
                default: "8080".to_string(),
                usage: "listen port".to_string(),
            }]
        );
    }

    #[test]
    fn test_factory_picks_plain_without_color() {
        let mut env = EnvSet::new(Policy::new("APP_"));
        env.int("PORT", 8080, "").unwrap();

        let plain = OutputFormatterFactory::create_plain_formatter()
            .format_report(&env, None)
            .unwrap();
        assert!(!plain.contains('\u{1b}'));

        let json = OutputFormatterFactory::create_formatter(true, true)
            .format_report(&env, None)
            .unwrap();
        assert!(json.trim_start().starts_with('{'));
    }
}
