//! JSON formatter for machine consumers

use super::formatter::OutputFormatter;
use super::SettingRow;
use crate::{
    env::EnvSet,
    error::{ParseError, Result},
};
use serde::Serialize;

#[derive(Serialize)]
struct Report<'a> {
    prefix: &'a str,
    ok: bool,
    settings: Vec<SettingRow>,
    error: Option<&'a ParseError>,
}

#[derive(Serialize)]
struct Usage<'a> {
    prefix: &'a str,
    settings: Vec<SettingRow>,
}

/// Pretty-printed JSON documents, one per run
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, env: &EnvSet, error: Option<&ParseError>) -> Result<String> {
        let error = error.filter(|error| error.is_error());
        let report = Report {
            prefix: env.prefix(),
            ok: error.is_none(),
            settings: SettingRow::collect(env),
            error,
        };
        Ok(serde_json::to_string_pretty(&report)? + "\n")
    }

    fn format_usage(&self, env: &EnvSet) -> Result<String> {
        let usage = Usage {
            prefix: env.prefix(),
            settings: SettingRow::collect(env),
        };
        Ok(serde_json::to_string_pretty(&usage)? + "\n")
    }
}
