//! Building the run configuration from CLI arguments

use crate::{
    cli::Cli,
    config::{
        run::{Declaration, RunConfig},
        validation::{ConfigValidator, ValidationLevel},
    },
    error::{EnvError, Result},
    store::SettingKind,
};
use tracing::{info, warn};

/// Turns parsed CLI arguments into a validated [`RunConfig`]
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<RunConfig> {
        self.cli.validate().map_err(EnvError::config)?;

        let config = RunConfig {
            prefix: self.cli.prefix.clone().unwrap_or_default(),
            error_on_extra_keys: self.cli.error_on_extra_keys,
            error_on_missing_keys: self.cli.error_on_missing_keys,
            error_on_parse_errors: !self.cli.ignore_parse_errors,
            declarations: self.collect_declarations()?,
            show_usage: self.cli.usage,
            json: self.cli.json,
            enable_color: !self.cli.no_color && !self.cli.json,
            verbose: self.cli.verbose,
            log_level: self.cli.log_level.parse()?,
            log_format: self.cli.log_format.parse()?,
        };

        for warning in ConfigValidator::validate(&config)? {
            match warning.level {
                ValidationLevel::Warning => warn!("{}", warning.message),
                ValidationLevel::Info => info!("{}", warning.message),
            }
        }

        Ok(config)
    }

    /// Declarations in flag order, grouped by kind
    fn collect_declarations(&self) -> Result<Vec<Declaration>> {
        let groups = [
            (SettingKind::String, &self.cli.strings),
            (SettingKind::Int, &self.cli.ints),
            (SettingKind::Bool, &self.cli.bools),
            (SettingKind::Duration, &self.cli.durations),
            (SettingKind::List, &self.cli.lists),
        ];

        let mut declarations = Vec::with_capacity(self.cli.declaration_count());
        for (kind, args) in groups {
            for arg in args {
                declarations.push(Declaration::parse_arg(kind, arg)?);
            }
        }
        Ok(declarations)
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<RunConfig> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for verbose output
pub fn display_config_summary(config: &RunConfig) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Prefix: {:?}", config.prefix));
    summary.push(format!("Settings: {}", config.declarations.len()));
    summary.push(format!("Error on extra keys: {}", config.error_on_extra_keys));
    summary.push(format!("Error on missing keys: {}", config.error_on_missing_keys));
    summary.push(format!("Error on parse errors: {}", config.error_on_parse_errors));

    summary.join("\n")
}
