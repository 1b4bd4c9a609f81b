//! Command-line interface for the envset binary

pub mod help;

pub use help::HelpSystem;

use clap::{ArgAction, Parser};

/// envset - check typed settings against the process environment
#[derive(Parser, Debug, Clone)]
#[command(name = "envset")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Environment variable prefix shared by every setting (e.g. APP_)
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Declare a string setting as NAME=DEFAULT (repeatable)
    #[arg(long = "string", value_name = "NAME=DEFAULT", action = ArgAction::Append)]
    pub strings: Vec<String>,

    /// Declare an integer setting as NAME=DEFAULT (repeatable)
    #[arg(long = "int", value_name = "NAME=DEFAULT", action = ArgAction::Append)]
    pub ints: Vec<String>,

    /// Declare a boolean setting as NAME=DEFAULT (repeatable)
    #[arg(long = "bool", value_name = "NAME=DEFAULT", action = ArgAction::Append)]
    pub bools: Vec<String>,

    /// Declare a duration setting as NAME=DEFAULT, e.g. TIMEOUT=1m30s (repeatable)
    #[arg(long = "duration", value_name = "NAME=DEFAULT", action = ArgAction::Append)]
    pub durations: Vec<String>,

    /// Declare a comma-separated list setting as NAME=DEFAULT (repeatable)
    #[arg(long = "list", value_name = "NAME=DEFAULT", action = ArgAction::Append)]
    pub lists: Vec<String>,

    /// Fail when a prefixed variable matches no declared setting
    #[arg(long)]
    pub error_on_extra_keys: bool,

    /// Fail when a declared setting has no matching variable
    #[arg(long)]
    pub error_on_missing_keys: bool,

    /// Keep defaults for malformed values instead of failing
    #[arg(long)]
    pub ignore_parse_errors: bool,

    /// Print example export lines for the declared settings and exit
    #[arg(long)]
    pub usage: bool,

    /// Emit machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, value_name = "LEVEL", env = "ENVSET_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log format (console, compact, json)
    #[arg(long, value_name = "FORMAT", env = "ENVSET_LOG_FORMAT", default_value = "console")]
    pub log_format: String,

    /// Show help for specific topic (types, policy, examples)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.help_topic.is_some() {
            return Ok(());
        }

        if self.prefix.is_none() {
            return Err("Must specify the environment prefix via --prefix".to_string());
        }

        if self.usage && self.declaration_count() == 0 {
            return Err("--usage needs at least one declared setting".to_string());
        }

        Ok(())
    }

    /// Total number of settings declared on the command line
    pub fn declaration_count(&self) -> usize {
        self.strings.len() + self.ints.len() + self.bools.len() + self.durations.len() + self.lists.len()
    }

    /// Check if help should be displayed for a specific topic
    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }
}
