//! envset - Main CLI Application
//!
//! Declares settings from the command line, parses the process environment
//! against them and reports the resolved values or every problem found.

use clap::Parser;
use envset::{
    build_info,
    cli::{Cli, HelpSystem},
    config::{display_config_summary, load_config},
    error::{EnvError, ErrorReporter, Result},
    logging::{init_logging, LogFormat, LogLevel},
    output::OutputFormatterFactory,
};
use std::io::Write;
use std::process;

fn main() {
    let cli = Cli::parse();
    let reporter = ErrorReporter::new(!cli.no_color && !cli.json, cli.verbose);
    let json = cli.json;

    if let Err(e) = run_application(cli) {
        // JSON runs already carry the parse problems in their output document
        if !(json && matches!(e, EnvError::Parse(_))) {
            reporter.report_error(&e);
        }
        process::exit(e.exit_code());
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    if let Some(topic) = cli.help_topic.as_deref() {
        let help = HelpSystem::new();
        let text = help
            .display_topic_help(topic, !cli.no_color)
            .ok_or_else(|| EnvError::config(help.unknown_topic(topic)))?;
        println!("{}", text);
        return Ok(());
    }

    // Logging comes up before the config is validated so its warnings are visible
    let level: LogLevel = cli.log_level.parse()?;
    let format: LogFormat = cli.log_format.parse()?;
    init_logging(level, format, !cli.no_color)?;

    let config = load_config(cli)?;

    if config.verbose && !config.json {
        println!("{}", build_info::describe());
        println!("{}", display_config_summary(&config));
        println!();
    }

    let mut env = config.build_env_set()?;
    let formatter = OutputFormatterFactory::create_formatter(config.json, config.enable_color);
    let mut stdout = std::io::stdout().lock();

    if config.show_usage {
        stdout.write_all(formatter.format_usage(&env)?.as_bytes())?;
        return Ok(());
    }

    let outcome = env.parse();
    stdout.write_all(formatter.format_report(&env, outcome.as_ref().err())?.as_bytes())?;
    stdout.flush()?;

    if let Err(report) = outcome {
        if !report.extra_keys().is_empty() && !config.json {
            eprint!("\n{}", env.usage());
        }
        return Err(report.into());
    }

    Ok(())
}
