//! Run configuration for the envset binary

use crate::{
    env::EnvSet,
    error::{EnvError, Result},
    logging::{LogFormat, LogLevel},
    policy::Policy,
    store::{EnvValue, SettingKind},
};
use serde::Serialize;
use std::time::Duration;

/// One setting declared on the command line as `NAME=DEFAULT`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub kind: SettingKind,
    pub name: String,
    pub default: String,
}

impl Declaration {
    /// Parse a `NAME=DEFAULT` argument; the default may itself contain `=`
    pub fn parse_arg(kind: SettingKind, arg: &str) -> Result<Self> {
        let (name, default) = arg.split_once('=').ok_or_else(|| {
            EnvError::declaration(format!(
                "expected NAME=DEFAULT for {} setting, got {:?}",
                kind, arg
            ))
        })?;

        Ok(Self {
            kind,
            name: name.to_string(),
            default: default.to_string(),
        })
    }

    fn usage(&self) -> String {
        format!("{} setting", self.kind)
    }

    /// Declare this setting on `env`, checking the default parses for its kind
    pub fn declare_on(&self, env: &mut EnvSet) -> Result<()> {
        match self.kind {
            SettingKind::String => self.declare_typed::<String>(env),
            SettingKind::Int => self.declare_typed::<i64>(env),
            SettingKind::Bool => self.declare_typed::<bool>(env),
            SettingKind::Duration => self.declare_typed::<Duration>(env),
            SettingKind::List => self.declare_typed::<Vec<String>>(env),
            SettingKind::Custom => Err(EnvError::declaration(format!(
                "{}: custom settings cannot be declared from the command line",
                self.name
            ))),
        }
    }

    /// Check the default without declaring anything
    pub fn check_default(&self) -> Result<()> {
        let checked = match self.kind {
            SettingKind::String => String::parse_env(&self.default).map(drop),
            SettingKind::Int => i64::parse_env(&self.default).map(drop),
            SettingKind::Bool => bool::parse_env(&self.default).map(drop),
            SettingKind::Duration => Duration::parse_env(&self.default).map(drop),
            SettingKind::List => Vec::<String>::parse_env(&self.default).map(drop),
            SettingKind::Custom => Ok(()),
        };
        checked.map_err(|e| {
            EnvError::declaration(format!(
                "default for {} is not a valid {}: {}",
                self.name, self.kind, e
            ))
        })
    }

    fn declare_typed<T: EnvValue>(&self, env: &mut EnvSet) -> Result<()> {
        let default = T::parse_env(&self.default).map_err(|e| {
            EnvError::declaration(format!(
                "default for {} is not a valid {}: {}",
                self.name,
                T::KIND,
                e
            ))
        })?;
        env.declare::<T>(&self.name, default, &self.usage())?;
        Ok(())
    }
}

/// Everything the binary needs for one run
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub prefix: String,
    pub error_on_extra_keys: bool,
    pub error_on_missing_keys: bool,
    pub error_on_parse_errors: bool,
    pub declarations: Vec<Declaration>,
    pub show_usage: bool,
    pub json: bool,
    pub enable_color: bool,
    pub verbose: bool,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl RunConfig {
    pub fn policy(&self) -> Policy {
        Policy::new(self.prefix.clone())
            .with_extra_keys_error(self.error_on_extra_keys)
            .with_missing_keys_error(self.error_on_missing_keys)
            .with_parse_errors(self.error_on_parse_errors)
    }

    /// Build an [`EnvSet`] with every declaration applied
    pub fn build_env_set(&self) -> Result<EnvSet> {
        let mut env = EnvSet::new(self.policy());
        for declaration in &self.declarations {
            declaration.declare_on(&mut env)?;
        }
        Ok(env)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            error_on_extra_keys: false,
            error_on_missing_keys: false,
            error_on_parse_errors: true,
            declarations: Vec::new(),
            show_usage: false,
            json: false,
            enable_color: true,
            verbose: false,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Console,
        }
    }
}
