//! Configuration validation utilities and rules

use crate::{
    config::run::RunConfig,
    error::{EnvError, Result},
};
use std::collections::HashSet;
use std::fmt;

/// Validation warning levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

/// Non-fatal finding about a run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new<S: Into<String>>(level: ValidationLevel, message: S) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            ValidationLevel::Info => "INFO",
            ValidationLevel::Warning => "WARNING",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// Checks a run configuration before any setting is declared
pub struct ConfigValidator;

impl ConfigValidator {
    /// Fail on duplicate names or unusable defaults; warn about the rest
    pub fn validate(config: &RunConfig) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        warnings.extend(Self::validate_prefix(&config.prefix));
        warnings.extend(Self::validate_declarations(config)?);
        Ok(warnings)
    }

    fn validate_prefix(prefix: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if prefix.is_empty() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "empty prefix matches every environment variable",
            ));
        } else if !prefix.ends_with('_') {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("prefix {:?} does not end with '_'; names will run together", prefix),
            ));
        }

        if prefix.chars().any(|c| c.is_ascii_lowercase()) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("prefix {:?} contains lowercase letters; matching is case-sensitive", prefix),
            ));
        }

        warnings
    }

    fn validate_declarations(config: &RunConfig) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for declaration in &config.declarations {
            if !seen.insert(declaration.name.as_str()) {
                return Err(EnvError::duplicate(declaration.name.clone()));
            }

            declaration.check_default()?;

            if declaration.name.is_empty() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!(
                        "empty {} setting name binds the bare prefix {:?}",
                        declaration.kind, config.prefix
                    ),
                ));
            } else if declaration.name.chars().any(|c| c.is_ascii_lowercase()) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!(
                        "setting {:?} contains lowercase letters; matching is case-sensitive",
                        declaration.name
                    ),
                ));
            }
        }

        Ok(warnings)
    }
}
