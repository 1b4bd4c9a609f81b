//! Settings policy: which environment variables belong to us and which
//! problems are worth failing a parse over.

use serde::Serialize;
use std::path::Path;

/// Immutable parse policy, fixed when the [`EnvSet`](crate::EnvSet) is built.
///
/// Matching against `prefix` is an exact, case-sensitive byte prefix. An
/// empty prefix matches every variable in the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    prefix: String,
    error_on_extra_keys: bool,
    error_on_missing_keys: bool,
    error_on_parse_errors: bool,
}

impl Policy {
    /// Policy for `prefix`, reporting malformed values but tolerating
    /// unknown and missing keys
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            error_on_extra_keys: false,
            error_on_missing_keys: false,
            error_on_parse_errors: true,
        }
    }

    /// Policy whose prefix is derived from a program path: `/usr/bin/my-app`
    /// becomes `MY-APP_`.
    pub fn for_program(program: &str) -> Self {
        Self::new(program_prefix(program))
    }

    pub fn with_extra_keys_error(mut self, enabled: bool) -> Self {
        self.error_on_extra_keys = enabled;
        self
    }

    pub fn with_missing_keys_error(mut self, enabled: bool) -> Self {
        self.error_on_missing_keys = enabled;
        self
    }

    pub fn with_parse_errors(mut self, enabled: bool) -> Self {
        self.error_on_parse_errors = enabled;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn error_on_extra_keys(&self) -> bool {
        self.error_on_extra_keys
    }

    pub fn error_on_missing_keys(&self) -> bool {
        self.error_on_missing_keys
    }

    pub fn error_on_parse_errors(&self) -> bool {
        self.error_on_parse_errors
    }

    /// Full environment variable name for a bare setting name
    pub fn env_key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Bare setting name for an environment key, if the key carries our prefix
    pub fn strip_prefix<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.prefix.as_str())
    }
}

impl Default for Policy {
    /// Policy named after the running executable
    fn default() -> Self {
        let program = std::env::args_os()
            .next()
            .map(|arg| arg.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::for_program(&program)
    }
}

/// Upper-cased file stem of `program` followed by `_`
pub fn program_prefix(program: &str) -> String {
    let stem = Path::new(program)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    format!("{}_", stem)
}
