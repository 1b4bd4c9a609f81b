//! Where `KEY=VALUE` entries come from

use std::ffi::OsString;

/// One environment entry, already split into key and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    /// False when the OS key or value was not valid UTF-8; `key` and `value`
    /// then hold a lossy rendering that must not be bound.
    pub unicode: bool,
}

impl EnvEntry {
    /// Split a `KEY=VALUE` string at its first `=`
    pub fn parse(entry: &str) -> Self {
        let (key, value) = split_entry(entry);
        Self {
            key: key.to_string(),
            value: value.to_string(),
            unicode: true,
        }
    }

    pub fn from_os(key: OsString, value: OsString) -> Self {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Self {
                key,
                value,
                unicode: true,
            },
            (key, value) => Self {
                key: lossy(key),
                value: lossy(value),
                unicode: false,
            },
        }
    }
}

fn lossy(text: Result<String, OsString>) -> String {
    text.unwrap_or_else(|os| os.to_string_lossy().into_owned())
}

/// A snapshot of environment entries.
pub trait EnvSource {
    fn entries(&self) -> Vec<EnvEntry>;
}

/// The real process environment.
///
/// Entries that are not valid UTF-8 are marked rather than converted, so the
/// parse engine can report them instead of binding replacement characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn entries(&self) -> Vec<EnvEntry> {
        std::env::vars_os()
            .map(|(key, value)| EnvEntry::from_os(key, value))
            .collect()
    }
}

/// `KEY=VALUE` strings, split at the first `=`
impl<S: AsRef<str>> EnvSource for [S] {
    fn entries(&self) -> Vec<EnvEntry> {
        self.iter().map(|entry| EnvEntry::parse(entry.as_ref())).collect()
    }
}

impl<S: AsRef<str>, const N: usize> EnvSource for [S; N] {
    fn entries(&self) -> Vec<EnvEntry> {
        self.as_slice().entries()
    }
}

impl<S: AsRef<str>> EnvSource for Vec<S> {
    fn entries(&self) -> Vec<EnvEntry> {
        self.as_slice().entries()
    }
}

/// Split an entry at its first `=`; an entry without one has an empty value.
pub fn split_entry(entry: &str) -> (&str, &str) {
    entry.split_once('=').unwrap_or((entry, ""))
}
