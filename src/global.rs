//! Process-wide default [`EnvSet`], named after the running executable.
//!
//! Created on first use with [`Policy::default`]. Nothing in the crate
//! depends on it; build an [`EnvSet`] directly for isolated instances.

use crate::{
    env::EnvSet,
    error::{ParseError, Result},
    policy::Policy,
    store::{Setting, Value},
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::OnceLock;
use std::time::Duration;

static ENVIRONMENT: OnceLock<Mutex<EnvSet>> = OnceLock::new();

/// Lock the default environment, creating it on first use
pub fn environment() -> MutexGuard<'static, EnvSet> {
    ENVIRONMENT
        .get_or_init(|| Mutex::new(EnvSet::new(Policy::default())))
        .lock()
}

pub fn string(name: &str, default: &str, usage: &str) -> Result<Setting<String>> {
    environment().string(name, default, usage)
}

pub fn int(name: &str, default: i64, usage: &str) -> Result<Setting<i64>> {
    environment().int(name, default, usage)
}

pub fn bool(name: &str, default: bool, usage: &str) -> Result<Setting<bool>> {
    environment().bool(name, default, usage)
}

pub fn duration(name: &str, default: Duration, usage: &str) -> Result<Setting<Duration>> {
    environment().duration(name, default, usage)
}

pub fn list(name: &str, default: &[&str], usage: &str) -> Result<Setting<Vec<String>>> {
    environment().list(name, default, usage)
}

pub fn var<V: Value + Clone + 'static>(name: &str, value: V, usage: &str) -> Result<Setting<V>> {
    environment().var(name, value, usage)
}

/// Parse the process environment into the default set
pub fn parse() -> std::result::Result<(), ParseError> {
    environment().parse()
}

pub fn print_defaults() {
    environment().print_defaults();
}
