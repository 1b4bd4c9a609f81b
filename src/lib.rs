//! envset
//!
//! Typed settings bound to environment variables that share a common
//! prefix. Declare each setting with a default, parse the environment once,
//! and get back either resolved values or a single error listing every
//! unknown key, malformed value and missing key the policy cares about.
//!
//! ```
//! use envset::{EnvSet, Policy};
//! use std::time::Duration;
//!
//! let mut env = EnvSet::new(Policy::new("APP_").with_extra_keys_error(true));
//! let timeout = env.duration("TIMEOUT", Duration::from_secs(1), "request timeout").unwrap();
//! let kafkas = env.list("KAFKAS", &[], "broker addresses").unwrap();
//!
//! env.parse_from(&["APP_TIMEOUT=1m3s", "APP_KAFKAS=host1,host2"]).unwrap();
//! assert_eq!(timeout.get(), Duration::from_secs(63));
//! assert_eq!(kafkas.get(), vec!["host1", "host2"]);
//! ```

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod global;
pub mod logging;
pub mod output;
pub mod policy;
pub mod store;

// Re-export commonly used types
pub use env::{EnvEntry, EnvSet, EnvSource, ProcessEnv};
pub use error::{EnvError, MalformedEntry, ParseError, Result, UnclassifiedEntry};
pub use policy::Policy;
pub use store::{EnvValue, SetError, Setting, SettingInfo, SettingKind, SettingStore, Value, ValueError};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Build metadata exported by build.rs
pub mod build_info {
    pub const BUILD_TIME: &str = env!("BUILD_TIME");
    pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
    pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

    /// One-line version string for `--verbose` output
    pub fn describe() -> String {
        match GIT_COMMIT {
            Some(commit) => format!(
                "{} {} ({}, built {} for {})",
                super::PKG_NAME,
                super::VERSION,
                commit,
                BUILD_TIME,
                TARGET_TRIPLE
            ),
            None => format!(
                "{} {} (built {} for {})",
                super::PKG_NAME,
                super::VERSION,
                BUILD_TIME,
                TARGET_TRIPLE
            ),
        }
    }
}
