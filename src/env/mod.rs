//! Parse engine: binds prefixed environment variables to declared settings

pub mod source;

pub use source::{split_entry, EnvEntry, EnvSource, ProcessEnv};

use crate::{
    error::{ParseError, Result},
    policy::Policy,
    store::{EnvValue, SetError, Setting, SettingInfo, SettingStore, Value, ValueError},
};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// A set of declared settings read from one environment prefix.
///
/// Declare settings first, then call [`parse`](EnvSet::parse) once; every
/// handle returned by a declaration holds its resolved value afterwards.
///
/// ```
/// use envset::{EnvSet, Policy};
///
/// let mut env = EnvSet::new(Policy::new("APP_"));
/// let port = env.int("PORT", 8080, "listen port").unwrap();
/// env.parse_from(&["APP_PORT=9090", "HOME=/root"]).unwrap();
/// assert_eq!(port.get(), 9090);
/// ```
#[derive(Debug)]
pub struct EnvSet {
    policy: Policy,
    store: SettingStore,
}

impl EnvSet {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            store: SettingStore::new(),
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn prefix(&self) -> &str {
        self.policy.prefix()
    }

    pub fn store(&self) -> &SettingStore {
        &self.store
    }

    pub fn declare<T: EnvValue>(&mut self, name: &str, default: T, usage: &str) -> Result<Setting<T>> {
        self.store.declare(name, default, usage)
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> Result<Setting<String>> {
        self.store.string(name, default, usage)
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> Result<Setting<i64>> {
        self.store.int(name, default, usage)
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> Result<Setting<bool>> {
        self.store.bool(name, default, usage)
    }

    pub fn duration(&mut self, name: &str, default: Duration, usage: &str) -> Result<Setting<Duration>> {
        self.store.duration(name, default, usage)
    }

    pub fn list(&mut self, name: &str, default: &[&str], usage: &str) -> Result<Setting<Vec<String>>> {
        self.store.list(name, default, usage)
    }

    pub fn custom<T, P, F>(
        &mut self,
        name: &str,
        default: T,
        usage: &str,
        parse: P,
        format: F,
    ) -> Result<Setting<T>>
    where
        T: Clone + Send + Sync + 'static,
        P: Fn(&str) -> std::result::Result<T, ValueError> + Send + Sync + 'static,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.store.custom(name, default, usage, parse, format)
    }

    pub fn var<V: Value + Clone + 'static>(&mut self, name: &str, value: V, usage: &str) -> Result<Setting<V>> {
        self.store.var(name, value, usage)
    }

    /// Set a declared setting directly, bypassing the environment
    pub fn set(&self, name: &str, raw: &str) -> std::result::Result<(), SetError> {
        self.store.set(name, raw)
    }

    pub fn lookup(&self, name: &str) -> Option<SettingInfo<'_>> {
        self.store.lookup(name)
    }

    /// Scan the process environment once and bind every prefixed variable.
    pub fn parse(&mut self) -> std::result::Result<(), ParseError> {
        self.parse_from(&ProcessEnv)
    }

    /// Scan `source` once and bind every prefixed entry.
    ///
    /// All problems are collected before returning; the scan never stops at
    /// the first one. Malformed values are always rolled back to the
    /// setting's default, whether or not the policy reports them.
    pub fn parse_from<E: EnvSource + ?Sized>(&mut self, source: &E) -> std::result::Result<(), ParseError> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut report = ParseError::new();

        for entry in source.entries() {
            let (key, value) = (entry.key.as_str(), entry.value.as_str());
            let Some(name) = self.policy.strip_prefix(key) else {
                continue;
            };

            debug!(key, "binding environment variable");
            trace!(key, value, "raw environment value");

            match self.bind(name, &entry) {
                Ok(()) => {
                    visited.insert(key.to_string());
                }
                Err(SetError::UnknownKey { .. }) => {
                    if self.policy.error_on_extra_keys() {
                        warn!(key, "unexpected environment variable");
                        report.push_extra(key.to_string());
                    } else {
                        debug!(key, "ignoring undeclared environment variable");
                    }
                }
                Err(SetError::Malformed { reason, .. }) => {
                    if let Err(rollback) = self.store.reset(name) {
                        warn!(key, error = %rollback, "could not restore default");
                        report.push_unclassified(key, value, rollback.to_string());
                    }
                    if self.policy.error_on_parse_errors() {
                        warn!(key, %reason, "malformed environment value");
                        report.push_malformed(key, value, reason);
                    } else {
                        debug!(key, %reason, "malformed environment value, keeping default");
                    }
                }
                Err(SetError::Rejected { reason, .. }) => {
                    warn!(key, %reason, "environment value rejected");
                    report.push_unclassified(key, value, reason);
                }
            }
        }

        if self.policy.error_on_missing_keys() {
            for name in self.store.names() {
                let key = self.policy.env_key(name);
                if !visited.contains(&key) {
                    warn!(key = %key, "required environment variable not set");
                    report.push_missing(key);
                }
            }
        }

        report.into_result()
    }

    /// Set `name` from `entry`; an entry that is not valid UTF-8 never binds.
    fn bind(&self, name: &str, entry: &EnvEntry) -> std::result::Result<(), SetError> {
        if entry.unicode {
            return self.store.set(name, &entry.value);
        }
        if self.store.contains(name) {
            Err(SetError::Malformed {
                name: name.to_string(),
                reason: "value is not valid UTF-8".to_string(),
            })
        } else {
            Err(SetError::UnknownKey {
                name: name.to_string(),
            })
        }
    }

    /// Example `export` lines for every declared setting, with defaults
    pub fn usage(&self) -> String {
        let mut out = String::from("## Example Usage:\n");
        self.store.visit_all(|info| {
            writeln!(
                out,
                "# {}\nexport {}{}={:?}",
                info.usage,
                self.policy.prefix(),
                info.name,
                info.default_value
            )
            .ok();
        });
        out
    }

    pub fn print_defaults(&self) {
        print!("{}", self.usage());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    struct Replicas(u32);

    impl fmt::Display for Replicas {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl Value for Replicas {
        fn set(&mut self, raw: &str) -> std::result::Result<(), ValueError> {
            let count: u32 = raw.parse()?;
            if count % 2 == 0 {
                return Err(ValueError::rejected("replica count must be odd"));
            }
            self.0 = count;
            Ok(())
        }
    }

    /// Host list that appends each item and stops at the first bad one
    #[derive(Debug, Clone, PartialEq)]
    struct Hosts(Vec<String>);

    impl fmt::Display for Hosts {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0.join(","))
        }
    }

    impl Value for Hosts {
        fn set(&mut self, raw: &str) -> std::result::Result<(), ValueError> {
            for host in raw.split(',') {
                if host.contains(' ') {
                    return Err(ValueError::malformed(format!("{:?} contains a space", host)));
                }
                self.0.push(host.to_string());
            }
            Ok(())
        }
    }

    fn app_env(policy: Policy) -> EnvSet {
        EnvSet::new(policy)
    }

    #[test]
    fn test_basic_environment() {
        let mut env = app_env(Policy::new("APP_"));
        let s = env.string("STRING", "nothing", "").unwrap();
        let i = env.int("INT", -1, "").unwrap();
        let b = env.bool("BOOL", false, "").unwrap();
        let d = env.duration("DURATION", Duration::from_secs(1), "").unwrap();

        assert_eq!(s.get(), "nothing");
        assert_eq!(i.get(), -1);
        assert!(!b.get());
        assert_eq!(d.get(), Duration::from_secs(1));

        env.parse_from(&[
            "APP_STRING=this is a string value",
            "APP_INT=101",
            "APP_BOOL=true",
            "APP_DURATION=1m3s",
        ])
        .unwrap();

        assert_eq!(s.get(), "this is a string value");
        assert_eq!(i.get(), 101);
        assert!(b.get());
        assert_eq!(d.get(), Duration::from_secs(63));
    }

    #[test]
    fn test_unprefixed_entries_are_ignored() {
        let mut env = app_env(Policy::new("APP_").with_extra_keys_error(true));
        let port = env.int("PORT", 80, "").unwrap();

        env.parse_from(&["PORT=1", "app_PORT=2", "HOME=/root"]).unwrap();
        assert_eq!(port.get(), 80);
    }

    #[test]
    fn test_value_keeps_everything_after_first_equals() {
        let mut env = app_env(Policy::new("APP_"));
        let dsn = env.string("DSN", "", "").unwrap();

        env.parse_from(&["APP_DSN=host=db user=app sslmode=require"]).unwrap();
        assert_eq!(dsn.get(), "host=db user=app sslmode=require");
    }

    #[test]
    fn test_extra_keys_follow_policy() {
        let mut lenient = app_env(Policy::new("APP_"));
        assert!(lenient.parse_from(&["APP_TYPO=1"]).is_ok());

        let mut strict = app_env(Policy::new("APP_").with_extra_keys_error(true));
        let err = strict.parse_from(&["APP_TYPO=1", "APP_OTHER=2"]).unwrap_err();
        assert_eq!(err.extra_keys(), ["APP_TYPO".to_string(), "APP_OTHER".to_string()]);
    }

    #[test]
    fn test_bare_prefix_is_an_extra_key() {
        let mut env = app_env(Policy::new("APP_").with_extra_keys_error(true));
        let err = env.parse_from(&["APP_=value"]).unwrap_err();
        assert_eq!(err.extra_keys(), ["APP_".to_string()]);

        let mut declared = app_env(Policy::new("APP_").with_extra_keys_error(true));
        let unnamed = declared.string("", "none", "").unwrap();
        declared.parse_from(&["APP_=value"]).unwrap();
        assert_eq!(unnamed.get(), "value");
    }

    #[test]
    fn test_malformed_value_rolls_back_to_default() {
        let mut env = app_env(Policy::new("APP_"));
        let int = env.int("INT", -1, "").unwrap();
        env.set("INT", "7").unwrap();

        let err = env.parse_from(&["APP_INT=notanumber"]).unwrap_err();
        assert_eq!(int.get(), -1);
        assert_eq!(err.malformed().len(), 1);
        assert_eq!(err.malformed()[0].key, "APP_INT");
        assert_eq!(err.malformed()[0].value, "notanumber");
    }

    #[test]
    fn test_malformed_value_rolls_back_even_when_ignored() {
        let mut env = app_env(Policy::new("APP_").with_parse_errors(false));
        let int = env.int("INT", -1, "").unwrap();
        env.set("INT", "7").unwrap();

        env.parse_from(&["APP_INT=notanumber"]).unwrap();
        assert_eq!(int.get(), -1);
    }

    #[test]
    fn test_partially_applied_value_rolls_back_to_default() {
        for report in [true, false] {
            let mut env = app_env(Policy::new("APP_").with_parse_errors(report));
            let hosts = env.var("HOSTS", Hosts(vec!["a".to_string()]), "").unwrap();

            let outcome = env.parse_from(&["APP_HOSTS=x,bad host"]);

            assert_eq!(hosts.get(), Hosts(vec!["a".to_string()]));
            assert_eq!(outcome.is_err(), report);
        }
    }

    /// Entries that failed UTF-8 decoding, as the process environment reports them
    struct NonUnicode(Vec<(&'static str, &'static str)>);

    impl EnvSource for NonUnicode {
        fn entries(&self) -> Vec<EnvEntry> {
            self.0
                .iter()
                .map(|(key, value)| EnvEntry {
                    key: key.to_string(),
                    value: value.to_string(),
                    unicode: false,
                })
                .collect()
        }
    }

    #[test]
    fn test_non_unicode_value_is_malformed() {
        let mut env = app_env(Policy::new("APP_").with_extra_keys_error(true));
        let name = env.string("NAME", "default", "").unwrap();
        env.set("NAME", "stale").unwrap();

        let source = NonUnicode(vec![("APP_NAME", "ab\u{FFFD}cd"), ("APP_OTHER", "x"), ("HOME", "/")]);
        let err = env.parse_from(&source).unwrap_err();

        assert_eq!(name.get(), "default");
        assert_eq!(err.malformed().len(), 1);
        assert_eq!(err.malformed()[0].key, "APP_NAME");
        assert_eq!(err.malformed()[0].reason, "value is not valid UTF-8");
        assert_eq!(err.extra_keys(), ["APP_OTHER".to_string()]);

        let mut lenient = app_env(Policy::new("APP_").with_parse_errors(false));
        let name = lenient.string("NAME", "default", "").unwrap();
        lenient.parse_from(&source).unwrap();
        assert_eq!(name.get(), "default");
    }

    #[test]
    fn test_rejected_values_are_always_reported() {
        let mut env = app_env(Policy::new("APP_").with_parse_errors(false));
        let replicas = env.var("REPLICAS", Replicas(3), "").unwrap();

        let err = env.parse_from(&["APP_REPLICAS=4"]).unwrap_err();
        assert_eq!(replicas.get(), Replicas(3));
        assert_eq!(err.unclassified().len(), 1);
        assert_eq!(err.unclassified()[0].reason, "replica count must be odd");
        assert!(err.malformed().is_empty());
    }

    #[test]
    fn test_missing_keys_follow_policy() {
        let mut env = app_env(Policy::new("APP_").with_missing_keys_error(true));
        env.string("REQUIRED", "", "").unwrap();
        env.string("PRESENT", "", "").unwrap();

        let err = env.parse_from(&["APP_PRESENT=yes"]).unwrap_err();
        assert_eq!(err.missing_keys(), ["APP_REQUIRED".to_string()]);

        let mut lenient = app_env(Policy::new("APP_"));
        lenient.string("REQUIRED", "", "").unwrap();
        assert!(lenient.parse_from(&["HOME=/"]).is_ok());
    }

    #[test]
    fn test_malformed_key_counts_as_missing() {
        let mut env = app_env(
            Policy::new("APP_")
                .with_missing_keys_error(true)
                .with_parse_errors(false),
        );
        env.int("INT", 0, "").unwrap();

        let err = env.parse_from(&["APP_INT=x"]).unwrap_err();
        assert_eq!(err.missing_keys(), ["APP_INT".to_string()]);
        assert!(err.malformed().is_empty());
    }

    #[test]
    fn test_every_problem_reported_in_one_pass() {
        let mut env = app_env(
            Policy::new("APP_")
                .with_extra_keys_error(true)
                .with_missing_keys_error(true),
        );
        env.int("INT", 0, "").unwrap();
        env.string("REQUIRED", "", "").unwrap();
        env.var("REPLICAS", Replicas(1), "").unwrap();

        let err = env
            .parse_from(&["APP_INT=x", "APP_TYPO=1", "APP_REPLICAS=2"])
            .unwrap_err();

        assert_eq!(err.extra_keys().len(), 1);
        assert_eq!(err.malformed().len(), 1);
        assert_eq!(err.unclassified().len(), 1);
        // INT and REPLICAS failed to bind, REQUIRED never appeared
        assert_eq!(err.missing_keys().len(), 3);
        assert_eq!(err.len(), 6);
    }

    #[test]
    fn test_reparse_starts_fresh() {
        let mut env = app_env(Policy::new("APP_").with_missing_keys_error(true));
        let port = env.int("PORT", 80, "").unwrap();

        env.parse_from(&["APP_PORT=8080"]).unwrap();
        assert_eq!(port.get(), 8080);

        // a key seen in the first pass does not satisfy the second
        let err = env.parse_from(&["HOME=/"]).unwrap_err();
        assert_eq!(err.missing_keys(), ["APP_PORT".to_string()]);
    }

    #[test]
    fn test_usage_listing() {
        let mut env = app_env(Policy::new("APP_"));
        env.int("PORT", 8080, "listen port").unwrap();
        env.duration("TIMEOUT", Duration::from_secs(90), "request timeout").unwrap();

        let usage = env.usage();
        assert_eq!(
            usage,
            "## Example Usage:\n\
             # listen port\nexport APP_PORT=\"8080\"\n\
             # request timeout\nexport APP_TIMEOUT=\"1m30s\"\n"
        );
    }

    #[test]
    fn test_lookup_reports_current_value() {
        let mut env = app_env(Policy::new("APP_"));
        env.list("PEERS", &[], "").unwrap();
        env.parse_from(&["APP_PEERS=a,b"]).unwrap();

        let info = env.lookup("PEERS").unwrap();
        assert_eq!(info.current_value, "a,b");
        assert_eq!(info.default_value, "");
        assert!(env.lookup("NOPE").is_none());
    }
}
