//! Typed setting store
//!
//! Holds every declared setting by name: its default, its current value and
//! the string parser that moves one to the other. The parse engine only talks
//! to the store through [`SettingStore::set`], [`SettingStore::reset`] and
//! [`SettingStore::visit_all`].

pub mod duration;
pub mod value;

pub use duration::{format_duration, parse_duration};
pub use value::{EnvValue, SettingKind, Value, ValueError};

use crate::error::{EnvError, Result};
use parking_lot::{RwLock, RwLockReadGuard};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Outcome of applying a raw string to a named setting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetError {
    /// No setting with this name was declared
    #[error("no setting named {name:?}")]
    UnknownKey { name: String },

    /// The setting exists but the string is not a valid value for its type
    #[error("invalid value for {name}: {reason}")]
    Malformed { name: String, reason: String },

    /// The setting's own parser refused the value for any other reason
    #[error("value for {name} rejected: {reason}")]
    Rejected { name: String, reason: String },
}

impl SetError {
    fn from_value(name: &str, error: ValueError) -> Self {
        match error {
            ValueError::Malformed(reason) => Self::Malformed {
                name: name.to_string(),
                reason,
            },
            ValueError::Rejected(reason) => Self::Rejected {
                name: name.to_string(),
                reason,
            },
        }
    }
}

/// Handle to a declared setting's current value.
///
/// Cloning the handle shares the same cell; read it after parsing to get the
/// resolved value.
pub struct Setting<T> {
    name: Arc<str>,
    cell: Arc<RwLock<T>>,
}

impl<T> Setting<T> {
    fn new(name: &str, value: T) -> Self {
        Self {
            name: Arc::from(name),
            cell: Arc::new(RwLock::new(value)),
        }
    }

    /// Bare setting name, without the environment prefix
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the current value
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.cell.read()
    }
}

impl<T: Clone> Setting<T> {
    /// Copy out the current value
    pub fn get(&self) -> T {
        self.cell.read().clone()
    }
}

impl<T> Clone for Setting<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("value", &*self.cell.read())
            .finish()
    }
}

type ParseFn<T> = Box<dyn Fn(&str) -> std::result::Result<T, ValueError> + Send + Sync>;
type FormatFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Type-erased write side of a setting.
trait Binding: Send + Sync {
    fn set(&self, raw: &str) -> std::result::Result<(), ValueError>;

    fn reset(&self);

    fn current(&self) -> String;
}

/// A setting parsed by a function; keeps a copy of the default for exact rollback.
struct Parsed<T> {
    cell: Arc<RwLock<T>>,
    default: T,
    parse: ParseFn<T>,
    format: FormatFn<T>,
}

impl<T: Clone + Send + Sync> Binding for Parsed<T> {
    fn set(&self, raw: &str) -> std::result::Result<(), ValueError> {
        let value = (self.parse)(raw)?;
        *self.cell.write() = value;
        Ok(())
    }

    fn reset(&self) {
        *self.cell.write() = self.default.clone();
    }

    fn current(&self) -> String {
        (self.format)(&self.cell.read())
    }
}

/// A caller-supplied [`Value`]; keeps a copy of the declared value for rollback.
///
/// `Value::set` may change the value before it fails, so rollback replaces
/// the whole value rather than re-parsing the default's display form.
struct Delegated<V> {
    cell: Arc<RwLock<V>>,
    default: V,
}

impl<V: Value + Clone> Binding for Delegated<V> {
    fn set(&self, raw: &str) -> std::result::Result<(), ValueError> {
        self.cell.write().set(raw)
    }

    fn reset(&self) {
        *self.cell.write() = self.default.clone();
    }

    fn current(&self) -> String {
        self.cell.read().to_string()
    }
}

struct Declared {
    usage: String,
    kind: SettingKind,
    default_repr: String,
    binding: Box<dyn Binding>,
}

/// Read-only view of one declared setting
#[derive(Debug, Clone, Serialize)]
pub struct SettingInfo<'a> {
    pub name: &'a str,
    pub kind: SettingKind,
    pub usage: &'a str,
    pub default_value: &'a str,
    pub current_value: String,
}

/// Registry of declared settings, keyed and iterated by name.
#[derive(Default)]
pub struct SettingStore {
    settings: BTreeMap<String, Declared>,
}

impl SettingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(
        &mut self,
        name: &str,
        usage: &str,
        kind: SettingKind,
        default_repr: String,
        binding: Box<dyn Binding>,
    ) -> Result<()> {
        if self.settings.contains_key(name) {
            return Err(EnvError::duplicate(name));
        }
        self.settings.insert(
            name.to_string(),
            Declared {
                usage: usage.to_string(),
                kind,
                default_repr,
                binding,
            },
        );
        Ok(())
    }

    /// Declare a setting of any built-in type
    pub fn declare<T: EnvValue>(&mut self, name: &str, default: T, usage: &str) -> Result<Setting<T>> {
        self.declare_with(
            name,
            T::KIND,
            default,
            usage,
            |raw| T::parse_env(raw),
            |value| value.format_env(),
        )
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> Result<Setting<String>> {
        self.declare(name, default.to_string(), usage)
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> Result<Setting<i64>> {
        self.declare(name, default, usage)
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> Result<Setting<bool>> {
        self.declare(name, default, usage)
    }

    pub fn duration(&mut self, name: &str, default: Duration, usage: &str) -> Result<Setting<Duration>> {
        self.declare(name, default, usage)
    }

    /// Comma-separated list of strings
    pub fn list(&mut self, name: &str, default: &[&str], usage: &str) -> Result<Setting<Vec<String>>> {
        let default = default.iter().map(|item| item.to_string()).collect();
        self.declare(name, default, usage)
    }

    /// Declare a setting with its own parse and format functions.
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
        self.declare_with(name, SettingKind::Custom, default, usage, parse, format)
    }

    /// Declare a setting backed by a caller-supplied [`Value`].
    ///
    /// `value` as given is the default that rollback restores.
    pub fn var<V: Value + Clone + 'static>(&mut self, name: &str, value: V, usage: &str) -> Result<Setting<V>> {
        let default_repr = value.to_string();
        let setting = Setting::new(name, value.clone());
        let binding = Delegated {
            cell: Arc::clone(&setting.cell),
            default: value,
        };
        self.insert(name, usage, SettingKind::Custom, default_repr, Box::new(binding))?;
        Ok(setting)
    }

    fn declare_with<T, P, F>(
        &mut self,
        name: &str,
        kind: SettingKind,
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
        let default_repr = format(&default);
        let setting = Setting::new(name, default.clone());
        let binding = Parsed {
            cell: Arc::clone(&setting.cell),
            default,
            parse: Box::new(parse),
            format: Box::new(format),
        };
        self.insert(name, usage, kind, default_repr, Box::new(binding))?;
        Ok(setting)
    }

    /// Apply a raw string to the named setting.
    ///
    /// On failure the setting keeps whatever value it held before the call.
    pub fn set(&self, name: &str, raw: &str) -> std::result::Result<(), SetError> {
        let declared = self.settings.get(name).ok_or_else(|| SetError::UnknownKey {
            name: name.to_string(),
        })?;
        declared
            .binding
            .set(raw)
            .map_err(|error| SetError::from_value(name, error))
    }

    /// Restore the named setting to its declared default
    pub fn reset(&self, name: &str) -> std::result::Result<(), SetError> {
        let declared = self.settings.get(name).ok_or_else(|| SetError::UnknownKey {
            name: name.to_string(),
        })?;
        declared.binding.reset();
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<SettingInfo<'_>> {
        self.settings
            .get_key_value(name)
            .map(|(name, declared)| Self::info(name, declared))
    }

    /// Visit every declared setting in lexicographic name order
    pub fn visit_all<F: FnMut(SettingInfo<'_>)>(&self, mut visit: F) {
        for (name, declared) in &self.settings {
            visit(Self::info(name, declared));
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    fn info<'a>(name: &'a str, declared: &'a Declared) -> SettingInfo<'a> {
        SettingInfo {
            name,
            kind: declared.kind,
            usage: &declared.usage,
            default_value: &declared.default_repr,
            current_value: declared.binding.current(),
        }
    }
}

impl fmt::Debug for SettingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.settings.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Port number that refuses privileged ports
    #[derive(Debug, Clone, PartialEq)]
    struct Port(u16);

    impl fmt::Display for Port {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl Value for Port {
        fn set(&mut self, raw: &str) -> std::result::Result<(), ValueError> {
            let port: u16 = raw.parse()?;
            if port < 1024 {
                return Err(ValueError::rejected(format!("port {} is privileged", port)));
            }
            self.0 = port;
            Ok(())
        }
    }

    #[test]
    fn test_declare_and_set() {
        let mut store = SettingStore::new();
        let count = store.int("COUNT", 5, "number of workers").unwrap();
        let name = store.string("NAME", "svc", "").unwrap();

        assert_eq!(count.get(), 5);
        assert_eq!(count.name(), "COUNT");

        store.set("COUNT", "12").unwrap();
        store.set("NAME", "api").unwrap();
        assert_eq!(count.get(), 12);
        assert_eq!(*name.read(), "api");
    }

    #[test]
    fn test_set_classifies_failures() {
        let mut store = SettingStore::new();
        let count = store.int("COUNT", 5, "").unwrap();
        let port = store.var("PORT", Port(8080), "").unwrap();

        assert_eq!(
            store.set("MISSING", "1"),
            Err(SetError::UnknownKey { name: "MISSING".to_string() })
        );
        assert!(matches!(store.set("COUNT", "five"), Err(SetError::Malformed { .. })));
        assert!(matches!(store.set("PORT", "http"), Err(SetError::Malformed { .. })));
        assert!(matches!(store.set("PORT", "22"), Err(SetError::Rejected { .. })));

        // failed sets leave the old value in place
        assert_eq!(count.get(), 5);
        assert_eq!(port.get(), Port(8080));
    }

    #[test]
    fn test_reset_restores_default() {
        let mut store = SettingStore::new();
        let timeout = store.duration("TIMEOUT", Duration::from_secs(1), "").unwrap();
        let port = store.var("PORT", Port(8080), "").unwrap();

        store.set("TIMEOUT", "1m").unwrap();
        store.set("PORT", "9000").unwrap();
        store.reset("TIMEOUT").unwrap();
        store.reset("PORT").unwrap();

        assert_eq!(timeout.get(), Duration::from_secs(1));
        assert_eq!(port.get(), Port(8080));
        assert!(matches!(store.reset("NOPE"), Err(SetError::UnknownKey { .. })));
    }

    /// Appends one host per call, like a repeatable flag
    #[derive(Debug, Clone, PartialEq)]
    struct Peers(Vec<String>);

    impl fmt::Display for Peers {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0.join(","))
        }
    }

    impl Value for Peers {
        fn set(&mut self, raw: &str) -> std::result::Result<(), ValueError> {
            if raw.is_empty() {
                return Err(ValueError::malformed("empty peer"));
            }
            self.0.push(raw.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_reset_replaces_appended_value() {
        let mut store = SettingStore::new();
        let peers = store.var("PEERS", Peers(vec!["a".to_string()]), "").unwrap();

        store.set("PEERS", "b").unwrap();
        assert_eq!(peers.get(), Peers(vec!["a".to_string(), "b".to_string()]));

        store.reset("PEERS").unwrap();
        assert_eq!(peers.get(), Peers(vec!["a".to_string()]));
        assert_eq!(store.lookup("PEERS").unwrap().default_value, "a");
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut store = SettingStore::new();
        store.bool("DEBUG", false, "").unwrap();

        let err = store.string("DEBUG", "x", "").unwrap_err();
        assert!(matches!(err, EnvError::Duplicate(ref name) if name == "DEBUG"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_visit_all_is_sorted() {
        let mut store = SettingStore::new();
        store.string("ZETA", "z", "last").unwrap();
        store.list("ALPHA", &["a", "b"], "first").unwrap();
        store.duration("MID", Duration::from_secs(90), "").unwrap();

        let mut seen = Vec::new();
        store.visit_all(|info| {
            seen.push((info.name.to_string(), info.kind, info.default_value.to_string()))
        });

        assert_eq!(
            seen,
            vec![
                ("ALPHA".to_string(), SettingKind::List, "a,b".to_string()),
                ("MID".to_string(), SettingKind::Duration, "1m30s".to_string()),
                ("ZETA".to_string(), SettingKind::String, "z".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_setting() {
        let mut store = SettingStore::new();
        let addr = store
            .custom(
                "BIND",
                std::net::IpAddr::from([127, 0, 0, 1]),
                "listen address",
                |raw| Ok(raw.parse::<std::net::IpAddr>()?),
                |addr| addr.to_string(),
            )
            .unwrap();

        store.set("BIND", "10.0.0.1").unwrap();
        assert_eq!(addr.get().to_string(), "10.0.0.1");
        assert!(matches!(store.set("BIND", "not-an-ip"), Err(SetError::Malformed { .. })));

        let info = store.lookup("BIND").unwrap();
        assert_eq!(info.kind, SettingKind::Custom);
        assert_eq!(info.default_value, "127.0.0.1");
        assert_eq!(info.current_value, "10.0.0.1");
    }
}
