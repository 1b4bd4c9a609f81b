//! Tests that read real process variables. Each test owns a distinct
//! prefix, so their writes never overlap.

use envset::{global, EnvSet, Policy};
use std::time::Duration;

#[test]
fn test_global_environment_binds_process_variables() {
    let prefix = global::environment().prefix().to_string();
    assert!(prefix.ends_with('_'));
    assert!(prefix.starts_with("GLOBAL_ENVIRONMENT"));

    let name = global::string("NAME", "unset", "service name").unwrap();
    let port = global::int("PORT", 80, "listen port").unwrap();
    let timeout = global::duration("TIMEOUT", Duration::from_secs(1), "request timeout").unwrap();
    let hosts = global::list("HOSTS", &[], "peer hosts").unwrap();

    // declaring the same name twice on the shared set is refused
    assert!(global::int("PORT", 81, "").is_err());

    std::env::set_var(format!("{}NAME", prefix), "svc");
    std::env::set_var(format!("{}PORT", prefix), "9090");
    std::env::set_var(format!("{}TIMEOUT", prefix), "1m3s");
    std::env::set_var(format!("{}HOSTS", prefix), "a, b");

    global::parse().unwrap();

    assert_eq!(name.get(), "svc");
    assert_eq!(port.get(), 9090);
    assert_eq!(timeout.get(), Duration::from_secs(63));
    assert_eq!(hosts.get(), vec!["a".to_string(), "b".to_string()]);

    // default policy reports malformed values and rolls them back
    std::env::set_var(format!("{}PORT", prefix), "eighty");
    let err = global::parse().unwrap_err();
    assert_eq!(err.malformed().len(), 1);
    assert_eq!(err.malformed()[0].key, format!("{}PORT", prefix));
    assert_eq!(port.get(), 80);

    let usage = global::environment().usage();
    assert!(usage.contains(&format!("export {}PORT=\"80\"", prefix)));
}

#[cfg(unix)]
#[test]
fn test_non_unicode_process_value_keeps_default() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    std::env::set_var("ENVSET_RAW_NAME", OsString::from_vec(b"ab\xffcd".to_vec()));
    std::env::set_var("ENVSET_RAW_PORT", "8081");

    let mut env = EnvSet::new(Policy::new("ENVSET_RAW_"));
    let name = env.string("NAME", "default", "").unwrap();
    let port = env.int("PORT", 80, "").unwrap();

    let err = env.parse().unwrap_err();

    assert_eq!(name.get(), "default");
    assert_eq!(port.get(), 8081);
    assert_eq!(err.malformed().len(), 1);
    assert_eq!(err.malformed()[0].key, "ENVSET_RAW_NAME");
}
