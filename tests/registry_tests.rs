use next_options::{Error, OptionKind, OptionSpec, OptionValue, Registry};
use proptest::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary directory for tests
fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn port_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(OptionSpec::new(
            "net",
            "port",
            8080,
            OptionKind::Int,
            "listen port",
        ))
        .expect("Failed to register option");
    registry
}

fn letters_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(
            OptionSpec::new("string", "letter", "a", OptionKind::Text, "a letter")
                .with_alternatives(["a", "b", "c"]),
        )
        .expect("Failed to register option");
    registry
}

#[test]
fn test_get_after_register_returns_default() {
    let registry = port_registry();
    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(8080));
    assert_eq!(
        registry.get_default("net", "port").unwrap(),
        OptionValue::Int(8080)
    );
}

#[test]
fn test_lookup_is_case_insensitive() {
    let mut registry = port_registry();
    assert_eq!(registry.get("NET", "PORT").unwrap(), OptionValue::Int(8080));

    registry.set("Net", "Port", 9090).unwrap();
    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(9090));

    let listed = registry.list(None);
    assert_eq!(listed[0].key, "net");
    assert_eq!(listed[0].subkey, "port");
}

#[test]
fn test_port_scenario_with_lock() {
    let mut registry = port_registry();

    registry.set("net", "port", 9090).unwrap();
    assert_eq!(registry.get_as::<i64>("net", "port").unwrap(), 9090);

    registry.lock("net", "port").unwrap();
    assert!(registry.is_locked("net", "port").unwrap());

    let err = registry.set("net", "port", 1111).unwrap_err();
    assert!(matches!(err, Error::Locked { .. }));

    let err = registry.reset("net", "port").unwrap_err();
    assert!(err.is_locked());

    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(9090));
}

#[test]
fn test_register_twice_fails_and_keeps_first() {
    let mut registry = port_registry();
    registry.set("net", "port", 9000).unwrap();

    let err = registry
        .register(OptionSpec::new("NET", "port", 1, OptionKind::Int, "again"))
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { .. }));

    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(9000));
    assert_eq!(registry.get_description("net", "port").unwrap(), "listen port");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_register_if_absent_tolerates_duplicates() {
    let mut registry = port_registry();
    let added = registry
        .register_if_absent(OptionSpec::new("net", "port", 1, OptionKind::Int, ""))
        .unwrap();
    assert!(!added);

    let added = registry
        .register_if_absent(OptionSpec::new("net", "host", "localhost", OptionKind::String, ""))
        .unwrap();
    assert!(added);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_register_rejects_default_of_wrong_kind() {
    let mut registry = Registry::new();
    let err = registry
        .register(OptionSpec::new("numeric", "count", "four", OptionKind::Int, ""))
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    assert!(!registry.contains("numeric", "count"));
}

#[test]
fn test_register_rejects_default_outside_alternatives() {
    let mut registry = Registry::new();
    let err = registry
        .register(
            OptionSpec::new("string", "letter", "z", OptionKind::Text, "")
                .with_alternatives(["a", "b"]),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotAllowed { .. }));
    assert!(registry.is_empty());
}

#[test]
fn test_register_missing_input_path_fails() {
    let mut registry = Registry::new();
    let err = registry
        .register(OptionSpec::new(
            "path",
            "in",
            PathBuf::from("/no/path/at/all"),
            OptionKind::PathIn,
            "",
        ))
        .unwrap_err();
    assert!(err.is_path_not_found());

    let err = registry.set("path", "in", "/tmp").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_output_path_is_not_checked() {
    let mut registry = Registry::new();
    registry
        .register(OptionSpec::new(
            "path",
            "out",
            "/no/path/at/all",
            OptionKind::PathOut,
            "",
        ))
        .unwrap();
    assert_eq!(
        registry.get("path", "out").unwrap(),
        OptionValue::Path(Some(PathBuf::from("/no/path/at/all")))
    );
}

#[test]
fn test_unset_input_path_requires_opt_in() {
    let mut registry = Registry::new();
    registry
        .register(OptionSpec::new("path", "in", "", OptionKind::PathIn, ""))
        .unwrap();

    let err = registry.get("path", "in").unwrap_err();
    assert!(matches!(err, Error::UnsetPath { .. }));
    assert_eq!(
        registry.get_allow_unset("path", "in").unwrap(),
        OptionValue::Path(None)
    );

    let dir = temp_dir();
    registry.set("path", "in", dir.path()).unwrap();
    assert_eq!(
        registry.get_as::<PathBuf>("path", "in").unwrap(),
        dir.path().to_path_buf()
    );

    let err = registry.set("path", "in", "/not/a/real/path").unwrap_err();
    assert!(err.is_path_not_found());
    assert_eq!(
        registry.get_as::<PathBuf>("path", "in").unwrap(),
        dir.path().to_path_buf()
    );
}

#[test]
fn test_alternatives_scenario() {
    let mut registry = letters_registry();

    assert!(!registry.check("string", "letter", "z").unwrap());
    assert!(registry.check("string", "letter", "b").unwrap());

    let err = registry.set("string", "letter", "z").unwrap_err();
    match err {
        Error::NotAllowed { accepted, .. } => assert_eq!(accepted, "a, b, c"),
        other => panic!("Expected NotAllowed, got {other:?}"),
    }
    assert_eq!(registry.get_as::<String>("string", "letter").unwrap(), "a");

    registry.set("string", "letter", "b").unwrap();
    assert_eq!(registry.get_as::<String>("string", "letter").unwrap(), "b");
    assert_eq!(
        registry
            .get_alternatives("string", "letter")
            .unwrap()
            .map(|a| a.len()),
        Some(3)
    );
}

#[test]
fn test_check_without_alternatives_accepts_any_value_of_kind() {
    let registry = port_registry();
    assert!(registry.check("net", "port", 1).unwrap());

    let err = registry.check("net", "port", "not a number").unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));

    let err = registry.check("net", "missing", 1).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_set_wrong_kind_leaves_value_unchanged() {
    let mut registry = Registry::new();
    registry
        .register(OptionSpec::new("boolean", "flag", false, OptionKind::Bool, ""))
        .unwrap();
    registry
        .register(OptionSpec::new("string", "free", "omega", OptionKind::String, ""))
        .unwrap();

    assert!(registry.set("boolean", "flag", "the_truth").is_err());
    assert!(registry.set("string", "free", 23.45).is_err());
    assert_eq!(registry.get_as::<bool>("boolean", "flag").unwrap(), false);
    assert_eq!(registry.get_as::<String>("string", "free").unwrap(), "omega");
}

#[test]
fn test_accessors_fail_for_unknown_option() {
    let mut registry = port_registry();
    assert!(registry.get("net", "host").unwrap_err().is_not_found());
    assert!(registry.get_default("net", "host").unwrap_err().is_not_found());
    assert!(registry.get_description("net", "host").unwrap_err().is_not_found());
    assert!(registry.get_type("net", "host").unwrap_err().is_not_found());
    assert!(registry.get_alternatives("net", "host").unwrap_err().is_not_found());
    assert!(registry.set("net", "host", "x").unwrap_err().is_not_found());
    assert!(registry.reset("net", "host").unwrap_err().is_not_found());
    assert!(registry.lock("net", "host").unwrap_err().is_not_found());
    assert!(registry.unregister("net", "host").unwrap_err().is_not_found());
}

#[test]
fn test_reset_restores_default() {
    let mut registry = port_registry();
    registry.set("net", "port", 1).unwrap();
    registry.reset("net", "port").unwrap();
    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(8080));
}

#[test]
fn test_unregister_removes_option() {
    let mut registry = port_registry();
    registry.unregister("NET", "port").unwrap();
    assert!(!registry.contains("net", "port"));
    assert!(registry.get("net", "port").unwrap_err().is_not_found());
}

#[test]
fn test_freeze_disables_schema_changes_only() {
    let mut registry = port_registry();
    registry.freeze();
    assert!(!registry.is_open());

    registry
        .register(OptionSpec::new("net", "host", "localhost", OptionKind::String, ""))
        .unwrap();
    assert!(!registry.contains("net", "host"));

    registry.unregister("net", "port").unwrap();
    assert!(registry.contains("net", "port"));

    registry.set("net", "port", 1234).unwrap();
    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(1234));
}

#[test]
fn test_list_preserves_order_and_filters_by_key() {
    let mut registry = Registry::new();
    registry
        .register(OptionSpec::new("net", "port", 8080, OptionKind::Int, ""))
        .unwrap();
    registry
        .register(OptionSpec::new("log", "level", "info", OptionKind::String, ""))
        .unwrap();
    registry
        .register(OptionSpec::new("net", "host", "localhost", OptionKind::String, ""))
        .unwrap();

    let all: Vec<_> = registry
        .list(None)
        .into_iter()
        .map(|o| format!("{}.{}", o.key, o.subkey))
        .collect();
    assert_eq!(all, ["net.port", "log.level", "net.host"]);

    let net = registry.list(Some("NET"));
    assert_eq!(net.len(), 2);
    assert_eq!(net[1].subkey, "host");
}

#[test]
fn test_list_returns_copies() {
    let registry = port_registry();
    let mut listed = registry.list(None);
    listed[0].value = OptionValue::Int(1);
    listed[0].locked = true;

    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(8080));
    assert!(!registry.is_locked("net", "port").unwrap());
}

#[test]
fn test_reset_all_bypasses_locks_or_empties() {
    let mut registry = port_registry();
    registry.set("net", "port", 9090).unwrap();
    registry.lock("net", "port").unwrap();

    registry.reset_all(false);
    assert_eq!(registry.get("net", "port").unwrap(), OptionValue::Int(8080));
    assert!(registry.is_locked("net", "port").unwrap());

    registry.reset_all(true);
    assert!(registry.is_empty());
    assert_eq!(registry.list(None).len(), 0);
}

#[test]
fn test_builder_registration() {
    let mut registry = Registry::new();
    let spec = OptionSpec::builder()
        .key("numeric")
        .subkey("integer_fixed")
        .default_value(4)
        .kind(OptionKind::Int)
        .description("this is a fixed integer")
        .locked(true)
        .build()
        .unwrap();
    registry.register(spec).unwrap();

    assert!(registry.set("numeric", "integer_fixed", 6).unwrap_err().is_locked());
    assert_eq!(registry.get_type("numeric", "integer_fixed").unwrap(), OptionKind::Int);

    let err = OptionSpec::builder().key("numeric").build().unwrap_err();
    assert!(matches!(err, Error::Builder(_)));
}

#[test]
fn test_builder_alternatives() {
    let spec = OptionSpec::builder()
        .key("string")
        .subkey("option_text")
        .default_value("alpha")
        .kind(OptionKind::Text)
        .alternatives(["alpha", "beta", "gamma"])
        .build()
        .unwrap();
    assert_eq!(spec.alternatives.map(|a| a.len()), Some(3));
    assert!(!spec.locked);
}

proptest! {
    #[test]
    fn prop_key_case_does_not_matter(key in "[a-zA-Z]{1,8}", subkey in "[a-zA-Z]{1,8}", value in any::<i64>()) {
        let mut registry = Registry::new();
        registry
            .register(OptionSpec::new(key.to_uppercase(), subkey.to_lowercase(), 0, OptionKind::Int, ""))
            .unwrap();

        registry.set(&key, &subkey, value).unwrap();
        prop_assert_eq!(
            registry.get(&key.to_lowercase(), &subkey.to_uppercase()).unwrap(),
            OptionValue::Int(value)
        );
    }
}
