use next_options::{Error, OptionKind, OptionSpec, OptionValue, Override, Registry};
use std::panic::{AssertUnwindSafe, catch_unwind};

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(OptionSpec::new("a", "b", 1, OptionKind::Int, ""))
        .unwrap();
    registry
        .register(OptionSpec::new("a", "c", "x", OptionKind::String, ""))
        .unwrap();
    registry
}

#[test]
fn test_values_visible_inside_and_restored_after() {
    let mut registry = registry();
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(1));

    let seen = registry
        .with_overrides(
            vec![Override::new("a", "b", 5), Override::new("A", "C", "y")],
            |registry| {
                assert_eq!(registry.get("a", "c")?, OptionValue::Text("y".into()));
                registry.get("a", "b")
            },
        )
        .unwrap();

    assert_eq!(seen, OptionValue::Int(5));
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(1));
    assert_eq!(registry.get("a", "c").unwrap(), OptionValue::Text("x".into()));
}

#[test]
fn test_restored_when_block_fails() {
    let mut registry = registry();
    let err = registry
        .with_overrides(vec![Override::new("a", "b", 5)], |registry| {
            registry.set("a", "b", 7)?;
            registry.get("a", "missing")
        })
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(1));
}

#[test]
fn test_restored_when_block_panics() {
    let mut registry = registry();
    let result = catch_unwind(AssertUnwindSafe(|| {
        registry
            .with_overrides(vec![Override::new("a", "b", 5)], |_| -> Result<(), Error> {
                panic!("boom")
            })
    }));

    assert!(result.is_err());
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(1));
}

#[test]
fn test_guard_restores_on_drop() {
    let mut registry = registry();
    {
        let guard = registry
            .override_values(vec![Override::new("a", "b", 5)])
            .unwrap();
        assert_eq!(guard.get("a", "b").unwrap(), OptionValue::Int(5));
    }
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(1));
}

#[test]
fn test_restore_failure_propagates() {
    let mut registry = registry();
    let err = registry
        .with_overrides(vec![Override::new("a", "b", 5)], |registry| {
            registry.lock("a", "b")
        })
        .unwrap_err();

    assert!(err.is_locked());
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(5));
}

#[test]
fn test_failed_apply_enters_no_override() {
    let mut registry = registry();
    registry
        .register(OptionSpec::new("a", "locked", 0, OptionKind::Int, "").locked())
        .unwrap();

    let err = registry
        .with_overrides(
            vec![Override::new("a", "b", 5), Override::new("a", "locked", 1)],
            |_| -> Result<(), Error> { panic!("block must not run") },
        )
        .unwrap_err();

    assert!(err.is_locked());
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(1));

    let err = registry
        .override_values(vec![Override::new("a", "b", "not an int")])
        .err()
        .unwrap();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_repeated_target_restores_original() {
    let mut registry = registry();
    registry
        .with_overrides(
            vec![Override::new("a", "b", 5), Override::new("a", "b", 6)],
            |registry| {
                assert_eq!(registry.get("a", "b")?, OptionValue::Int(6));
                Ok(())
            },
        )
        .unwrap();
    assert_eq!(registry.get("a", "b").unwrap(), OptionValue::Int(1));
}

#[test]
fn test_flat_overrides() {
    let overrides = Override::from_flat(vec!["a".into(), "b".into(), 5.into()]).unwrap();
    assert_eq!(overrides, vec![Override::new("a", "b", 5)]);

    for len in [0, 2, 4] {
        let values = vec![OptionValue::from("a"); len];
        assert!(matches!(
            Override::from_flat(values),
            Err(Error::InvalidOverrides(n)) if n == len
        ));
    }

    let err = Override::from_flat(vec![1.into(), "b".into(), 5.into()]).unwrap_err();
    assert!(matches!(err, Error::InvalidOverrides(3)));

    let mut registry = registry();
    assert!(matches!(
        registry.with_overrides(Vec::new(), |_| Ok(())),
        Err(Error::InvalidOverrides(0))
    ));
}
