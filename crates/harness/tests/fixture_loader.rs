//! Bundled fixture tests.

use crud_harness::fixtures::{USER_DELETE, USER_GET, USER_POST, USER_PUT};
use crud_harness::{FixtureError, FixtureLoader};
use serde_json::json;

#[test]
fn test_bundled_fixture_contents() {
    let loader = FixtureLoader::bundled();

    assert_eq!(
        loader.load_json(USER_GET).unwrap(),
        json!({"id": 1, "name": "John Doe", "email": "john@example.com"})
    );
    assert_eq!(
        loader.load_json(USER_POST).unwrap(),
        json!({"id": 2, "name": "Jane Smith", "email": "jane@example.com"})
    );
    assert_eq!(
        loader.load_json(USER_PUT).unwrap(),
        json!({"id": 1, "name": "John Updated", "email": "john.updated@example.com"})
    );
    assert_eq!(
        loader.load_json(USER_DELETE).unwrap(),
        json!({"message": "User deleted successfully", "deletedId": 1})
    );
}

#[test]
fn test_repeated_loads_are_identical() {
    let loader = FixtureLoader::bundled();

    for name in FixtureLoader::names() {
        let first = loader.load(name).unwrap();
        let second = loader.load(name).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes(), "{name}");
        assert!(!first.is_empty());
    }
}

#[test]
fn test_missing_fixture_names_the_file() {
    let err = FixtureLoader::bundled().load("user_patch.json").unwrap_err();

    assert!(matches!(err, FixtureError::NotFound { .. }));
    assert_eq!(err.fixture_name(), "user_patch.json");
    assert!(err.to_string().contains("user_patch.json"));
}

#[test]
fn test_reads_are_not_cached() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_get.json");
    let loader = FixtureLoader::new(dir.path());

    std::fs::write(&path, r#"{"id": 1}"#).unwrap();
    assert_eq!(loader.load_json("user_get.json").unwrap(), json!({"id": 1}));

    std::fs::write(&path, r#"{"id": 2}"#).unwrap();
    assert_eq!(loader.load_json("user_get.json").unwrap(), json!({"id": 2}));
}

#[test]
fn test_custom_dir_falls_back_to_bundled() {
    let bundled = FixtureLoader::from_dir_or_bundled(None);
    assert_eq!(bundled.dir(), FixtureLoader::bundled().dir());

    let dir = tempfile::tempdir().unwrap();
    let custom = FixtureLoader::from_dir_or_bundled(Some(dir.path()));
    assert_eq!(custom.dir(), dir.path());
}
