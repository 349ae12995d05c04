use std::fs;

use assert_matches::assert_matches;

use biobank_directory::config::{ConfigLoader, DEFAULT_BASE_URL};
use biobank_directory::error::DirectoryError;

#[test]
fn resolves_explicit_config_file() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("bbdir.json");
    fs::write(
        &path,
        r#"{"base_url": "http://localhost:8080", "negotiator_endpoint": "/negotiate"}"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.base_url, "http://localhost:8080");
    assert_eq!(resolved.negotiator_endpoint, "/negotiate");
}

#[test]
fn partial_config_keeps_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("bbdir.json");
    fs::write(&path, r#"{"negotiator_endpoint": "/negotiate"}"#).unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
}

#[test]
fn missing_explicit_path_is_an_error() {
    let err = ConfigLoader::resolve(Some("/nonexistent/bbdir.json")).unwrap_err();
    assert_matches!(err, DirectoryError::ConfigRead(_));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("bbdir.json");
    fs::write(&path, "{not json").unwrap();

    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, DirectoryError::ConfigParse(_));
}
