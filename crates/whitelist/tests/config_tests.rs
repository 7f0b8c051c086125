//! Configuration loading from files and the environment

use std::io::Write;
use tempfile::{Builder, NamedTempFile};
use whitelist::config::{Config, Visibility};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
        [identity]
        endpoint = "http://127.0.0.1:9000/v1/usernames/users"
        timeout_secs = 5

        [store]
        api_key = "file-key"
        document_id = "Xy12Ab"
        visibility = "PRIVATE"
        "#,
    );

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.identity.timeout_secs, 5);
    assert_eq!(config.store.api_key, "file-key");
    assert_eq!(config.store.document_id, "Xy12Ab");
    assert_eq!(config.store.visibility, Visibility::Private);
    // Unset sections keep their defaults.
    assert_eq!(config.store.timeout_secs, 10);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
        [store]
        api_key = "file-key"
        document_id = "Xy12Ab"
        title = "from-file"
        "#,
    );

    std::env::set_var("WHITELIST_STORE__TITLE", "from-env");
    let config = Config::load(Some(file.path()));
    std::env::remove_var("WHITELIST_STORE__TITLE");

    assert_eq!(config.unwrap().store.title, "from-env");
}

#[test]
fn test_missing_credentials_fail_validation() {
    let file = write_config(
        r#"
        [store]
        document_id = "Xy12Ab"
        "#,
    );

    let err = Config::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("store.api_key"));
}

#[test]
fn test_missing_file_is_an_error() {
    let err = Config::load(Some(std::path::Path::new("/nonexistent/whitelist.toml"))).unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_invalid_visibility_is_a_parse_error() {
    let file = write_config(
        r#"
        [store]
        api_key = "k"
        document_id = "d"
        visibility = "SECRET"
        "#,
    );

    assert!(Config::load(Some(file.path())).is_err());
}
