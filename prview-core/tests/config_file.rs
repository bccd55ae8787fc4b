//! Integration tests for config file loading.

use std::time::Duration;

use prview_core::config::{self, Config, DEFAULT_API_URL};
use prview_core::ConfigError;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn full_file_is_parsed() {
    let (_dir, path) = write_config(
        r#"
api_url = "http://review.example:8000"
theme = "dark"
request_timeout_secs = 60
log_file = "/tmp/prview-test.log"
"#,
    );
    let cfg = config::load(&path).unwrap();
    assert_eq!(cfg.api_url, "http://review.example:8000");
    assert_eq!(cfg.theme, "dark");
    assert_eq!(cfg.request_timeout(), Duration::from_secs(60));
    assert_eq!(cfg.log_path(), std::path::PathBuf::from("/tmp/prview-test.log"));
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = config::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
}

#[test]
fn bad_toml_is_a_parse_error() {
    let (_dir, path) = write_config("api_url = [not a string");
    assert!(matches!(config::load(&path), Err(ConfigError::Parse { .. })));
}

#[test]
fn wrong_type_is_a_parse_error() {
    let (_dir, path) = write_config("request_timeout_secs = \"soon\"");
    assert!(matches!(config::load(&path), Err(ConfigError::Parse { .. })));
}
