//! User configuration loaded from `$XDG_CONFIG_HOME/prview/config.toml`.
//!
//! Every key is optional. A missing file is not an error; a malformed one is
//! reported by [`load`], and the binary falls back to defaults after logging
//! the error, so a typo in config never prevents startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_THEME: &str = "catppuccin-mocha";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Base address of the review service.
    pub api_url: String,
    /// Built-in theme name, resolved by the binary.
    pub theme: String,
    /// Upper bound on one request. Reviews run inference per changed file.
    pub request_timeout_secs: u64,
    /// Where tracing output goes; the terminal itself is owned by the UI.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            theme: DEFAULT_THEME.to_owned(),
            request_timeout_secs: 300,
            log_file: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// The configured log file, or the XDG state default.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_path)
    }
}

/// Returns `$base/<rest>`, where `$base` is `$var` or `~/<home_rel>`.
fn xdg_dir(var: &str, home_rel: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(home_rel))
        })
        .unwrap_or_else(|| PathBuf::from(home_rel))
}

/// Returns the path to the prview config file.
///
/// Prefers `$XDG_CONFIG_HOME/prview/config.toml`; falls back to
/// `~/.config/prview/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
        .join("prview")
        .join("config.toml")
}

/// `$XDG_STATE_HOME/prview/prview.log`, else `~/.local/state/prview/prview.log`.
pub fn default_log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .join("prview")
        .join("prview.log")
}

/// Reads and parses `path`. A missing file yields the defaults.
///
/// # Errors
///
/// Returns `ConfigError::Io` for unreadable files and `ConfigError::Parse`
/// for invalid TOML or mistyped keys.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_owned(),
                source,
            })
        }
    };
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg: Config = toml::from_str(r#"api_url = "http://review.internal:9000""#).unwrap();
        assert_eq!(cfg.api_url, "http://review.internal:9000");
        assert_eq!(cfg.theme, DEFAULT_THEME);
        assert_eq!(cfg.request_timeout_secs, 300);
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cfg = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn explicit_log_file_wins() {
        let cfg = Config {
            log_file: Some("/tmp/x.log".into()),
            ..Config::default()
        };
        assert_eq!(cfg.log_path(), PathBuf::from("/tmp/x.log"));
    }
}
