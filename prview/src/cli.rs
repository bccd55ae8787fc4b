//! Command-line flags. Each one overrides the matching config-file key.

use std::path::PathBuf;

use clap::Parser;
use prview_core::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "prview",
    version,
    about = "Terminal client for an AI pull-request review service"
)]
pub struct Cli {
    /// Config file to read instead of the XDG default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the review service.
    #[arg(long, env = "PRVIEW_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Color theme: "catppuccin-mocha" or "dark".
    #[arg(long)]
    pub theme: Option<String>,

    /// Write logs here instead of the XDG state directory.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Applies flags (and `PRVIEW_API_URL`) over the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "prview",
            "--api-url",
            "http://review.example:8080",
            "--theme",
            "dark",
            "--timeout",
            "30",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.api_url, "http://review.example:8080");
        assert_eq!(config.theme, "dark");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let cli = Cli::try_parse_from(["prview", "--config", "/tmp/prview.toml"]).unwrap();
        let mut config = Config {
            theme: "dark".into(),
            ..Config::default()
        };
        cli.apply(&mut config);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/prview.toml")));
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["prview", "--bogus"]).is_err());
    }
}
