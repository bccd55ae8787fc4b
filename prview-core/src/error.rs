use thiserror::Error;

/// Failure of one call to the review service.
///
/// Every variant is terminal for the user action that caused it; nothing is
/// retried and nothing here is fatal to the application.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Non-2xx reply. `detail` is the service's structured error text, if any.
    #[error("service returned status {status}")]
    Service { status: u16, detail: Option<String> },

    /// Connection, DNS, TLS or timeout failure before a reply was read.
    #[error("{0}")]
    Transport(String),

    /// A 2xx reply whose body did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request could not be built from the user's input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// The service-provided `detail`, when the reply carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Service { detail, .. } => detail.as_deref().filter(|d| !d.is_empty()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Service { status: 401, .. })
    }

    /// Resolves the message shown to the user: service detail, else `fallback`.
    ///
    /// Used by the register and login workflows.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_owned()
    }

    /// Three-tier resolution used by the review workflow: service detail, then
    /// the underlying transport message, then `fallback`.
    pub fn user_message_with_transport(&self, fallback: &str) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_owned();
        }
        match self {
            ApiError::Transport(msg) | ApiError::Malformed(msg) if !msg.is_empty() => msg.clone(),
            ApiError::Service { status, .. } => format!("Request failed with status code {status}"),
            _ => fallback.to_owned(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Malformed(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Malformed(e.to_string())
    }
}

/// Failure loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error in {path:?}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "fallback";

    #[test]
    fn detail_wins_over_everything() {
        let e = ApiError::Service {
            status: 500,
            detail: Some("rate limited".into()),
        };
        assert_eq!(e.user_message(FALLBACK), "rate limited");
        assert_eq!(e.user_message_with_transport(FALLBACK), "rate limited");
    }

    #[test]
    fn auth_flows_fall_back_without_detail() {
        let e = ApiError::Transport("connection refused".into());
        assert_eq!(e.user_message(FALLBACK), FALLBACK);
        let e = ApiError::Service {
            status: 400,
            detail: None,
        };
        assert_eq!(e.user_message(FALLBACK), FALLBACK);
    }

    #[test]
    fn review_flow_uses_transport_message() {
        let e = ApiError::Transport("connection refused".into());
        assert_eq!(e.user_message_with_transport(FALLBACK), "connection refused");
        let e = ApiError::Transport(String::new());
        assert_eq!(e.user_message_with_transport(FALLBACK), FALLBACK);
        let e = ApiError::InvalidInput("bad".into());
        assert_eq!(e.user_message_with_transport(FALLBACK), FALLBACK);
    }

    #[test]
    fn empty_detail_is_ignored() {
        let e = ApiError::Service {
            status: 400,
            detail: Some(String::new()),
        };
        assert_eq!(e.detail(), None);
        assert_eq!(e.user_message(FALLBACK), FALLBACK);
    }
}
