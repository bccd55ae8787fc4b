//! Owned data types shared by the controller, the HTTP client, and the UI.
//!
//! Wire types (`*Request` / `*Response`) mirror the JSON bodies exchanged with
//! the review service. Everything here is fully owned and `Send` so values can
//! travel from the API dispatch tasks back to the UI task over a channel.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which form is active.
///
/// The default is `Login`. Transitions are driven by the controller only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Username + password form (default on startup).
    #[default]
    Login,
    /// Account creation form.
    Register,
    /// Pull-request review form and results. Requires a credential.
    Review,
}

impl Screen {
    /// Short human-readable label used in titles and the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Review => "Review",
        }
    }
}

/// Registration fields, also used as the source of login credentials.
///
/// Serialises directly to the `/auth/register` body.
#[derive(Default, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationForm {
    pub name: String,
    pub username: String,
    pub password: String,
    pub github_token: String,
}

impl RegistrationForm {
    /// All four registration fields are filled in.
    pub fn is_complete(&self) -> bool {
        self.has_login_fields() && !self.name.is_empty() && !self.github_token.is_empty()
    }

    /// Username and password are filled in, enough to attempt a login.
    pub fn has_login_fields(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

// Manual Debug impl to avoid leaking the password and GitHub token
impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("github_token", &"[REDACTED]")
            .finish()
    }
}

/// Opaque bearer token issued by a successful login.
///
/// An empty token means "unauthenticated". `Debug` never prints the token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header only.
    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<none>)")
        } else {
            f.write_str("Credential([REDACTED])")
        }
    }
}

/// The review form inputs as typed.
///
/// `pr_number` holds digits only; it is coerced to an integer at submission.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    pub repo: String,
    pub pr_number: String,
}

impl ReviewQuery {
    /// Both fields present and the PR number positive, the precondition for
    /// dispatching a review. `"0"` and `"000"` do not count as a PR number.
    pub fn is_complete(&self) -> bool {
        !self.repo.is_empty() && self.pr_number.bytes().any(|b| b != b'0')
    }
}

/// Filename → review text, in the order the service returned them.
pub type ReviewResult = IndexMap<String, String>;

/// State of the review workflow. Exactly one variant holds at any time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    /// Failed with the user-facing message.
    Error(String),
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }
}

// --- Wire types ---

/// Body of `POST /auth/register`.
pub type RegisterRequest = RegistrationForm;

/// Body of `POST /auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Success body of `POST /auth/login`.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Body of `POST /review-pr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    pub repo: String,
    pub pr_number: u64,
}

/// Success body of `POST /review-pr`.
///
/// Only `reviews` is required; the echo fields are accepted when present.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewResponse {
    pub reviews: ReviewResult,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub pr_number: Option<u64>,
}
