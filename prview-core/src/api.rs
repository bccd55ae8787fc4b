//! HTTP client for the review service.
//!
//! [`ReviewApi`] is the seam between the controller and the network. The
//! production implementation is [`HttpApi`] (reqwest); tests substitute an
//! in-memory fake.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::types::{
    Credential, LoginRequest, LoginResponse, RegisterRequest, ReviewRequest, ReviewResponse,
    ReviewResult,
};

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REVIEW_PATH: &str = "/review-pr";

/// The three calls the client makes against the review service.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    /// `POST /auth/register`. Any 2xx is success; the body is ignored.
    async fn register(&self, form: &RegisterRequest) -> Result<()>;

    /// `POST /auth/login`. Returns the issued bearer token.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse>;

    /// `POST /review-pr` with `Authorization: Bearer <credential>`.
    async fn review(&self, credential: &Credential, request: &ReviewRequest)
        -> Result<ReviewResult>;
}

/// reqwest-backed [`ReviewApi`] against a fixed base address.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Builds a client for `base_url` (trailing slashes are ignored).
    ///
    /// `timeout` bounds each whole request; reviews run model inference on
    /// every changed file, so callers should allow minutes, not seconds.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the TLS backend cannot be initialised.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a JSON POST and maps non-2xx replies to `ApiError::Service`.
    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        credential: Option<&Credential>,
    ) -> Result<Response> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.token());
        }

        tracing::debug!(path, "sending request");
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "received response");

        if !status.is_success() {
            return Err(service_error(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl ReviewApi for HttpApi {
    async fn register(&self, form: &RegisterRequest) -> Result<()> {
        self.post(REGISTER_PATH, form, None).await?;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let response = self.post(LOGIN_PATH, request, None).await?;
        decode(response).await
    }

    async fn review(
        &self,
        credential: &Credential,
        request: &ReviewRequest,
    ) -> Result<ReviewResult> {
        let response = self.post(REVIEW_PATH, request, Some(credential)).await?;
        let body: ReviewResponse = decode(response).await?;
        Ok(body.reviews)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

async fn service_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Service {
        status,
        detail: parse_detail(&body),
    }
}

/// Extracts `detail` from an error body.
///
/// The service raises FastAPI `HTTPException`s, so `detail` is usually a
/// string. Request-validation failures carry a list of objects instead; those
/// are returned as compact JSON text.
pub fn parse_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
