//! Session/Review Controller.
//!
//! Owns everything the three screens show: the active screen, the form fields,
//! the credential, the review query, and the review result. Renderers read it
//! through `&Controller`; the keybinding dispatcher and the API worker's results
//! mutate it through `&mut Controller` on the UI task only.
//!
//! # Dispatch tickets
//!
//! Every network-facing operation is split in two:
//!
//! 1. `begin_*` checks the preconditions, applies the "request started" state
//!    change, and returns a [`Ticket`] carrying a fresh [`RequestId`] and the
//!    request to send. `None` means nothing was dispatched and nothing changed
//!    (apart from the PR-number coercion failure described on
//!    [`Controller::begin_review`]).
//! 2. `complete_*` applies the outcome only if the ticket is still the latest
//!    one issued for its workflow. A completion for a superseded ticket (after
//!    `reset_review`, or after navigating away from an auth screen) is dropped.
//!
//! Only one ticket per workflow can be outstanding at a time, which is what
//! keeps duplicate submissions out for register, login, and review alike.
//!
//! The `async` façade ([`Controller::register_account`],
//! [`Controller::authenticate`], [`Controller::submit_review`]) runs both
//! halves back-to-back against any [`ReviewApi`].

use crate::api::ReviewApi;
use crate::error::{ApiError, Result};
use crate::types::{
    Credential, LoginRequest, LoginResponse, RegisterRequest, RegistrationForm, RequestStatus,
    ReviewQuery, ReviewRequest, ReviewResult, Screen,
};

/// Shown after a registration attempt fails without a service detail.
pub const REGISTER_FALLBACK: &str = "Registration failed";
/// Shown after a login attempt fails without a service detail.
pub const LOGIN_FALLBACK: &str = "Login failed";
/// Shown after a review fetch fails with neither a detail nor a transport message.
pub const REVIEW_FALLBACK: &str = "Failed to fetch review. Please check your inputs.";
/// Notice shown on the Login screen after a successful registration.
pub const REGISTERED_NOTICE: &str = "Registration successful. Please login.";
/// Shown on the Login screen when the review service rejects the credential.
pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";

/// Monotonically increasing id tagging each dispatched request.
pub type RequestId = u64;

/// The three independent request workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Register,
    Login,
    Review,
}

/// Handle for one dispatched request.
///
/// Hand `request` to the network layer, then pass `id` back to the matching
/// `complete_*` method together with the outcome.
#[derive(Debug, Clone)]
pub struct Ticket<T> {
    pub id: RequestId,
    pub workflow: Workflow,
    pub request: T,
}

/// Everything needed to send one `POST /review-pr`.
#[derive(Debug, Clone)]
pub struct ReviewDispatch {
    pub credential: Credential,
    pub body: ReviewRequest,
}

/// The client-side state machine. See the module docs.
#[derive(Debug, Default)]
pub struct Controller {
    screen: Screen,
    form: RegistrationForm,
    credential: Credential,
    query: ReviewQuery,
    result: ReviewResult,
    status: RequestStatus,
    error: Option<String>,
    notice: Option<String>,

    last_id: RequestId,
    register_pending: Option<RequestId>,
    login_pending: Option<RequestId>,
    review_pending: Option<RequestId>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn is_authenticated(&self) -> bool {
        !self.credential.is_empty()
    }

    pub fn query(&self) -> &ReviewQuery {
        &self.query
    }

    pub fn result(&self) -> &ReviewResult {
        &self.result
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// The current error message, if the last attempt on this screen failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A one-shot informational message (e.g. after registering).
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// `true` while a request for `workflow` is outstanding.
    pub fn is_pending(&self, workflow: Workflow) -> bool {
        self.pending_slot(workflow).is_some()
    }

    /// Review inputs are read-only while a fetch is in flight.
    pub fn inputs_locked(&self) -> bool {
        self.status.is_loading()
    }

    /// Whether the "Get AI Review" trigger is enabled.
    pub fn can_submit_review(&self) -> bool {
        self.screen == Screen::Review
            && self.is_authenticated()
            && !self.status.is_loading()
            && self.query.is_complete()
    }

    // -----------------------------------------------------------------------
    // Field editing and navigation
    // -----------------------------------------------------------------------

    /// Mutable access to the registration/login fields, one keystroke at a time.
    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    /// Replaces the repository input. Ignored while a review is loading.
    pub fn set_repo_input(&mut self, text: impl Into<String>) {
        if !self.inputs_locked() {
            self.query.repo = text.into();
        }
    }

    /// Replaces the PR-number input, keeping ASCII digits only.
    /// Ignored while a review is loading.
    pub fn set_pr_number_input(&mut self, text: &str) {
        if !self.inputs_locked() {
            self.query.pr_number = digits_only(text);
        }
    }

    /// Switches to the Login screen. Refused once on the Review screen.
    pub fn show_login(&mut self) -> bool {
        self.navigate(Screen::Login)
    }

    /// Switches to the Register screen. Refused once on the Review screen.
    pub fn show_register(&mut self) -> bool {
        self.navigate(Screen::Register)
    }

    fn navigate(&mut self, target: Screen) -> bool {
        if self.screen == Screen::Review {
            return false;
        }
        if self.screen != target {
            // Leaving an auth screen abandons whatever it had in flight.
            self.register_pending = None;
            self.login_pending = None;
            self.error = None;
            self.notice = None;
            self.screen = target;
            tracing::debug!(screen = target.label(), "navigated");
        }
        true
    }

    // -----------------------------------------------------------------------
    // Register
    // -----------------------------------------------------------------------

    /// Starts a registration with the current form contents.
    ///
    /// Returns `None` while a previous registration is still pending.
    pub fn begin_register(&mut self) -> Option<Ticket<RegisterRequest>> {
        if self.register_pending.is_some() {
            return None;
        }
        let id = self.next_id();
        self.register_pending = Some(id);
        self.notice = None;
        tracing::info!(id, username = %self.form.username, "dispatching registration");
        Some(Ticket {
            id,
            workflow: Workflow::Register,
            request: self.form.clone(),
        })
    }

    /// Applies a registration outcome. Returns `false` if the ticket was stale.
    ///
    /// Success moves to Login with a notice; failure stores the service detail
    /// or [`REGISTER_FALLBACK`] and stays on the current screen.
    pub fn complete_register(&mut self, id: RequestId, outcome: Result<()>) -> bool {
        if !self.take_pending(Workflow::Register, id) {
            return false;
        }
        match outcome {
            Ok(()) => {
                tracing::info!(id, "registration succeeded");
                self.error = None;
                self.notice = Some(REGISTERED_NOTICE.to_owned());
                self.screen = Screen::Login;
            }
            Err(e) => {
                tracing::info!(id, error = %e, "registration failed");
                self.error = Some(e.user_message(REGISTER_FALLBACK));
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Login
    // -----------------------------------------------------------------------

    /// Starts a login with the form's username and password.
    ///
    /// Returns `None` while a previous login is still pending.
    pub fn begin_login(&mut self) -> Option<Ticket<LoginRequest>> {
        if self.login_pending.is_some() {
            return None;
        }
        let id = self.next_id();
        self.login_pending = Some(id);
        self.notice = None;
        tracing::info!(id, username = %self.form.username, "dispatching login");
        Some(Ticket {
            id,
            workflow: Workflow::Login,
            request: LoginRequest {
                username: self.form.username.clone(),
                password: self.form.password.clone(),
            },
        })
    }

    /// Applies a login outcome. Returns `false` if the ticket was stale.
    ///
    /// Success stores the token and moves to Review. A reply with an empty
    /// token counts as a failure so the Review screen is never reached
    /// without a credential.
    pub fn complete_login(&mut self, id: RequestId, outcome: Result<LoginResponse>) -> bool {
        if !self.take_pending(Workflow::Login, id) {
            return false;
        }
        let outcome = outcome.and_then(|r| {
            if r.access_token.is_empty() {
                Err(ApiError::Malformed("empty access_token".to_owned()))
            } else {
                Ok(r)
            }
        });
        match outcome {
            Ok(response) => {
                tracing::info!(id, "login succeeded");
                self.credential = Credential::new(response.access_token);
                self.error = None;
                self.screen = Screen::Review;
            }
            Err(e) => {
                tracing::info!(id, error = %e, "login failed");
                self.error = Some(e.user_message(LOGIN_FALLBACK));
            }
        }
        true
    }

    // -----------------------------------------------------------------------
    // Review
    // -----------------------------------------------------------------------

    /// Starts a review fetch for the current query.
    ///
    /// No-op (returns `None`, state untouched) unless both query fields are
    /// non-empty, a credential is held, and no fetch is already loading.
    ///
    /// Otherwise clears the previous error and result and sets the status to
    /// `Loading` before returning the ticket. If the PR number cannot be
    /// represented as an integer the attempt fails on the spot: the status
    /// becomes `Error(REVIEW_FALLBACK)` and `None` is returned.
    pub fn begin_review(&mut self) -> Option<Ticket<ReviewDispatch>> {
        if !self.query.is_complete() || self.status.is_loading() || !self.is_authenticated() {
            return None;
        }

        self.error = None;
        self.result.clear();

        let pr_number = match self.query.pr_number.parse::<u64>() {
            Ok(n) => n,
            Err(e) => {
                tracing::info!(input = %self.query.pr_number, error = %e, "PR number rejected");
                self.fail_review(REVIEW_FALLBACK.to_owned());
                return None;
            }
        };

        let id = self.next_id();
        self.review_pending = Some(id);
        self.status = RequestStatus::Loading;
        let repo = self.query.repo.trim().to_owned();
        tracing::info!(id, repo = %repo, pr_number, "dispatching review");

        Some(Ticket {
            id,
            workflow: Workflow::Review,
            request: ReviewDispatch {
                credential: self.credential.clone(),
                body: ReviewRequest { repo, pr_number },
            },
        })
    }

    /// Applies a review outcome. Returns `false` if the ticket was stale.
    ///
    /// Success replaces the result wholesale. Failure resolves the message as
    /// service detail, then transport message, then [`REVIEW_FALLBACK`]. A
    /// `401` additionally drops the credential and returns to Login. In every
    /// applied case the status leaves `Loading`.
    pub fn complete_review(&mut self, id: RequestId, outcome: Result<ReviewResult>) -> bool {
        if !self.take_pending(Workflow::Review, id) {
            return false;
        }
        match outcome {
            Ok(reviews) => {
                tracing::info!(id, files = reviews.len(), "review succeeded");
                self.result = reviews;
                self.error = None;
                self.status = RequestStatus::Success;
            }
            Err(e) if e.is_unauthorized() => {
                tracing::info!(id, "review rejected the credential; returning to login");
                self.result.clear();
                self.credential = Credential::default();
                self.status = RequestStatus::Idle;
                self.error = Some(SESSION_EXPIRED.to_owned());
                self.screen = Screen::Login;
            }
            Err(e) => {
                tracing::info!(id, error = %e, "review failed");
                self.fail_review(e.user_message_with_transport(REVIEW_FALLBACK));
            }
        }
        true
    }

    /// Clears the review inputs, result, and error. Screen and credential are
    /// untouched. Any fetch still in flight is abandoned. Idempotent.
    pub fn reset_review(&mut self) {
        if let Some(id) = self.review_pending.take() {
            tracing::debug!(id, "review abandoned by reset");
        }
        self.query = ReviewQuery::default();
        self.result.clear();
        self.error = None;
        self.status = RequestStatus::Idle;
    }

    fn fail_review(&mut self, message: String) {
        self.result.clear();
        self.error = Some(message.clone());
        self.status = RequestStatus::Error(message);
    }

    // -----------------------------------------------------------------------
    // Async façade
    // -----------------------------------------------------------------------

    /// Registers the current form against `api` and applies the outcome.
    ///
    /// Returns `Ok(())` without calling `api` if a registration ticket issued
    /// through [`Controller::begin_register`] is still outstanding.
    pub async fn register_account(&mut self, api: &dyn ReviewApi) -> Result<()> {
        let Some(ticket) = self.begin_register() else {
            return Ok(());
        };
        let outcome = api.register(&ticket.request).await;
        self.complete_register(ticket.id, outcome.clone());
        outcome
    }

    /// Logs in with `username` / `password` and applies the outcome.
    ///
    /// The values are written into the form first, as typing them would. If a
    /// login ticket is already outstanding nothing is sent and the current
    /// credential is returned as-is.
    pub async fn authenticate(
        &mut self,
        api: &dyn ReviewApi,
        username: &str,
        password: &str,
    ) -> Result<Credential> {
        self.form.username = username.to_owned();
        self.form.password = password.to_owned();
        let Some(ticket) = self.begin_login() else {
            return Ok(self.credential.clone());
        };
        let outcome = api.login(&ticket.request).await;
        self.complete_login(ticket.id, outcome.clone());
        match outcome {
            Ok(_) if self.is_authenticated() => Ok(self.credential.clone()),
            Ok(_) => Err(ApiError::Malformed("empty access_token".to_owned())),
            Err(e) => Err(e),
        }
    }

    /// Sets the query to `repo` / `pr_number`, fetches, and applies the outcome.
    ///
    /// `Ok(None)` means the preconditions were not met and nothing was sent.
    pub async fn submit_review(
        &mut self,
        api: &dyn ReviewApi,
        repo: &str,
        pr_number: &str,
    ) -> Result<Option<ReviewResult>> {
        self.set_repo_input(repo);
        self.set_pr_number_input(pr_number);
        let attempted =
            self.query.is_complete() && !self.status.is_loading() && self.is_authenticated();
        let Some(ticket) = self.begin_review() else {
            if attempted {
                return Err(ApiError::InvalidInput(self.query.pr_number.clone()));
            }
            return Ok(None);
        };
        let dispatch = &ticket.request;
        let outcome = api.review(&dispatch.credential, &dispatch.body).await;
        self.complete_review(ticket.id, outcome.clone());
        outcome.map(Some)
    }

    // -----------------------------------------------------------------------
    // Ticket bookkeeping
    // -----------------------------------------------------------------------

    fn next_id(&mut self) -> RequestId {
        self.last_id += 1;
        self.last_id
    }

    fn pending_slot(&self, workflow: Workflow) -> Option<RequestId> {
        match workflow {
            Workflow::Register => self.register_pending,
            Workflow::Login => self.login_pending,
            Workflow::Review => self.review_pending,
        }
    }

    /// Clears the pending slot if `id` is the current ticket for `workflow`.
    fn take_pending(&mut self, workflow: Workflow, id: RequestId) -> bool {
        let slot = match workflow {
            Workflow::Register => &mut self.register_pending,
            Workflow::Login => &mut self.login_pending,
            Workflow::Review => &mut self.review_pending,
        };
        if *slot == Some(id) {
            *slot = None;
            true
        } else {
            tracing::debug!(id, ?workflow, current = ?slot, "discarding stale completion");
            false
        }
    }
}

/// Keeps ASCII digits only, mirroring a numeric input's filter.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Canned-response `ReviewApi`. Unset responses fail with a transport error.
    #[derive(Default)]
    struct FakeApi {
        register: Option<Result<()>>,
        login: Option<Result<LoginResponse>>,
        review: Option<Result<ReviewResult>>,
        calls: AtomicUsize,
        last_review: Mutex<Option<(String, ReviewRequest)>>,
    }

    impl FakeApi {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn canned<T: Clone>(&self, slot: &Option<Result<T>>) -> Result<T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            slot.clone()
                .unwrap_or_else(|| Err(ApiError::Transport("no canned response".into())))
        }
    }

    #[async_trait]
    impl ReviewApi for FakeApi {
        async fn register(&self, _form: &RegisterRequest) -> Result<()> {
            self.canned(&self.register)
        }

        async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse> {
            self.canned(&self.login)
        }

        async fn review(
            &self,
            credential: &Credential,
            request: &ReviewRequest,
        ) -> Result<ReviewResult> {
            *self.last_review.lock().unwrap() =
                Some((credential.token().to_owned(), request.clone()));
            self.canned(&self.review)
        }
    }

    fn token(t: &str) -> LoginResponse {
        LoginResponse {
            access_token: t.into(),
            token_type: Some("bearer".into()),
        }
    }

    fn reviews(pairs: &[(&str, &str)]) -> ReviewResult {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn detail(status: u16, d: &str) -> ApiError {
        ApiError::Service {
            status,
            detail: Some(d.into()),
        }
    }

    /// A controller already on the Review screen holding credential "abc".
    async fn logged_in() -> Controller {
        let api = FakeApi {
            login: Some(Ok(token("abc"))),
            ..Default::default()
        };
        let mut c = Controller::new();
        c.authenticate(&api, "u1", "p1").await.unwrap();
        c
    }

    #[tokio::test]
    async fn register_success_moves_to_login() {
        let api = FakeApi {
            register: Some(Ok(())),
            ..Default::default()
        };
        let mut c = Controller::new();
        assert!(c.show_register());
        *c.form_mut() = RegistrationForm {
            name: "A".into(),
            username: "u1".into(),
            password: "p1".into(),
            github_token: "t".into(),
        };

        c.register_account(&api).await.unwrap();

        assert_eq!(c.screen(), Screen::Login);
        assert_eq!(c.error(), None);
        assert_eq!(c.notice(), Some(REGISTERED_NOTICE));
        // The form is kept, not cleared.
        assert_eq!(c.form().username, "u1");
    }

    #[tokio::test]
    async fn register_failure_shows_detail_or_fallback() {
        let api = FakeApi {
            register: Some(Err(detail(400, "Username already taken"))),
            ..Default::default()
        };
        let mut c = Controller::new();
        c.show_register();
        assert!(c.register_account(&api).await.is_err());
        assert_eq!(c.screen(), Screen::Register);
        assert_eq!(c.error(), Some("Username already taken"));

        let api = FakeApi {
            register: Some(Err(ApiError::Transport("connection refused".into()))),
            ..Default::default()
        };
        assert!(c.register_account(&api).await.is_err());
        assert_eq!(c.error(), Some(REGISTER_FALLBACK));
    }

    #[tokio::test]
    async fn login_success_sets_credential_and_moves_to_review() {
        let c = logged_in().await;
        assert_eq!(c.credential().token(), "abc");
        assert_eq!(c.screen(), Screen::Review);
        assert_eq!(c.error(), None);
    }

    #[tokio::test]
    async fn login_failure_leaves_screen_and_credential() {
        let api = FakeApi {
            login: Some(Err(detail(401, "Invalid credentials"))),
            ..Default::default()
        };
        let mut c = Controller::new();
        assert!(c.authenticate(&api, "u1", "wrong").await.is_err());
        assert_eq!(c.screen(), Screen::Login);
        assert!(!c.is_authenticated());
        assert_eq!(c.error(), Some("Invalid credentials"));

        let api = FakeApi {
            login: Some(Err(ApiError::Service {
                status: 500,
                detail: None,
            })),
            ..Default::default()
        };
        assert!(c.authenticate(&api, "u1", "p1").await.is_err());
        assert_eq!(c.error(), Some(LOGIN_FALLBACK));
        assert!(!c.is_authenticated());
    }

    #[tokio::test]
    async fn login_with_empty_token_is_a_failure() {
        let api = FakeApi {
            login: Some(Ok(token(""))),
            ..Default::default()
        };
        let mut c = Controller::new();
        assert!(c.authenticate(&api, "u1", "p1").await.is_err());
        assert_eq!(c.screen(), Screen::Login);
        assert_eq!(c.error(), Some(LOGIN_FALLBACK));
    }

    #[tokio::test]
    async fn review_success_stores_result() {
        let mut c = logged_in().await;
        let api = FakeApi {
            review: Some(Ok(reviews(&[("main.py", "looks good")]))),
            ..Default::default()
        };

        let out = c.submit_review(&api, "  octocat/hello-world ", "42").await.unwrap();

        assert_eq!(out, Some(reviews(&[("main.py", "looks good")])));
        assert_eq!(c.result(), &reviews(&[("main.py", "looks good")]));
        assert_eq!(c.status(), &RequestStatus::Success);
        let (bearer, body) = api.last_review.lock().unwrap().clone().unwrap();
        assert_eq!(bearer, "abc");
        let expected = ReviewRequest {
            repo: "octocat/hello-world".into(),
            pr_number: 42,
        };
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn review_service_error_shows_detail() {
        let mut c = logged_in().await;
        let api = FakeApi {
            review: Some(Err(detail(500, "rate limited"))),
            ..Default::default()
        };

        assert!(c.submit_review(&api, "octocat/hello-world", "42").await.is_err());

        assert_eq!(c.error(), Some("rate limited"));
        assert_eq!(c.status(), &RequestStatus::Error("rate limited".into()));
        assert!(c.result().is_empty());
    }

    #[tokio::test]
    async fn review_transport_error_uses_transport_message() {
        let mut c = logged_in().await;
        let api = FakeApi {
            review: Some(Err(ApiError::Transport("error sending request".into()))),
            ..Default::default()
        };
        let _ = c.submit_review(&api, "o/r", "1").await;
        assert_eq!(c.error(), Some("error sending request"));
        assert!(!c.status().is_loading());
    }

    #[tokio::test]
    async fn review_is_noop_when_a_field_is_empty() {
        let mut c = logged_in().await;
        let api = FakeApi::default();

        assert_eq!(c.submit_review(&api, "", "42").await.unwrap(), None);
        assert_eq!(c.submit_review(&api, "o/r", "").await.unwrap(), None);
        // Non-digits are filtered out, leaving the field empty.
        assert_eq!(c.submit_review(&api, "o/r", "abc").await.unwrap(), None);

        assert_eq!(api.calls(), 0);
        assert_eq!(c.status(), &RequestStatus::Idle);
        assert_eq!(c.error(), None);
    }

    #[tokio::test]
    async fn review_requires_credential() {
        let mut c = Controller::new();
        c.set_repo_input("o/r");
        c.set_pr_number_input("1");
        assert!(c.begin_review().is_none());
        assert_eq!(c.status(), &RequestStatus::Idle);
    }

    #[tokio::test]
    async fn no_second_dispatch_while_loading() {
        let mut c = logged_in().await;
        c.set_repo_input("o/r");
        c.set_pr_number_input("7");

        let first = c.begin_review().unwrap();
        assert!(c.status().is_loading());
        assert!(!c.can_submit_review());
        assert!(c.begin_review().is_none());

        // Inputs are read-only while loading.
        c.set_repo_input("other/repo");
        assert_eq!(c.query().repo, "o/r");

        assert!(c.complete_review(first.id, Ok(reviews(&[("a.rs", "ok")]))));
        assert_eq!(c.status(), &RequestStatus::Success);
        assert!(c.begin_review().is_some());
    }

    #[tokio::test]
    async fn starting_a_fetch_clears_previous_result_and_error() {
        let mut c = logged_in().await;
        c.set_repo_input("o/r");
        c.set_pr_number_input("1");
        let t = c.begin_review().unwrap();
        c.complete_review(t.id, Ok(reviews(&[("a.rs", "ok")])));
        assert_eq!(c.result().len(), 1);

        let _t = c.begin_review().unwrap();
        assert!(c.result().is_empty());
        assert_eq!(c.error(), None);
        assert!(c.status().is_loading());
    }

    #[tokio::test]
    async fn reset_clears_review_state_only() {
        let mut c = logged_in().await;
        let api = FakeApi {
            review: Some(Err(detail(500, "boom"))),
            ..Default::default()
        };
        let _ = c.submit_review(&api, "o/r", "3").await;

        c.reset_review();
        c.reset_review();

        assert!(c.result().is_empty());
        assert_eq!(c.error(), None);
        assert_eq!(c.query(), &ReviewQuery::default());
        assert_eq!(c.status(), &RequestStatus::Idle);
        assert_eq!(c.screen(), Screen::Review);
        assert_eq!(c.credential().token(), "abc");
    }

    #[tokio::test]
    async fn stale_review_after_reset_is_discarded() {
        let mut c = logged_in().await;
        c.set_repo_input("o/r");
        c.set_pr_number_input("1");
        let stale = c.begin_review().unwrap();

        c.reset_review();
        c.set_repo_input("o/r2");
        c.set_pr_number_input("2");
        let current = c.begin_review().unwrap();

        assert!(!c.complete_review(stale.id, Ok(reviews(&[("old.rs", "stale")]))));
        assert!(c.status().is_loading());
        assert!(c.result().is_empty());

        assert!(c.complete_review(current.id, Ok(reviews(&[("new.rs", "fresh")]))));
        assert_eq!(c.result(), &reviews(&[("new.rs", "fresh")]));
    }

    #[tokio::test]
    async fn unauthorized_review_returns_to_login() {
        let mut c = logged_in().await;
        let api = FakeApi {
            review: Some(Err(detail(401, "Invalid token"))),
            ..Default::default()
        };

        assert!(c.submit_review(&api, "o/r", "1").await.is_err());

        assert_eq!(c.screen(), Screen::Login);
        assert!(!c.is_authenticated());
        assert_eq!(c.error(), Some(SESSION_EXPIRED));
        assert!(!c.status().is_loading());
    }

    #[tokio::test]
    async fn pr_number_overflow_fails_without_dispatch() {
        let mut c = logged_in().await;
        let api = FakeApi::default();
        let out = c.submit_review(&api, "o/r", "99999999999999999999999").await;
        assert!(out.is_err());
        assert_eq!(api.calls(), 0);
        assert_eq!(c.status(), &RequestStatus::Error(REVIEW_FALLBACK.into()));
    }

    #[tokio::test]
    async fn pr_number_zero_is_not_submittable() {
        let mut c = logged_in().await;
        c.set_repo_input("o/r");
        for zero in ["0", "000"] {
            c.set_pr_number_input(zero);
            assert!(!c.can_submit_review());
            assert!(c.begin_review().is_none());
        }
        assert_eq!(c.status(), &RequestStatus::Idle);
        assert_eq!(c.error(), None);

        c.set_pr_number_input("007");
        assert!(c.can_submit_review());
        let ticket = c.begin_review().unwrap();
        assert_eq!(ticket.request.body.pr_number, 7);
    }

    #[test]
    fn duplicate_login_is_refused_while_pending() {
        let mut c = Controller::new();
        let first = c.begin_login().unwrap();
        assert!(c.is_pending(Workflow::Login));
        assert!(c.begin_login().is_none());
        assert!(c.complete_login(first.id, Ok(token("abc"))));
        assert!(!c.is_pending(Workflow::Login));
    }

    #[test]
    fn duplicate_register_is_refused_while_pending() {
        let mut c = Controller::new();
        c.show_register();
        let first = c.begin_register().unwrap();
        assert!(c.begin_register().is_none());
        assert!(c.complete_register(first.id, Err(detail(400, "Username already taken"))));
        assert!(c.begin_register().is_some());
    }

    #[test]
    fn navigating_away_abandons_pending_login() {
        let mut c = Controller::new();
        let ticket = c.begin_login().unwrap();
        c.show_register();

        assert!(!c.complete_login(ticket.id, Ok(token("abc"))));
        assert_eq!(c.screen(), Screen::Register);
        assert!(!c.is_authenticated());
    }

    #[test]
    fn navigation_clears_error_and_is_refused_on_review() {
        let mut c = Controller::new();
        let t = c.begin_login().unwrap();
        c.complete_login(t.id, Err(detail(401, "Invalid credentials")));
        assert!(c.error().is_some());

        c.show_register();
        assert_eq!(c.error(), None);

        c.show_login();
        let t = c.begin_login().unwrap();
        c.complete_login(t.id, Ok(token("abc")));
        assert!(!c.show_register());
        assert_eq!(c.screen(), Screen::Review);
    }

    #[test]
    fn pr_number_input_keeps_digits() {
        let mut c = Controller::new();
        c.set_pr_number_input("#12a3");
        assert_eq!(c.query().pr_number, "123");
        assert_eq!(digits_only("٣4"), "4");
    }
}
