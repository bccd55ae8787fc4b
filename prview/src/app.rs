//! Central application state for prview.
//!
//! `AppState` wraps the [`Controller`] (everything the screens show) with the
//! UI-only state around it: which widget has focus, overlay mode, results
//! scroll position, spinner frame, and the job channel to the API worker. No
//! ratatui rendering logic lives here; it is read by the render module and
//! mutated by the keybinding dispatcher and by API outcomes.

use prview_core::types::Screen;
use prview_core::{ApiError, Controller, Workflow};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{ApiJob, ApiOutcome};
use crate::ui::results::ResultsLayout;

/// Overlay mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Full-screen help overlay is shown above the current screen.
    HelpOverlay,
}

/// A focusable widget on one of the three screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Username,
    Password,
    GithubToken,
    Repo,
    PrNumber,
    /// The screen's primary button (Register / Login / Get AI Review).
    Submit,
    /// The link to the other auth screen.
    SwitchScreen,
    /// "New Review", offered once results are on screen.
    NewReview,
}

impl Field {
    /// `true` for text inputs; `false` for buttons and links.
    pub fn is_input(self) -> bool {
        matches!(
            self,
            Field::Name
                | Field::Username
                | Field::Password
                | Field::GithubToken
                | Field::Repo
                | Field::PrNumber
        )
    }
}

const REGISTER_FIELDS: &[Field] = &[
    Field::Name,
    Field::Username,
    Field::Password,
    Field::GithubToken,
    Field::Submit,
    Field::SwitchScreen,
];
const LOGIN_FIELDS: &[Field] = &[
    Field::Username,
    Field::Password,
    Field::Submit,
    Field::SwitchScreen,
];
const REVIEW_FIELDS: &[Field] = &[Field::Repo, Field::PrNumber, Field::Submit];
const REVIEW_FIELDS_WITH_RESULTS: &[Field] =
    &[Field::Repo, Field::PrNumber, Field::Submit, Field::NewReview];

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// All mutable state passed through every render cycle.
pub struct AppState {
    pub controller: Controller,
    pub mode: Mode,

    /// Index into [`AppState::fields`] of the focused widget.
    pub focus_index: usize,
    /// Screen the focus index refers to; focus resets when the screen changes.
    focus_screen: Screen,

    /// First visible row of the flattened results view.
    pub results_scroll: usize,
    /// Inner height of the results panel, cached after each render.
    pub results_viewport_height: u16,
    /// Wrapped review lines for the current result and panel width.
    /// `None` after the result changes; rebuilt by the renderer.
    pub results_layout: Option<ResultsLayout>,

    pub help_scroll: u16,
    spinner_frame: usize,

    /// Screen areas of the focusable widgets drawn in the last frame, for
    /// mouse hit-testing.
    pub hit_areas: Vec<(Field, Rect)>,

    api_tx: UnboundedSender<ApiJob>,
}

impl AppState {
    pub fn new(api_tx: UnboundedSender<ApiJob>) -> Self {
        Self {
            controller: Controller::new(),
            mode: Mode::default(),
            focus_index: 0,
            focus_screen: Screen::default(),
            results_scroll: 0,
            results_viewport_height: 0,
            results_layout: None,
            help_scroll: 0,
            spinner_frame: 0,
            hit_areas: Vec::new(),
            api_tx,
        }
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// The focusable widgets of the current screen, in tab order.
    pub fn fields(&self) -> &'static [Field] {
        match self.controller.screen() {
            Screen::Register => REGISTER_FIELDS,
            Screen::Login => LOGIN_FIELDS,
            Screen::Review if self.controller.result().is_empty() => REVIEW_FIELDS,
            Screen::Review => REVIEW_FIELDS_WITH_RESULTS,
        }
    }

    pub fn focused(&self) -> Field {
        let fields = self.fields();
        fields[self.focus_index.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus_index = (self.focus_index + 1) % self.fields().len();
    }

    /// Focuses `field` if the current screen has it.
    pub fn focus_field(&mut self, field: Field) -> bool {
        match self.fields().iter().position(|&f| f == field) {
            Some(index) => {
                self.focus_index = index;
                true
            }
            None => false,
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.focus_index = (self.focus_index + len - 1) % len;
    }

    /// Resets focus to the first field after a screen change and keeps the
    /// index in range when the field list shrinks.
    fn sync_focus(&mut self) {
        let screen = self.controller.screen();
        if screen != self.focus_screen {
            self.focus_screen = screen;
            self.focus_index = 0;
        }
        self.focus_index = self.focus_index.min(self.fields().len() - 1);
    }

    // -----------------------------------------------------------------------
    // Text editing
    // -----------------------------------------------------------------------

    /// Current text of an input field.
    pub fn field_value(&self, field: Field) -> &str {
        let form = self.controller.form();
        let query = self.controller.query();
        match field {
            Field::Name => &form.name,
            Field::Username => &form.username,
            Field::Password => &form.password,
            Field::GithubToken => &form.github_token,
            Field::Repo => &query.repo,
            Field::PrNumber => &query.pr_number,
            Field::Submit | Field::SwitchScreen | Field::NewReview => "",
        }
    }

    /// Applies `edit` to the focused input. Buttons ignore edits.
    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        match self.focused() {
            Field::Name => edit(&mut self.controller.form_mut().name),
            Field::Username => edit(&mut self.controller.form_mut().username),
            Field::Password => edit(&mut self.controller.form_mut().password),
            Field::GithubToken => edit(&mut self.controller.form_mut().github_token),
            Field::Repo => {
                let mut repo = self.controller.query().repo.clone();
                edit(&mut repo);
                self.controller.set_repo_input(repo);
            }
            Field::PrNumber => {
                let mut pr = self.controller.query().pr_number.clone();
                edit(&mut pr);
                self.controller.set_pr_number_input(&pr);
            }
            Field::Submit | Field::SwitchScreen | Field::NewReview => {}
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit_focused(|s| s.push(c));
    }

    pub fn delete_char(&mut self) {
        self.edit_focused(|s| {
            s.pop();
        });
    }

    pub fn clear_field(&mut self) {
        self.edit_focused(String::clear);
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Enter: activates the focused button, or submits the form from an input.
    pub fn activate(&mut self) {
        match self.focused() {
            Field::SwitchScreen => self.toggle_auth_screen(),
            Field::NewReview => self.reset_review(),
            _ => self.submit(),
        }
    }

    /// Submits the current screen's form through the API worker.
    ///
    /// The controller refuses duplicates and incomplete review queries, in
    /// which case nothing is sent.
    pub fn submit(&mut self) {
        let job = match self.controller.screen() {
            Screen::Register | Screen::Login if !self.auth_form_ready() => None,
            Screen::Register => self.controller.begin_register().map(ApiJob::Register),
            Screen::Login => self.controller.begin_login().map(ApiJob::Login),
            Screen::Review => {
                let job = self.controller.begin_review().map(ApiJob::Review);
                // Results were cleared (or replaced by an error) on dispatch.
                self.invalidate_results();
                job
            }
        };
        if let Some(job) = job {
            self.dispatch(job);
        }
        self.sync_focus();
    }

    /// Every field the current auth screen requires is filled in.
    ///
    /// Always `false` on the Review screen, which has its own precondition.
    pub fn auth_form_ready(&self) -> bool {
        let form = self.controller.form();
        match self.controller.screen() {
            Screen::Register => form.is_complete(),
            Screen::Login => form.has_login_fields(),
            Screen::Review => false,
        }
    }

    fn dispatch(&mut self, job: ApiJob) {
        if let Err(rejected) = self.api_tx.send(job) {
            tracing::warn!(id = rejected.0.id(), "api worker unavailable");
            let outcome = rejected
                .0
                .into_failure(ApiError::Transport("API worker unavailable".to_owned()));
            self.apply_api_outcome(outcome);
        }
    }

    /// Switches between Login and Register. No-op on the Review screen.
    pub fn toggle_auth_screen(&mut self) {
        match self.controller.screen() {
            Screen::Login => {
                self.controller.show_register();
            }
            Screen::Register => {
                self.controller.show_login();
            }
            Screen::Review => {}
        }
        self.sync_focus();
    }

    /// "New Review": clears inputs and results and focuses the repo input.
    pub fn reset_review(&mut self) {
        if self.controller.screen() != Screen::Review {
            return;
        }
        self.controller.reset_review();
        self.invalidate_results();
        self.focus_index = 0;
    }

    /// Applies a finished call to the controller. Stale outcomes are dropped
    /// by the controller and leave the UI untouched.
    pub fn apply_api_outcome(&mut self, outcome: ApiOutcome) {
        let applied = match outcome {
            ApiOutcome::Register { id, result } => self.controller.complete_register(id, result),
            ApiOutcome::Login { id, result } => self.controller.complete_login(id, result),
            ApiOutcome::Review { id, result } => {
                let applied = self.controller.complete_review(id, result);
                if applied {
                    self.invalidate_results();
                }
                applied
            }
        };
        if applied {
            self.sync_focus();
        }
    }

    /// `true` while any request is outstanding.
    pub fn is_busy(&self) -> bool {
        [Workflow::Register, Workflow::Login, Workflow::Review]
            .into_iter()
            .any(|w| self.controller.is_pending(w))
    }

    pub fn on_tick(&mut self) {
        if self.is_busy() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame]
    }

    // -----------------------------------------------------------------------
    // Results scrolling
    // -----------------------------------------------------------------------

    fn invalidate_results(&mut self) {
        self.results_layout = None;
        self.results_scroll = 0;
    }

    fn results_len(&self) -> usize {
        self.results_layout.as_ref().map_or(0, |l| l.lines.len())
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.results_len().saturating_sub(1);
        self.results_scroll = self.results_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.results_scroll = self.results_scroll.saturating_sub(lines);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.results_viewport_height.max(1)));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(usize::from(self.results_viewport_height.max(1)));
    }

    /// Scrolls so the next file's header is the first visible row.
    pub fn next_file(&mut self) {
        let Some(layout) = &self.results_layout else {
            return;
        };
        if let Some(&offset) = layout.file_offsets.iter().find(|&&o| o > self.results_scroll) {
            self.results_scroll = offset;
        }
    }

    /// Scrolls to the header of the file above the current position.
    pub fn prev_file(&mut self) {
        let Some(layout) = &self.results_layout else {
            return;
        };
        if let Some(&offset) = layout.file_offsets.iter().rev().find(|&&o| o < self.results_scroll)
        {
            self.results_scroll = offset;
        }
    }
}
