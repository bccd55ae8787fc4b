//! UI rendering module for prview.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout helpers live in `layout.rs`; each screen
//! has its own renderer.

mod forms;
pub mod help;
pub mod highlight;
pub mod keybindings;
mod layout;
pub mod results;
mod review_view;

use ratatui::{Frame, style::Style, widgets::Block};

use prview_core::types::Screen;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Renders one complete frame: the current screen, the status bar, and the
/// help overlay when it is open.
///
/// The results viewport height and widget hit areas are written back into
/// `state` so the next key or mouse event can use them.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );
    let [main, status_bar] = compute_layout(frame);

    state.hit_areas.clear();
    match state.controller.screen() {
        Screen::Register => forms::render_register(frame, main, state, theme),
        Screen::Login => forms::render_login(frame, main, state, theme),
        Screen::Review => review_view::render_review(frame, main, state, theme),
    }

    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

#[cfg(test)]
mod tests {
    use prview_core::types::{LoginResponse, ReviewResult};
    use ratatui::{Terminal, backend::TestBackend, style::Color};
    use tokio::sync::mpsc::unbounded_channel;

    use super::*;
    use crate::api::{ApiJob, ApiOutcome};
    use crate::ui::review_view::{LOADING_LABEL, SUBMIT_LABEL};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(terminal: &mut Terminal<TestBackend>, state: &mut AppState) -> String {
        let theme = Theme::dark();
        terminal
            .draw(|frame| render(frame, state, &theme))
            .expect("draw to test backend");
        screen_text(terminal)
    }

    fn signed_in() -> (AppState, tokio::sync::mpsc::UnboundedReceiver<ApiJob>) {
        let (tx, mut rx) = unbounded_channel();
        let mut state = AppState::new(tx);
        state.controller.form_mut().username = "u1".into();
        state.controller.form_mut().password = "p1".into();
        state.submit();
        let Ok(ApiJob::Login(ticket)) = rx.try_recv() else {
            panic!("expected a login job");
        };
        state.apply_api_outcome(ApiOutcome::Login {
            id: ticket.id,
            result: Ok(LoginResponse {
                access_token: "abc".into(),
                token_type: None,
            }),
        });
        (state, rx)
    }

    /// Foreground color of the first cell of `label` on screen.
    fn label_fg(terminal: &Terminal<TestBackend>, label: &str) -> Option<Color> {
        let buffer = terminal.backend().buffer();
        for y in 0..buffer.area.height {
            let row: Vec<&str> = (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            let text = row.concat();
            if let Some(byte) = text.find(label) {
                let x = text[..byte].chars().count() as u16;
                return Some(buffer[(x, y)].fg);
            }
        }
        None
    }

    #[test]
    fn login_screen_masks_the_password() {
        let (tx, _rx) = unbounded_channel();
        let mut state = AppState::new(tx);
        state.focus_next();
        for c in "hunter2".chars() {
            state.insert_char(c);
        }
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");

        let text = draw(&mut terminal, &mut state);

        assert!(text.contains("Login"));
        assert!(text.contains("•••••••"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("Don't have an account? Register"));
    }

    #[test]
    fn login_button_is_dimmed_until_both_fields_are_filled() {
        let (tx, _rx) = unbounded_channel();
        let mut state = AppState::new(tx);
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test terminal");

        draw(&mut terminal, &mut state);
        assert_eq!(label_fg(&terminal, "[ Login ]"), Some(theme.button_disabled));

        state.controller.form_mut().username = "u1".into();
        state.controller.form_mut().password = "p1".into();
        draw(&mut terminal, &mut state);
        assert_eq!(label_fg(&terminal, "[ Login ]"), Some(theme.button_primary));
    }

    #[test]
    fn review_button_reads_reviewing_while_loading() {
        let (mut state, _rx) = signed_in();
        state.controller.set_repo_input("octocat/hello-world");
        state.controller.set_pr_number_input("42");
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");

        assert!(draw(&mut terminal, &mut state).contains(SUBMIT_LABEL));
        state.submit();
        let text = draw(&mut terminal, &mut state);
        assert!(text.contains(LOADING_LABEL));
        assert!(!text.contains(SUBMIT_LABEL));
    }

    #[test]
    fn results_render_in_service_order_and_record_file_offsets() {
        let (mut state, mut rx) = signed_in();
        state.controller.set_repo_input("o/r");
        state.controller.set_pr_number_input("7");
        state.submit();
        let Ok(ApiJob::Review(ticket)) = rx.try_recv() else {
            panic!("expected a review job");
        };
        let mut reviews = ReviewResult::new();
        reviews.insert("zeta.rs".into(), "Looks fine.".into());
        reviews.insert("alpha.rs".into(), "Needs tests.".into());
        state.apply_api_outcome(ApiOutcome::Review {
            id: ticket.id,
            result: Ok(reviews),
        });
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("test terminal");

        let text = draw(&mut terminal, &mut state);

        let zeta = text.find("zeta.rs").expect("zeta shown");
        let alpha = text.find("alpha.rs").expect("alpha shown");
        assert!(zeta < alpha);
        assert!(text.contains("New Review"));
        let layout = state.results_layout.as_ref().expect("layout cached");
        assert_eq!(layout.file_offsets, vec![0, 3]);
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let (mut state, _rx) = signed_in();
        state.mode = Mode::HelpOverlay;
        let mut terminal = Terminal::new(TestBackend::new(10, 3)).expect("test terminal");
        draw(&mut terminal, &mut state);
    }
}
