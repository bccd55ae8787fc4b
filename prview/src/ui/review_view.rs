//! Review screen: repository and PR inputs, the review trigger, and the
//! scrolling results panel.
//!
//! The results panel uses manual virtual scrolling: only
//! `lines[results_scroll..results_scroll + viewport]` are handed to the `List`
//! per frame, so long reviews cost O(viewport) to draw.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::app::{AppState, Field};
use crate::theme::Theme;
use crate::ui::layout::{
    inner_rect, panel_block, render_button, render_input, render_message, Button, Input,
};
use crate::ui::results::ResultsLayout;

/// Label of the review trigger while idle.
pub const SUBMIT_LABEL: &str = "Get AI Review";
/// Label of the review trigger while a fetch is in flight.
pub const LOADING_LABEL: &str = "Reviewing...";

pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let area = area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    let [header, inputs, buttons, message, results] = area.layout(&Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ]));

    render_header(frame, header, theme);
    render_inputs(frame, inputs, state, theme);
    render_buttons(frame, buttons, state, theme);
    render_message(frame, message, state, theme);
    render_results(frame, results, state, theme);
}

fn render_header(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(Span::styled(
            "AI Code Review",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Get intelligent feedback on your GitHub pull requests",
            Style::default().fg(theme.subtitle),
        )),
    ];
    frame.render_widget(Paragraph::new(text), area);
}

fn render_inputs(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [repo_area, pr_area] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(20)]));
    let locked = state.controller.inputs_locked();

    let repo = Input {
        field: Field::Repo,
        label: "Repository",
        placeholder: "e.g. facebook/react",
        masked: false,
        locked,
    };
    render_input(frame, repo_area, &repo, state, theme);

    let pr = Input {
        field: Field::PrNumber,
        label: "PR #",
        placeholder: "e.g. 123",
        masked: false,
        locked,
    };
    render_input(frame, pr_area, &pr, state, theme);
}

fn render_buttons(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let loading = state.controller.status().is_loading();
    let label = if loading { LOADING_LABEL } else { SUBMIT_LABEL };
    let submit = Button {
        field: Field::Submit,
        label,
        enabled: state.controller.can_submit_review(),
        color: theme.button_primary,
    };
    render_button(frame, area, &submit, state, theme);

    if state.fields().contains(&Field::NewReview) {
        let offset = u16::try_from(label.len() + 6).unwrap_or(u16::MAX);
        let rest = Rect {
            x: area.x.saturating_add(offset),
            width: area.width.saturating_sub(offset),
            ..area
        };
        let reset = Button {
            field: Field::NewReview,
            label: "New Review",
            enabled: !loading,
            color: theme.button_secondary,
        };
        render_button(frame, rest, &reset, state, theme);
    }
}

fn render_results(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let count = state.controller.result().len();
    let title = if count == 0 {
        " Code Review Results ".to_owned()
    } else {
        format!(" Code Review Results ({count} files) ")
    };
    frame.render_widget(panel_block(title, false, theme), area);

    let inner = inner_rect(area);
    state.results_viewport_height = inner.height;
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if count == 0 {
        let msg = if state.controller.status().is_loading() {
            format!("{} Reviewing pull request. This can take a few minutes.", state.spinner())
        } else {
            "Enter a repository and PR number, then press Enter.".to_owned()
        };
        let item = ListItem::new(Line::from(Span::styled(
            msg,
            Style::default().fg(theme.placeholder),
        )));
        frame.render_widget(List::new(vec![item]), inner);
        return;
    }

    if state.results_layout.as_ref().is_none_or(|l| l.width != inner.width) {
        let layout = ResultsLayout::build(state.controller.result(), inner.width, theme);
        state.results_layout = Some(layout);
    }
    let Some(layout) = state.results_layout.as_ref() else {
        return;
    };

    let total = layout.lines.len();
    let visible_start = state.results_scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + usize::from(inner.height)).min(total);
    state.results_scroll = visible_start;

    let items: Vec<ListItem> = layout.lines[visible_start..visible_end]
        .iter()
        .map(|l| ListItem::new(l.clone()))
        .collect();
    frame.render_widget(List::new(items), inner);
}
