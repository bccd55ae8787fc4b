//! Register and Login screens.
//!
//! Both are a centered card: title, bordered inputs, a submit button, the
//! link to the other screen, and the error/notice line.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use prview_core::Workflow;

use crate::app::{AppState, Field};
use crate::theme::Theme;
use crate::ui::layout::{
    centered_card, inner_rect, panel_block, render_button, render_input, render_message, Button,
    Input,
};

const CARD_WIDTH: u16 = 56;

struct FormSpec {
    title: &'static str,
    workflow: Workflow,
    inputs: &'static [(Field, &'static str, &'static str, bool)],
    submit: &'static str,
    switch: &'static str,
}

const REGISTER: FormSpec = FormSpec {
    title: "Register",
    workflow: Workflow::Register,
    inputs: &[
        (Field::Name, "Name", "Full Name", false),
        (Field::Username, "Username", "Username", false),
        (Field::Password, "Password", "Password", true),
        (Field::GithubToken, "GitHub Token", "GitHub Token", true),
    ],
    submit: "Register",
    switch: "Already have an account? Login",
};

const LOGIN: FormSpec = FormSpec {
    title: "Login",
    workflow: Workflow::Login,
    inputs: &[
        (Field::Username, "Username", "Username", false),
        (Field::Password, "Password", "Password", true),
    ],
    submit: "Login",
    switch: "Don't have an account? Register",
};

pub fn render_register(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    render_form(frame, area, &REGISTER, state, theme);
}

pub fn render_login(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    render_form(frame, area, &LOGIN, state, theme);
}

fn render_form(
    frame: &mut Frame,
    area: Rect,
    spec: &FormSpec,
    state: &mut AppState,
    theme: &Theme,
) {
    // spacer, inputs, gap, submit, link, gap, message rows, borders
    let fields = spec.inputs.len() as u16;
    let height = 1 + 3 * fields + 4 + 3 + 2;
    let card = centered_card(area, CARD_WIDTH, height);

    let title = Line::from(Span::styled(
        format!(" {} ", spec.title),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(panel_block(title, false, theme), card);
    let inner = inner_rect(card).inner(Margin {
        vertical: 0,
        horizontal: 1,
    });

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(spec.inputs.iter().map(|_| Constraint::Length(3)));
    constraints.extend([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ]);
    let rows = Layout::vertical(constraints).split(inner);

    let pending = state.controller.is_pending(spec.workflow);
    for (i, &(field, label, placeholder, masked)) in spec.inputs.iter().enumerate() {
        let input = Input {
            field,
            label,
            placeholder,
            masked,
            locked: pending,
        };
        render_input(frame, rows[1 + i], &input, state, theme);
    }

    let after = 1 + spec.inputs.len();
    let submit = Button {
        field: Field::Submit,
        label: spec.submit,
        enabled: !pending && state.auth_form_ready(),
        color: theme.button_primary,
    };
    render_button(frame, rows[after + 1], &submit, state, theme);
    let switch = Button {
        field: Field::SwitchScreen,
        label: spec.switch,
        enabled: true,
        color: theme.link,
    };
    render_button(frame, rows[after + 2], &switch, state, theme);

    let message_area = rows[after + 4];
    render_message(frame, message_area, state, theme);

    if message_area.height > 1 && pending {
        let waiting = Paragraph::new(Span::styled(
            format!("{} contacting the review service", state.spinner()),
            Style::default().fg(theme.subtitle),
        ));
        let row = Rect {
            y: message_area.y + 1,
            height: 1,
            ..message_area
        };
        frame.render_widget(waiting, row);
    }
}
