//! Layout helpers shared by the three screens.
//!
//! Pure layout arithmetic plus the small widgets every screen is built from:
//! bordered inputs, one-row buttons, the message line, and the status bar.
//! Called inside `terminal.draw()` on every render, so each frame reflects the
//! current terminal size.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Field};
use crate::theme::Theme;

/// Returns `[main, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame) -> [Rect; 2] {
    frame
        .area()
        .layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]))
}

/// Centers a card of at most `width` x `height` cells inside `area`.
pub fn centered_card(area: Rect, width: u16, height: u16) -> Rect {
    area.centered(
        Constraint::Length(width.min(area.width)),
        Constraint::Length(height.min(area.height)),
    )
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    })
}

/// Builds a bordered `Block`, thick and highlighted when focused.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused {
        BorderType::Thick
    } else {
        BorderType::Plain
    };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
}

/// One text input as drawn on a form.
pub struct Input<'a> {
    pub field: Field,
    pub label: &'a str,
    pub placeholder: &'a str,
    pub masked: bool,
    /// Read-only while a request is in flight.
    pub locked: bool,
}

/// Draws `input` into a 3-row bordered box and records its hit area.
///
/// When the input is focused and editable the terminal cursor is placed after
/// the last visible character.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    input: &Input<'_>,
    state: &mut AppState,
    theme: &Theme,
) {
    let focused = state.focused() == input.field;
    let value = state.field_value(input.field);
    let block = panel_block(format!(" {} ", input.label), focused, theme);
    let inner = inner_rect(area);

    let shown = if input.masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_owned()
    };
    // Keep the tail in view once the text outgrows the box.
    let room = usize::from(inner.width.saturating_sub(1));
    let skip = shown.chars().count().saturating_sub(room);
    let visible: String = shown.chars().skip(skip).collect();
    let visible_len = visible.chars().count();

    let text_style = if input.locked {
        Style::default().fg(theme.placeholder)
    } else {
        Style::default().fg(theme.input_text)
    };
    let line = if visible.is_empty() {
        Line::from(Span::styled(
            input.placeholder.to_owned(),
            Style::default().fg(theme.placeholder),
        ))
    } else {
        Line::from(Span::styled(visible, text_style))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
    state.hit_areas.push((input.field, area));

    if focused && !input.locked && inner.width > 0 && inner.height > 0 {
        // visible_len <= room < inner.width, so the cast cannot truncate.
        let x = inner.x + visible_len as u16;
        frame.set_cursor_position(Position { x, y: inner.y });
    }
}

/// One button or link as drawn on a form.
pub struct Button<'a> {
    pub field: Field,
    pub label: &'a str,
    pub enabled: bool,
    pub color: Color,
}

/// Draws a one-row button label. Disabled buttons are dimmed.
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    button: &Button<'_>,
    state: &mut AppState,
    theme: &Theme,
) {
    let focused = state.focused() == button.field;
    let mut style = if button.enabled {
        Style::default().fg(button.color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.button_disabled)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let text = format!("[ {} ]", button.label);
    let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX).min(area.width);
    let button_area = Rect { width, ..area };

    frame.render_widget(Paragraph::new(Span::styled(text, style)), button_area);
    state.hit_areas.push((button.field, button_area));
}

/// Draws the error line, or the notice line when there is no error.
pub fn render_message(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let line = match (state.controller.error(), state.controller.notice()) {
        (Some(error), _) => Line::from(Span::styled(
            error.to_owned(),
            Style::default().fg(theme.error),
        )),
        (None, Some(notice)) => Line::from(Span::styled(
            notice.to_owned(),
            Style::default().fg(theme.notice),
        )),
        (None, None) => return,
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the 1-row status bar: screen, auth state, request spinner, help hint.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let signed_in = state.controller.is_authenticated();
    let badge_color = if signed_in {
        theme.status_signed_in
    } else {
        theme.status_signed_out
    };
    let screen = state.controller.screen();
    let mut spans = vec![
        Span::styled(
            format!(" {} ", screen.label().to_uppercase()),
            Style::default()
                .fg(theme.status_bar_bg)
                .bg(badge_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(if signed_in { " signed in " } else { " signed out " }),
    ];

    if state.controller.status().is_loading() {
        spans.push(Span::styled(
            format!(" {} reviewing ", state.spinner()),
            Style::default().fg(theme.border_active),
        ));
    } else if state.is_busy() {
        spans.push(Span::styled(
            format!(" {} waiting for service ", state.spinner()),
            Style::default().fg(theme.border_active),
        ));
    }

    spans.push(Span::styled(" F1 help ", Style::default().fg(theme.subtitle)));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
