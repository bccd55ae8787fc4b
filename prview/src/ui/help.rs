//! Help overlay renderer for prview.
//!
//! Draws a centred modal over the current screen. `Clear` erases the area first,
//! so the overlay is drawn in the same `terminal.draw()` closure as everything
//! else.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 40 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: Up/Down scroll, F1 or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let heading = |s: &'static str| {
        Line::from(Span::styled(
            s,
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ))
    };
    Text::from(vec![
        heading("Forms"),
        Line::from("  Tab / Down       Next field"),
        Line::from("  Shift-Tab / Up   Previous field"),
        Line::from("  Enter            Submit, or press the focused button"),
        Line::from("  Backspace        Delete last character"),
        Line::from("  Ctrl-u           Clear the focused field"),
        Line::from("  Ctrl-r           Switch between Login and Register"),
        Line::from(""),
        heading("Review"),
        Line::from("  Ctrl-n           New review (clear inputs and results)"),
        Line::from("  PageDown / Up    Scroll results by a page"),
        Line::from("  Ctrl-j / Ctrl-k  Scroll results by a line"),
        Line::from("  Alt-Down / Up    Next / previous file"),
        Line::from("  Mouse wheel      Scroll results"),
        Line::from(""),
        heading("General"),
        Line::from("  F1               Open / close this help"),
        Line::from("  Esc / Ctrl-c     Quit"),
    ])
}
