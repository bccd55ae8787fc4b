//! Flattened, wrapped lines for the review results panel.
//!
//! Each file becomes a card: a filename header, its highlighted review text,
//! and a blank separator. The whole result is flattened into one line list
//! wrapped to the panel width so the panel can scroll it virtually, showing
//! only `lines[scroll..scroll + height]` per frame.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use prview_core::types::ReviewResult;
use unicode_width::UnicodeWidthChar;

use crate::theme::Theme;
use crate::ui::highlight::highlight_review;

/// Results rendered for one panel width.
#[derive(Debug, Clone, Default)]
pub struct ResultsLayout {
    /// Width the lines were wrapped to. A resize triggers a rebuild.
    pub width: u16,
    pub lines: Vec<Line<'static>>,
    /// Index into `lines` of each file's header, in result order.
    pub file_offsets: Vec<usize>,
}

impl ResultsLayout {
    pub fn build(result: &ReviewResult, width: u16, theme: &Theme) -> Self {
        let header = Style::default().fg(theme.filename).add_modifier(Modifier::BOLD);
        let wrap_at = usize::from(width.max(1));
        let mut layout = Self {
            width,
            ..Self::default()
        };

        for (filename, review) in result {
            layout.file_offsets.push(layout.lines.len());
            let title = Line::from(Span::styled(format!("── {filename}"), header));
            layout.lines.extend(wrap_line(title, wrap_at));
            for line in highlight_review(filename, review, theme) {
                layout.lines.extend(wrap_line(line, wrap_at));
            }
            layout.lines.push(Line::default());
        }

        layout
    }
}

/// Hard-wraps `line` at `width` terminal columns, keeping each span's style.
///
/// A wide character that would straddle the edge moves to the next row.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if line.width() <= width {
        return vec![line];
    }

    let mut out = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in line.spans {
        let style = span.style;
        let mut piece = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width && used > 0 {
                if !piece.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut piece), style));
                }
                out.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            piece.push(c);
            used += w;
        }
        if !piece.is_empty() {
            current.push(Span::styled(piece, style));
        }
    }
    if !current.is_empty() {
        out.push(Line::from(current));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn file_headers_follow_result_order() {
        let mut result = ReviewResult::new();
        result.insert("b.rs".into(), "first\nsecond".into());
        result.insert("a.rs".into(), "only".into());

        let layout = ResultsLayout::build(&result, 80, &Theme::dark());

        assert_eq!(layout.file_offsets, vec![0, 4]);
        assert_eq!(text_of(&layout.lines[0]), "── b.rs");
        assert_eq!(text_of(&layout.lines[4]), "── a.rs");
        assert_eq!(layout.lines.len(), 7);
    }

    #[test]
    fn long_lines_wrap_and_keep_styles() {
        let theme = Theme::dark();
        let red = Style::default().fg(theme.error);
        let line = Line::from(vec![Span::raw("abcd"), Span::styled("efghij", red)]);

        let wrapped = wrap_line(line, 4);

        let texts: Vec<String> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, ["abcd", "efgh", "ij"]);
        assert_eq!(wrapped[2].spans[0].style, red);
    }

    #[test]
    fn multibyte_text_wraps_on_char_boundaries() {
        let wrapped = wrap_line(Line::raw("ééééé"), 2);
        let texts: Vec<String> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, ["éé", "éé", "é"]);
    }

    #[test]
    fn wide_characters_wrap_by_column_width() {
        let wrapped = wrap_line(Line::raw("日本語"), 4);
        let texts: Vec<String> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, ["日本", "語"]);

        let wrapped = wrap_line(Line::raw("a日本"), 4);
        let texts: Vec<String> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, ["a日", "本"]);
        assert!(wrapped.iter().all(|l| l.width() <= 4));
    }
}
