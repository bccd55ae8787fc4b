//! Syntax highlighting of fenced code blocks inside review text.
//!
//! Review text is markdown-ish prose. Lines between ```` ``` ```` fences are
//! highlighted with syntect; the syntax comes from the fence's language tag,
//! else from the reviewed file's extension, else plain text. Prose lines use
//! the theme's review color.

use std::sync::LazyLock;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::theme::Theme;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const FENCE: &str = "```";

/// Loads the syntax and theme sets so the first review does not pay for it.
pub fn warm_up() {
    LazyLock::force(&PS);
    LazyLock::force(&TS);
}

fn code_theme() -> Option<&'static SyntectTheme> {
    TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next())
}

/// Picks the syntax for a fenced block in `filename`'s review.
pub fn syntax_for(lang: &str, filename: &str) -> &'static SyntaxReference {
    let lang = lang.trim();
    let by_lang = (!lang.is_empty()).then(|| PS.find_syntax_by_token(lang)).flatten();
    by_lang
        .or_else(|| file_ext(filename).and_then(|ext| PS.find_syntax_by_extension(ext)))
        .unwrap_or_else(|| PS.find_syntax_plain_text())
}

/// Extension of a repository-relative path, if it has one.
fn file_ext(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Trailing newlines are stripped; the caller emits one `Line` per source line.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::Color as SC;
    let to_color = |c: SC| -> Option<Color> {
        if c.a > 0 { Some(Color::Rgb(c.r, c.g, c.b)) } else { None }
    };
    let mut ratatui_style = Style::default();
    if let Some(fg) = to_color(style.foreground) {
        ratatui_style = ratatui_style.fg(fg);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.trim_end_matches(['\n', '\r']).to_owned(), ratatui_style)
}

fn highlight_code_line(code: &str, h: &mut HighlightLines<'_>) -> Line<'static> {
    let with_newline = format!("{code}\n");
    let spans: Vec<Span<'static>> = h
        .highlight_line(&with_newline, &PS)
        .unwrap_or_default()
        .into_iter()
        .map(|(style, text)| syntect_to_span(style, text))
        .filter(|span| !span.content.is_empty())
        .collect();
    if spans.is_empty() {
        Line::raw(code.to_owned())
    } else {
        Line::from(spans)
    }
}

/// Renders one file's review text into styled, unwrapped lines.
pub fn highlight_review(filename: &str, text: &str, theme: &Theme) -> Vec<Line<'static>> {
    let prose = Style::default().fg(theme.review_text);
    let fence = Style::default().fg(theme.code_fence);

    let mut lines = Vec::new();
    // Some while inside a fenced block; None when no syntect theme is available.
    let mut block: Option<Option<HighlightLines<'static>>> = None;

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        if let Some(tag) = trimmed.strip_prefix(FENCE) {
            block = match block {
                Some(_) => None,
                None => {
                    let syntax = syntax_for(tag, filename);
                    Some(code_theme().map(|t| HighlightLines::new(syntax, t)))
                }
            };
            lines.push(Line::from(Span::styled(raw.to_owned(), fence)));
            continue;
        }
        match block.as_mut() {
            Some(Some(h)) => lines.push(highlight_code_line(raw, h)),
            Some(None) => lines.push(Line::raw(raw.to_owned())),
            None => lines.push(Line::from(Span::styled(raw.to_owned(), prose))),
        }
    }

    lines
}
