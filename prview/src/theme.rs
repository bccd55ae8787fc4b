//! Color theme system for prview.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every surface
//! the three screens render. Two built-in themes are provided:
//!
//! - `dark` uses ANSI 16 colors so it works on any terminal, including
//!   256-color SSH sessions without truecolor support.
//! - `catppuccin_mocha` uses the Catppuccin Mocha palette in RGB.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    // Borders
    /// Border of the focused input or button.
    pub border_active: Color,
    pub border_inactive: Color,

    // Forms
    pub title: Color,
    pub subtitle: Color,
    pub input_text: Color,
    /// Placeholder text shown in empty inputs.
    pub placeholder: Color,
    pub button_primary: Color,
    pub button_secondary: Color,
    /// Label color for buttons that cannot be pressed right now.
    pub button_disabled: Color,
    /// "Don't have an account? Register" style links.
    pub link: Color,
    pub error: Color,
    pub notice: Color,

    // Review results
    pub filename: Color,
    pub review_text: Color,
    /// Fence lines (```lang) around code in review text.
    pub code_fence: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Screen badge color while signed out.
    pub status_signed_out: Color,
    /// Screen badge color while signed in.
    pub status_signed_in: Color,

    pub background: Color,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            title: Color::Blue,
            subtitle: Color::Gray,
            input_text: Color::Reset,
            placeholder: Color::DarkGray,
            button_primary: Color::Blue,
            button_secondary: Color::Gray,
            button_disabled: Color::DarkGray,
            link: Color::Cyan,
            error: Color::Red,
            notice: Color::Green,

            filename: Color::Blue,
            review_text: Color::Reset,
            code_fence: Color::DarkGray,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_signed_out: Color::Yellow,
            status_signed_in: Color::Green,

            background: Color::Reset,
        }
    }

    /// The Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let blue = Color::Rgb(137, 180, 250); // #89b4fa
        let sapphire = Color::Rgb(116, 199, 236); // #74c7ec
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let subtext0 = Color::Rgb(166, 173, 200); // #a6adc8
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            title: mauve,
            subtitle: subtext0,
            input_text: text,
            placeholder: overlay0,
            button_primary: blue,
            button_secondary: subtext0,
            button_disabled: overlay0,
            link: sapphire,
            error: red,
            notice: green,

            filename: blue,
            review_text: text,
            code_fence: overlay0,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_signed_out: yellow,
            status_signed_in: green,

            background: base,
        }
    }

    /// Resolves a theme name to a built-in theme.
    ///
    /// Unknown names fall back to `dark()` and log a warning.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
