//! Theme and Styling
//!
//! Colors and styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // === Palette ===

    /// Gemini blue
    pub const ACCENT: Color = Color::Rgb(66, 133, 244);
    pub const ACCENT_SOFT: Color = Color::Rgb(155, 114, 203);
    pub const SUCCESS: Color = Color::Rgb(52, 168, 83);
    pub const WARNING: Color = Color::Rgb(251, 188, 5);
    pub const ERROR: Color = Color::Rgb(234, 67, 53);

    pub const TEXT_PRIMARY: Color = Color::Rgb(232, 234, 237);
    pub const TEXT_SECONDARY: Color = Color::Rgb(154, 160, 166);
    pub const TEXT_DIM: Color = Color::Rgb(95, 99, 104);

    pub const BORDER: Color = Color::Rgb(60, 64, 67);
    pub const BORDER_FOCUSED: Color = Color::Rgb(138, 180, 248);

    // === Styles ===

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Selected settings row
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn user_message() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn assistant_message() -> Style {
        Style::default()
            .fg(Self::ACCENT_SOFT)
            .add_modifier(Modifier::BOLD)
    }

    /// Welcome text, warnings and errors in the transcript
    pub fn system_message() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Request in flight
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    pub fn complete() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn badge_primary() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }
}

pub struct Icons;

impl Icons {
    pub const COMPLETE: &'static str = "✓";
    pub const PENDING: &'static str = "○";
    pub const ERROR: &'static str = "✗";
    pub const CURSOR: &'static str = "▌";
    pub const SELECTED: &'static str = "▶";
    pub const DOT: &'static str = "•";
    pub const STATUS: &'static str = "●";
}
