//! Settings Widget
//!
//! Modal dialog for the API key, model and generation parameters.

use crate::tui::app::{App, SettingsField};
use crate::tui::theme::{Icons, Theme};
use crate::tui::ui::centered_rect;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the settings modal
pub fn render_settings(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),  // Instructions
            Constraint::Min(8),     // Fields
            Constraint::Length(2),  // Footer
        ])
        .split(inner);

    render_instructions(frame, chunks[0]);
    render_fields(frame, chunks[1], app);
    render_footer(frame, chunks[2], app);
}

fn render_instructions(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Settings apply to the next message. Nothing is saved to disk.",
            Theme::text(),
        )),
        Line::from(vec![
            Span::styled("[Tab/↑↓]", Theme::shortcut_key()),
            Span::styled(" Select ", Theme::shortcut_desc()),
            Span::styled("[←→]", Theme::shortcut_key()),
            Span::styled(" Adjust ", Theme::shortcut_desc()),
            Span::styled("[Enter]", Theme::shortcut_key()),
            Span::styled(" Edit/Save key ", Theme::shortcut_desc()),
            Span::styled("[Esc]", Theme::shortcut_key()),
            Span::styled(" Close", Theme::shortcut_desc()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_fields(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();

    for field in SettingsField::ALL {
        let is_selected = field == app.settings_field;
        let prefix = if is_selected { Icons::SELECTED } else { " " };
        let name_style = if is_selected {
            Theme::selected()
        } else {
            Theme::text()
        };

        let mut spans = vec![
            Span::styled(
                format!("{} ", prefix),
                if is_selected { Theme::selected() } else { Theme::text_dim() },
            ),
            Span::styled(format!("{:<13}", field.label()), name_style),
        ];
        spans.extend(field_value(field, app, is_selected));
        lines.push(Line::from(spans));

        if is_selected && field == SettingsField::ApiKey && app.settings_show_input {
            let input_display = if app.settings_input.is_empty() {
                "Enter API key...".to_string()
            } else {
                Icons::DOT.repeat(app.settings_input.chars().count())
            };
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(format!("[{}]", input_display), Theme::warning()),
                Span::styled(" ", Theme::text()),
                Span::styled(Icons::CURSOR, Theme::active()),
            ]));
        }

        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn field_value(field: SettingsField, app: &App, is_selected: bool) -> Vec<Span<'static>> {
    let arrows = |value: String| {
        if is_selected {
            vec![
                Span::styled("◀ ", Theme::text_dim()),
                Span::styled(value, Theme::text()),
                Span::styled(" ▶", Theme::text_dim()),
            ]
        } else {
            vec![Span::styled(value, Theme::text())]
        }
    };

    match field {
        SettingsField::ApiKey => match app.settings.key_hint() {
            Some(hint) => vec![
                Span::styled(format!("{} ", Icons::COMPLETE), Theme::success()),
                Span::styled(hint, Theme::text_dim()),
            ],
            None => vec![Span::styled(
                format!("{} Not set", Icons::PENDING),
                Theme::text_dim(),
            )],
        },
        SettingsField::Model => {
            let mut spans = arrows(app.settings.model.clone());
            if app.settings.supports_images() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(" vision ", Theme::badge_primary()));
            }
            spans
        }
        SettingsField::Temperature => arrows(format!("{:.2}", app.settings.temperature)),
        SettingsField::MaxTokens => arrows(app.settings.max_tokens.to_string()),
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.settings_field {
        SettingsField::ApiKey if app.settings_show_input => {
            "Type your API key, then press Enter to save (empty clears it)"
        }
        SettingsField::ApiKey if app.settings.has_api_key() => "Press Enter to change the key",
        SettingsField::ApiKey => "Press Enter to enter a Google API key",
        SettingsField::Model => "Only models with 'vision' in the name accept images",
        SettingsField::Temperature => "Range 0.00 to 1.00, step 0.05",
        SettingsField::MaxTokens => "Range 1 to 2048, step 50",
    };

    let line = Line::from(Span::styled(help_text, Theme::text_secondary()));
    frame.render_widget(Paragraph::new(line), area);
}
