//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::tui::app::{App, MessageRole, TurnStage, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use crate::upload::UploadKind;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::rc::Rc;

const INDENT: &str = "  ";

/// Split the screen into header, attachment, messages, input and status bar
pub fn main_layout(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(5),  // Attachment preview
            Constraint::Min(8),     // Messages
            Constraint::Length(4),  // Input
            Constraint::Length(1),  // Status bar
        ])
        .split(area)
}

/// Inner area of the messages pane for a given screen size
pub fn messages_viewport(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(main_layout(area)[2])
}

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = main_layout(frame.area());

    render_header(frame, chunks[0], app);
    widgets::render_upload_preview(
        frame,
        chunks[1],
        app.attachment_name.as_deref(),
        app.session.payload(),
        app.settings.supports_images(),
    );
    render_messages(frame, chunks[2], app);
    render_input(frame, chunks[3], app);
    render_status_bar(frame, chunks[4], app);

    match app.view {
        View::Settings => widgets::render_settings(frame, app),
        View::Help => render_help(frame),
        View::Attach => render_attach(frame, app),
        View::Chat => {}
    }
}

/// Header with the active model and key status
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let key_dot = if app.settings.has_api_key() {
        Span::styled(format!("{} key set", Icons::STATUS), Theme::success())
    } else {
        Span::styled(format!("{} no API key", Icons::STATUS), Theme::error())
    };

    let title_text = vec![Line::from(vec![
        Span::raw("✦ "),
        Span::styled("Gemini", Theme::title()),
        Span::styled(" Chat", Theme::text_secondary()),
        Span::raw("  "),
        Span::styled(app.settings.model.clone(), Theme::text()),
        Span::raw("  "),
        key_dot,
    ])];

    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .style(Style::default()),
        );

    frame.render_widget(title, area);
}

/// Transcript lines, wrapped to `width`
pub fn message_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let max_line_width = (width as usize).saturating_sub(INDENT.len()).max(1);

    let push_message = |lines: &mut Vec<Line<'static>>, role: &MessageRole, content: &str| {
        let (prefix, style) = match role {
            MessageRole::User => ("You", Theme::user_message()),
            MessageRole::Assistant => ("Gemini", Theme::assistant_message()),
            MessageRole::System => ("System", Theme::system_message()),
        };
        lines.push(Line::from(Span::styled(format!("{}: ", prefix), style)));

        for line in content.lines() {
            if line.is_empty() {
                lines.push(Line::from(INDENT));
                continue;
            }
            for chunk in wrap_line(line, max_line_width) {
                lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(chunk, Theme::text()),
                ]));
            }
        }
        lines.push(Line::from(""));
    };

    for msg in &app.messages {
        push_message(&mut lines, &msg.role, &msg.content);
    }

    if let Some(prompt) = &app.pending_prompt {
        push_message(&mut lines, &MessageRole::User, prompt);
        lines.push(Line::from(vec![
            Span::styled("Gemini: ", Theme::assistant_message()),
            Span::styled("Generating… ", Theme::text_dim()),
            Span::styled(Icons::CURSOR, Theme::active()),
        ]));
    }

    lines
}

/// Split a line at the last break character that fits, or hard-split a long word
pub fn wrap_line(line: &str, max_width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut remaining = line;

    while !remaining.is_empty() {
        if remaining.chars().count() <= max_width {
            out.push(remaining.to_string());
            break;
        }

        let mut break_byte = None;
        let mut hard_byte = remaining.len();
        for (seen, (idx, ch)) in remaining.char_indices().enumerate() {
            if seen >= max_width {
                hard_byte = idx;
                break;
            }
            if idx > 0 && (ch.is_whitespace() || ch == ',' || ch == ';') {
                break_byte = Some(idx);
            }
        }

        let (chunk, rest) = remaining.split_at(break_byte.unwrap_or(hard_byte));
        out.push(chunk.to_string());
        remaining = rest.trim_start();
    }

    out
}

fn render_messages(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Messages ")
        .borders(Borders::ALL)
        .border_style(if app.view == View::Chat {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(message_lines(app, inner_area.width)).scroll((app.scroll_offset, 0));
    frame.render_widget(paragraph, inner_area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.view == View::Chat && !app.is_generating();

    let block = Block::default()
        .title(" Input ")
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.input, inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match &app.stage {
        TurnStage::Idle => Span::styled("Ready", Theme::text_secondary()),
        TurnStage::Generating => Span::styled("Generating…", Theme::active()),
        TurnStage::Complete => Span::styled("Complete", Theme::complete()),
        TurnStage::Error(e) => Span::styled(format!("Error: {}", e), Theme::error()),
    };

    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Send ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+O]", Theme::shortcut_key()),
        Span::styled(" Attach ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+S]", Theme::shortcut_key()),
        Span::styled(" Settings ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

/// Path prompt for attaching a file
fn render_attach(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 30, frame.area());
    frame.render_widget(Clear, area);

    let supported: Vec<String> = UploadKind::SUPPORTED
        .iter()
        .map(|kind| format!("{} ({})", kind, kind.extensions().join(", ")))
        .collect();

    let mut lines = vec![
        Line::from(Span::styled("Path to the file to attach:", Theme::text())),
        Line::from(vec![
            Span::styled(format!("> {}", app.attach_input), Theme::warning()),
            Span::styled(Icons::CURSOR, Theme::active()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Supported:", Theme::text_secondary())),
    ];
    lines.extend(
        supported
            .into_iter()
            .map(|s| Line::from(Span::styled(format!("  {}", s), Theme::text_dim()))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter]", Theme::shortcut_key()),
        Span::styled(" Attach ", Theme::shortcut_desc()),
        Span::styled("[Esc]", Theme::shortcut_key()),
        Span::styled(" Cancel", Theme::shortcut_desc()),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Attach File ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let shortcut = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:<13}", key), Theme::shortcut_key()),
            Span::styled(desc, Theme::text()),
        ])
    };

    let help_lines = vec![
        Line::from(Span::styled("How to use", Theme::heading())),
        Line::from(Span::styled("1. Enter your Google API key in Settings (Ctrl+S)", Theme::text())),
        Line::from(Span::styled("2. Pick a model; vision models accept images", Theme::text())),
        Line::from(Span::styled("3. Adjust temperature and max tokens if needed", Theme::text())),
        Line::from(Span::styled("4. Optionally attach a file (Ctrl+O)", Theme::text())),
        Line::from(Span::styled("5. Type a message and press Enter", Theme::text())),
        Line::from(""),
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        shortcut("Enter", "Send message / Confirm"),
        shortcut("Ctrl+O", "Attach a file"),
        shortcut("Ctrl+X", "Remove the attachment"),
        shortcut("Ctrl+S", "Open settings"),
        shortcut("Ctrl+Q", "Quit application"),
        shortcut("Ctrl+C", "Force quit"),
        shortcut("↑/↓", "Scroll messages"),
        shortcut("PageUp/Down", "Scroll page"),
        shortcut("Tab / ←→", "Select / adjust (in settings)"),
        shortcut("Esc", "Close modal / Cancel"),
        shortcut("F1", "Show this help"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
