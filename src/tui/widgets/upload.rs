//! Upload Preview Widget
//!
//! Shows what will be sent with the next message.

use crate::tui::theme::{Icons, Theme};
use crate::upload::NormalizedPayload;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the pending attachment box
pub fn render_upload_preview(
    frame: &mut Frame,
    area: Rect,
    name: Option<&str>,
    payload: Option<&NormalizedPayload>,
    supports_images: bool,
) {
    let title = match name {
        Some(name) if payload.is_some() => format!(" Attachment: {} ", name),
        _ => " Attachment ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let max_lines = inner.height as usize;

    let lines: Vec<Line> = match payload {
        None => vec![Line::from(Span::styled(
            "No file attached. Press Ctrl+O to attach one.",
            Theme::text_dim(),
        ))],
        Some(NormalizedPayload::Image { pixels }) => {
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} ", Icons::COMPLETE), Theme::success()),
                Span::styled(
                    format!("Image {}x{} ready", pixels.width(), pixels.height()),
                    Theme::text(),
                ),
            ])];
            if !supports_images {
                lines.push(Line::from(Span::styled(
                    "The selected model cannot read images. Pick a vision model in Settings.",
                    Theme::warning(),
                )));
            }
            lines
        }
        Some(NormalizedPayload::Text { content }) => preview_lines(content, max_lines, width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Theme::text_secondary())))
            .collect(),
        Some(NormalizedPayload::Error { message }) => vec![Line::from(vec![
            Span::styled(format!("{} ", Icons::ERROR), Theme::error()),
            Span::styled(message.clone(), Theme::error()),
        ])],
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

/// First lines of extracted text, clipped to the box
pub fn preview_lines(content: &str, max_lines: usize, width: usize) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }

    let total = content.lines().count();
    let shown = if total > max_lines { max_lines - 1 } else { total };

    let mut lines: Vec<String> = content
        .lines()
        .take(shown)
        .map(|line| truncate_string(line, width))
        .collect();

    if total > shown {
        lines.push(format!("… {} more lines", total - shown));
    }
    lines
}

/// Truncate a string to fit within a given width (in characters)
fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_fits() {
        assert_eq!(preview_lines("a\nb", 3, 10), vec!["a", "b"]);
    }

    #[test]
    fn test_preview_reports_hidden_lines() {
        let content = "1\n2\n3\n4\n5";
        assert_eq!(preview_lines(content, 3, 10), vec!["1", "2", "… 3 more lines"]);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate_string("📄 report.txt", 6), "📄 r...");
        assert_eq!(truncate_string("short", 10), "short");
    }
}
