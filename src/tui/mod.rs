//! Terminal User Interface Module
//!
//! Chat front-end for Gemini, built with Ratatui.
//!
//! # Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ✦ Gemini Chat   gemini-1.5-flash   ● key set                  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─ Attachment: notes.pdf ─────────────────────────────────┐   │
//! │  │ [first lines of the extracted text / image size / error] │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Messages ──────────────────────────────────────────────┐   │
//! │  │  [Scrollable message history]                            │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  ┌─ Input ─────────────────────────────────────────────────┐   │
//! │  │ > Type your message here...                              │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │  Ready │ [Enter] Send [Ctrl+O] Attach [Ctrl+S] Settings ...    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::{App, TurnStage, View};
pub use event::{AppAction, EventHandler};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run(config: crate::config::Config, attach: Option<PathBuf>) -> anyhow::Result<()> {
    info!("Starting TUI mode");

    let mut app = App::new(config)?;
    if let Some(path) = attach {
        app.attach_path(&path).await;
    }

    let mut terminal = init_terminal()?;
    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        let viewport = ui::messages_viewport(terminal.get_frame().area());
        let content_height = ui::message_lines(app, viewport.width).len();
        app.update_scroll_bounds(
            u16::try_from(content_height).unwrap_or(u16::MAX),
            viewport.height,
        );

        terminal.draw(|frame| ui::render(frame, app))?;

        // The "Generating…" frame is on screen; block on the request now.
        if app.is_generating() {
            app.run_pending().await;
            events.drain();
            continue;
        }

        match events.next().await {
            Some(AppAction::Quit) | Some(AppAction::ForceQuit) | None => break,
            Some(action) => app.handle_action(action).await,
        }

        if app.should_quit {
            break;
        }
    }

    info!("TUI exited normally");
    Ok(())
}
