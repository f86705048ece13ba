//! Event Handling
//!
//! Handles keyboard and timer events for the TUI.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit without confirmation
    ForceQuit,
    /// Submit current input (Enter key)
    Submit,
    ToggleSettings,
    ToggleHelp,
    /// Open the attach-file dialog
    OpenAttach,
    /// Drop the pending attachment
    ClearAttachment,
    /// Escape - close modals, cancel
    Escape,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    /// Move to next field (Tab)
    NextField,
    /// Move to previous field (Shift+Tab)
    PrevField,
    /// Decrease the selected setting (←)
    Decrease,
    /// Increase the selected setting (→)
    Increase,
    /// Regular input character
    Input(KeyEvent),
    /// Timer tick for redraws
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = Self::map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }

    /// Drop queued input, e.g. keys typed while a request was running
    pub fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }

    fn map_event(event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) => Self::map_key_event(key),
            _ => None,
        }
    }

    /// Map a key event to an app action
    pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),

            (KeyModifiers::CONTROL, KeyCode::Char('s')) => Some(AppAction::ToggleSettings),
            (KeyModifiers::CONTROL, KeyCode::Char('o')) => Some(AppAction::OpenAttach),
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => Some(AppAction::ClearAttachment),

            (KeyModifiers::SHIFT, KeyCode::BackTab) => Some(AppAction::PrevField),

            (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => Some(AppAction::Escape),
                KeyCode::Enter => Some(AppAction::Submit),
                KeyCode::F(1) => Some(AppAction::ToggleHelp),

                KeyCode::Up => Some(AppAction::ScrollUp),
                KeyCode::Down => Some(AppAction::ScrollDown),
                KeyCode::PageUp => Some(AppAction::ScrollPageUp),
                KeyCode::PageDown => Some(AppAction::ScrollPageDown),

                KeyCode::Left => Some(AppAction::Decrease),
                KeyCode::Right => Some(AppAction::Increase),

                KeyCode::Tab => Some(AppAction::NextField),

                _ => Some(AppAction::Input(key)),
            },

            _ => Some(AppAction::Input(key)),
        }
    }
}
