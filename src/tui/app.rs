//! Application State
//!
//! Contains the main application state and logic for the TUI.

use crate::chat::{ConversationSession, ReplyAgent, Role};
use crate::config::Config;
use crate::llm::google::GoogleAdapter;
use crate::settings::ChatSettings;
use crate::tui::event::AppAction;
use crate::types::AppError;
use crate::upload::{process_upload, UploadedFile};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{error, info, warn};
use tui_textarea::TextArea;

const INPUT_PLACEHOLDER: &str = "Type your message here...";

/// State of the current chat turn
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TurnStage {
    #[default]
    Idle,
    /// Waiting on Gemini
    Generating,
    Complete,
    Error(String),
}

/// A line in the transcript view
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Chat,
    Settings,
    Help,
    Attach,
}

/// Rows of the settings modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    ApiKey,
    Model,
    Temperature,
    MaxTokens,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        SettingsField::ApiKey,
        SettingsField::Model,
        SettingsField::Temperature,
        SettingsField::MaxTokens,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::ApiKey => "API Key",
            SettingsField::Model => "Model",
            SettingsField::Temperature => "Temperature",
            SettingsField::MaxTokens => "Max Tokens",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Main application state
pub struct App {
    pub config: Config,

    // UI State
    pub view: View,
    pub should_quit: bool,

    // Chat State
    pub session: ConversationSession,
    pub messages: Vec<ChatMessage>,
    pub input: TextArea<'static>,
    pub scroll_offset: u16,
    pub max_scroll: u16,
    follow_bottom: bool,
    synced_turns: usize,

    // Turn State
    pub stage: TurnStage,
    pub pending_prompt: Option<String>,

    // Upload State
    pub attachment_name: Option<String>,
    pub attach_input: String,

    // Settings State
    pub settings: ChatSettings,
    pub settings_field: SettingsField,
    pub settings_input: String,
    pub settings_show_input: bool,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let settings = ChatSettings::from_config(&config.llm)?;

        let mut welcome = String::from(
            "Welcome to Gemini Chat!\n\n\
             Type a message below to get started. Attach a file with Ctrl+O.",
        );
        if !settings.has_api_key() {
            welcome.push_str("\nPress Ctrl+S to enter your Google API key in Settings.");
        }

        Ok(Self {
            config,
            view: View::Chat,
            should_quit: false,
            session: ConversationSession::new(),
            messages: vec![ChatMessage {
                role: MessageRole::System,
                content: welcome,
                timestamp: Utc::now(),
            }],
            input: Self::new_input(),
            scroll_offset: 0,
            max_scroll: 0,
            follow_bottom: true,
            synced_turns: 0,
            stage: TurnStage::Idle,
            pending_prompt: None,
            attachment_name: None,
            attach_input: String::new(),
            settings,
            settings_field: SettingsField::ApiKey,
            settings_input: String::new(),
            settings_show_input: false,
        })
    }

    fn new_input() -> TextArea<'static> {
        let mut input = TextArea::default();
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(INPUT_PLACEHOLDER);
        input
    }

    pub fn is_generating(&self) -> bool {
        self.pending_prompt.is_some()
    }

    fn push_system(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: MessageRole::System,
            content: content.into(),
            timestamp: Utc::now(),
        });
        self.scroll_to_bottom();
    }

    /// Copy turns the session gained since the last sync into the transcript
    fn sync_transcript(&mut self) {
        let new_turns: Vec<ChatMessage> = self.session.turns()[self.synced_turns..]
            .iter()
            .map(|turn| ChatMessage {
                role: turn.role.into(),
                content: turn.text.clone(),
                timestamp: turn.timestamp,
            })
            .collect();
        self.synced_turns = self.session.turns().len();
        self.messages.extend(new_turns);
        self.scroll_to_bottom();
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => match self.view {
                View::Settings => self.save_current_setting(),
                View::Attach => self.submit_attach().await,
                View::Help => self.view = View::Chat,
                View::Chat => self.submit_message(),
            },
            AppAction::ToggleSettings => {
                self.view = if self.view == View::Settings {
                    View::Chat
                } else {
                    View::Settings
                };
                self.cancel_settings_input();
            }
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Chat
                } else {
                    View::Help
                };
            }
            AppAction::OpenAttach => {
                self.view = View::Attach;
                self.attach_input.clear();
            }
            AppAction::ClearAttachment => self.clear_attachment(),
            AppAction::Escape => {
                if self.view != View::Chat {
                    self.view = View::Chat;
                    self.cancel_settings_input();
                    self.attach_input.clear();
                }
            }
            AppAction::ScrollUp => {
                if self.view == View::Settings {
                    self.move_settings_field(false);
                } else {
                    self.scroll_offset = self.scroll_offset.saturating_sub(1);
                    self.follow_bottom = false;
                }
            }
            AppAction::ScrollDown => {
                if self.view == View::Settings {
                    self.move_settings_field(true);
                } else {
                    self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll);
                    self.follow_bottom = self.scroll_offset == self.max_scroll;
                }
            }
            AppAction::ScrollPageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                self.follow_bottom = false;
            }
            AppAction::ScrollPageDown => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll);
                self.follow_bottom = self.scroll_offset == self.max_scroll;
            }
            AppAction::NextField => {
                if self.view == View::Settings {
                    self.move_settings_field(true);
                }
            }
            AppAction::PrevField => {
                if self.view == View::Settings {
                    self.move_settings_field(false);
                }
            }
            AppAction::Decrease => self.adjust_setting(false),
            AppAction::Increase => self.adjust_setting(true),
            AppAction::Input(key_event) => self.handle_input(key_event),
            AppAction::Tick => {}
        }
    }

    fn handle_input(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match self.view {
            View::Settings => {
                if !self.settings_show_input {
                    return;
                }
                match key.code {
                    KeyCode::Char(c) => self.settings_input.push(c),
                    KeyCode::Backspace => {
                        self.settings_input.pop();
                    }
                    _ => {}
                }
            }
            View::Attach => match key.code {
                KeyCode::Char(c) => self.attach_input.push(c),
                KeyCode::Backspace => {
                    self.attach_input.pop();
                }
                _ => {}
            },
            View::Chat => {
                self.input.input(key);
            }
            View::Help => self.view = View::Chat,
        }
    }

    fn move_settings_field(&mut self, forward: bool) {
        self.settings_field = if forward {
            self.settings_field.next()
        } else {
            self.settings_field.prev()
        };
        self.cancel_settings_input();
    }

    fn cancel_settings_input(&mut self) {
        self.settings_show_input = false;
        self.settings_input.clear();
    }

    fn adjust_setting(&mut self, up: bool) {
        if self.view != View::Settings {
            return;
        }
        match self.settings_field {
            SettingsField::ApiKey => {}
            SettingsField::Model => self.settings.cycle_model(up),
            SettingsField::Temperature => {
                self.settings.adjust_temperature(if up { 0.05 } else { -0.05 })
            }
            SettingsField::MaxTokens => {
                self.settings.adjust_max_tokens(if up { 50 } else { -50 })
            }
        }
    }

    /// Enter on the API key row starts editing; Enter again stores the key
    fn save_current_setting(&mut self) {
        if self.settings_field != SettingsField::ApiKey {
            return;
        }
        if !self.settings_show_input {
            self.settings_show_input = true;
            return;
        }

        let key = std::mem::take(&mut self.settings_input);
        self.settings.set_api_key(key);
        self.settings_show_input = false;

        if self.settings.has_api_key() {
            info!("API key updated");
        } else {
            warn!("API key cleared");
        }
    }

    /// Record the message as pending; the run loop sends it after the next draw
    fn submit_message(&mut self) {
        if self.is_generating() {
            return;
        }

        let content = self.input.lines().join("\n").trim().to_string();
        if content.is_empty() {
            return;
        }

        self.input = Self::new_input();
        self.pending_prompt = Some(content);
        self.stage = TurnStage::Generating;
        self.scroll_to_bottom();
    }

    /// Send the pending message, if any, and fold the outcome into the transcript
    pub async fn run_pending(&mut self) {
        let Some(prompt) = self.pending_prompt.take() else {
            return;
        };

        let llm = GoogleAdapter::with_base_url(
            self.settings.api_key().unwrap_or_default(),
            &self.config.llm.api_base,
        );

        let result = ReplyAgent::respond(&mut self.session, &prompt, &self.settings, &llm).await;
        self.sync_transcript();

        match result {
            Ok(_) => {
                self.stage = TurnStage::Complete;
            }
            Err(AppError::MissingCredential) => {
                self.stage = TurnStage::Error(AppError::MissingCredential.to_string());
                self.push_system(
                    "API key required. Press Ctrl+S to open Settings and enter your Google API key.",
                );
                self.restore_input(&prompt);
            }
            Err(e @ AppError::ModelCapabilityMismatch(_)) => {
                self.stage = TurnStage::Error(e.to_string());
                self.push_system(e.to_string());
                self.restore_input(&prompt);
            }
            Err(e) => {
                error!(error = %e, "Chat completion failed");
                self.stage = TurnStage::Error(e.to_string());
                let mut note = format!("Error: {}", e);
                if let Some(hint) = ReplyAgent::capability_hint(&self.session, &self.settings) {
                    note.push('\n');
                    note.push_str(&hint);
                }
                self.push_system(note);
            }
        }
    }

    /// Put an unsent message back into the input box
    fn restore_input(&mut self, prompt: &str) {
        let mut input = TextArea::new(prompt.lines().map(str::to_string).collect());
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(INPUT_PLACEHOLDER);
        self.input = input;
    }

    async fn submit_attach(&mut self) {
        let path = self.attach_input.trim().to_string();
        if path.is_empty() {
            return;
        }
        self.attach_input.clear();
        self.view = View::Chat;
        self.attach_path(Path::new(&path)).await;
    }

    /// Read and normalize a file, replacing any pending attachment
    pub async fn attach_path(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let outcome = match UploadedFile::from_path(path).await {
            Ok(file) => process_upload(&file),
            Err(e) => Err(e),
        };

        let note = match &outcome {
            Ok(payload) => format!("Attached {} ({})", name, payload.summary()),
            Err(e) => format!("Could not attach {}: {}", name, e),
        };

        self.session.attach(outcome);
        self.attachment_name = Some(name);
        self.push_system(note);
    }

    fn clear_attachment(&mut self) {
        if self.session.clear_payload().is_some() {
            if let Some(name) = self.attachment_name.take() {
                self.push_system(format!("Removed attachment {}", name));
            }
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.follow_bottom = true;
        self.scroll_offset = self.max_scroll;
    }

    /// Update max scroll based on content
    pub fn update_scroll_bounds(&mut self, content_height: u16, viewport_height: u16) {
        self.max_scroll = content_height.saturating_sub(viewport_height);
        if self.follow_bottom || self.scroll_offset > self.max_scroll {
            self.scroll_offset = self.max_scroll;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LLMConfig, LoggingConfig};
    use crate::upload::NormalizedPayload;
    use mockito::Matcher;
    use std::io::Write;
    use std::path::PathBuf;

    fn test_config(api_key: &str, api_base: &str) -> Config {
        Config {
            llm: LLMConfig {
                google_api_key: api_key.to_string(),
                default_model: "gemini-1.5-flash".to_string(),
                temperature: 0.7,
                max_tokens: 1000,
                api_base: api_base.to_string(),
            },
            logging: LoggingConfig {
                dir: PathBuf::from("."),
                filter: "gemini_chat=debug".to_string(),
            },
        }
    }

    fn type_text(app: &mut App, text: &str) {
        app.input.insert_str(text);
    }

    #[test]
    fn test_settings_fields_wrap() {
        assert_eq!(SettingsField::ApiKey.prev(), SettingsField::MaxTokens);
        assert_eq!(SettingsField::MaxTokens.next(), SettingsField::ApiKey);
        assert_eq!(SettingsField::Model.next(), SettingsField::Temperature);
    }

    #[tokio::test]
    async fn test_settings_adjustments() {
        let mut app = App::new(test_config("", "http://localhost")).unwrap();
        app.handle_action(AppAction::ToggleSettings).await;

        app.handle_action(AppAction::NextField).await;
        assert_eq!(app.settings_field, SettingsField::Model);
        app.handle_action(AppAction::Increase).await;
        assert_eq!(app.settings.model, "gemini-1.5-pro");

        app.handle_action(AppAction::NextField).await;
        app.handle_action(AppAction::Decrease).await;
        assert_eq!(app.settings.temperature, 0.65);

        app.handle_action(AppAction::NextField).await;
        app.handle_action(AppAction::Increase).await;
        assert_eq!(app.settings.max_tokens, 1050);
    }

    #[tokio::test]
    async fn test_api_key_entry() {
        let mut app = App::new(test_config("", "http://localhost")).unwrap();
        app.handle_action(AppAction::ToggleSettings).await;
        app.handle_action(AppAction::Submit).await;
        assert!(app.settings_show_input);

        app.settings_input.push_str("AIzaKey9876");
        app.handle_action(AppAction::Submit).await;
        assert!(!app.settings_show_input);
        assert_eq!(app.settings.key_hint(), Some("••••9876".to_string()));
    }

    #[tokio::test]
    async fn test_missing_key_warns_without_request() {
        let mut app = App::new(test_config("", "http://localhost")).unwrap();
        type_text(&mut app, "hello");
        app.handle_action(AppAction::Submit).await;
        assert!(app.is_generating());

        app.run_pending().await;

        assert!(!app.is_generating());
        assert!(app.session.turns().is_empty());
        let last = app.messages.last().unwrap();
        assert_eq!(last.role, MessageRole::System);
        assert!(last.content.starts_with("API key required"));
        assert_eq!(app.input.lines().join("\n"), "hello");
    }

    #[tokio::test]
    async fn test_reply_lands_in_transcript() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex(r"^/v1beta/models/.+:generateContent$".to_string()))
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Hi there"}]}}]}"#)
            .create_async()
            .await;

        let mut app = App::new(test_config("test-key", &server.url())).unwrap();
        type_text(&mut app, "hello");
        app.handle_action(AppAction::Submit).await;
        app.run_pending().await;

        // the request went to the configured base URL with the settings key
        mock.assert_async().await;
        assert_eq!(app.stage, TurnStage::Complete);
        let tail: Vec<(MessageRole, &str)> = app
            .messages
            .iter()
            .skip(1)
            .map(|m| (m.role.clone(), m.content.as_str()))
            .collect();
        assert_eq!(
            tail,
            vec![(MessageRole::User, "hello"), (MessageRole::Assistant, "Hi there")]
        );
    }

    #[tokio::test]
    async fn test_attach_and_clear() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"file body").unwrap();

        let mut app = App::new(test_config("", "http://localhost")).unwrap();
        app.attach_path(file.path()).await;
        assert_eq!(
            app.session.payload(),
            Some(&NormalizedPayload::Text {
                content: "file body".to_string()
            })
        );
        assert!(app.messages.last().unwrap().content.starts_with("Attached"));

        app.handle_action(AppAction::ClearAttachment).await;
        assert!(app.session.payload().is_none());
        assert!(app.attachment_name.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_becomes_error_payload() {
        let mut app = App::new(test_config("", "http://localhost")).unwrap();
        app.attach_path(Path::new("/definitely/not/here.txt")).await;
        assert!(matches!(
            app.session.payload(),
            Some(NormalizedPayload::Error { .. })
        ));
    }
}
