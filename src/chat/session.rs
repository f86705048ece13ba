//! Conversation state for one run of the client.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::types::AppResult;
use crate::upload::NormalizedPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Gemini",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered turns plus the single pending upload.
///
/// Turns are append-only. At most one payload is held; a new upload replaces it.
#[derive(Debug, Default)]
pub struct ConversationSession {
    turns: Vec<ConversationTurn>,
    payload: Option<NormalizedPayload>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::new(Role::User, text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::new(Role::Assistant, text));
    }

    pub fn payload(&self) -> Option<&NormalizedPayload> {
        self.payload.as_ref()
    }

    pub fn replace_payload(&mut self, payload: NormalizedPayload) {
        debug!(summary = %payload.summary(), "Replacing pending payload");
        self.payload = Some(payload);
    }

    /// Store the outcome of an upload. A failed upload becomes an `Error` payload
    /// so the previous attachment is never sent by accident.
    pub fn attach(&mut self, outcome: AppResult<NormalizedPayload>) {
        let payload = match outcome {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Upload failed");
                NormalizedPayload::from(e)
            }
        };
        self.replace_payload(payload);
    }

    pub fn clear_payload(&mut self) -> Option<NormalizedPayload> {
        self.payload.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppError;

    #[test]
    fn test_turns_keep_order() {
        let mut session = ConversationSession::new();
        session.push_user("hi");
        session.push_assistant("hello");
        session.push_user("bye");

        let roles: Vec<Role> = session.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(session.turns()[1].text, "hello");
    }

    #[test]
    fn test_new_upload_replaces_previous() {
        let mut session = ConversationSession::new();
        session.replace_payload(NormalizedPayload::Text {
            content: "first".to_string(),
        });
        session.replace_payload(NormalizedPayload::Text {
            content: "second".to_string(),
        });
        assert_eq!(
            session.payload(),
            Some(&NormalizedPayload::Text {
                content: "second".to_string()
            })
        );
    }

    #[test]
    fn test_failed_upload_clears_stale_payload() {
        let mut session = ConversationSession::new();
        session.attach(Ok(NormalizedPayload::Text {
            content: "old".to_string(),
        }));
        session.attach(Err(AppError::Decode("bad bytes".to_string())));

        match session.payload() {
            Some(NormalizedPayload::Error { message }) => {
                assert_eq!(message, "Decode failure: bad bytes")
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_clear_payload() {
        let mut session = ConversationSession::new();
        session.replace_payload(NormalizedPayload::Error {
            message: "x".to_string(),
        });
        assert!(session.clear_payload().is_some());
        assert!(session.payload().is_none());
        assert!(session.clear_payload().is_none());
    }
}
