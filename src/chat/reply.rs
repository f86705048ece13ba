//! Reply Agent
//!
//! Runs one chat turn: credential check, prompt assembly, the remote call,
//! and the session updates that go with each outcome.

use tracing::{error, info, warn};

use crate::chat::prompt::PromptAssembler;
use crate::chat::session::ConversationSession;
use crate::llm::provider::LLMAdapter;
use crate::settings::ChatSettings;
use crate::types::{AppError, AppResult, LLMRequest};

pub struct ReplyAgent;

impl ReplyAgent {
    /// Answer `message` using the pending upload and the current settings.
    ///
    /// The user turn is appended only once the request is ready to send. On a
    /// remote failure it stays in the session without an assistant turn.
    pub async fn respond(
        session: &mut ConversationSession,
        message: &str,
        settings: &ChatSettings,
        adapter: &dyn LLMAdapter,
    ) -> AppResult<String> {
        info!(
            message_len = message.len(),
            model = %settings.model,
            has_payload = session.payload().is_some(),
            "Generating reply"
        );

        if !settings.has_api_key() {
            warn!("No API key set, skipping request");
            return Err(AppError::MissingCredential);
        }

        let content = PromptAssembler::assemble(message, session.payload(), &settings.model)?;

        session.push_user(message);

        let request = LLMRequest {
            model: settings.model.clone(),
            content,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        };

        match adapter.create_chat_completion(&request).await {
            Ok(response) => {
                info!(
                    response_len = response.content.len(),
                    finish_reason = %response.finish_reason,
                    prompt_tokens = response.usage.prompt_tokens,
                    completion_tokens = response.usage.completion_tokens,
                    total_tokens = response.usage.total_tokens,
                    "Generated reply successfully"
                );
                session.push_assistant(response.content.clone());
                Ok(response.content)
            }
            Err(e) => {
                error!(error = %e, "Gemini call failed");
                Err(e)
            }
        }
    }

    /// Hint shown next to a remote error when an image is pending for a
    /// model that cannot take it.
    pub fn capability_hint(session: &ConversationSession, settings: &ChatSettings) -> Option<String> {
        match session.payload() {
            Some(payload) if payload.is_image() && !settings.supports_images() => Some(format!(
                "The attached image needs a vision model; '{}' cannot read it",
                settings.model
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::session::Role;
    use crate::llm::google::GoogleAdapter;
    use crate::upload::NormalizedPayload;
    use ::image::RgbImage;
    use mockito::Matcher;

    fn settings_with_key() -> ChatSettings {
        ChatSettings::new(Some("test-key".to_string()), "gemini-1.5-flash", 0.5, 100).unwrap()
    }

    #[tokio::test]
    async fn test_successful_turn_appends_both_turns() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hi\n\n[File Content]\nnotes"}]}]
            })))
            .with_status(200)
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Hello!"}]}}]}"#)
            .create_async()
            .await;

        let adapter = GoogleAdapter::with_base_url("test-key", &server.url());
        let mut session = ConversationSession::new();
        session.replace_payload(NormalizedPayload::Text {
            content: "notes".to_string(),
        });

        let reply = ReplyAgent::respond(&mut session, "hi", &settings_with_key(), &adapter)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Hello!");
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[0].role, Role::User);
        assert_eq!(session.turns()[1].text, "Hello!");
    }

    #[tokio::test]
    async fn test_zero_candidates_keeps_only_user_turn() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let adapter = GoogleAdapter::with_base_url("test-key", &server.url());
        let mut session = ConversationSession::new();

        let err = ReplyAgent::respond(&mut session, "hi", &settings_with_key(), &adapter)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyResponse));
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let adapter = GoogleAdapter::with_base_url("", &server.url());
        let mut session = ConversationSession::new();
        let settings = ChatSettings::default();

        let err = ReplyAgent::respond(&mut session, "hi", &settings, &adapter)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, AppError::MissingCredential));
        assert!(session.turns().is_empty());
    }

    #[tokio::test]
    async fn test_image_on_text_model_makes_no_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let adapter = GoogleAdapter::with_base_url("test-key", &server.url());
        let mut session = ConversationSession::new();
        session.replace_payload(NormalizedPayload::Image {
            pixels: RgbImage::new(2, 2),
        });

        let err = ReplyAgent::respond(&mut session, "what is it", &settings_with_key(), &adapter)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, AppError::ModelCapabilityMismatch(_)));
        assert!(session.turns().is_empty());
    }

    #[tokio::test]
    async fn test_service_error_keeps_user_turn() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Any)
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let adapter = GoogleAdapter::with_base_url("test-key", &server.url());
        let mut session = ConversationSession::new();

        let err = ReplyAgent::respond(&mut session, "hi", &settings_with_key(), &adapter)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::LLMApi(_)));
        assert_eq!(session.turns().len(), 1);
    }

    #[test]
    fn test_capability_hint_requires_pending_image() {
        let mut session = ConversationSession::new();
        let mut settings = settings_with_key();
        assert_eq!(ReplyAgent::capability_hint(&session, &settings), None);

        session.replace_payload(NormalizedPayload::Image {
            pixels: RgbImage::new(1, 1),
        });
        assert!(ReplyAgent::capability_hint(&session, &settings).is_some());

        settings.model = "gemini-1.5-pro-vision-latest".to_string();
        assert_eq!(ReplyAgent::capability_hint(&session, &settings), None);
    }
}
