// Google Gemini adapter (generateContent REST API)
// API Reference: https://ai.google.dev/api/generate-content

use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

// Request types for the Gemini API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text { text: String },
    InlineData { inline_data: GeminiBlob },
}

#[derive(Serialize)]
struct GeminiBlob {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// Response types for the Gemini API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GoogleAdapter {
    /// Create an adapter against `base_url` (the public endpoint, a proxy or a test server)
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn build_request(request: &LLMRequest) -> GeminiRequest {
        let mut parts = vec![GeminiPart::Text {
            text: request.content.text.clone(),
        }];
        if let Some(attachment) = &request.content.attachment {
            parts.push(GeminiPart::InlineData {
                inline_data: GeminiBlob {
                    mime_type: attachment.mime_type.clone(),
                    data: attachment.data.clone(),
                },
            });
        }

        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts,
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl LLMAdapter for GoogleAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let url = self.endpoint(&request.model);
        let body = Self::build_request(request);

        debug!(
            model = %request.model,
            has_attachment = request.content.attachment.is_some(),
            "Sending Gemini request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("Gemini request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                return Err(AppError::LLMApi(format!(
                    "Gemini API error ({}): {} (status: {})",
                    status,
                    error_response.error.message,
                    error_response.error.status.unwrap_or_default()
                )));
            }

            return Err(AppError::LLMApi(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to parse Gemini response: {}", e)))?;

        let candidate = gemini_response
            .candidates
            .first()
            .ok_or(AppError::EmptyResponse)?;

        let content: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        let finish_reason = candidate
            .finish_reason
            .clone()
            .unwrap_or_else(|| "STOP".to_string());

        if content.is_empty() {
            warn!(finish_reason = %finish_reason, "Gemini candidate carried no text");
            return Err(AppError::EmptyResponse);
        }

        let usage = gemini_response
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(LLMResponse {
            content,
            finish_reason,
            usage,
        })
    }
}

/// Models offered in the settings view. A model accepts inline images only
/// when its name carries the "vision" marker.
pub mod models {
    pub const GEMINI_1_5_FLASH: &str = "gemini-1.5-flash";
    pub const GEMINI_1_5_PRO: &str = "gemini-1.5-pro";
    pub const GEMINI_1_5_PRO_VISION: &str = "gemini-1.5-pro-vision-latest";
    pub const GEMINI_1_0_PRO: &str = "gemini-1.0-pro";
    pub const GEMINI_1_0_PRO_VISION: &str = "gemini-1.0-pro-vision-latest";
    pub const GEMINI_2_0_PRO_EXP: &str = "gemini-2.0-pro-exp-02-05";
    pub const GEMINI_2_0_FLASH_LITE: &str = "gemini-2.0-flash-lite";
    pub const GEMINI_2_0_FLASH_IMAGE_GEN: &str = "gemini-2.0-flash-exp-image-generation";
    pub const GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";
    pub const GEMINI_2_0_FLASH_THINKING: &str = "gemini-2.0-flash-thinking-exp-01-21";

    pub const AVAILABLE: &[&str] = &[
        GEMINI_1_5_FLASH,
        GEMINI_1_5_PRO,
        GEMINI_1_5_PRO_VISION,
        GEMINI_1_0_PRO,
        GEMINI_1_0_PRO_VISION,
        GEMINI_2_0_PRO_EXP,
        GEMINI_2_0_FLASH_LITE,
        GEMINI_2_0_FLASH_IMAGE_GEN,
        GEMINI_2_0_FLASH,
        GEMINI_2_0_FLASH_THINKING,
    ];

    pub const DEFAULT: &str = GEMINI_1_5_FLASH;
}

/// Check if a model may receive inline image attachments
pub fn is_vision_model(model: &str) -> bool {
    model.to_lowercase().contains("vision")
}
