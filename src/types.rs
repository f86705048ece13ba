// Type definitions shared by the upload pipeline, the chat flow and the LLM adapters

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Binary attachment sent inline with a request (e.g. a JPEG image)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InlineAttachment {
    pub mime_type: String,
    /// Base64-encoded payload
    pub data: String,
}

impl InlineAttachment {
    /// Encode raw bytes as an inline attachment
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: BASE64.encode(bytes),
        }
    }
}

/// Content of a single model request: the text segment plus an optional attachment.
///
/// Built per turn by the prompt assembler, sent once and discarded.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelRequestContent {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<InlineAttachment>,
}

impl ModelRequestContent {
    /// Plain text content with no attachment
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            text: s.into(),
            attachment: None,
        }
    }

    /// Check if this content carries an image
    pub fn has_image(&self) -> bool {
        self.attachment
            .as_ref()
            .is_some_and(|a| a.mime_type.starts_with("image/"))
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub content: ModelRequestContent,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported file format")]
    UnsupportedFormat,

    #[error("Decode failure: {0}")]
    Decode(String),

    #[error("Model '{0}' cannot accept images. Please select a vision model")]
    ModelCapabilityMismatch(String),

    #[error("API key required")]
    MissingCredential,

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("No valid response received. Check the input or the model")]
    EmptyResponse,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
