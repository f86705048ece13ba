//! Prompt Assembler
//!
//! Merges the user's message with the pending upload into one request body.

use tracing::{debug, warn};

use crate::llm::google::is_vision_model;
use crate::types::{AppError, AppResult, InlineAttachment, ModelRequestContent};
use crate::upload::{image, NormalizedPayload};

pub const FILE_CONTENT_MARKER: &str = "\n\n[File Content]\n";

pub struct PromptAssembler;

impl PromptAssembler {
    /// Build the request content for one turn.
    ///
    /// Fails with `ModelCapabilityMismatch` when an image is pending and the
    /// model is not vision-capable; nothing is sent in that case.
    pub fn assemble(
        message: &str,
        payload: Option<&NormalizedPayload>,
        model: &str,
    ) -> AppResult<ModelRequestContent> {
        match payload {
            Some(NormalizedPayload::Text { content }) => {
                debug!(content_len = content.len(), "Appending file content to prompt");
                Ok(ModelRequestContent::text(format!(
                    "{}{}{}",
                    message, FILE_CONTENT_MARKER, content
                )))
            }
            Some(NormalizedPayload::Image { pixels }) => {
                if !is_vision_model(model) {
                    warn!(model = %model, "Image attached but model has no vision support");
                    return Err(AppError::ModelCapabilityMismatch(model.to_string()));
                }
                let jpeg = image::encode_jpeg(pixels)?;
                debug!(bytes = jpeg.len(), "Attaching image");
                Ok(ModelRequestContent {
                    text: message.to_string(),
                    attachment: Some(InlineAttachment::from_bytes(
                        mime::IMAGE_JPEG.essence_str(),
                        &jpeg,
                    )),
                })
            }
            Some(NormalizedPayload::Error { .. }) | None => Ok(ModelRequestContent::text(message)),
        }
    }
}
