//! Settings Module
//!
//! Runtime chat settings: API key, model, and generation parameters.
//! Held in memory for the session only; nothing is written to disk.

use crate::config::LLMConfig;
use crate::llm::google::{is_vision_model, models};
use crate::types::{AppError, AppResult};
use std::ops::RangeInclusive;

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 1..=2048;

/// Settings shown in the sidebar/settings view
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: models::DEFAULT.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

impl ChatSettings {
    /// Build validated settings
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> AppResult<Self> {
        let model = model.into();

        if !models::AVAILABLE.contains(&model.as_str()) {
            return Err(AppError::InvalidRequest(format!(
                "Unknown model '{}'. Available: {}",
                model,
                models::AVAILABLE.join(", ")
            )));
        }
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(AppError::InvalidRequest(format!(
                "Temperature {} is outside [0, 1]",
                temperature
            )));
        }
        if !MAX_TOKENS_RANGE.contains(&max_tokens) {
            return Err(AppError::InvalidRequest(format!(
                "Max tokens {} is outside [1, 2048]",
                max_tokens
            )));
        }

        let mut settings = Self {
            api_key: None,
            model,
            temperature,
            max_tokens,
        };
        if let Some(key) = api_key {
            settings.set_api_key(key);
        }
        Ok(settings)
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Self::new(
            Some(config.google_api_key.clone()),
            config.default_model.clone(),
            config.temperature,
            config.max_tokens,
        )
    }

    /// The API key, if a non-blank one is set
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Set the key; blank input clears it
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        let key = key.into().trim().to_string();
        self.api_key = if key.is_empty() { None } else { Some(key) };
    }

    /// Masked key for display (last 4 characters only)
    pub fn key_hint(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let chars: Vec<char> = key.chars().collect();
            if chars.len() > 4 {
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("••••{}", tail)
            } else {
                "••••".to_string()
            }
        })
    }

    pub fn supports_images(&self) -> bool {
        is_vision_model(&self.model)
    }

    /// Step through the fixed model list, wrapping at both ends
    pub fn cycle_model(&mut self, forward: bool) {
        let len = models::AVAILABLE.len();
        let current = models::AVAILABLE
            .iter()
            .position(|m| *m == self.model)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.model = models::AVAILABLE[next].to_string();
    }

    /// Change temperature by `delta`, clamped to [0, 1] and rounded to 2 decimals
    pub fn adjust_temperature(&mut self, delta: f32) {
        let value = (self.temperature + delta).clamp(*TEMPERATURE_RANGE.start(), *TEMPERATURE_RANGE.end());
        self.temperature = (value * 100.0).round() / 100.0;
    }

    /// Change max tokens by `delta`, clamped to [1, 2048]
    pub fn adjust_max_tokens(&mut self, delta: i64) {
        let value = (i64::from(self.max_tokens) + delta).clamp(
            i64::from(*MAX_TOKENS_RANGE.start()),
            i64::from(*MAX_TOKENS_RANGE.end()),
        );
        self.max_tokens = value as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ChatSettings::default();
        assert_eq!(settings.model, "gemini-1.5-flash");
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.max_tokens, 1000);
        assert!(!settings.has_api_key());
    }

    #[test]
    fn test_validation() {
        assert!(ChatSettings::new(None, "gemini-1.5-pro", 0.0, 1).is_ok());
        assert!(ChatSettings::new(None, "gemini-1.5-pro", 1.0, 2048).is_ok());
        assert!(ChatSettings::new(None, "gpt-4o", 0.5, 100).is_err());
        assert!(ChatSettings::new(None, "gemini-1.5-pro", 1.5, 100).is_err());
        assert!(ChatSettings::new(None, "gemini-1.5-pro", 0.5, 0).is_err());
        assert!(ChatSettings::new(None, "gemini-1.5-pro", 0.5, 4096).is_err());
    }

    #[test]
    fn test_blank_key_is_not_a_key() {
        let settings = ChatSettings::new(Some("   ".to_string()), models::DEFAULT, 0.7, 10).unwrap();
        assert!(!settings.has_api_key());
        assert_eq!(settings.api_key(), None);
    }

    #[test]
    fn test_key_hint() {
        let mut settings = ChatSettings::default();
        assert_eq!(settings.key_hint(), None);

        settings.set_api_key("AIzaSyTest1234");
        assert_eq!(settings.key_hint(), Some("••••1234".to_string()));

        settings.set_api_key("abc");
        assert_eq!(settings.key_hint(), Some("••••".to_string()));
    }

    #[test]
    fn test_cycle_model_wraps() {
        let mut settings = ChatSettings::default();
        settings.cycle_model(false);
        assert_eq!(settings.model, *models::AVAILABLE.last().unwrap());
        settings.cycle_model(true);
        assert_eq!(settings.model, models::AVAILABLE[0]);
        settings.cycle_model(true);
        assert_eq!(settings.model, models::AVAILABLE[1]);
    }

    #[test]
    fn test_adjust_parameters_clamp() {
        let mut settings = ChatSettings::default();
        settings.adjust_temperature(0.05);
        assert_eq!(settings.temperature, 0.75);
        settings.adjust_temperature(5.0);
        assert_eq!(settings.temperature, 1.0);
        settings.adjust_temperature(-5.0);
        assert_eq!(settings.temperature, 0.0);

        settings.adjust_max_tokens(5000);
        assert_eq!(settings.max_tokens, 2048);
        settings.adjust_max_tokens(-5000);
        assert_eq!(settings.max_tokens, 1);
    }

    #[test]
    fn test_supports_images() {
        let mut settings = ChatSettings::default();
        assert!(!settings.supports_images());
        settings.model = "gemini-1.5-pro-vision-latest".to_string();
        assert!(settings.supports_images());
    }
}
