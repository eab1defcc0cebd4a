//! Static model configuration registry.
//!
//! [`ModelConfigRegistry::lookup`] maps a model identifier to its context
//! window and output reservation. Lookup never fails: unknown identifiers
//! resolve to a conservative default so every caller has a budget to plan
//! against.

use serde::{Deserialize, Serialize};

/// Provider family of a model (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelProvider {
    Anthropic,
    OpenAi,
    Google,
    Unknown,
}

impl ModelProvider {
    pub fn as_str(&self) -> &str {
        match self {
            ModelProvider::Anthropic => "anthropic",
            ModelProvider::OpenAi => "openai",
            ModelProvider::Google => "google",
            ModelProvider::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget-relevant facts about one model.
///
/// Immutable once created; keyed by [`id`](Self::id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub id: String,
    pub display_name: String,
    pub context_window_tokens: usize,
    pub reserved_output_tokens: usize,
    pub provider: ModelProvider,
}

impl ModelConfig {
    /// Tokens available for the conversation once output is reserved.
    pub fn usable_budget(&self) -> usize {
        self.context_window_tokens
            .saturating_sub(self.reserved_output_tokens)
    }
}

/// (id, display name, context window, reserved output, provider)
const KNOWN_MODELS: &[(&str, &str, usize, usize, ModelProvider)] = &[
    // Claude models
    ("claude-opus-4.5", "Claude Opus 4.5", 200_000, 8_192, ModelProvider::Anthropic),
    ("claude-sonnet-4.5", "Claude Sonnet 4.5", 200_000, 8_192, ModelProvider::Anthropic),
    ("claude-haiku-4.5", "Claude Haiku 4.5", 200_000, 8_192, ModelProvider::Anthropic),
    ("claude-sonnet-4", "Claude Sonnet 4", 200_000, 8_192, ModelProvider::Anthropic),
    ("claude-3-5-sonnet", "Claude 3.5 Sonnet", 200_000, 8_192, ModelProvider::Anthropic),
    ("claude-3-haiku", "Claude 3 Haiku", 200_000, 4_096, ModelProvider::Anthropic),
    // GPT models
    ("gpt-5", "GPT-5", 400_000, 128_000, ModelProvider::OpenAi),
    ("gpt-5-mini", "GPT-5 mini", 400_000, 128_000, ModelProvider::OpenAi),
    ("gpt-4.1", "GPT-4.1", 1_047_576, 32_768, ModelProvider::OpenAi),
    ("gpt-4o", "GPT-4o", 128_000, 16_384, ModelProvider::OpenAi),
    ("gpt-4o-mini", "GPT-4o mini", 128_000, 16_384, ModelProvider::OpenAi),
    ("gpt-4-turbo", "GPT-4 Turbo", 128_000, 4_096, ModelProvider::OpenAi),
    ("gpt-4", "GPT-4", 8_192, 1_024, ModelProvider::OpenAi),
    // Gemini models
    ("gemini-2.5-pro", "Gemini 2.5 Pro", 1_048_576, 65_536, ModelProvider::Google),
    ("gemini-2.5-flash", "Gemini 2.5 Flash", 1_048_576, 65_536, ModelProvider::Google),
    ("gemini-1.5-pro", "Gemini 1.5 Pro", 2_097_152, 8_192, ModelProvider::Google),
];

/// Context window used for unrecognized models.
pub const DEFAULT_CONTEXT_WINDOW: usize = 8_192;

/// Output reservation used for unrecognized models.
pub const DEFAULT_RESERVED_OUTPUT: usize = 1_024;

/// Pure lookup from model id to [`ModelConfig`].
pub struct ModelConfigRegistry;

impl ModelConfigRegistry {
    /// Resolve a model id.
    ///
    /// Matching ignores case and an optional `provider/` prefix
    /// (`anthropic/claude-sonnet-4.5` resolves like `claude-sonnet-4.5`).
    pub fn lookup(model_id: &str) -> ModelConfig {
        let normalized = Self::normalize(model_id);

        KNOWN_MODELS
            .iter()
            .find(|(id, ..)| *id == normalized)
            .map(|(id, name, window, reserved, provider)| ModelConfig {
                id: (*id).to_string(),
                display_name: (*name).to_string(),
                context_window_tokens: *window,
                reserved_output_tokens: *reserved,
                provider: *provider,
            })
            .unwrap_or_else(|| Self::fallback(model_id))
    }

    /// Whether `model_id` is a known model (not the default fallback).
    pub fn is_known(model_id: &str) -> bool {
        let normalized = Self::normalize(model_id);
        KNOWN_MODELS.iter().any(|(id, ..)| *id == normalized)
    }

    /// All known model ids, in registry order.
    pub fn known_ids() -> impl Iterator<Item = &'static str> {
        KNOWN_MODELS.iter().map(|(id, ..)| *id)
    }

    fn normalize(model_id: &str) -> String {
        let trimmed = model_id.trim();
        let bare = trimmed.rsplit('/').next().unwrap_or(trimmed);
        bare.to_ascii_lowercase()
    }

    fn fallback(model_id: &str) -> ModelConfig {
        ModelConfig {
            id: model_id.to_string(),
            display_name: model_id.to_string(),
            context_window_tokens: DEFAULT_CONTEXT_WINDOW,
            reserved_output_tokens: DEFAULT_RESERVED_OUTPUT,
            provider: ModelProvider::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_model() {
        let config = ModelConfigRegistry::lookup("claude-sonnet-4.5");
        assert_eq!(config.display_name, "Claude Sonnet 4.5");
        assert_eq!(config.context_window_tokens, 200_000);
        assert_eq!(config.reserved_output_tokens, 8_192);
        assert_eq!(config.provider, ModelProvider::Anthropic);
        assert_eq!(config.usable_budget(), 191_808);
    }

    #[test]
    fn test_lookup_ignores_case_and_prefix() {
        let config = ModelConfigRegistry::lookup("OpenAI/GPT-4o");
        assert_eq!(config.id, "gpt-4o");
        assert_eq!(config.provider, ModelProvider::OpenAi);
    }

    #[test]
    fn test_unknown_model_gets_conservative_default() {
        let config = ModelConfigRegistry::lookup("my-local-llama");
        assert_eq!(config.id, "my-local-llama");
        assert_eq!(config.display_name, "my-local-llama");
        assert_eq!(config.context_window_tokens, DEFAULT_CONTEXT_WINDOW);
        assert_eq!(config.reserved_output_tokens, DEFAULT_RESERVED_OUTPUT);
        assert_eq!(config.provider, ModelProvider::Unknown);
        assert!(!ModelConfigRegistry::is_known("my-local-llama"));
    }

    #[test]
    fn test_every_known_model_has_room_for_conversation() {
        for id in ModelConfigRegistry::known_ids() {
            let config = ModelConfigRegistry::lookup(id);
            assert!(config.usable_budget() > 0, "{id} has no usable budget");
            assert!(ModelConfigRegistry::is_known(id));
        }
    }
}
