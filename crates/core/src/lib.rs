use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.intelligence.io.solutions/api/v1/";
pub const DEFAULT_MODEL_ID: &str = "meta-llama/Llama-3.2-90B-Vision-Instruct";

/// Per-model counters for one aggregation window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl ModelUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Ledger totals for a day or for all time, with a per-model breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub models: BTreeMap<String, ModelUsage>,
}

/// The singleton settings record: credential, endpoint, selected model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: String,
    pub endpoint: String,
    pub model_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

/// Partial settings update: `None` leaves the current value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model_id: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.endpoint.is_none() && self.model_id.is_none()
    }
}

impl Settings {
    pub fn apply(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            api_key: patch.api_key.clone().unwrap_or_else(|| self.api_key.clone()),
            endpoint: patch
                .endpoint
                .clone()
                .unwrap_or_else(|| self.endpoint.clone()),
            model_id: patch
                .model_id
                .clone()
                .unwrap_or_else(|| self.model_id.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat turn, shaped for the OpenAI-compatible messages array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_documented_triple() {
        let settings = Settings::default();
        assert_eq!(settings.api_key, "");
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.model_id, DEFAULT_MODEL_ID);
    }

    #[test]
    fn patch_overlays_only_set_fields() {
        let current = Settings {
            api_key: "k1".to_string(),
            endpoint: "https://e/".to_string(),
            model_id: "m1".to_string(),
        };
        let patch = SettingsPatch {
            model_id: Some("m2".to_string()),
            ..Default::default()
        };
        let merged = current.apply(&patch);
        assert_eq!(merged.api_key, "k1");
        assert_eq!(merged.endpoint, "https://e/");
        assert_eq!(merged.model_id, "m2");
    }

    #[test]
    fn empty_patch_is_identity() {
        let current = Settings::default();
        assert!(SettingsPatch::default().is_empty());
        assert_eq!(current.apply(&SettingsPatch::default()), current);
    }

    #[test]
    fn model_usage_total_is_input_plus_output() {
        let usage = ModelUsage {
            requests: 2,
            input_tokens: 13,
            output_tokens: 7,
        };
        assert_eq!(usage.total_tokens(), 20);
    }
}
