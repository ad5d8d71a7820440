//! Chatbot configuration records.
//!
//! A `ChatbotConfig` is what the persistence layer resolves a chatbot id
//! into. Field names follow the stored record (`ai_provider`,
//! `system_prompt`, `theme_config`) while the theme itself uses the
//! camelCase keys written by the theme designer.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
pub const DEFAULT_AI_PROVIDER: &str = "google/gemini-2.5-flash";
pub const DEFAULT_CHATBOT_NAME: &str = "AI Assistant";

/// Visual parameters of a chatbot widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub border_radius: String,
    pub bubble_style: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#8B5CF6".to_string(),
            secondary_color: "#A855F7".to_string(),
            font_family: "font-sans".to_string(),
            border_radius: "lg".to_string(),
            bubble_style: "gradient".to_string(),
        }
    }
}

/// Resolved configuration of a single chatbot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatbotConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ai_provider: String,
    #[serde(default)]
    pub system_prompt: String,
    /// Stored records may carry `null` here; missing themes use the defaults
    #[serde(default, deserialize_with = "deserialize_theme")]
    pub theme_config: ThemeConfig,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CHATBOT_NAME.to_string(),
            ai_provider: DEFAULT_AI_PROVIDER.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            theme_config: ThemeConfig::default(),
        }
    }
}

impl ChatbotConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_ai_provider(mut self, provider: impl Into<String>) -> Self {
        self.ai_provider = provider.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.theme_config = theme;
        self
    }

    /// System prompt sent with requests; blank values use the default
    pub fn effective_system_prompt(&self) -> &str {
        non_blank_or(&self.system_prompt, DEFAULT_SYSTEM_PROMPT)
    }

    /// Provider identifier sent with requests; blank values use the default
    pub fn effective_provider(&self) -> &str {
        non_blank_or(&self.ai_provider, DEFAULT_AI_PROVIDER)
    }

    /// Display name; blank values use the default
    pub fn display_name(&self) -> &str {
        non_blank_or(&self.name, DEFAULT_CHATBOT_NAME)
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn deserialize_theme<'de, D>(deserializer: D) -> Result<ThemeConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<ThemeConfig> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChatbotConfig::default();
        assert_eq!(config.effective_system_prompt(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.effective_provider(), DEFAULT_AI_PROVIDER);
        assert_eq!(config.theme_config.primary_color, "#8B5CF6");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = ChatbotConfig::default()
            .with_system_prompt("   ")
            .with_ai_provider("")
            .with_name("");
        assert_eq!(config.effective_system_prompt(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.effective_provider(), DEFAULT_AI_PROVIDER);
        assert_eq!(config.display_name(), DEFAULT_CHATBOT_NAME);
    }

    #[test]
    fn test_deserialize_stored_record() {
        let json = r##"{
            "name": "Support Bot",
            "ai_provider": "openai/gpt-5",
            "system_prompt": "You answer billing questions.",
            "theme_config": {
                "primaryColor": "#3B82F6",
                "secondaryColor": "#06B6D4",
                "fontFamily": "font-mono",
                "borderRadius": "sm",
                "bubbleStyle": "solid"
            },
            "user_id": "ignored"
        }"##;
        let config: ChatbotConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "Support Bot");
        assert_eq!(config.effective_provider(), "openai/gpt-5");
        assert_eq!(config.theme_config.font_family, "font-mono");
        assert_eq!(config.theme_config.bubble_style, "solid");
    }

    #[test]
    fn test_deserialize_null_theme_uses_defaults() {
        let json = r#"{"name":"Bot","ai_provider":"x","system_prompt":"y","theme_config":null}"#;
        let config: ChatbotConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.theme_config, ThemeConfig::default());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let config: ChatbotConfig = serde_json::from_str(r#"{"name":"Bare"}"#).unwrap();
        assert_eq!(config.effective_provider(), DEFAULT_AI_PROVIDER);
        assert_eq!(config.theme_config, ThemeConfig::default());
    }

    #[test]
    fn test_deserialize_partial_theme_fills_in_defaults() {
        let json = r##"{"name":"Bot","theme_config":{"primaryColor":"#0EA5E9"}}"##;
        let config: ChatbotConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.theme_config.primary_color, "#0EA5E9");
        assert_eq!(config.theme_config.secondary_color, "#A855F7");
        assert_eq!(config.theme_config.bubble_style, "gradient");

        let empty: ChatbotConfig =
            serde_json::from_str(r#"{"name":"Bot","theme_config":{}}"#).unwrap();
        assert_eq!(empty.theme_config, ThemeConfig::default());
    }
}
