//! Preview front-end: chat with a chatbot configured on the spot.

use crate::chat::{ChatClient, ChatWidget};
use crate::cli::PreviewOptions;
use crate::models::{ChatbotConfig, ThemeConfig};

/// Default configuration with the command-line overrides applied.
pub fn preview_config(options: &PreviewOptions) -> ChatbotConfig {
    let mut config = ChatbotConfig::default();
    if let Some(provider) = &options.provider {
        config.ai_provider = provider.clone();
    }
    if let Some(prompt) = &options.system_prompt {
        config.system_prompt = prompt.clone();
    }

    let defaults = ThemeConfig::default();
    config.theme_config = ThemeConfig {
        primary_color: options
            .primary_color
            .clone()
            .unwrap_or(defaults.primary_color),
        secondary_color: options
            .secondary_color
            .clone()
            .unwrap_or(defaults.secondary_color),
        ..defaults
    };
    config
}

/// Widget for a preview session, ready to send.
pub fn preview_widget(client: ChatClient, options: &PreviewOptions) -> ChatWidget {
    ChatWidget::new(client, preview_config(options))
}
