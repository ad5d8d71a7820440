//! Result type alias for crate operations.

use super::chat_error::ChatError;

/// Type alias for Results using ChatError.
///
/// # Example
///
/// ```ignore
/// use botchat::error::ChatResult;
///
/// fn load_bot(id: &str) -> ChatResult<ChatbotConfig> {
///     // Implementation that may return various error types
///     Ok(config)
/// }
/// ```
pub type ChatResult<T> = Result<T, ChatError>;
