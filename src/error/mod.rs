//! Error handling for the streaming chat core.
//!
//! - **Transport errors** end a session and are shown to the user as the
//!   conversation's apology message.
//! - **Stream errors** (malformed events, bad UTF-8, dangling partial lines)
//!   are recovered from and only logged.
//! - **`ChatError`** unifies everything that can fail outside the read loop,
//!   with a category for retry and messaging decisions.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, dropped stream, abort | Yes |
//! | Server | Non-2xx status, missing body | Yes |
//! | User | Unknown chatbot, invalid id | No |
//! | System | Local I/O | No |
//! | Configuration | Settings and arguments | No |

mod category;
mod chat_error;
mod result;
mod stream;
mod transport;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use result::ChatResult;
pub use stream::StreamError;
pub use transport::TransportError;
