//! Streaming chat core.
//!
//! - `client` - request construction and transport acquisition
//! - `session` - the read loop of one request (transport → framer → decoder
//!   → accumulator → conversation)
//! - `widget` - the reusable component both front-ends are built on

pub mod client;
pub mod session;
pub mod widget;

pub use client::ChatClient;
pub use session::{SessionEnd, SessionSummary, StreamSession};
pub use widget::{ChatWidget, SendOutcome, SessionAborter};
