//! Conversation state
//!
//! - `Conversation`: message log plus the Idle/Sending/Streaming lifecycle
//! - `ConversationLog`: the observable snapshot handed to renderers

mod conversation;

pub use conversation::{Conversation, ConversationLog, ConversationState, APOLOGY, GREETING};
