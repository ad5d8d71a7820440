//! Reusable streaming chat component.
//!
//! `ChatWidget` is what both front-ends are built on: a conversation, the
//! chatbot configuration it talks with, and the machinery to send a message
//! and stream the answer into the log. The preview front-end creates it with
//! a local configuration; the embed front-end creates it unresolved and
//! supplies the configuration once the chatbot record has been loaded.

use futures::stream::{AbortHandle, AbortRegistration, Abortable};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::chat::client::ChatClient;
use crate::chat::session::{SessionSummary, StreamSession};
use crate::error::TransportError;
use crate::models::{ChatRequest, ChatbotConfig};
use crate::state::{Conversation, ConversationLog, GREETING};

/// Result of [`ChatWidget::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing was sent: blank input, a request already in flight, or no
    /// configuration yet
    Rejected,
    /// A request was made; the summary says how it ended
    Sent(SessionSummary),
}

impl SendOutcome {
    pub fn summary(&self) -> Option<&SessionSummary> {
        match self {
            SendOutcome::Rejected => None,
            SendOutcome::Sent(summary) => Some(summary),
        }
    }
}

#[derive(Debug, Default)]
struct AbortSlot {
    armed: bool,
    aborted: bool,
    handles: Vec<AbortHandle>,
}

/// Aborts the request in flight, from any task.
///
/// Covers both the wait for the response and the read loop. Aborting while
/// idle does nothing.
#[derive(Debug, Clone, Default)]
pub struct SessionAborter {
    slot: Arc<Mutex<AbortSlot>>,
}

impl SessionAborter {
    /// Abort the current request. Returns false when nothing was in flight.
    pub fn abort(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if !slot.armed {
            return false;
        }
        slot.aborted = true;
        slot.handles.iter().for_each(AbortHandle::abort);
        true
    }

    pub fn is_armed(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .armed
    }

    fn arm(&self) -> AbortRegistration {
        let (handle, registration) = AbortHandle::new_pair();
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = AbortSlot {
            armed: true,
            aborted: false,
            handles: vec![handle],
        };
        registration
    }

    fn attach(&self, handle: AbortHandle) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.aborted {
            handle.abort();
        }
        slot.handles.push(handle);
    }

    fn disarm(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = AbortSlot::default();
    }
}

/// Streaming chat component parameterized by a chatbot configuration.
#[derive(Debug)]
pub struct ChatWidget {
    client: ChatClient,
    config: Option<ChatbotConfig>,
    chatbot_id: Option<String>,
    conversation: Conversation,
    aborter: SessionAborter,
}

impl ChatWidget {
    /// Widget with a known configuration, ready to send.
    pub fn new(client: ChatClient, config: ChatbotConfig) -> Self {
        Self {
            client,
            config: Some(config),
            chatbot_id: None,
            conversation: Conversation::new(),
            aborter: SessionAborter::default(),
        }
    }

    /// Widget for a stored chatbot whose configuration is not loaded yet.
    ///
    /// Starts with an empty log and rejects every send until
    /// [`ChatWidget::resolve`] is called.
    pub fn unresolved(client: ChatClient, chatbot_id: impl Into<String>) -> Self {
        Self {
            client,
            config: None,
            chatbot_id: Some(chatbot_id.into()),
            conversation: Conversation::with_greeting(None),
            aborter: SessionAborter::default(),
        }
    }

    /// Supply the loaded configuration; the conversation restarts with the
    /// greeting.
    pub fn resolve(&mut self, config: ChatbotConfig) {
        self.config = Some(config);
        self.conversation.set_greeting(Some(GREETING.to_string()));
        self.conversation.reset();
    }

    pub fn config(&self) -> Option<&ChatbotConfig> {
        self.config.as_ref()
    }

    pub fn chatbot_id(&self) -> Option<&str> {
        self.chatbot_id.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.config.is_some()
    }

    pub fn input_enabled(&self) -> bool {
        self.is_ready() && self.conversation.input_enabled()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Subscribe to conversation log mutations.
    pub fn subscribe(&self) -> watch::Receiver<ConversationLog> {
        self.conversation.subscribe()
    }

    /// Handle for aborting requests made by this widget.
    pub fn aborter(&self) -> SessionAborter {
        self.aborter.clone()
    }

    /// Start a new conversation. Ignored while a request is in flight.
    pub fn reset(&mut self) -> bool {
        self.conversation.reset()
    }

    /// Submit `text` and stream the answer into the conversation.
    ///
    /// Returns once the conversation is back to `Idle`. Dropping the future
    /// before then (a timeout, a `select!` that loses interest) fails the
    /// request so input is accepted again.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let Some(config) = &self.config else {
            debug!("Ignoring message: chatbot configuration not loaded");
            return SendOutcome::Rejected;
        };
        let Some(messages) = self.conversation.submit(text) else {
            return SendOutcome::Rejected;
        };

        let request = ChatRequest::new(messages, config).with_chatbot_id(self.chatbot_id.clone());

        let registration = self.aborter.arm();
        let mut in_flight = InFlight::new(self);
        let opened = Abortable::new(in_flight.widget.client.open(&request), registration).await;

        let reader = match opened {
            Ok(Ok(reader)) => reader,
            Ok(Err(err)) => return in_flight.fail_before_stream(err),
            Err(_) => return in_flight.fail_before_stream(TransportError::Aborted),
        };

        let session = StreamSession::new(reader);
        in_flight.widget.aborter.attach(session.abort_handle());
        let summary = session.run(&mut in_flight.widget.conversation).await;
        in_flight.settled = true;

        SendOutcome::Sent(summary)
    }
}

/// A request between `submit` and its return to `Idle`.
///
/// Disarms the aborter when dropped, and fails the conversation if the
/// request was dropped before it settled.
struct InFlight<'a> {
    widget: &'a mut ChatWidget,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(widget: &'a mut ChatWidget) -> Self {
        Self {
            widget,
            settled: false,
        }
    }

    fn fail_before_stream(mut self, err: TransportError) -> SendOutcome {
        warn!(code = err.error_code(), error = %err, "Chat request failed");
        self.widget.conversation.fail();
        self.settled = true;
        SendOutcome::Sent(SessionSummary::not_started(err))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Chat request dropped before completion");
            self.widget.conversation.fail();
        }
        self.widget.aborter.disarm();
    }
}
