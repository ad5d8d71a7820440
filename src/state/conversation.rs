//! Conversation state machine.
//!
//! Owns the ordered message log, whether input is accepted, and which log
//! entry (if any) is the assistant message still being streamed into.
//!
//! ```text
//! Idle --submit--> Sending --first chunk--> Streaming --fragment--> Streaming
//!   ^                 |                         |
//!   +---- finish / fail (terminator, end of stream, transport error) ----+
//! ```
//!
//! The log lives inside a `tokio::sync::watch` channel so presentation code
//! can subscribe and re-render on every mutation.

use tokio::sync::watch;

use crate::models::Message;

/// First assistant message of every new conversation.
pub const GREETING: &str = "Hello! How can I help you today?";

/// Assistant message shown when a request fails.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Where the conversation is in the request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    /// No request in flight; input accepted
    #[default]
    Idle,
    /// Request sent, no response bytes yet
    Sending,
    /// Response bytes arriving; an open placeholder exists
    Streaming,
}

/// Observable view of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationLog {
    pub messages: Vec<Message>,
    pub state: ConversationState,
    /// Index of the assistant message currently being streamed into
    pub open_message_index: Option<usize>,
}

impl ConversationLog {
    /// Input is enabled only while idle.
    pub fn input_enabled(&self) -> bool {
        self.state == ConversationState::Idle
    }

    /// The message being streamed into, if any.
    pub fn open_message(&self) -> Option<&Message> {
        self.open_message_index
            .and_then(|index| self.messages.get(index))
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Conversation state machine with a subscribable log.
#[derive(Debug)]
pub struct Conversation {
    log: watch::Sender<ConversationLog>,
    greeting: Option<String>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// New conversation opened by the standard greeting.
    pub fn new() -> Self {
        Self::with_greeting(Some(GREETING.to_string()))
    }

    /// New conversation with a custom greeting, or none.
    pub fn with_greeting(greeting: Option<String>) -> Self {
        let (log, _) = watch::channel(Self::initial_log(greeting.as_deref()));
        Self { log, greeting }
    }

    fn initial_log(greeting: Option<&str>) -> ConversationLog {
        ConversationLog {
            messages: greeting.map(Message::assistant).into_iter().collect(),
            ..ConversationLog::default()
        }
    }

    /// Subscribe to log mutations.
    pub fn subscribe(&self) -> watch::Receiver<ConversationLog> {
        self.log.subscribe()
    }

    /// Copy of the current log.
    pub fn snapshot(&self) -> ConversationLog {
        self.log.borrow().clone()
    }

    pub fn state(&self) -> ConversationState {
        self.log.borrow().state
    }

    pub fn input_enabled(&self) -> bool {
        self.log.borrow().input_enabled()
    }

    pub fn open_message_index(&self) -> Option<usize> {
        self.log.borrow().open_message_index
    }

    /// Accept a user message.
    ///
    /// Returns the full log to send (including the new message), or `None`
    /// when the input is blank or a request is already in flight. Rejection
    /// changes nothing.
    pub fn submit(&mut self, text: &str) -> Option<Vec<Message>> {
        if text.trim().is_empty() {
            return None;
        }

        let mut outgoing = None;
        self.log.send_if_modified(|log| {
            if !log.input_enabled() {
                return false;
            }
            log.messages.push(Message::user(text));
            log.state = ConversationState::Sending;
            outgoing = Some(log.messages.clone());
            true
        });
        outgoing
    }

    /// Append the empty assistant placeholder once response bytes arrive.
    ///
    /// Idempotent while streaming; returns `None` when no request is in
    /// flight.
    pub fn open_placeholder(&mut self) -> Option<usize> {
        let mut index = None;
        self.log.send_if_modified(|log| match log.state {
            ConversationState::Idle => false,
            ConversationState::Streaming => {
                index = log.open_message_index;
                false
            }
            ConversationState::Sending => {
                log.messages.push(Message::placeholder());
                let open = log.messages.len() - 1;
                log.open_message_index = Some(open);
                log.state = ConversationState::Streaming;
                index = Some(open);
                true
            }
        });
        index
    }

    /// Replace the open placeholder's content.
    ///
    /// Returns false when there is no open placeholder.
    pub fn update_open_message(&mut self, content: &str) -> bool {
        self.log.send_if_modified(|log| {
            let Some(index) = log.open_message_index else {
                return false;
            };
            match log.messages.get_mut(index) {
                Some(message) => {
                    message.content.clear();
                    message.content.push_str(content);
                    true
                }
                None => false,
            }
        })
    }

    /// Close the request normally; the open placeholder becomes history.
    pub fn finish(&mut self) {
        self.log.send_if_modified(|log| {
            if log.state == ConversationState::Idle {
                return false;
            }
            log.state = ConversationState::Idle;
            log.open_message_index = None;
            true
        });
    }

    /// Close the request after a transport failure.
    ///
    /// An open placeholder that received no text is replaced by the
    /// apology; otherwise the apology is appended after the partial
    /// response. Input is re-enabled in every case.
    pub fn fail(&mut self) {
        self.log.send_modify(|log| {
            let empty_placeholder = log
                .open_message_index
                .and_then(|index| log.messages.get_mut(index))
                .filter(|message| message.content.is_empty());

            match empty_placeholder {
                Some(message) => message.content = APOLOGY.to_string(),
                None => log.messages.push(Message::assistant(APOLOGY)),
            }
            log.state = ConversationState::Idle;
            log.open_message_index = None;
        });
    }

    /// Change the greeting used by the next [`Conversation::reset`].
    pub fn set_greeting(&mut self, greeting: Option<String>) {
        self.greeting = greeting;
    }

    /// Start over with only the greeting. Ignored while a request is in flight.
    pub fn reset(&mut self) -> bool {
        let initial = Self::initial_log(self.greeting.as_deref());
        self.log.send_if_modified(|log| {
            if !log.input_enabled() {
                return false;
            }
            *log = initial;
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    #[test]
    fn test_new_conversation_has_greeting() {
        let conversation = Conversation::new();
        let log = conversation.snapshot();
        assert_eq!(log.messages, vec![Message::assistant(GREETING)]);
        assert_eq!(log.state, ConversationState::Idle);
        assert!(log.input_enabled());
    }

    #[test]
    fn test_without_greeting() {
        let conversation = Conversation::with_greeting(None);
        assert!(conversation.snapshot().messages.is_empty());
    }

    #[test]
    fn test_submit_appends_user_message_and_disables_input() {
        let mut conversation = Conversation::new();
        let outgoing = conversation.submit("Hi").unwrap();

        assert_eq!(
            outgoing,
            vec![Message::assistant(GREETING), Message::user("Hi")]
        );
        assert_eq!(conversation.state(), ConversationState::Sending);
        assert!(!conversation.input_enabled());
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut conversation = Conversation::new();
        let before = conversation.snapshot();

        assert!(conversation.submit("").is_none());
        assert!(conversation.submit("   \n\t").is_none());
        assert_eq!(conversation.snapshot(), before);
    }

    #[test]
    fn test_submit_while_in_flight_is_noop() {
        let mut conversation = Conversation::new();
        conversation.submit("first").unwrap();
        assert!(conversation.submit("second").is_none());

        conversation.open_placeholder();
        assert!(conversation.submit("third").is_none());
        assert_eq!(conversation.snapshot().messages.len(), 3);
    }

    #[test]
    fn test_placeholder_and_updates() {
        let mut conversation = Conversation::new();
        conversation.submit("Hi").unwrap();

        let index = conversation.open_placeholder().unwrap();
        assert_eq!(index, 2);
        assert_eq!(conversation.state(), ConversationState::Streaming);
        // Second call returns the same placeholder
        assert_eq!(conversation.open_placeholder(), Some(2));

        assert!(conversation.update_open_message("Hel"));
        assert!(conversation.update_open_message("Hello"));

        let log = conversation.snapshot();
        assert_eq!(log.messages.len(), 3);
        assert_eq!(log.open_message().unwrap().content, "Hello");
        assert_eq!(log.open_message().unwrap().role, MessageRole::Assistant);
    }

    #[test]
    fn test_placeholder_requires_request_in_flight() {
        let mut conversation = Conversation::new();
        assert!(conversation.open_placeholder().is_none());
        assert!(!conversation.update_open_message("stray"));
        assert_eq!(conversation.snapshot().messages.len(), 1);
    }

    #[test]
    fn test_finish_closes_placeholder() {
        let mut conversation = Conversation::new();
        conversation.submit("Hi").unwrap();
        conversation.open_placeholder();
        conversation.update_open_message("Hello");
        conversation.finish();

        let log = conversation.snapshot();
        assert_eq!(log.state, ConversationState::Idle);
        assert!(log.open_message_index.is_none());
        assert_eq!(log.last_message().unwrap().content, "Hello");
        // Closed history is no longer mutable through the session API
        assert!(!conversation.update_open_message("changed"));
    }

    #[test]
    fn test_fail_before_placeholder_appends_apology() {
        let mut conversation = Conversation::new();
        conversation.submit("Hi").unwrap();
        conversation.fail();

        let log = conversation.snapshot();
        assert!(log.input_enabled());
        assert_eq!(log.messages.len(), 3);
        assert_eq!(log.last_message().unwrap(), &Message::assistant(APOLOGY));
    }

    #[test]
    fn test_fail_replaces_empty_placeholder() {
        let mut conversation = Conversation::new();
        conversation.submit("Hi").unwrap();
        conversation.open_placeholder();
        conversation.fail();

        let log = conversation.snapshot();
        assert_eq!(log.messages.len(), 3);
        assert_eq!(log.messages[2], Message::assistant(APOLOGY));
    }

    #[test]
    fn test_fail_keeps_partial_response() {
        let mut conversation = Conversation::new();
        conversation.submit("Hi").unwrap();
        conversation.open_placeholder();
        conversation.update_open_message("Partial");
        conversation.fail();

        let log = conversation.snapshot();
        assert_eq!(log.messages.len(), 4);
        assert_eq!(log.messages[2].content, "Partial");
        assert_eq!(log.messages[3].content, APOLOGY);
        assert!(log.input_enabled());
    }

    #[test]
    fn test_reset() {
        let mut conversation = Conversation::new();
        conversation.submit("Hi").unwrap();
        assert!(!conversation.reset());

        conversation.finish();
        assert!(conversation.reset());
        assert_eq!(conversation.snapshot().messages, vec![Message::assistant(GREETING)]);
    }

    #[test]
    fn test_greeting_added_on_reset() {
        let mut conversation = Conversation::with_greeting(None);
        conversation.set_greeting(Some(GREETING.to_string()));
        assert!(conversation.snapshot().messages.is_empty());

        conversation.reset();
        assert_eq!(conversation.snapshot().messages, vec![Message::assistant(GREETING)]);
    }

    #[tokio::test]
    async fn test_subscribers_see_each_mutation() {
        let mut conversation = Conversation::new();
        let mut rx = conversation.subscribe();

        conversation.submit("Hi").unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().state, ConversationState::Sending);

        conversation.open_placeholder();
        conversation.update_open_message("Hey");
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().open_message().unwrap().content,
            "Hey"
        );

        // Rejected submits do not notify
        conversation.submit("again");
        assert!(!rx.has_changed().unwrap());
    }
}
