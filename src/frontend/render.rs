//! Terminal transcript renderer.
//!
//! Turns successive snapshots of the conversation log into the text that
//! still has to be written, so streamed answers appear token by token. The
//! chatbot theme colors the role labels with 24-bit ANSI escapes.

use std::io::Write;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::{ChatbotConfig, Message, MessageRole, ThemeConfig};
use crate::state::ConversationLog;

const RESET: &str = "\x1b[0m";

/// Parse `#RRGGBB` or `#RGB`.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some((
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

/// Label colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    assistant: Option<(u8, u8, u8)>,
    user: Option<(u8, u8, u8)>,
}

impl Palette {
    /// Assistant labels in the primary color, user labels in the secondary.
    /// Unparsable colors are left uncolored.
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        Self {
            assistant: parse_hex_color(&theme.primary_color),
            user: parse_hex_color(&theme.secondary_color),
        }
    }

    /// No escapes at all.
    pub fn plain() -> Self {
        Self::default()
    }

    fn paint(&self, role: MessageRole, text: &str) -> String {
        let color = match role {
            MessageRole::Assistant => self.assistant,
            MessageRole::User => self.user,
        };
        match color {
            Some((r, g, b)) => format!("\x1b[1;38;2;{};{};{}m{}{}", r, g, b, text, RESET),
            None => text.to_string(),
        }
    }
}

/// Incremental transcript renderer.
#[derive(Debug, Clone)]
pub struct TranscriptRenderer {
    palette: Palette,
    assistant_name: String,
    echo_user: bool,
    /// Messages written in full
    printed_messages: usize,
    /// Label of the next message already written
    label_printed: bool,
    /// Content bytes of the next message already written
    printed_bytes: usize,
}

impl TranscriptRenderer {
    pub fn new(assistant_name: impl Into<String>, palette: Palette) -> Self {
        Self {
            palette,
            assistant_name: assistant_name.into(),
            echo_user: true,
            printed_messages: 0,
            label_printed: false,
            printed_bytes: 0,
        }
    }

    /// Renderer labelled and colored after a chatbot.
    pub fn for_chatbot(config: &ChatbotConfig, colored: bool) -> Self {
        let palette = if colored {
            Palette::from_theme(&config.theme_config)
        } else {
            Palette::plain()
        };
        Self::new(config.display_name(), palette)
    }

    /// Whether user messages are written. Off when the user's own typing
    /// is already on screen.
    pub fn with_user_echo(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    /// Text to write to bring the screen up to date with `log`.
    pub fn render(&mut self, log: &ConversationLog) -> String {
        if log.messages.len() < self.printed_messages {
            // Conversation was reset
            self.printed_messages = 0;
            self.label_printed = false;
            self.printed_bytes = 0;
        }

        let mut out = String::new();
        for (index, message) in log.messages.iter().enumerate().skip(self.printed_messages) {
            let open = log.open_message_index == Some(index);

            if message.role == MessageRole::User && !self.echo_user {
                self.printed_messages = index + 1;
                continue;
            }

            if !self.label_printed {
                out.push_str(&self.label(message));
                self.label_printed = true;
            }

            let unseen = message.content.get(self.printed_bytes..).unwrap_or("");
            out.push_str(unseen);
            self.printed_bytes = message.content.len();

            if open {
                break;
            }

            out.push('\n');
            self.printed_messages = index + 1;
            self.label_printed = false;
            self.printed_bytes = 0;
        }
        out
    }

    fn label(&self, message: &Message) -> String {
        let name = match message.role {
            MessageRole::Assistant => self.assistant_name.as_str(),
            MessageRole::User => MessageRole::User.label(),
        };
        format!("{}: ", self.palette.paint(message.role, name))
    }
}

/// Write every log mutation to `out` until the conversation is dropped.
///
/// Returns the writer when done.
pub fn spawn_renderer<W>(
    mut updates: watch::Receiver<ConversationLog>,
    mut renderer: TranscriptRenderer,
    mut out: W,
) -> JoinHandle<W>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let text = {
                let log = updates.borrow_and_update();
                renderer.render(&log)
            };
            write_text(&mut out, &text);

            if updates.changed().await.is_err() {
                break;
            }
        }

        let text = renderer.render(&updates.borrow());
        write_text(&mut out, &text);
        out
    })
}

fn write_text<W: Write>(out: &mut W, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
        tracing::warn!(error = %e, "Failed to write transcript");
    }
}
