//! Line-oriented chat loop shared by both front-ends.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::chat::{ChatWidget, SendOutcome};
use crate::error::ChatResult;

pub const QUIT_COMMAND: &str = "/quit";
pub const RESET_COMMAND: &str = "/reset";

/// Send every input line through `widget` until EOF or `/quit`.
///
/// Each line is answered in full before the next one is read. Returns the
/// number of messages sent.
pub async fn run_repl<R>(widget: &mut ChatWidget, input: R) -> ChatResult<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut sent = 0;

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            QUIT_COMMAND => break,
            RESET_COMMAND => {
                widget.reset();
                continue;
            }
            _ => {}
        }

        match widget.send(&line).await {
            SendOutcome::Rejected => debug!("Input rejected"),
            SendOutcome::Sent(summary) => {
                sent += 1;
                debug!(
                    session_id = %summary.session_id,
                    success = summary.is_success(),
                    fragments = summary.fragments,
                    "Message answered"
                );
            }
        }
    }

    Ok(sent)
}
