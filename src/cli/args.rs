//! Command-line argument parsing for the botchat CLI.

use crate::error::ChatError;

/// Overrides for the preview front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    pub provider: Option<String>,
    pub system_prompt: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Chat with a locally configured chatbot (default)
    Preview(PreviewOptions),
    /// Chat with a stored chatbot
    Embed { chatbot_id: String },
}

/// Usage text printed by `--help`.
pub const USAGE: &str = "\
Usage:
  botchat [preview] [--provider ID] [--system-prompt TEXT]
                    [--primary-color HEX] [--secondary-color HEX]
  botchat embed <CHATBOT_ID>
  botchat --version | -V
  botchat --help | -h

Type a message and press Enter. /reset starts over, /quit or EOF exits,
Ctrl-C stops the answer being streamed.";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use botchat::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["botchat".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()).unwrap(), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ChatError>
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1).peekable();

    if let Some(flag) = args.peek() {
        match flag.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            _ => {}
        }
    }

    match args.peek().map(String::as_str) {
        Some("embed") => {
            args.next();
            let chatbot_id = args
                .next()
                .ok_or_else(|| ChatError::settings("embed needs a chatbot id"))?;
            if let Some(extra) = args.next() {
                return Err(ChatError::settings(format!("unexpected argument '{}'", extra)));
            }
            Ok(CliCommand::Embed { chatbot_id })
        }
        Some("preview") => {
            args.next();
            parse_preview(args).map(CliCommand::Preview)
        }
        _ => parse_preview(args).map(CliCommand::Preview),
    }
}

fn parse_preview<I>(mut args: I) -> Result<PreviewOptions, ChatError>
where
    I: Iterator<Item = String>,
{
    let mut options = PreviewOptions::default();

    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--provider" => &mut options.provider,
            "--system-prompt" => &mut options.system_prompt,
            "--primary-color" => &mut options.primary_color,
            "--secondary-color" => &mut options.secondary_color,
            "--version" | "-V" | "--help" | "-h" => {
                return Err(ChatError::settings(format!("{} must come first", arg)))
            }
            other => {
                return Err(ChatError::settings(format!("unexpected argument '{}'", other)))
            }
        };
        let value = args
            .next()
            .ok_or_else(|| ChatError::settings(format!("{} needs a value", arg)))?;
        *slot = Some(value);
    }

    Ok(options)
}
