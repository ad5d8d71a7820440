use botchat::adapters::ReqwestHttpClient;
use botchat::chat::{ChatClient, ChatWidget};
use botchat::cli::{parse_args, version_string, CliCommand, USAGE};
use botchat::config::AppConfig;
use botchat::frontend::{
    config_source, preview_widget, run_repl, spawn_renderer, EmbedFrontend, TranscriptRenderer,
};
use botchat::logging::init_tracing;
use botchat::traits::HttpClient;

use color_eyre::Result;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{error, info};

/// Exit status after an interrupt while idle (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn main() -> Result<()> {
    // Handle informational flags before any initialization
    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    match command {
        CliCommand::Version => {
            println!("{}", version_string());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    color_eyre::install()?;

    let config = AppConfig::from_env();
    init_tracing(config.log_filter.as_deref());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(command, config))
}

async fn run(command: CliCommand, config: AppConfig) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let client = ChatClient::new(http.clone(), config.chat_endpoint.clone())
        .with_api_key(config.api_key.clone());
    info!(endpoint = %client.endpoint(), "Starting chat");

    let widget = match command {
        CliCommand::Preview(options) => preview_widget(client, &options),
        CliCommand::Embed { chatbot_id } => {
            let source = config_source(&config, http)?;
            let mut embed = EmbedFrontend::new(client, source, chatbot_id);
            if let Err(e) = embed.load().await {
                error!(category = %e.category(), error = %e, "Failed to load chatbot");
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
            embed.into_widget()
        }
        CliCommand::Version | CliCommand::Help => return Ok(()),
    };

    chat(widget).await
}

async fn chat(mut widget: ChatWidget) -> Result<()> {
    let interactive = std::io::stdin().is_terminal();
    let colored = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

    let renderer = match widget.config() {
        Some(config) => TranscriptRenderer::for_chatbot(config, colored),
        None => return Ok(()),
    }
    .with_user_echo(!interactive);
    let printer = spawn_renderer(widget.subscribe(), renderer, std::io::stdout());

    // Ctrl-C stops the answer being streamed; when idle it exits
    let aborter = widget.aborter();
    let interrupts = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if !aborter.abort() {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let result = run_repl(&mut widget, stdin).await;

    interrupts.abort();
    drop(widget);
    let _ = printer.await;

    let sent = result?;
    info!(sent, "Chat finished");
    Ok(())
}
