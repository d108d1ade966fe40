//! CLI entry point for scibot

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Input;
use scibot_chat::{project, ChatEngine, ChatError};
use scibot_core::config::{Config, ConfigLoader};
use scibot_core::logging::init_logging;
use scibot_providers::{GeminiGateway, GenerationConfig, SafetySetting};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "scibot")]
#[command(about = "A science tutor chatbot backed by a hosted generative model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration directory
    #[arg(short, long, global = true)]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat
    Chat {
        /// Session key for conversation continuity
        #[arg(short, long, default_value = "cli:local")]
        session: String,
        /// Model to use
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Send a single message and print the reply
    Ask {
        /// Message to send
        #[arg(short, long)]
        message: String,
        /// Session key for conversation continuity
        #[arg(short, long, default_value = "cli:direct")]
        session: String,
        /// Model to use
        #[arg(long)]
        model: Option<String>,
    },
    /// Show the resolved gateway settings
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let loader = match &cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };

    // A missing or invalid credential is fatal here, before anything runs.
    let config = loader
        .load()
        .context("failed to load configuration")?;

    let _log_guard = init_logging(&config.logging);

    match cli.command {
        Commands::Chat { session, model } => run_chat(&config, model, &session).await,
        Commands::Ask {
            message,
            session,
            model,
        } => run_ask(&config, model, &session, &message).await,
        Commands::Status => run_status(&config),
    }
}

fn build_engine(config: &Config, model: Option<String>) -> Result<ChatEngine> {
    let mut gateway_config = config.gateway.clone();
    if let Some(model) = model {
        gateway_config.model = model;
    }

    let generation = GenerationConfig::from(&gateway_config.generation);
    let safety = gateway_config
        .safety
        .iter()
        .map(SafetySetting::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let gateway = Arc::new(GeminiGateway::from_config(&gateway_config));
    Ok(ChatEngine::new(
        gateway,
        config.chat.system_instruction.clone(),
        generation,
        safety,
        Duration::from_secs(gateway_config.request_timeout_secs),
    ))
}

async fn run_chat(config: &Config, model: Option<String>, session: &str) -> Result<()> {
    let engine = build_engine(config, model)?;
    info!(session, model = %config.gateway.model, "starting interactive chat");

    println!(
        "{}",
        style("🔬 scibot — ask me anything about science!").bold()
    );
    println!("{}", style("Type 'exit' to leave.").dim());

    let mut rendered = 0usize;

    loop {
        let input: String = match Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()
        {
            Ok(input) => input,
            // Closed stdin ends the UI session.
            Err(_) => break,
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        // Input stays suspended until the exchange resolves; the session
        // does not support overlapping submits.
        let spinner = render::thinking_spinner();
        let result = engine.submit(session, trimmed).await;
        spinner.finish_and_clear();

        // Re-render from history after every submit: the transcript on
        // screen mirrors the session log, including any unanswered turn.
        let lines = project(&engine.history(session).await);
        rendered = render::print_new_lines(&lines, rendered);

        match result {
            Ok(_) => {}
            Err(ChatError::EmptyInput) => {}
            Err(e) => render::print_error(&e),
        }
    }

    engine.discard(session).await;
    info!(session, "chat session discarded");
    Ok(())
}

async fn run_ask(
    config: &Config,
    model: Option<String>,
    session: &str,
    message: &str,
) -> Result<()> {
    let engine = build_engine(config, model)?;

    match engine.submit(session, message).await {
        Ok(turn) => {
            println!("{}", turn.text);
            Ok(())
        }
        Err(e) => {
            render::print_error(&e);
            anyhow::bail!("exchange failed: {}", e);
        }
    }
}

fn run_status(config: &Config) -> Result<()> {
    println!("{}", style("Gateway").bold());
    println!("  model:    {}", config.gateway.model);
    println!("  endpoint: {}", config.gateway.api_base);
    println!(
        "  api key:  {}",
        if config.gateway.api_key.is_empty() {
            "(not set)".to_string()
        } else {
            format!("set ({} chars)", config.gateway.api_key.len())
        }
    );
    println!(
        "  timeouts: connect {}s, request {}s",
        config.gateway.connect_timeout_secs, config.gateway.request_timeout_secs
    );

    let g = &config.gateway.generation;
    println!("{}", style("Generation").bold());
    println!(
        "  temperature {} | topP {} | topK {} | maxOutputTokens {} | {}",
        g.temperature, g.top_p, g.top_k, g.max_output_tokens, g.response_mime_type
    );

    println!("{}", style("Safety").bold());
    for rule in &config.gateway.safety {
        println!("  {:<20} {}", rule.category, rule.threshold);
    }

    Ok(())
}
