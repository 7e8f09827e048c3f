mod chat;
mod gateway;
mod init;

use chrono::Utc;
use clap::{Parser, Subcommand};
use grace_core::{
    config::{self, Prompts},
    shellexpand,
    traits::{ProfileRepository, Provider},
};
use grace_memory::Store;
use grace_providers::GeminiProvider;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "grace",
    version,
    about = "✦ Grace — a safety-gated companion for navigating friendship"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create config and your profile.
    Init,
    /// Start an interactive chat with Grace.
    Chat,
    /// Send a one-shot message to Grace.
    Ask {
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Show configuration, provider, and profile status.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_stderr_logging("warn");
            init::run(&cli.config).await?;
        }
        Commands::Chat => {
            let cfg = config::load(&cli.config)?;
            // Keep the guard alive so buffered log lines flush on exit.
            let _guard = init_file_logging(&cfg.grace.data_dir, &cfg.grace.log_level)?;

            let store = Store::new(&cfg.memory).await?;
            let Some(profile) = store.load().await? else {
                anyhow::bail!("no profile yet. Run `grace init` first.");
            };
            if profile.is_beta_expired(Utc::now(), cfg.beta.window()) {
                anyhow::bail!(
                    "the {}-day beta for {} has ended. Thank you for testing Grace!",
                    cfg.beta.duration_days,
                    profile.name
                );
            }

            let provider = build_provider(&cfg);
            if !provider.is_configured() {
                tracing::warn!("starting chat without an API key");
            }
            let prompts = Prompts::load(&cfg.grace.data_dir);
            let gw = gateway::Gateway::new(provider, &prompts, &cfg.provider.gemini);

            tracing::info!("Grace chat started for {}", profile.name);
            chat::run(chat::ChatSession::new(gw, store, profile)).await?;
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: grace ask <message>");
            }

            let cfg = config::load(&cli.config)?;
            init_stderr_logging(&cfg.grace.log_level);

            let prompt = message.join(" ");
            let provider = build_provider(&cfg);
            let prompts = Prompts::load(&cfg.grace.data_dir);
            let gw = gateway::Gateway::new(provider, &prompts, &cfg.provider.gemini);

            let reply = gw.handle_message(&[], &prompt).await;
            println!("{}", reply.text);
            if let Some(action) = reply.action {
                println!(
                    "{}",
                    console::style(format!("[{} {}]", action.kind(), action.payload())).dim()
                );
            }
        }
        Commands::Status => {
            let cfg = config::load(&cli.config)?;
            init_stderr_logging("warn");
            println!("✦ Grace — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Data dir: {}", shellexpand(&cfg.grace.data_dir));
            println!("Model: {}", cfg.provider.gemini.model);
            println!("Classifier model: {}", cfg.provider.gemini.classifier_model);
            println!();

            let provider = build_provider(&cfg);
            let gemini_state = if !provider.is_configured() {
                "no API key (set GEMINI_API_KEY)"
            } else if provider.is_available().await {
                "available"
            } else {
                "configured but unreachable"
            };
            println!("  gemini: {gemini_state}");

            let store = Store::new(&cfg.memory).await?;
            match store.load().await? {
                Some(p) => {
                    let now = Utc::now();
                    let days_left = (cfg.beta.window() - (now - p.join_date)).num_days().max(0);
                    println!(
                        "  profile: {} {} — vibe {}, mastery {}%, {} insights",
                        init::avatar_glyph(&p.avatar_id),
                        p.name,
                        p.current_vibe.display_name(),
                        p.mastery_progress,
                        p.insights.len()
                    );
                    if p.is_beta_expired(now, cfg.beta.window()) {
                        println!("  beta: ended");
                    } else {
                        println!("  beta: {days_left} days left");
                    }
                }
                None => println!("  profile: none (run `grace init`)"),
            }
            println!("  store: {} bytes", store.db_size().await?);
        }
    }

    Ok(())
}

/// Build the Gemini provider from config.
fn build_provider(cfg: &config::Config) -> Arc<dyn Provider> {
    Arc::new(GeminiProvider::from_config(&cfg.provider.gemini))
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn init_stderr_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .init();
}

/// Log to `{data_dir}/logs/grace.log` so log lines stay out of the conversation.
fn init_file_logging(
    data_dir: &str,
    level: &str,
) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = std::path::Path::new(&shellexpand(data_dir)).join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let appender = tracing_appender::rolling::never(&log_dir, "grace.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
