use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use gemini_chat::{config::Config, utils::init_logger};

/// Terminal chat client for Google Gemini with file uploads
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Model to start with (overrides GEMINI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Sampling temperature in [0, 1] (overrides GEMINI_TEMPERATURE)
    #[arg(short, long)]
    temperature: Option<f32>,

    /// Maximum output tokens in [1, 2048] (overrides GEMINI_MAX_TOKENS)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// File to attach before the first message
    #[arg(short, long)]
    attach: Option<PathBuf>,

    /// Directory for gemini-chat.log (overrides LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(model) = args.model {
        config.llm.default_model = model;
    }
    if let Some(temperature) = args.temperature {
        config.llm.temperature = temperature;
    }
    if let Some(max_tokens) = args.max_tokens {
        config.llm.max_tokens = max_tokens;
    }
    if let Some(dir) = args.log_dir {
        config.logging.dir = dir;
    }

    // Held until exit so buffered log lines are flushed
    let _guard = init_logger(&config.logging)?;

    info!(
        model = %config.llm.default_model,
        temperature = config.llm.temperature,
        max_tokens = config.llm.max_tokens,
        api_base = %config.llm.api_base,
        "Configuration loaded"
    );

    gemini_chat::tui::run(config, args.attach).await
}
