//! persona-bot: chat with a local language model that plays a selectable persona.

use anyhow::Result;
use clap::{Parser, Subcommand};
use persona_bot::{run_persona_bot, PersonaBotConfig, DEFAULT_LOG_FILE};
use rbot_core::init_tracing;
use rbot_telegram::TelegramConfig;
use text_generation::ModelConfig;

#[derive(Parser)]
#[command(name = "persona-bot")]
#[command(about = "Telegram persona chat bot backed by a local language model", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (config from env; token overrides TELEGRAM_BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let telegram = TelegramConfig::from_env(token)?;
            init_tracing(telegram.log_file_or(DEFAULT_LOG_FILE))?;
            let settings = PersonaBotConfig::from_env()?;
            let model = ModelConfig::from_env()?;
            run_persona_bot(telegram, settings, model).await
        }
    }
}
