//! echo-bot: replies to every text message with `You said: <text>`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use echo_bot::{run_echo_bot, DEFAULT_LOG_FILE};
use rbot_core::init_tracing;
use rbot_telegram::TelegramConfig;

#[derive(Parser)]
#[command(name = "echo-bot")]
#[command(about = "Telegram echo bot", long_about = None)]
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
            let config = TelegramConfig::from_env(token)?;
            init_tracing(config.log_file_or(DEFAULT_LOG_FILE))?;
            run_echo_bot(config).await
        }
    }
}
