pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "ragctl")]
#[command(about = "Operator CLI for the RAG API backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Mint a development bearer token for a caller")]
    Token {
        #[arg(help = "External identity id (clerk_id) to put in the sub claim")]
        clerk_id: String,
        #[arg(long, help = "Token lifetime in hours (defaults to AUTH_TOKEN_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Print the effective configuration with secrets omitted")]
    Config,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Token { clerk_id, hours } => commands::token::handle(&clerk_id, hours, output_format),
        Commands::Config => commands::config::handle(output_format),
    }
}
