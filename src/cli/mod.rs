pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shopctl")]
#[command(about = "Operator tooling for the shop API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a development bearer token for a user")]
    Token(commands::token::TokenArgs),

    #[command(about = "Inspect the effective stored-query catalog")]
    Queries {
        #[command(subcommand)]
        cmd: commands::queries::QueriesCommands,
    },

    #[command(about = "Probe a running server's health endpoint")]
    Health(commands::health::HealthArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Queries { cmd } => commands::queries::handle(cmd, output_format),
        Commands::Health(args) => commands::health::handle(args, output_format).await,
    }
}
