pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::{AppConfig, DEFAULT_LISTEN_ADDR};

#[derive(Parser)]
#[command(name = "channel-api")]
#[command(about = "Channel and item REST API")]
#[command(version)]
pub struct Cli {
    /// Defaults to `serve` on the default address
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP API")]
    Serve {
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR, help = "Address to listen on")]
        listen: String,
    },

    #[command(about = "Manage the user registry")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve { listen }) => commands::serve::handle(&listen, config).await,
        Some(Commands::User { cmd }) => commands::user::handle(cmd, &config).await,
        None => commands::serve::handle(DEFAULT_LISTEN_ADDR, config).await,
    }
}
