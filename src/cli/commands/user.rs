use clap::Subcommand;

use crate::config::AppConfig;
use crate::database::models::UserRecord;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Register a user")]
    Add {
        #[arg(help = "Username")]
        username: String,
        #[arg(long = "subscription", help = "Channel slug to subscribe to (repeatable)")]
        subscriptions: Vec<String>,
    },

    #[command(about = "List registered users")]
    List,
}

pub async fn handle(cmd: UserCommands, config: &AppConfig) -> anyhow::Result<()> {
    // The memory backend would drop the registry when this process exits
    if config.database.connection_url()?.is_none() {
        anyhow::bail!("user registry requires DATABASE_URL or DATABASE_HOST");
    }
    let store = DatabaseManager::connect(&config.database).await?;

    match cmd {
        UserCommands::Add {
            username,
            subscriptions,
        } => {
            if username.is_empty() {
                anyhow::bail!("username cannot be empty");
            }
            let user = UserRecord {
                username,
                subscriptions,
            };
            store.insert_user(&user).await?;
            println!("Added user {}", user.username);
        }
        UserCommands::List => {
            for user in store.list_users().await? {
                if user.subscriptions.is_empty() {
                    println!("{}", user.username);
                } else {
                    println!("{} ({})", user.username, user.subscriptions.join(", "));
                }
            }
        }
    }

    Ok(())
}
