//! Grocery list CLI - database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations to the configured database
//! grocery-cli migrate
//!
//! # Create an account
//! grocery-cli user create --username alice --password 'correct horse'
//! ```
//!
//! The database is chosen the same way as for the web server
//! (`GROCERY_DATABASE_URL`, then `DATABASE_URL`, then `sqlite://grocery.db`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "grocery-cli")]
#[command(author, version, about = "Grocery list CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                let id = commands::user::create(&username, &password).await?;
                tracing::info!("Created user {username} (id {id})");
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "grocery-cli",
            "user",
            "create",
            "--username",
            "alice",
            "--password",
            "correct horse",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::User {
                action: UserAction::Create { ref username, ref password }
            }) if username == "alice" && password == "correct horse"
        ));
    }
}
