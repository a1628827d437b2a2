use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::TokenVerifier;
use crate::cli::OutputFormat;
use crate::config::{AppConfig, StorageBackend};
use crate::database;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(long, help = "Display name")]
        name: String,

        #[arg(long, help = "Email address, unique across accounts")]
        email: String,

        #[arg(long, help = "Avatar URL, defaults to the Gravatar for the email")]
        avatar: Option<String>,

        #[arg(long, help = "Password for signing in through POST /api/auth")]
        password: Option<String>,
    },
}

pub async fn handle(
    cmd: UserCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create {
            name,
            email,
            avatar,
            password,
        } => {
            if config.storage.backend == StorageBackend::Memory {
                tracing::warn!(
                    "Storage backend is in-memory; the created user will not outlive this command"
                );
            }

            let store = database::connect(&config.storage)
                .await
                .context("failed to open storage")?;
            let user = UserService::new(store)
                .create(&name, &email, avatar, password)
                .await?;
            let token = TokenVerifier::from_config(&config.security).issue(user.id)?;

            match output_format {
                OutputFormat::Json => {
                    let body = json!({ "user": user.view(), "token": token });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Text => {
                    println!("Created user {}", user.id);
                    println!("  name:   {}", user.name);
                    println!("  email:  {}", user.email);
                    println!("  avatar: {}", user.avatar);
                    println!("  token:  {}", token);
                }
            }

            Ok(())
        }
    }
}
