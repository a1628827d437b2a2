use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::TokenVerifier;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database;
use crate::services::UserService;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signed credential for an existing user")]
    Issue {
        #[arg(help = "User ID")]
        user_id: Uuid,
    },
}

pub async fn handle(
    cmd: TokenCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user_id } => {
            let store = database::connect(&config.storage)
                .await
                .context("failed to open storage")?;
            let user = UserService::new(store).get(user_id).await?;

            let verifier = TokenVerifier::from_config(&config.security);
            let token = verifier.issue(user.id)?;

            match output_format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&json!({
                            "token": token,
                            "user": user.summary(),
                            "expires_in": config.security.jwt_expiry_hours * 3600,
                        }))?
                    );
                }
                OutputFormat::Text => println!("{}", token),
            }

            Ok(())
        }
    }
}
