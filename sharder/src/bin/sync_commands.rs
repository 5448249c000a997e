use common::CommandRegistry;
use model::Snowflake;
use serde::Deserialize;
use sharder::{RestClient, RestError};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct Config {
    discord_token: String,
    discord_application_id: Option<String>,
}

#[derive(thiserror::Error, Debug)]
enum SyncError {
    #[error("error while reading configuration: {0}")]
    EnvError(#[from] envy::Error),

    #[error("DISCORD_APPLICATION_ID is not a valid id: {0}")]
    InvalidApplicationId(String),

    #[error("{0}")]
    RestError(#[from] RestError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    match sync().await {
        Ok(names) => {
            for name in &names {
                println!("/{}", name);
            }

            info!(count = names.len(), "Synced global commands");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to sync commands");
            ExitCode::FAILURE
        }
    }
}

async fn sync() -> Result<Vec<String>, SyncError> {
    let config: Config = envy::from_env()?;
    let rest = RestClient::new(config.discord_token)?;

    let application_id: Snowflake = match config.discord_application_id {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| SyncError::InvalidApplicationId(raw.clone()))?,
        None => {
            let application = rest.get_current_application().await?;
            info!(id = %application.id, name = %application.name, "Resolved application");
            application.id
        }
    };

    let definitions = CommandRegistry::builtin().definitions();
    let synced = rest
        .bulk_overwrite_global_commands(application_id, &definitions)
        .await?;

    Ok(synced
        .into_iter()
        .map(|command| command.name.to_string())
        .collect())
}
