use common::CommandRegistry;
use http_gateway::http::Server;
use http_gateway::{await_shutdown, Config, Result};
use sharder::{Options, RestClient, SessionStatus, Shard};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    configure_observability(&config);

    let registry = Arc::new(CommandRegistry::builtin());
    let status = Arc::new(SessionStatus::new());

    let rest = match config.bot_token() {
        Some(token) => {
            let rest = Arc::new(RestClient::new(token)?);
            start_shard(
                token,
                Arc::clone(&registry),
                Arc::clone(&rest),
                Arc::clone(&status),
            );

            Some(rest)
        }
        None => {
            warn!("DISCORD_TOKEN is not set, running without a gateway session");
            None
        }
    };

    let server = Server::new(config, registry, status, rest)?;

    server
        .start(async {
            if let Err(e) = await_shutdown().await {
                error!(error = %e, "Failed to listen for shutdown signals");
                std::future::pending::<()>().await;
            }

            info!("Shutting down");
        })
        .await
}

fn configure_observability(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_log {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn start_shard(
    token: &str,
    registry: Arc<CommandRegistry>,
    rest: Arc<RestClient>,
    status: Arc<SessionStatus>,
) {
    let shard = Shard::new(Options::new(token), registry, rest, status);

    tokio::spawn(async move {
        info!("Starting gateway session");

        // only a fatal close code ends the session, the HTTP server keeps running
        if let Err(e) = shard.run().await {
            error!(error = %e, "Gateway session stopped");
        }
    });
}
