use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use game_api_rust::config::AppConfig;
use game_api_rust::database::DatabaseManager;
use game_api_rust::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "game-api-rust", version, about = "Game records REST API")]
struct Args {
    /// Port to listen on (overrides GAME_API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Keep all data in process memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("game_api_rust=debug,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting Game API in {:?} mode", config.environment);

    let state = if args.in_memory || config.database.url.is_none() {
        tracing::warn!("Using in-memory store, data is lost on shutdown");
        AppState::in_memory(config)
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        AppState::postgres(config, pool)
    };

    let bind_addr = format!(
        "{}:{}",
        state.config.server.bind_address, state.config.server.port
    );
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Game API listening on http://{}", bind_addr);
    axum::serve(listener, app(state))
        .await
        .context("server error")?;

    Ok(())
}
