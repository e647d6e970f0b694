use std::env;
use std::sync::Arc;

use stafflane_db_memory::InMemoryStore;
use stafflane_server::config::load_config;
use stafflane_server::{AppState, observability, router, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    let config_path = env::var("STAFFLANE_CONFIG").ok();
    let config = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {e}");
        std::process::exit(2);
    }

    observability::init_tracing_with_level(&config.logging.level);
    tracing::info!(
        path = config_path.as_deref().unwrap_or("stafflane.toml"),
        "Configuration loaded"
    );

    let store = InMemoryStore::new();
    seed::seed_demo_data(&store).await?;
    tracing::info!(records = store.len().await, "Demo data seeded");

    let state = AppState::new(Arc::new(store), &config);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Stafflane server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
