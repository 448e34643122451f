use muhsin::catalog::seed_data;
use muhsin::notifications::{LocalReminders, spawn_reminder_sync};
use muhsin::{AppState, AppStore, Config, load_data, persist_data, router, spawn_writer};
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = match load_data(&config.data_path).await {
        Some(data) => data,
        None => {
            let seed = seed_data();
            if let Err(err) = persist_data(&config.data_path, &seed).await {
                error!("failed to write initial state: {err}");
            }
            seed
        }
    };

    let store = AppStore::new(data);
    let writer = spawn_writer(config.data_path.clone(), store.subscribe());
    let reminders = spawn_reminder_sync(Arc::new(LocalReminders::new()), store.subscribe());

    let app = router(AppState::new(store));

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router held the last store handle; both tasks finish once they
    // have seen the final state.
    writer.await?;
    reminders.await?;
    info!("state flushed, bye");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
