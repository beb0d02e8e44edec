use std::sync::Arc;

use anyhow::{bail, Context};
use mongodb::bson::doc;
use mongodb::Client;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use todo_server::{app, Config, SharedStore, ToDoDal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Startup order is strict: no request is served before the store
    // answers a ping.
    let client = Client::with_uri_str(&config.mongodb_uri)
        .await
        .context("failed to connect to the document store")?;
    let database = client
        .default_database()
        .context("MONGODB_URI must name a default database")?;
    let pong = database
        .run_command(doc! { "ping": 1 })
        .await
        .context("document store liveness probe failed")?;
    let ok = match pong.get_f64("ok") {
        Ok(value) => value,
        Err(_) => f64::from(pong.get_i32("ok").unwrap_or(0)),
    };
    if ok != 1.0 {
        bail!("document store ping did not return ok");
    }

    let store: SharedStore = Arc::new(ToDoDal::new(&database));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Accepting has stopped and in-flight requests have drained; release
    // the store connection last.
    client.shutdown().await;
    tracing::info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
    }
}
