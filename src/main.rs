use channel_dashboard::{AppState, Config, router};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env().inspect_err(|err| error!("{err}"))?;

    if let Some(parent) = config
        .history_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).await?;
    }

    let state = AppState::from_config(&config).await;
    let app = router(state);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");

    if config.open_browser {
        let url = format!("http://localhost:{}/", config.port);
        if let Err(err) = webbrowser::open(&url) {
            warn!("could not open a browser at {url}: {err}");
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
