use like_gadgets::{AppState, AutomationClient, Settings, load_data, router, ui::Presentation};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env();
    if let Some(parent) = settings.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&settings.data_path).await;
    let gateway = AutomationClient::new(
        &settings.automation_url,
        &settings.automation_user,
        &settings.automation_password,
    );
    info!(automation = %settings.automation_url, "using automation server");
    let state = AppState::new(
        settings.data_path.clone(),
        data,
        gateway,
        Presentation::new(settings.icon_base_url.clone()),
    )
    .with_mount_limit(settings.mount_limit);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
