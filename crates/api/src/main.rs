use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use api::{build_router, ApiState};
use axum::Router;
use common::{config::AppConfig, logging, AppError};
use directory::{GitlabDirectoryClient, UserDirectory};
use notifier::{NotificationService, TelegramMessenger};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let config = AppConfig::load()?;
    config.validate()?;

    let timeout = Duration::from_secs(config.http.timeout_secs);
    let directory_client =
        GitlabDirectoryClient::new(&config.gitlab.url, config.gitlab.token.clone(), timeout)
            .map_err(AppError::http)?;
    let messenger = TelegramMessenger::new(&config.telegram.api_url, &config.telegram.token, timeout)
        .map_err(AppError::http)?;

    let service = NotificationService::new(
        UserDirectory::new(Arc::new(directory_client)),
        Arc::new(messenger),
    );
    let state = Arc::new(ApiState {
        service,
        webhook_path: config.server.path.clone(),
        metrics_path: config.observability.metrics_path.clone(),
    });
    let app: Router = build_router(state);

    let addr: std::net::SocketAddr = config.server.bind.parse()?;
    info!(
        %addr,
        webhook_path = %config.server.path,
        gitlab = %config.gitlab.url,
        "gitlab notifier listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
