use coach_nutrition::{AppConfig, AppState, JsonFileRepository, router};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let filter = EnvFilter::from_default_env().add_directive("info".parse()?);
    if config.json_logs {
        fmt().with_env_filter(filter).with_target(false).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }

    let repo = JsonFileRepository::open(config.data_path.clone()).await?;
    info!(path = %repo.path().display(), policy = ?config.missing_day_policy, "food store ready");

    let state = AppState::new(Arc::new(repo), config.missing_day_policy);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
