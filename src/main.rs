use anyhow::Context;
use tracing::{error, info};

use video_likes::artifacts::TrainedArtifacts;
use video_likes::config::Config;
use video_likes::routes;
use video_likes::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!("[video-likes] Starting video-likes server");
    info!("[video-likes] Models directory: {:?}", config.models_dir);

    // No requests are accepted until every artifact has loaded.
    let artifacts = TrainedArtifacts::load(&config.models_dir)
        .inspect_err(|e| error!("[video-likes] Error loading model or preprocessing files: {}", e))
        .with_context(|| format!("loading artifacts from {:?}", config.models_dir))?;
    info!(
        "[video-likes] Artifact fingerprint: {}",
        artifacts.fingerprint().unwrap_or("none")
    );

    let state = AppState::new(config.clone(), artifacts);
    let app = routes::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[video-likes] Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
