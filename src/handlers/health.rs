use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub artifacts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_hash: Option<String>,
    pub model_kind: String,
    pub features: usize,
    pub ready: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let artifacts = &state.artifacts;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: format!("video-likes-v{}", env!("CARGO_PKG_VERSION")),
        artifacts: artifacts.name().to_string(),
        artifact_hash: artifacts.fingerprint().map(str::to_string),
        model_kind: artifacts.model().kind().to_string(),
        features: artifacts.schema().len(),
        // artifacts are loaded before the listener binds
        ready: true,
    })
}
