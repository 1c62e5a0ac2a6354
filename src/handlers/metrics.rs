use axum::extract::State;
use axum::Json;

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
