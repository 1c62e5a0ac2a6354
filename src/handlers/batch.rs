use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::predict::{run_single_predict, ApiError, ErrorResponse, PredictResponse};
use crate::input::RawVideoInput;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<RawVideoInput>,
}

#[derive(Serialize)]
pub struct BatchResponse {
    pub predictions: Vec<PredictResponse>,
}

pub async fn batch_predict(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    if request.requests.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "At least one request is required".to_string(),
                stage: None,
                hint: Some("Provide {\"requests\": [{\"duration_seconds\": ..., \"title\": \"...\"}]}".to_string()),
            }),
        ));
    }

    let max = state.config.max_batch;
    if request.requests.len() > max {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Maximum {} requests per batch", max),
                stage: None,
                hint: None,
            }),
        ));
    }

    let mut predictions = Vec::with_capacity(request.requests.len());
    for input in &request.requests {
        predictions.push(run_single_predict(&state, input)?);
    }

    Ok(Json(BatchResponse { predictions }))
}
