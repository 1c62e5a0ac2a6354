use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{PipelineWarning, Stage};
use crate::input::RawVideoInput;
use crate::pipeline;
use crate::state::AppState;

#[derive(Serialize, Clone, Debug)]
pub struct WarningBody {
    #[serde(flatten)]
    pub warning: PipelineWarning,
    pub message: String,
}

impl From<PipelineWarning> for WarningBody {
    fn from(warning: PipelineWarning) -> Self {
        let message = warning.to_string();
        Self { warning, message }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PredictResponse {
    pub prediction_id: String,
    pub predicted_likes: f64,
    pub warnings: Vec<WarningBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_hash: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn predict(
    State(state): State<AppState>,
    Json(input): Json<RawVideoInput>,
) -> Result<Json<PredictResponse>, ApiError> {
    run_single_predict(&state, &input).map(Json)
}

pub fn run_single_predict(
    state: &AppState,
    input: &RawVideoInput,
) -> Result<PredictResponse, ApiError> {
    state.metrics.record_request();

    let prediction = pipeline::predict(&state.artifacts, input).map_err(|e| {
        state.metrics.record_failure();
        error!("[video-likes] Prediction failed at {} stage: {}", e.stage(), e);
        let status = match e.stage() {
            Stage::Assemble => StatusCode::UNPROCESSABLE_ENTITY,
            Stage::Predict => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: format!("Error in prediction: {}", e),
                stage: Some(e.stage()),
                hint: None,
            }),
        )
    })?;
    state.metrics.record_prediction(&prediction);

    let prediction_id = uuid::Uuid::new_v4().to_string();
    info!(
        "[video-likes] Prediction {}: {:.2} likes ({} warnings)",
        prediction_id,
        prediction.value,
        prediction.warnings.len()
    );

    Ok(PredictResponse {
        prediction_id,
        predicted_likes: prediction.value,
        warnings: prediction.warnings.into_iter().map(WarningBody::from).collect(),
        artifact_hash: state.artifacts.fingerprint().map(str::to_string),
    })
}
