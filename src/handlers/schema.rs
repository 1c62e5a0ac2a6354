use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::schema::{Slot, NUMERIC_FEATURES};
use crate::state::AppState;

#[derive(Serialize)]
pub struct FeatureView {
    pub name: String,
    pub slot: Slot,
}

#[derive(Serialize)]
pub struct SchemaResponse {
    pub name: String,
    pub features: Vec<FeatureView>,
    pub numeric_features: Vec<String>,
    pub codec_classes: Vec<String>,
    pub vocabulary_size: usize,
    pub missing_features: Vec<String>,
}

/// The trained feature order and the codec labels the model knows about.
pub async fn schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    let artifacts = &state.artifacts;
    let schema = artifacts.schema();
    let features = schema
        .names()
        .iter()
        .zip(schema.slots())
        .map(|(name, slot)| FeatureView {
            name: name.clone(),
            slot: *slot,
        })
        .collect();

    Json(SchemaResponse {
        name: artifacts.name().to_string(),
        features,
        numeric_features: NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect(),
        codec_classes: artifacts.encoder().classes().to_vec(),
        vocabulary_size: artifacts.vectorizer().dim(),
        missing_features: schema.missing().to_vec(),
    })
}
