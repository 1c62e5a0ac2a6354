use crate::artifacts::TrainedArtifacts;
use crate::config::Config;
use crate::metrics::Metrics;

use std::sync::Arc;

/// Shared by every handler. The artifacts are loaded once before the
/// server starts and never written again.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub artifacts: Arc<TrainedArtifacts>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, artifacts: TrainedArtifacts) -> Self {
        Self {
            config,
            artifacts: Arc::new(artifacts),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
