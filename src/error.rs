use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Failure while loading the trained artifacts. Always fatal: the service
/// refuses to start.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact '{name}' not found at {path:?}")]
    Missing { name: &'static str, path: PathBuf },

    #[error("Failed to read artifact '{name}' at {path:?}: {source}")]
    Io {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact '{name}': {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Inconsistent artifact '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ArtifactError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Pipeline stage names reported back to callers when a request fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Assemble,
    Predict,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Assemble => f.write_str("assemble"),
            Stage::Predict => f.write_str("predict"),
        }
    }
}

/// Failure that aborts a single prediction request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("Feature row has {got} columns, model expects {expected}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Feature '{name}' is not finite ({value})")]
    NonFiniteFeature { name: String, value: f64 },

    #[error("Model produced a non-finite prediction ({0})")]
    NonFiniteOutput(f64),
}

impl PredictionError {
    pub fn stage(&self) -> Stage {
        match self {
            PredictionError::NonFiniteFeature { .. } => Stage::Assemble,
            PredictionError::ShapeMismatch { .. } | PredictionError::NonFiniteOutput(_) => {
                Stage::Predict
            }
        }
    }
}

/// Non-fatal condition raised while building a feature row. The pipeline
/// substitutes a default and carries on.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    UnknownCodec { label: String },
    MissingFeatures { names: Vec<String> },
}

impl PipelineWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineWarning::UnknownCodec { .. } => "unknown_codec",
            PipelineWarning::MissingFeatures { .. } => "missing_features",
        }
    }
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::UnknownCodec { label } => write!(
                f,
                "Codec '{}' not recognized. Assigning default codec encoding.",
                label
            ),
            PipelineWarning::MissingFeatures { names } => write!(
                f,
                "Missing features {{{}}}. Filling with zeros.",
                names.join(", ")
            ),
        }
    }
}
