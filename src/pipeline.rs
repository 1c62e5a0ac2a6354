use serde::Serialize;
use tracing::{debug, warn};

use crate::artifacts::TrainedArtifacts;
use crate::assemble::assemble;
use crate::error::{PipelineWarning, PredictionError};
use crate::input::RawVideoInput;

#[derive(Clone, Debug, Serialize)]
pub struct Prediction {
    pub value: f64,
    pub warnings: Vec<PipelineWarning>,
}

/// Runs one request through the feature pipeline and the trained model.
/// Warnings are logged and returned; any error aborts this request only.
pub fn predict(
    artifacts: &TrainedArtifacts,
    input: &RawVideoInput,
) -> Result<Prediction, PredictionError> {
    let assembled = assemble(input, artifacts)?;
    for warning in &assembled.warnings {
        warn!("[video-likes] {}", warning);
    }

    let value = artifacts.model().predict(assembled.row.values())?;
    debug!(
        "[video-likes] Predicted {:.2} likes for title {:?}",
        value, assembled.normalized_title
    );

    Ok(Prediction {
        value,
        warnings: assembled.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::fixtures;
    use crate::codec::CodecEncoder;
    use crate::lemma::Lemmatizer;
    use crate::model::RegressionModel;

    #[test]
    fn test_end_to_end_reference_input() {
        let artifacts = fixtures::artifacts();
        let prediction = predict(&artifacts, &RawVideoInput::sample("h264", "Hello World")).unwrap();

        let length = (1.5f64.powi(2) + 1.8f64.powi(2)).sqrt();
        let numeric = 0.5 * 10.0 // duration
            + -1.0 * 5.0 // fps
            + (150.0 / 1800.0) * 4.0 // frames
            + -0.5 * 6.0 // file size
            + 0.975 // audio rate
            + 1.0 * 7.0 // year
            + (4.0 / 3.0) // month
            + 0.5 * 0.5; // day
        let expected = fixtures::INTERCEPT
            + numeric
            + 8.0 // has_audio
            + 20.0 * 1.5 / length
            + 25.0 * 1.8 / length;

        assert!(prediction.value.is_finite());
        assert!((prediction.value - expected).abs() < 1e-9);
        assert!(prediction.warnings.is_empty());
    }

    #[test]
    fn test_fallback_date_is_silent() {
        let artifacts = fixtures::artifacts();
        let mut input = RawVideoInput::sample("h264", "Hello World");
        input.publish_time = "not-a-date".to_string();
        let prediction = predict(&artifacts, &input).unwrap();
        assert!(prediction.warnings.is_empty());
    }

    #[test]
    fn test_unknown_codec_is_a_warning_not_an_error() {
        let artifacts = fixtures::artifacts();
        let known = predict(&artifacts, &RawVideoInput::sample("h264", "cat video")).unwrap();
        let unknown = predict(&artifacts, &RawVideoInput::sample("av1", "cat video")).unwrap();

        assert_eq!(known.value, unknown.value);
        assert_eq!(unknown.warnings.len(), 1);
        assert_eq!(unknown.warnings[0].kind(), "unknown_codec");
    }

    #[test]
    fn test_predictions_are_deterministic() {
        let artifacts = fixtures::artifacts();
        let input = RawVideoInput::sample("vp9", "Top 10 cat tutorials");
        let first = predict(&artifacts, &input).unwrap().value;
        for _ in 0..5 {
            assert_eq!(predict(&artifacts, &input).unwrap().value, first);
        }
    }

    #[test]
    fn test_tree_model_prediction() {
        // split on has_audio (column 14)
        let tree = crate::model::Tree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![14, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![0.0, 100.0, 900.0],
        };
        let artifacts = TrainedArtifacts::from_parts(
            "forest",
            RegressionModel::RandomForest {
                n_features: 20,
                trees: vec![tree],
            },
            fixtures::scaler(),
            fixtures::vectorizer(),
            CodecEncoder::from_classes(vec!["h264".into()]).unwrap(),
            fixtures::feature_names(),
            Lemmatizer::default(),
        )
        .unwrap();

        let mut input = RawVideoInput::sample("h264", "Hello World");
        assert_eq!(predict(&artifacts, &input).unwrap().value, 900.0);
        input.has_audio = 0;
        assert_eq!(predict(&artifacts, &input).unwrap().value, 100.0);
    }

    #[test]
    fn test_non_finite_feature_aborts_request() {
        let artifacts = fixtures::artifacts();
        let mut input = RawVideoInput::sample("h264", "Hello World");
        input.duration_seconds = f64::INFINITY;
        let err = predict(&artifacts, &input).unwrap_err();
        assert_eq!(
            err,
            PredictionError::NonFiniteFeature {
                name: "duration_seconds".to_string(),
                value: f64::INFINITY,
            }
        );
        assert_eq!(err.stage(), crate::error::Stage::Assemble);
    }
}
