use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::codec::{CodecEncoder, CodecEncoderDoc};
use crate::crypto;
use crate::error::ArtifactError;
use crate::lemma::Lemmatizer;
use crate::model::RegressionModel;
use crate::scaler::NumericScaler;
use crate::schema::FeatureSchema;
use crate::tfidf::{TfIdfDoc, TfIdfVectorizer};

pub const MANIFEST_FILE: &str = "artifacts.toml";

/// Optional `artifacts.toml` next to the artifacts. Every key falls back to
/// the file name the training job writes by default.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ArtifactManifest {
    pub name: String,
    pub model: String,
    pub scaler: String,
    pub vectorizer: String,
    pub encoder: String,
    pub feature_names: String,
    pub lemmas: String,
}

impl Default for ArtifactManifest {
    fn default() -> Self {
        Self {
            name: "video-likes".to_string(),
            model: "video_feature_model.json".to_string(),
            scaler: "scaler.json".to_string(),
            vectorizer: "tfidf_vectorizer.json".to_string(),
            encoder: "label_encoder_codec.json".to_string(),
            feature_names: "feature_names.json".to_string(),
            lemmas: "lemmas.json".to_string(),
        }
    }
}

impl ArtifactManifest {
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| ArtifactError::Io {
            name: "manifest",
            path: path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ArtifactError::Manifest { path, source })
    }
}

/// Everything produced by training, loaded once and shared read-only.
#[derive(Debug)]
pub struct TrainedArtifacts {
    name: String,
    fingerprint: Option<String>,
    model: RegressionModel,
    scaler: NumericScaler,
    vectorizer: TfIdfVectorizer,
    encoder: CodecEncoder,
    lemmatizer: Lemmatizer,
    schema: FeatureSchema,
}

impl TrainedArtifacts {
    /// Assembles a bundle from already-parsed artifacts and checks that they
    /// agree with each other.
    pub fn from_parts(
        name: impl Into<String>,
        model: RegressionModel,
        scaler: NumericScaler,
        vectorizer: TfIdfVectorizer,
        encoder: CodecEncoder,
        feature_names: Vec<String>,
        lemmatizer: Lemmatizer,
    ) -> Result<Self, ArtifactError> {
        scaler.validate()?;
        model.validate()?;
        if feature_names.is_empty() {
            return Err(ArtifactError::invalid("feature_names", "empty feature list"));
        }
        if model.n_features() != feature_names.len() {
            return Err(ArtifactError::invalid(
                "model",
                format!(
                    "model expects {} features, feature list has {}",
                    model.n_features(),
                    feature_names.len()
                ),
            ));
        }

        let schema = FeatureSchema::build(feature_names, &vectorizer);
        Ok(Self {
            name: name.into(),
            fingerprint: None,
            model,
            scaler,
            vectorizer,
            encoder,
            lemmatizer,
            schema,
        })
    }

    /// Loads the bundle from `dir`. Any missing or inconsistent artifact is
    /// an error; the caller must not serve predictions without one.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let manifest = ArtifactManifest::load(dir)?;

        let model_bytes = read_artifact(dir, "model", &manifest.model)?;
        let scaler_bytes = read_artifact(dir, "scaler", &manifest.scaler)?;
        let vectorizer_bytes = read_artifact(dir, "tfidf_vectorizer", &manifest.vectorizer)?;
        let encoder_bytes = read_artifact(dir, "label_encoder_codec", &manifest.encoder)?;
        let names_bytes = read_artifact(dir, "feature_names", &manifest.feature_names)?;

        let model: RegressionModel = parse("model", &model_bytes)?;
        let scaler: NumericScaler = parse("scaler", &scaler_bytes)?;
        let vectorizer = TfIdfVectorizer::try_from(parse::<TfIdfDoc>(
            "tfidf_vectorizer",
            &vectorizer_bytes,
        )?)?;
        let encoder =
            CodecEncoder::try_from(parse::<CodecEncoderDoc>("label_encoder_codec", &encoder_bytes)?)?;
        let feature_names: Vec<String> = parse("feature_names", &names_bytes)?;

        let lemmas_path = dir.join(&manifest.lemmas);
        let (lemmatizer, lemma_bytes) = if lemmas_path.exists() {
            let bytes = read_artifact(dir, "lemmas", &manifest.lemmas)?;
            let table: HashMap<String, String> = parse("lemmas", &bytes)?;
            (Lemmatizer::from_table(table)?, bytes)
        } else {
            (Lemmatizer::default(), Vec::new())
        };

        let fingerprint = crypto::fingerprint(&[
            model_bytes.as_slice(),
            scaler_bytes.as_slice(),
            vectorizer_bytes.as_slice(),
            encoder_bytes.as_slice(),
            names_bytes.as_slice(),
            lemma_bytes.as_slice(),
        ]);

        let mut artifacts = Self::from_parts(
            manifest.name,
            model,
            scaler,
            vectorizer,
            encoder,
            feature_names,
            lemmatizer,
        )?;
        artifacts.fingerprint = Some(fingerprint);

        info!(
            "[video-likes] Loaded artifacts '{}' from {:?}: {} model, {} features, {} vocabulary terms, {} codecs, {} lemmas",
            artifacts.name,
            dir,
            artifacts.model.kind(),
            artifacts.schema.len(),
            artifacts.vectorizer.dim(),
            artifacts.encoder.classes().len(),
            artifacts.lemmatizer.table_len(),
        );
        if !artifacts.schema.missing().is_empty() {
            warn!(
                "[video-likes] Trained features with no source, always zero: {:?}",
                artifacts.schema.missing()
            );
        }
        let dropped = artifacts.schema.dropped_terms(&artifacts.vectorizer);
        if !dropped.is_empty() {
            info!(
                "[video-likes] {} vocabulary terms are not model features and will be dropped",
                dropped.len()
            );
        }

        Ok(artifacts)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn model(&self) -> &RegressionModel {
        &self.model
    }

    pub fn scaler(&self) -> &NumericScaler {
        &self.scaler
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn encoder(&self) -> &CodecEncoder {
        &self.encoder
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }
}

fn read_artifact(dir: &Path, name: &'static str, file: &str) -> Result<Vec<u8>, ArtifactError> {
    let path: PathBuf = dir.join(file);
    if !path.exists() {
        return Err(ArtifactError::Missing { name, path });
    }
    std::fs::read(&path).map_err(|source| ArtifactError::Io { name, path, source })
}

fn parse<T: DeserializeOwned>(name: &'static str, bytes: &[u8]) -> Result<T, ArtifactError> {
    serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse { name, source })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::schema::{CODEC_FEATURE, HAS_AUDIO_FEATURE, NUMERIC_FEATURES};

    pub const TERMS: [&str; 5] = ["cat", "hello", "tutorial", "video", "world"];
    pub const IDF: [f64; 5] = [2.0, 1.5, 2.5, 1.2, 1.8];
    pub const MEAN: [f64; 13] = [
        120.0, 30.0, 1280.0, 720.0, 3600.0, 12.0, 44100.0, 2.0, 2021.0, 6.0, 15.0, 3.0, 12.0,
    ];
    pub const SCALE: [f64; 13] = [
        60.0, 5.0, 320.0, 180.0, 1800.0, 4.0, 4000.0, 1.0, 2.0, 3.0, 8.0, 2.0, 1.0,
    ];
    pub const COEFFICIENTS: [f64; 20] = [
        10.0, 5.0, 3.0, 2.0, 4.0, 6.0, 1.0, 2.0, 7.0, 1.0, 0.5, -1.0, 0.0, // numeric
        2.0, 8.0, // codec, audio
        12.0, 20.0, 15.0, 9.0, 25.0, // terms
    ];
    pub const INTERCEPT: f64 = 500.0;

    pub fn feature_names() -> Vec<String> {
        NUMERIC_FEATURES
            .iter()
            .chain([CODEC_FEATURE, HAS_AUDIO_FEATURE].iter())
            .chain(TERMS.iter())
            .map(|s| s.to_string())
            .collect()
    }

    pub fn vectorizer() -> TfIdfVectorizer {
        let doc: TfIdfDoc = serde_json::from_value(serde_json::json!({
            "vocabulary": TERMS
                .iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), i))
                .collect::<HashMap<_, _>>(),
            "idf": IDF,
        }))
        .unwrap();
        TfIdfVectorizer::try_from(doc).unwrap()
    }

    pub fn scaler() -> NumericScaler {
        NumericScaler::Standard {
            mean: MEAN.to_vec(),
            scale: SCALE.to_vec(),
            with_mean: true,
            with_std: true,
            feature_names_in: Some(NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn encoder() -> CodecEncoder {
        CodecEncoder::from_classes(vec!["h264".into(), "hevc".into(), "vp9".into()]).unwrap()
    }

    /// Small but complete bundle: every trained feature has a source.
    pub fn artifacts() -> TrainedArtifacts {
        artifacts_with_names(feature_names())
    }

    pub fn artifacts_with_names(names: Vec<String>) -> TrainedArtifacts {
        let model = RegressionModel::Linear {
            coefficients: COEFFICIENTS
                .iter()
                .copied()
                .chain(std::iter::repeat(0.0))
                .take(names.len())
                .collect(),
            intercept: INTERCEPT,
        };
        TrainedArtifacts::from_parts(
            "fixture",
            model,
            scaler(),
            vectorizer(),
            encoder(),
            names,
            Lemmatizer::default(),
        )
        .unwrap()
    }
}
