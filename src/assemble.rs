use crate::artifacts::TrainedArtifacts;
use crate::error::{PipelineWarning, PredictionError};
use crate::input::RawVideoInput;
use crate::scaler::RawNumeric;
use crate::schema::{FeatureSchema, Slot};
use crate::temporal::{self, PublishDate};
use crate::text::normalize_title;

/// Model input, positionally aligned with the trained feature list.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRow {
    values: Vec<f64>,
}

impl FeatureRow {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn named<'a>(&'a self, schema: &'a FeatureSchema) -> impl Iterator<Item = (&'a str, f64)> {
        schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

#[derive(Clone, Debug)]
pub struct AssembledRow {
    pub row: FeatureRow,
    pub normalized_title: String,
    pub warnings: Vec<PipelineWarning>,
}

pub fn raw_numeric(input: &RawVideoInput, date: &PublishDate) -> RawNumeric {
    RawNumeric([
        input.duration_seconds,
        input.fps,
        input.width as f64,
        input.height as f64,
        input.num_frames as f64,
        input.file_size_mb,
        input.audio_fps,
        input.audio_channels as f64,
        date.year as f64,
        date.month as f64,
        date.day as f64,
        date.day_of_week as f64,
        date.hour as f64,
    ])
}

/// Builds the model row for one request: decompose the date, encode the
/// codec, vectorize the title, scale the numeric block once, then lay every
/// value into its trained slot. Slots with no source stay zero.
pub fn assemble(
    input: &RawVideoInput,
    artifacts: &TrainedArtifacts,
) -> Result<AssembledRow, PredictionError> {
    let mut warnings = Vec::new();

    let date = temporal::decompose(&input.publish_time);
    let (codec_code, codec_warning) = artifacts.encoder().encode(&input.codec);
    warnings.extend(codec_warning);

    let normalized_title = normalize_title(&input.title, artifacts.lemmatizer());
    let text = artifacts.vectorizer().transform(&normalized_title);

    let scaled = artifacts.scaler().transform(raw_numeric(input, &date));
    let numeric = scaled.values();

    let schema = artifacts.schema();
    let values: Vec<f64> = schema
        .slots()
        .iter()
        .map(|slot| match *slot {
            Slot::Numeric(i) => numeric[i],
            Slot::Codec => codec_code as f64,
            Slot::HasAudio => input.has_audio as f64,
            Slot::Term(i) => text[i],
            Slot::Missing => 0.0,
        })
        .collect();

    if !schema.missing().is_empty() {
        warnings.push(PipelineWarning::MissingFeatures {
            names: schema.missing().to_vec(),
        });
    }

    let row = FeatureRow { values };
    if let Some((name, value)) = row.named(schema).find(|(_, v)| !v.is_finite()) {
        return Err(PredictionError::NonFiniteFeature {
            name: name.to_string(),
            value,
        });
    }

    Ok(AssembledRow {
        row,
        normalized_title,
        warnings,
    })
}
