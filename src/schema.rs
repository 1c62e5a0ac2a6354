use serde::Serialize;

use crate::tfidf::TfIdfVectorizer;

pub const NUMERIC_FEATURE_COUNT: usize = 13;

/// Columns handed to the numeric scaler, in the order it was fitted on.
pub const NUMERIC_FEATURES: [&str; NUMERIC_FEATURE_COUNT] = [
    "duration_seconds",
    "fps",
    "width",
    "height",
    "num_frames",
    "file_size_MB",
    "audio_fps",
    "audio_channels",
    "publish_year",
    "publish_month",
    "publish_day",
    "publish_dayofweek",
    "publish_hour",
];

pub const CODEC_FEATURE: &str = "codec_encoded";
pub const HAS_AUDIO_FEATURE: &str = "has_audio";

/// Where the value of one trained column comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "index", rename_all = "snake_case")]
pub enum Slot {
    /// Index into the scaled numeric block.
    Numeric(usize),
    Codec,
    HasAudio,
    /// Column index in the title vectorizer output.
    Term(usize),
    /// No stage produces this column; it is always zero.
    Missing,
}

/// The trained feature order with each column resolved to its source once,
/// at load time.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    slots: Vec<Slot>,
    missing: Vec<String>,
}

impl FeatureSchema {
    pub fn build(feature_names: Vec<String>, vectorizer: &TfIdfVectorizer) -> Self {
        let slots: Vec<Slot> = feature_names
            .iter()
            .map(|name| resolve(name, vectorizer))
            .collect();
        let missing = feature_names
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| **slot == Slot::Missing)
            .map(|(name, _)| name.clone())
            .collect();
        Self {
            names: feature_names,
            slots,
            missing,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Trained columns that no pipeline stage produces.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Vocabulary terms the vectorizer produces but the model never sees.
    pub fn dropped_terms<'a>(&self, vectorizer: &'a TfIdfVectorizer) -> Vec<&'a str> {
        let mut used = vec![false; vectorizer.dim()];
        for slot in &self.slots {
            if let Slot::Term(index) = slot {
                used[*index] = true;
            }
        }
        vectorizer
            .terms()
            .iter()
            .zip(used)
            .filter(|(_, used)| !used)
            .map(|(term, _)| term.as_str())
            .collect()
    }
}

fn resolve(name: &str, vectorizer: &TfIdfVectorizer) -> Slot {
    if let Some(index) = NUMERIC_FEATURES.iter().position(|n| *n == name) {
        return Slot::Numeric(index);
    }
    match name {
        CODEC_FEATURE => Slot::Codec,
        HAS_AUDIO_FEATURE => Slot::HasAudio,
        _ => vectorizer
            .index_of(name)
            .map(Slot::Term)
            .unwrap_or(Slot::Missing),
    }
}
