use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{ArtifactError, PipelineWarning};

/// On-disk form of the codec label encoder.
#[derive(Debug, Deserialize)]
pub struct CodecEncoderDoc {
    pub classes: Vec<String>,
}

/// Maps codec labels to the integer codes fixed at training time. The code
/// of a class is its position in the stored class list.
#[derive(Debug, Clone)]
pub struct CodecEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl CodecEncoder {
    pub fn from_classes(classes: Vec<String>) -> Result<Self, ArtifactError> {
        if classes.is_empty() {
            return Err(ArtifactError::invalid("label_encoder_codec", "no codec classes"));
        }
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code).is_some() {
                return Err(ArtifactError::invalid(
                    "label_encoder_codec",
                    format!("duplicate codec class '{}'", class),
                ));
            }
        }
        Ok(Self { classes, codes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encodes a codec label. Unknown labels take the code of the first
    /// stored class and produce a warning.
    pub fn encode(&self, label: &str) -> (usize, Option<PipelineWarning>) {
        match self.codes.get(label) {
            Some(&code) => (code, None),
            None => {
                let fallback = self.codes[&self.classes[0]];
                (
                    fallback,
                    Some(PipelineWarning::UnknownCodec {
                        label: label.to_string(),
                    }),
                )
            }
        }
    }
}

impl TryFrom<CodecEncoderDoc> for CodecEncoder {
    type Error = ArtifactError;

    fn try_from(doc: CodecEncoderDoc) -> Result<Self, Self::Error> {
        Self::from_classes(doc.classes)
    }
}
