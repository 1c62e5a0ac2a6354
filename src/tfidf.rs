use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::ArtifactError;

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// On-disk form of the fitted title vectorizer.
#[derive(Debug, Deserialize)]
pub struct TfIdfDoc {
    /// term -> column index
    pub vocabulary: HashMap<String, usize>,
    /// idf weight per column index
    pub idf: Vec<f64>,
    #[serde(default)]
    pub norm: Norm,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Applies trained TF-IDF weights to a title. Nothing is refit.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
    norm: Norm,
    sublinear_tf: bool,
    binary: bool,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
}

impl TryFrom<TfIdfDoc> for TfIdfVectorizer {
    type Error = ArtifactError;

    fn try_from(doc: TfIdfDoc) -> Result<Self, Self::Error> {
        let dim = doc.vocabulary.len();
        if doc.idf.len() != dim {
            return Err(ArtifactError::invalid(
                "tfidf_vectorizer",
                format!("{} idf weights for {} vocabulary terms", doc.idf.len(), dim),
            ));
        }
        if doc.idf.iter().any(|w| !w.is_finite()) {
            return Err(ArtifactError::invalid("tfidf_vectorizer", "non-finite idf weight"));
        }

        let mut terms: Vec<Option<String>> = vec![None; dim];
        for (term, &index) in &doc.vocabulary {
            match terms.get_mut(index) {
                Some(slot @ None) => *slot = Some(term.clone()),
                Some(Some(other)) => {
                    return Err(ArtifactError::invalid(
                        "tfidf_vectorizer",
                        format!("terms '{}' and '{}' share index {}", other, term, index),
                    ))
                }
                None => {
                    return Err(ArtifactError::invalid(
                        "tfidf_vectorizer",
                        format!("term '{}' has index {} outside 0..{}", term, index, dim),
                    ))
                }
            }
        }
        let terms: Vec<String> = terms.into_iter().flatten().collect();

        let (min_n, max_n) = doc.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ArtifactError::invalid(
                "tfidf_vectorizer",
                format!("bad ngram_range ({}, {})", min_n, max_n),
            ));
        }

        let token_pattern = Regex::new(&doc.token_pattern).map_err(|e| {
            ArtifactError::invalid("tfidf_vectorizer", format!("bad token_pattern: {}", e))
        })?;
        if token_pattern.captures_len() > 2 {
            return Err(ArtifactError::invalid(
                "tfidf_vectorizer",
                "token_pattern may have at most one capturing group",
            ));
        }

        Ok(Self {
            vocabulary: doc.vocabulary,
            terms,
            idf: doc.idf,
            norm: doc.norm,
            sublinear_tf: doc.sublinear_tf,
            binary: doc.binary,
            lowercase: doc.lowercase,
            token_pattern,
            ngram_range: doc.ngram_range,
        })
    }
}

impl TfIdfVectorizer {
    pub fn dim(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let group = if self.token_pattern.captures_len() == 2 { 1 } else { 0 };
        self.token_pattern
            .captures_iter(&text)
            .filter_map(|cap| cap.get(group).map(|m| m.as_str().to_string()))
            .collect()
    }

    fn ngrams(&self, tokens: Vec<String>) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        if max_n == 1 {
            return tokens;
        }
        let mut grams = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                grams.push(window.join(" "));
            }
        }
        grams
    }

    /// Dense TF-IDF row over the vocabulary. Out-of-vocabulary tokens and
    /// empty text contribute nothing.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vec = vec![0.0f64; self.dim()];

        for gram in self.ngrams(self.tokenize(text)) {
            if let Some(&index) = self.vocabulary.get(&gram) {
                vec[index] += 1.0;
            }
        }

        for (index, value) in vec.iter_mut().enumerate() {
            if *value == 0.0 {
                continue;
            }
            let mut tf = if self.binary { 1.0 } else { *value };
            if self.sublinear_tf {
                tf = tf.ln() + 1.0;
            }
            *value = tf * self.idf[index];
        }

        let length = match self.norm {
            Norm::L2 => vec.iter().map(|v| v * v).sum::<f64>().sqrt(),
            Norm::L1 => vec.iter().map(|v| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if length > 0.0 && length != 1.0 {
            for value in vec.iter_mut() {
                *value /= length;
            }
        }

        vec
    }
}
