use serde::Deserialize;

use crate::error::ArtifactError;
use crate::schema::{NUMERIC_FEATURES, NUMERIC_FEATURE_COUNT};

/// Numeric and temporal columns before scaling, in `NUMERIC_FEATURES` order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawNumeric(pub [f64; NUMERIC_FEATURE_COUNT]);

/// Output of [`NumericScaler::transform`]. Only the scaler can build one, so a
/// block cannot be scaled twice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledNumeric([f64; NUMERIC_FEATURE_COUNT]);

impl ScaledNumeric {
    pub fn values(&self) -> &[f64; NUMERIC_FEATURE_COUNT] {
        &self.0
    }
}

fn default_true() -> bool {
    true
}

/// Trained numeric scaler, applied to the numeric block only.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumericScaler {
    /// `(x - mean) / scale`
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default = "default_true")]
        with_mean: bool,
        #[serde(default = "default_true")]
        with_std: bool,
        #[serde(default)]
        feature_names_in: Option<Vec<String>>,
    },
    /// `x * scale + min`
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names_in: Option<Vec<String>>,
    },
}

impl NumericScaler {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let (offsets, scale, names) = match self {
            NumericScaler::Standard {
                mean,
                scale,
                feature_names_in,
                ..
            } => (mean, scale, feature_names_in),
            NumericScaler::MinMax {
                min,
                scale,
                feature_names_in,
            } => (min, scale, feature_names_in),
        };

        if offsets.len() != NUMERIC_FEATURE_COUNT || scale.len() != NUMERIC_FEATURE_COUNT {
            return Err(ArtifactError::invalid(
                "scaler",
                format!(
                    "expected {} numeric columns, got {} offsets and {} scales",
                    NUMERIC_FEATURE_COUNT,
                    offsets.len(),
                    scale.len()
                ),
            ));
        }
        if offsets.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(ArtifactError::invalid("scaler", "non-finite parameter"));
        }
        if let Some(names) = names {
            if names.iter().map(String::as_str).ne(NUMERIC_FEATURES.iter().copied()) {
                return Err(ArtifactError::invalid(
                    "scaler",
                    format!("fitted on {:?}, expected {:?}", names, NUMERIC_FEATURES),
                ));
            }
        }
        Ok(())
    }

    pub fn transform(&self, raw: RawNumeric) -> ScaledNumeric {
        let mut out = raw.0;
        match self {
            NumericScaler::Standard {
                mean,
                scale,
                with_mean,
                with_std,
                ..
            } => {
                for (i, value) in out.iter_mut().enumerate() {
                    if *with_mean {
                        *value -= mean[i];
                    }
                    if *with_std && scale[i] != 0.0 {
                        *value /= scale[i];
                    }
                }
            }
            NumericScaler::MinMax { min, scale, .. } => {
                for (i, value) in out.iter_mut().enumerate() {
                    *value = *value * scale[i] + min[i];
                }
            }
        }
        ScaledNumeric(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> NumericScaler {
        NumericScaler::Standard {
            mean: (0..NUMERIC_FEATURE_COUNT).map(|i| i as f64).collect(),
            scale: vec![2.0; NUMERIC_FEATURE_COUNT],
            with_mean: true,
            with_std: true,
            feature_names_in: None,
        }
    }

    #[test]
    fn test_standard_transform() {
        let raw = RawNumeric([10.0; NUMERIC_FEATURE_COUNT]);
        let scaled = standard().transform(raw);
        for (i, value) in scaled.values().iter().enumerate() {
            assert_eq!(*value, (10.0 - i as f64) / 2.0);
        }
    }

    #[test]
    fn test_zero_scale_is_identity_divisor() {
        let scaler = NumericScaler::Standard {
            mean: vec![1.0; NUMERIC_FEATURE_COUNT],
            scale: vec![0.0; NUMERIC_FEATURE_COUNT],
            with_mean: true,
            with_std: true,
            feature_names_in: None,
        };
        let scaled = scaler.transform(RawNumeric([3.0; NUMERIC_FEATURE_COUNT]));
        assert!(scaled.values().iter().all(|v| *v == 2.0));
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = NumericScaler::MinMax {
            min: vec![-1.0; NUMERIC_FEATURE_COUNT],
            scale: vec![0.5; NUMERIC_FEATURE_COUNT],
            feature_names_in: None,
        };
        let scaled = scaler.transform(RawNumeric([4.0; NUMERIC_FEATURE_COUNT]));
        assert!(scaled.values().iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_validate_checks_width_and_names() {
        assert!(standard().validate().is_ok());

        let short = NumericScaler::MinMax {
            min: vec![0.0; 3],
            scale: vec![1.0; 3],
            feature_names_in: None,
        };
        assert!(short.validate().is_err());

        let mut names: Vec<String> = NUMERIC_FEATURES.iter().map(|s| s.to_string()).collect();
        names.swap(0, 1);
        let misordered = NumericScaler::MinMax {
            min: vec![0.0; NUMERIC_FEATURE_COUNT],
            scale: vec![1.0; NUMERIC_FEATURE_COUNT],
            feature_names_in: Some(names),
        };
        assert!(misordered.validate().is_err());
    }

    #[test]
    fn test_deserialize_standard_defaults() {
        let json = serde_json::json!({
            "kind": "standard",
            "mean": vec![0.0; NUMERIC_FEATURE_COUNT],
            "scale": vec![1.0; NUMERIC_FEATURE_COUNT],
        });
        let scaler: NumericScaler = serde_json::from_value(json).unwrap();
        match scaler {
            NumericScaler::Standard {
                with_mean,
                with_std,
                ..
            } => assert!(with_mean && with_std),
            _ => panic!("Expected standard scaler"),
        }
    }
}
