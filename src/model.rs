use serde::Deserialize;

use crate::error::{ArtifactError, PredictionError};

const TREE_LEAF: i64 = -1;

/// One regression tree in flat array layout. Node 0 is the root; a node is a
/// leaf when both children are `-1`. Samples go left when
/// `x[feature] <= threshold`.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err("empty tree".to_string());
        }
        if [
            self.children_right.len(),
            self.feature.len(),
            self.threshold.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("node arrays differ in length".to_string());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF && right == TREE_LEAF {
                if !self.value[node].is_finite() {
                    return Err(format!("leaf {} has a non-finite value", node));
                }
                continue;
            }
            // children always come after their parent, which rules out cycles
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has bad child {}", node, child));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on feature {}", node, feature));
            }
            if self.threshold[node].is_nan() {
                return Err(format!("node {} has a NaN threshold", node));
            }
        }
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

/// The trained like-count regressor.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionModel {
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    /// Mean of the tree outputs.
    RandomForest { n_features: usize, trees: Vec<Tree> },
    /// `base_score + learning_rate * sum(tree outputs)`
    GradientBoosting {
        n_features: usize,
        trees: Vec<Tree>,
        base_score: f64,
        learning_rate: f64,
    },
}

impl RegressionModel {
    pub fn n_features(&self) -> usize {
        match self {
            RegressionModel::Linear { coefficients, .. } => coefficients.len(),
            RegressionModel::RandomForest { n_features, .. }
            | RegressionModel::GradientBoosting { n_features, .. } => *n_features,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegressionModel::Linear { .. } => "linear",
            RegressionModel::RandomForest { .. } => "random_forest",
            RegressionModel::GradientBoosting { .. } => "gradient_boosting",
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        match self {
            RegressionModel::Linear {
                coefficients,
                intercept,
            } => {
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ArtifactError::invalid("model", "non-finite coefficient"));
                }
            }
            RegressionModel::RandomForest { n_features, trees }
            | RegressionModel::GradientBoosting {
                n_features, trees, ..
            } => {
                if trees.is_empty() {
                    return Err(ArtifactError::invalid("model", "ensemble has no trees"));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(*n_features)
                        .map_err(|e| ArtifactError::invalid("model", format!("tree {}: {}", i, e)))?;
                }
            }
        }
        if let RegressionModel::GradientBoosting {
            base_score,
            learning_rate,
            ..
        } = self
        {
            if !base_score.is_finite() || !learning_rate.is_finite() {
                return Err(ArtifactError::invalid("model", "non-finite boosting parameter"));
            }
        }
        Ok(())
    }

    /// Predicts a single row. The row must have exactly `n_features` columns.
    pub fn predict(&self, row: &[f64]) -> Result<f64, PredictionError> {
        let expected = self.n_features();
        if row.len() != expected {
            return Err(PredictionError::ShapeMismatch {
                expected,
                got: row.len(),
            });
        }

        let prediction = match self {
            RegressionModel::Linear {
                coefficients,
                intercept,
            } => intercept + coefficients.iter().zip(row).map(|(c, x)| c * x).sum::<f64>(),
            RegressionModel::RandomForest { trees, .. } => {
                trees.iter().map(|t| t.predict(row)).sum::<f64>() / trees.len() as f64
            }
            RegressionModel::GradientBoosting {
                trees,
                base_score,
                learning_rate,
                ..
            } => base_score + learning_rate * trees.iter().map(|t| t.predict(row)).sum::<f64>(),
        };

        if !prediction.is_finite() {
            return Err(PredictionError::NonFiniteOutput(prediction));
        }
        Ok(prediction)
    }
}
