//! Estimators over an encoded design row. Binary only: outputs index 0 or 1 into the class list.

use crate::error::{ModelError, ScorerError};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
    /// Linear SVM: decision function only, no probabilities.
    LinearSvc { coef: Vec<f64>, intercept: f64 },
    DecisionTree(Tree),
    RandomForest { trees: Vec<Tree> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `x[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights (counts or fractions), normalized at prediction time.
    Leaf { value: Vec<f64> },
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn argmax(dist: &[f64; 2]) -> usize {
    if dist[1] > dist[0] {
        1
    } else {
        0
    }
}

impl Tree {
    /// Children must point forward so that traversal always terminates.
    fn validate(&self, width: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid("tree has no nodes".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= width {
                        return Err(ModelError::Invalid(format!(
                            "node {} splits on feature {} but input has {} features",
                            i, feature, width
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "node {} has bad child index {}",
                                i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != 2 {
                        return Err(ModelError::Invalid(format!(
                            "leaf {} has {} class weights, expected 2",
                            i,
                            value.len()
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(ModelError::Invalid(format!("leaf {} has unusable weights", i)));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_proba(&self, x: ArrayView1<f64>) -> Result<[f64; 2], ScorerError> {
        let mut idx = 0;
        // bounded: validated children always point forward
        for _ in 0..self.nodes.len() {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = x.get(*feature).ok_or(ScorerError::Shape {
                        expected: *feature + 1,
                        actual: x.len(),
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return Ok([value[0] / total, value[1] / total]);
                }
            }
        }
        Err(ScorerError::Invalid("tree traversal did not reach a leaf".into()))
    }
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::LinearSvc { .. } => "linear_svc",
            Estimator::DecisionTree(_) => "decision_tree",
            Estimator::RandomForest { .. } => "random_forest",
        }
    }

    pub fn has_proba(&self) -> bool {
        !matches!(self, Estimator::LinearSvc { .. })
    }

    /// Structural checks against the encoded input width.
    pub fn validate(&self, width: usize) -> Result<(), ModelError> {
        match self {
            Estimator::LogisticRegression { coef, intercept }
            | Estimator::LinearSvc { coef, intercept } => {
                if coef.len() != width {
                    return Err(ModelError::Invalid(format!(
                        "estimator expects {} features, preprocessor produces {}",
                        coef.len(),
                        width
                    )));
                }
                if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::Invalid("non-finite coefficient".into()));
                }
                Ok(())
            }
            Estimator::DecisionTree(tree) => tree.validate(width),
            Estimator::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Invalid("forest has no trees".into()));
                }
                trees.iter().try_for_each(|t| t.validate(width))
            }
        }
    }

    fn decision(coef: &[f64], intercept: f64, x: ArrayView1<f64>) -> Result<f64, ScorerError> {
        if coef.len() != x.len() {
            return Err(ScorerError::Shape {
                expected: coef.len(),
                actual: x.len(),
            });
        }
        Ok(ArrayView1::from(coef).dot(&x) + intercept)
    }

    /// Index of the predicted class (0 or 1).
    pub(crate) fn predict_index(&self, x: ArrayView1<f64>) -> Result<usize, ScorerError> {
        match self {
            Estimator::LogisticRegression { coef, intercept }
            | Estimator::LinearSvc { coef, intercept } => {
                let z = Self::decision(coef, *intercept, x)?;
                Ok(if z > 0.0 { 1 } else { 0 })
            }
            Estimator::DecisionTree(_) | Estimator::RandomForest { .. } => {
                let dist = self.tree_proba(x)?;
                Ok(argmax(&dist))
            }
        }
    }

    /// Class distribution, or `None` for estimators without probability output.
    pub(crate) fn predict_proba(&self, x: ArrayView1<f64>) -> Option<Result<[f64; 2], ScorerError>> {
        match self {
            Estimator::LogisticRegression { coef, intercept } => Some(
                Self::decision(coef, *intercept, x).map(|z| {
                    let p = sigmoid(z);
                    [1.0 - p, p]
                }),
            ),
            Estimator::LinearSvc { .. } => None,
            Estimator::DecisionTree(_) | Estimator::RandomForest { .. } => Some(self.tree_proba(x)),
        }
    }

    fn tree_proba(&self, x: ArrayView1<f64>) -> Result<[f64; 2], ScorerError> {
        match self {
            Estimator::DecisionTree(tree) => tree.predict_proba(x),
            Estimator::RandomForest { trees } => {
                let mut acc = Array1::<f64>::zeros(2);
                for tree in trees {
                    let d = tree.predict_proba(x)?;
                    acc += &ArrayView1::from(&d[..]);
                }
                acc /= trees.len() as f64;
                Ok([acc[0], acc[1]])
            }
            _ => Err(ScorerError::Invalid(format!("{} is not a tree model", self.kind()))),
        }
    }
}
