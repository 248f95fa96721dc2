use crate::error::{AppError, Result};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// A node in a serialized decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split node. Go left if feature < threshold; missing (NaN)
    /// values follow `default_left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        default_left: bool,
    },
    /// Leaf node contributing its weight to the margin.
    Leaf { weight: f64 },
}

/// A single tree of the boosted ensemble, nodes stored in one flat vector
/// with the root at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Walk the tree for one feature vector and return the leaf weight.
    fn score(&self, features: ArrayView1<'_, f64>) -> Result<f64> {
        let mut index = 0usize;
        // Each hop goes strictly deeper; more hops than nodes means a cycle.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { weight }) => return Ok(*weight),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                }) => {
                    let value = *features.get(*feature).ok_or_else(|| {
                        AppError::Inference(format!(
                            "split references feature {feature} outside the input vector"
                        ))
                    })?;
                    let go_left = if value.is_nan() {
                        *default_left
                    } else {
                        value < *threshold
                    };
                    index = if go_left { *left } else { *right };
                }
                None => {
                    return Err(AppError::Inference(format!(
                        "tree node index {index} out of bounds"
                    )))
                }
            }
        }
        Err(AppError::Inference("cycle detected in tree traversal".to_string()))
    }
}

/// Pre-trained gradient-boosted binary classifier, deserialized from its
/// artifact file. Stands in for the offline-trained booster; only the
/// prediction path exists here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    n_features: usize,
    base_score: f64,
    trees: Vec<DecisionTree>,
}

impl GradientBoostedClassifier {
    pub fn new(n_features: usize, base_score: f64, trees: Vec<DecisionTree>) -> Self {
        Self {
            n_features,
            base_score,
            trees,
        }
    }

    /// Number of input features this model was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of output classes. The lesividad target is binary.
    pub fn n_classes(&self) -> usize {
        2
    }

    /// Probability distribution `[p_class0, p_class1]` for one feature vector.
    pub fn predict_proba(&self, features: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        if features.len() != self.n_features {
            return Err(AppError::Inference(format!(
                "feature vector has {} values, model expects {}",
                features.len(),
                self.n_features
            )));
        }

        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += tree.score(features)?;
        }

        let p1 = sigmoid(margin);
        Ok(Array1::from_vec(vec![1.0 - p1, p1]))
    }
}

#[inline]
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
