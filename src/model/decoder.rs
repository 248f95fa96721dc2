use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Fitted label decoder: maps a class index back to the original label
/// value it was encoded from during training.
///
/// For the lesividad target the fitted classes are `[0, 1]` with
/// `0 = Con asistencia` and `1 = Sin asistencia`, but the authoritative
/// order is whatever the artifact carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDecoder {
    classes: Vec<i64>,
}

impl LabelDecoder {
    pub fn new(classes: Vec<i64>) -> Self {
        Self { classes }
    }

    /// Number of fitted classes.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Reverse the training encoding for one class index.
    pub fn decode(&self, index: usize) -> Result<i64> {
        self.classes.get(index).copied().ok_or_else(|| {
            AppError::Inference(format!(
                "class index {index} outside the {} fitted classes",
                self.classes.len()
            ))
        })
    }
}
