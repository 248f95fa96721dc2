use crate::error::{AppError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat input record handed to a fitted preprocessor.
///
/// Holds every field the request supplied; the preprocessor picks out the
/// columns it was fitted on and ignores the rest.
#[derive(Debug, Clone, Default)]
pub struct FeatureRecord {
    categorical: BTreeMap<String, String>,
    numeric: BTreeMap<String, f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_categorical(&mut self, name: &str, value: impl Into<String>) {
        self.categorical.insert(name.to_string(), value.into());
    }

    pub fn set_numeric(&mut self, name: &str, value: f64) {
        self.numeric.insert(name.to_string(), value);
    }

    pub fn categorical(&self, name: &str) -> Option<&str> {
        self.categorical.get(name).map(String::as_str)
    }

    pub fn numeric(&self, name: &str) -> Option<f64> {
        self.numeric.get(name).copied()
    }
}

/// Per-column encoder fitted during training.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnEncoder {
    /// One-hot over the fitted category list, in fitted order.
    /// An unseen category encodes to all zeros.
    OneHot {
        name: String,
        categories: Vec<String>,
    },
    /// Standard scaling: (value - mean) / std_dev.
    Standardized {
        name: String,
        mean: f64,
        std_dev: f64,
    },
}

impl ColumnEncoder {
    pub fn name(&self) -> &str {
        match self {
            ColumnEncoder::OneHot { name, .. } => name,
            ColumnEncoder::Standardized { name, .. } => name,
        }
    }

    /// Number of output features this column expands into.
    pub fn width(&self) -> usize {
        match self {
            ColumnEncoder::OneHot { categories, .. } => categories.len(),
            ColumnEncoder::Standardized { .. } => 1,
        }
    }
}

/// Fitted tabular preprocessor, deserialized from its artifact file.
///
/// The column order here is the feature order the classifier was trained
/// with; reordering columns silently corrupts predictions, so `transform`
/// always walks the fitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularPreprocessor {
    columns: Vec<ColumnEncoder>,
}

impl TabularPreprocessor {
    pub fn new(columns: Vec<ColumnEncoder>) -> Self {
        Self { columns }
    }

    /// Total width of the transformed feature vector.
    pub fn output_width(&self) -> usize {
        self.columns.iter().map(ColumnEncoder::width).sum()
    }

    /// Names of the fitted input columns, in fitted order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(ColumnEncoder::name).collect()
    }

    /// Transform a record into the model-ready feature vector.
    pub fn transform(&self, record: &FeatureRecord) -> Result<Array1<f64>> {
        let mut features = Vec::with_capacity(self.output_width());

        for column in &self.columns {
            match column {
                ColumnEncoder::OneHot { name, categories } => {
                    let value = record.categorical(name).ok_or_else(|| {
                        AppError::Inference(format!("missing categorical column '{name}'"))
                    })?;
                    for category in categories {
                        features.push(if category == value { 1.0 } else { 0.0 });
                    }
                }
                ColumnEncoder::Standardized { name, mean, std_dev } => {
                    let value = record.numeric(name).ok_or_else(|| {
                        AppError::Inference(format!("missing numeric column '{name}'"))
                    })?;
                    if !value.is_finite() {
                        return Err(AppError::Inference(format!(
                            "non-finite value for numeric column '{name}'"
                        )));
                    }
                    let scaled = if *std_dev > 0.0 {
                        (value - mean) / std_dev
                    } else {
                        value - mean
                    };
                    features.push(scaled);
                }
            }
        }

        Ok(Array1::from_vec(features))
    }
}
