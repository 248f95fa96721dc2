use crate::error::Result;
use crate::model::classifier::GradientBoostedClassifier;
use crate::model::decoder::LabelDecoder;
use crate::model::preprocessor::{FeatureRecord, TabularPreprocessor};
use serde::{Deserialize, Serialize};

/// The two trained model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Trained with the district code as the location feature
    Distrito,
    /// Trained with raw coordinates as the location features
    Coordenadas,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Distrito, ModelVariant::Coordenadas];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Distrito => "distrito",
            ModelVariant::Coordenadas => "coordenadas",
        }
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location mode of a request, resolved once at the boundary.
///
/// The invariant "district or both coordinates" is carried by this type;
/// once a `Location` exists, model selection cannot fall through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    ByDistrict { code: i64 },
    ByCoordinates { x: f64, y: f64 },
}

impl Location {
    /// Which model variant serves this location mode. Pure and total.
    pub fn variant(&self) -> ModelVariant {
        match self {
            Location::ByDistrict { .. } => ModelVariant::Distrito,
            Location::ByCoordinates { .. } => ModelVariant::Coordenadas,
        }
    }
}

/// One prediction outcome: the decoded label and the probability mass of
/// the predicted class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LesividadPrediction {
    pub prediction: i64,
    pub probability: f64,
}

/// The artifact triple for one variant: preprocessor, classifier and label
/// decoder trained together. Immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    variant: ModelVariant,
    preprocessor: TabularPreprocessor,
    classifier: GradientBoostedClassifier,
    label_decoder: LabelDecoder,
}

impl ModelBundle {
    pub fn new(
        variant: ModelVariant,
        preprocessor: TabularPreprocessor,
        classifier: GradientBoostedClassifier,
        label_decoder: LabelDecoder,
    ) -> Self {
        Self {
            variant,
            preprocessor,
            classifier,
            label_decoder,
        }
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn preprocessor(&self) -> &TabularPreprocessor {
        &self.preprocessor
    }

    pub fn classifier(&self) -> &GradientBoostedClassifier {
        &self.classifier
    }

    pub fn label_decoder(&self) -> &LabelDecoder {
        &self.label_decoder
    }

    /// Run the full pipeline: preprocess, classify, arg-max, decode.
    pub fn predict(&self, record: &FeatureRecord) -> Result<LesividadPrediction> {
        let features = self.preprocessor.transform(record)?;
        let proba = self.classifier.predict_proba(features.view())?;

        let (class_index, probability) = proba
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .unwrap_or((0, 0.0));

        let prediction = self.label_decoder.decode(class_index)?;

        Ok(LesividadPrediction {
            prediction,
            probability,
        })
    }
}

/// Both model bundles, loaded once before the server accepts traffic and
/// shared read-only for the process lifetime.
#[derive(Debug)]
pub struct ModelRegistry {
    distrito: ModelBundle,
    coordenadas: ModelBundle,
}

impl ModelRegistry {
    pub fn new(distrito: ModelBundle, coordenadas: ModelBundle) -> Self {
        Self {
            distrito,
            coordenadas,
        }
    }

    pub fn bundle(&self, variant: ModelVariant) -> &ModelBundle {
        match variant {
            ModelVariant::Distrito => &self.distrito,
            ModelVariant::Coordenadas => &self.coordenadas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classifier::{DecisionTree, TreeNode};
    use crate::model::preprocessor::ColumnEncoder;

    fn test_bundle(variant: ModelVariant, leaf_weight: f64) -> ModelBundle {
        let preprocessor = TabularPreprocessor::new(vec![ColumnEncoder::OneHot {
            name: "sexo".to_string(),
            categories: vec!["Hombre".to_string(), "Mujer".to_string()],
        }]);
        let classifier = GradientBoostedClassifier::new(
            2,
            0.0,
            vec![DecisionTree::new(vec![TreeNode::Leaf {
                weight: leaf_weight,
            }])],
        );
        ModelBundle::new(variant, preprocessor, classifier, LabelDecoder::new(vec![0, 1]))
    }

    fn test_record() -> FeatureRecord {
        let mut record = FeatureRecord::new();
        record.set_categorical("sexo", "Hombre");
        record
    }

    #[test]
    fn test_location_selects_variant() {
        assert_eq!(
            Location::ByDistrict { code: 1 }.variant(),
            ModelVariant::Distrito
        );
        assert_eq!(
            Location::ByCoordinates {
                x: 440_000.0,
                y: 4_474_000.0
            }
            .variant(),
            ModelVariant::Coordenadas
        );
    }

    #[test]
    fn test_predict_decodes_argmax_class() {
        let bundle = test_bundle(ModelVariant::Distrito, 2.0);
        let result = bundle.predict(&test_record()).unwrap();

        assert_eq!(result.prediction, 1);
        assert!(result.probability > 0.5 && result.probability <= 1.0);
    }

    #[test]
    fn test_predict_reports_predicted_class_mass() {
        // Negative margin: class 0 wins and probability is the class-0 mass
        let bundle = test_bundle(ModelVariant::Coordenadas, -2.0);
        let result = bundle.predict(&test_record()).unwrap();

        assert_eq!(result.prediction, 0);
        assert!(result.probability > 0.5);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let bundle = test_bundle(ModelVariant::Distrito, 0.4);
        let record = test_record();
        assert_eq!(
            bundle.predict(&record).unwrap(),
            bundle.predict(&record).unwrap()
        );
    }

    #[test]
    fn test_registry_routes_by_variant() {
        let registry = ModelRegistry::new(
            test_bundle(ModelVariant::Distrito, 1.0),
            test_bundle(ModelVariant::Coordenadas, -1.0),
        );
        assert_eq!(
            registry.bundle(ModelVariant::Distrito).variant(),
            ModelVariant::Distrito
        );
        assert_eq!(
            registry.bundle(ModelVariant::Coordenadas).variant(),
            ModelVariant::Coordenadas
        );
    }
}
