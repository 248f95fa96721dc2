/// Model bundle layer: the pre-trained artifacts and the inference
/// pipeline that runs over them.
///
/// A bundle is the triple {preprocessor, classifier, label decoder}
/// trained together offline. Two variants exist: "distrito" (location as
/// district code) and "coordenadas" (location as raw coordinates). Both
/// are loaded once at startup and are immutable afterwards.
pub mod bundle;
pub mod classifier;
pub mod decoder;
pub mod loader;
pub mod preprocessor;

pub use bundle::{LesividadPrediction, Location, ModelBundle, ModelRegistry, ModelVariant};
pub use classifier::{DecisionTree, GradientBoostedClassifier, TreeNode};
pub use decoder::LabelDecoder;
pub use loader::{artifact_path, load_bundle, load_registry, ArtifactRole};
pub use preprocessor::{ColumnEncoder, FeatureRecord, TabularPreprocessor};
