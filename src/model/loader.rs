use crate::config::ArtifactConfig;
use crate::error::{AppError, Result};
use crate::model::bundle::{ModelBundle, ModelRegistry, ModelVariant};
use crate::model::classifier::GradientBoostedClassifier;
use crate::model::decoder::LabelDecoder;
use crate::model::preprocessor::TabularPreprocessor;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Artifact roles, one subdirectory per role under the artifact root.
#[derive(Debug, Clone, Copy)]
pub enum ArtifactRole {
    Preprocessor,
    Classifier,
    LabelDecoder,
}

impl ArtifactRole {
    pub fn dir_name(&self) -> &'static str {
        match self {
            ArtifactRole::Preprocessor => "preprocessor",
            ArtifactRole::Classifier => "classifier",
            ArtifactRole::LabelDecoder => "label_decoder",
        }
    }
}

/// Fixed on-disk location of one artifact:
/// `<root>/<role>/<variant>.json`
pub fn artifact_path(root: &Path, role: ArtifactRole, variant: ModelVariant) -> PathBuf {
    root.join(role.dir_name())
        .join(format!("{}.json", variant.as_str()))
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::ArtifactNotFound(path.display().to_string())
        } else {
            AppError::Io(err)
        }
    })?;

    serde_json::from_str(&raw)
        .map_err(|err| AppError::ArtifactInvalid(format!("{}: {}", path.display(), err)))
}

/// Load the artifact triple for one variant and cross-check its coherence.
pub fn load_bundle(root: &Path, variant: ModelVariant) -> Result<ModelBundle> {
    let preprocessor: TabularPreprocessor =
        read_artifact(&artifact_path(root, ArtifactRole::Preprocessor, variant))?;
    let classifier: GradientBoostedClassifier =
        read_artifact(&artifact_path(root, ArtifactRole::Classifier, variant))?;
    let label_decoder: LabelDecoder =
        read_artifact(&artifact_path(root, ArtifactRole::LabelDecoder, variant))?;

    if preprocessor.output_width() != classifier.n_features() {
        return Err(AppError::ArtifactInvalid(format!(
            "variant '{variant}': preprocessor produces {} features, classifier expects {}",
            preprocessor.output_width(),
            classifier.n_features()
        )));
    }

    if label_decoder.n_classes() != classifier.n_classes() {
        return Err(AppError::ArtifactInvalid(format!(
            "variant '{variant}': label decoder has {} classes, classifier has {}",
            label_decoder.n_classes(),
            classifier.n_classes()
        )));
    }

    Ok(ModelBundle::new(
        variant,
        preprocessor,
        classifier,
        label_decoder,
    ))
}

/// Load both model bundles at startup. Any missing or invalid artifact
/// fails the whole load; the process never becomes ready with a partial
/// registry.
pub fn load_registry(config: &ArtifactConfig) -> Result<ModelRegistry> {
    let root = config.dir.as_path();

    let distrito = load_bundle(root, ModelVariant::Distrito)?;
    tracing::info!(variant = %ModelVariant::Distrito, "Model bundle loaded");

    let coordenadas = load_bundle(root, ModelVariant::Coordenadas)?;
    tracing::info!(variant = %ModelVariant::Coordenadas, "Model bundle loaded");

    Ok(ModelRegistry::new(distrito, coordenadas))
}
