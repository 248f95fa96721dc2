//! Shared artifact fixtures for integration tests.
//!
//! Builds a synthetic six-file artifact layout: the district classifier is
//! biased so it always predicts label 1, the coordinates classifier so it
//! always predicts label 0. Tests can therefore tell from the response
//! which bundle served a request.
#![allow(dead_code)]

use lesividad_api::api::{build_router, AppState};
use lesividad_api::config::ArtifactConfig;
use lesividad_api::model::{
    artifact_path, load_registry, ArtifactRole, ColumnEncoder, DecisionTree,
    GradientBoostedClassifier, LabelDecoder, ModelVariant, TabularPreprocessor, TreeNode,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

fn categorical_columns() -> Vec<ColumnEncoder> {
    let one_hot = |name: &str, categories: [&str; 2]| ColumnEncoder::OneHot {
        name: name.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    };
    vec![
        one_hot("tipo_vehiculo", ["Turismo", "Motocicleta > 125cc"]),
        one_hot("tipo_persona", ["Conductor", "Peatón"]),
        one_hot("tipo_accidente", ["Colisión lateral", "Alcance"]),
        one_hot("sexo", ["Hombre", "Mujer"]),
        one_hot("rango_edad", ["De 30 a 34 años", "De 35 a 39 años"]),
        one_hot("estado_meteorológico", ["Despejado", "Lluvia débil"]),
    ]
}

fn distrito_preprocessor() -> TabularPreprocessor {
    let mut columns = categorical_columns();
    columns.push(ColumnEncoder::Standardized {
        name: "cod_distrito".to_string(),
        mean: 11.0,
        std_dev: 6.0,
    });
    TabularPreprocessor::new(columns)
}

fn coordenadas_preprocessor() -> TabularPreprocessor {
    let mut columns = categorical_columns();
    columns.push(ColumnEncoder::Standardized {
        name: "coordenada_x_utm".to_string(),
        mean: 440_000.0,
        std_dev: 1_000.0,
    });
    columns.push(ColumnEncoder::Standardized {
        name: "coordenada_y_utm".to_string(),
        mean: 4_474_000.0,
        std_dev: 1_000.0,
    });
    TabularPreprocessor::new(columns)
}

fn distrito_classifier() -> GradientBoostedClassifier {
    // Standardized district codes stay well under the threshold, so every
    // request routes to the positive leaf: the district bundle always
    // predicts label 1.
    let split = DecisionTree::new(vec![
        TreeNode::Split {
            feature: 12,
            threshold: 10.0,
            left: 1,
            right: 2,
            default_left: true,
        },
        TreeNode::Leaf { weight: 2.0 },
        TreeNode::Leaf { weight: -2.0 },
    ]);
    let bias = DecisionTree::new(vec![TreeNode::Leaf { weight: 0.5 }]);
    GradientBoostedClassifier::new(13, 0.0, vec![split, bias])
}

fn coordenadas_classifier() -> GradientBoostedClassifier {
    // Constant negative margin: the coordinates bundle always predicts 0.
    let tree = DecisionTree::new(vec![TreeNode::Leaf { weight: -2.0 }]);
    GradientBoostedClassifier::new(14, 0.0, vec![tree])
}

fn write_artifact<T: Serialize>(root: &Path, role: ArtifactRole, variant: ModelVariant, value: &T) {
    let path = artifact_path(root, role, variant);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Write the full six-file artifact layout under `root`.
pub fn write_artifacts(root: &Path) {
    write_artifact(
        root,
        ArtifactRole::Preprocessor,
        ModelVariant::Distrito,
        &distrito_preprocessor(),
    );
    write_artifact(
        root,
        ArtifactRole::Classifier,
        ModelVariant::Distrito,
        &distrito_classifier(),
    );
    write_artifact(
        root,
        ArtifactRole::LabelDecoder,
        ModelVariant::Distrito,
        &LabelDecoder::new(vec![0, 1]),
    );
    write_artifact(
        root,
        ArtifactRole::Preprocessor,
        ModelVariant::Coordenadas,
        &coordenadas_preprocessor(),
    );
    write_artifact(
        root,
        ArtifactRole::Classifier,
        ModelVariant::Coordenadas,
        &coordenadas_classifier(),
    );
    write_artifact(
        root,
        ArtifactRole::LabelDecoder,
        ModelVariant::Coordenadas,
        &LabelDecoder::new(vec![0, 1]),
    );
}

/// Load the fixture artifacts and build a router over them.
pub fn test_router(root: &Path) -> axum::Router {
    let registry = load_registry(&ArtifactConfig {
        dir: root.to_path_buf(),
    })
    .expect("fixture artifacts should load");
    build_router(AppState::new(Arc::new(registry)))
}

/// The categorical fields shared by the end-to-end scenarios.
pub fn base_payload() -> Value {
    json!({
        "tipo_vehiculo": "Turismo",
        "tipo_persona": "Conductor",
        "tipo_accidente": "Colisión lateral",
        "sexo": "Hombre",
        "rango_edad": "De 30 a 34 años",
        "estado_meteorológico": "Despejado",
    })
}
