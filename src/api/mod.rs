pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::model::ModelRegistry;
use std::sync::Arc;

/// Shared application state: the loaded model bundles, read-only for the
/// process lifetime. Built once at startup; no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }
}
