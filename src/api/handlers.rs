use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::model::{FeatureRecord, LesividadPrediction, Location};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

/// Welcome endpoint
pub async fn root() -> Json<Value> {
    Json(json!({
        "mensaje": "API Predicción Lesividad en Accidentes",
        "status": "activo",
        "endpoints": ["/predict", "/health", "/modelo/info"],
    }))
}

/// Liveness endpoint. Reachable only once both bundles loaded, so the
/// models are always "cargados" here.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        modelos: "cargados".to_string(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub modelos: String,
}

/// Static description of the model variants, accepted fields and output
/// encoding.
pub async fn modelo_info() -> Json<Value> {
    Json(json!({
        "modelos_disponibles": ["distrito", "coordenadas"],
        "variables_entrada": [
            "tipo_vehiculo", "tipo_persona", "tipo_accidente",
            "sexo", "rango_edad", "estado_meteorológico",
        ],
        "ubicacion_opciones": ["cod_distrito", "coordenada_x_utm + coordenada_y_utm"],
        "salida": {
            "prediction": "0 = Con asistencia, 1 = Sin asistencia",
            "probability": "Probabilidad de la clase predicha (0.0-1.0)",
        },
    }))
}

/// One prediction request. Location is optional per field; the invariant
/// "district or both coordinates" is resolved into a `Location` before any
/// model code runs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(length(min = 1))]
    pub tipo_vehiculo: String,

    #[validate(length(min = 1))]
    pub tipo_persona: String,

    #[validate(length(min = 1))]
    pub tipo_accidente: String,

    #[validate(length(min = 1))]
    pub sexo: String,

    #[validate(length(min = 1))]
    pub rango_edad: String,

    // The trained artifacts carry the accented column name
    #[serde(rename = "estado_meteorológico", alias = "estado_meteorologico")]
    #[validate(length(min = 1))]
    pub estado_meteorologico: String,

    /// Madrid district code, 1..=21
    #[validate(range(min = 1, max = 21))]
    pub cod_distrito: Option<i64>,

    pub coordenada_x_utm: Option<f64>,
    pub coordenada_y_utm: Option<f64>,
}

impl PredictRequest {
    /// Resolve the location mode. The district branch is checked first, so
    /// a request carrying both a district and coordinates uses the
    /// district bundle.
    pub fn location(&self) -> Result<Location> {
        if let Some(code) = self.cod_distrito {
            return Ok(Location::ByDistrict { code });
        }
        if let (Some(x), Some(y)) = (self.coordenada_x_utm, self.coordenada_y_utm) {
            return Ok(Location::ByCoordinates { x, y });
        }
        Err(AppError::MissingLocation)
    }

    /// Flatten the request into the record the fitted preprocessor reads.
    /// The district code is exposed both as a number and as a category so
    /// either fitted encoding finds its column.
    pub fn feature_record(&self, location: &Location) -> FeatureRecord {
        let mut record = FeatureRecord::new();
        record.set_categorical("tipo_vehiculo", self.tipo_vehiculo.clone());
        record.set_categorical("tipo_persona", self.tipo_persona.clone());
        record.set_categorical("tipo_accidente", self.tipo_accidente.clone());
        record.set_categorical("sexo", self.sexo.clone());
        record.set_categorical("rango_edad", self.rango_edad.clone());
        record.set_categorical("estado_meteorológico", self.estado_meteorologico.clone());

        match *location {
            Location::ByDistrict { code } => {
                record.set_numeric("cod_distrito", code as f64);
                record.set_categorical("cod_distrito", code.to_string());
            }
            Location::ByCoordinates { x, y } => {
                record.set_numeric("coordenada_x_utm", x);
                record.set_numeric("coordenada_y_utm", y);
            }
        }

        record
    }
}

/// Prediction response DTO
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: i64,
    pub probability: f64,
}

impl From<LesividadPrediction> for PredictResponse {
    fn from(result: LesividadPrediction) -> Self {
        Self {
            prediction: result.prediction,
            probability: result.probability,
        }
    }
}

/// Predict the lesividad of one accident record.
///
/// The body is taken as a raw JSON value first so schema failures can echo
/// the offending payload back with the field-level errors.
pub async fn predict(
    State(state): State<AppState>,
    Json(raw): Json<Value>,
) -> Result<Json<PredictResponse>> {
    let request: PredictRequest = match serde_json::from_value(raw.clone()) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "Request failed schema validation");
            return Err(AppError::Validation {
                detail: json!([{ "msg": err.to_string() }]),
                body: raw,
            });
        }
    };

    if let Err(errors) = request.validate() {
        tracing::warn!(error = %errors, "Request failed field validation");
        return Err(AppError::Validation {
            detail: serde_json::to_value(&errors)
                .unwrap_or_else(|_| json!([{ "msg": errors.to_string() }])),
            body: raw,
        });
    }

    let location = request.location()?;
    let variant = location.variant();
    tracing::info!(variant = %variant, "Received prediction request");

    let bundle = state.registry.bundle(variant);
    let record = request.feature_record(&location);
    let result = bundle.predict(&record)?;

    tracing::info!(
        variant = %variant,
        prediction = result.prediction,
        probability = result.probability,
        "Prediction complete"
    );

    Ok(Json(PredictResponse::from(result)))
}
