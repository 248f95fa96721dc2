use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Model artifact file is missing on disk (startup-fatal)
    #[error("Model artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Model artifact exists but failed to deserialize or is incoherent (startup-fatal)
    #[error("Model artifact invalid: {0}")]
    ArtifactInvalid(String),

    /// Request body failed schema or field validation
    #[error("Validation error")]
    Validation {
        detail: serde_json::Value,
        body: serde_json::Value,
    },

    /// Neither a district code nor both coordinates were supplied
    #[error("Debe proporcionar 'cod_distrito' o ambas coordenadas UTM (coordenada_x_utm y coordenada_y_utm)")]
    MissingLocation,

    /// Preprocessing or classification failed at request time
    #[error("Inference error: {0}")]
    Inference(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ArtifactNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ArtifactInvalid(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MissingLocation => StatusCode::BAD_REQUEST,
            AppError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ArtifactNotFound(_) => "ARTIFACT_NOT_FOUND",
            AppError::ArtifactInvalid(_) => "ARTIFACT_INVALID",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::MissingLocation => "MISSING_LOCATION",
            AppError::Inference(_) => "INFERENCE_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %self,
            "Request error"
        );

        let body = match self {
            // Schema failures echo the field-level errors and the offending payload
            AppError::Validation { detail, body } => json!({ "detail": detail, "body": body }),
            // Inference detail stays server-side; the caller gets a generic message
            AppError::Inference(_) => json!({
                "error": {
                    "code": error_code,
                    "message": "Error interno del servidor durante la predicción",
                    "status": status.as_u16(),
                }
            }),
            other => json!({
                "error": {
                    "code": error_code,
                    "message": other.to_string(),
                    "status": status.as_u16(),
                }
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ArtifactNotFound("modelos/x.json".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Validation {
                detail: json!([]),
                body: json!({}),
            }
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(AppError::MissingLocation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Inference("shape mismatch".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::ArtifactNotFound("x".to_string()).error_code(),
            "ARTIFACT_NOT_FOUND"
        );
        assert_eq!(
            AppError::ArtifactInvalid("x".to_string()).error_code(),
            "ARTIFACT_INVALID"
        );
        assert_eq!(AppError::MissingLocation.error_code(), "MISSING_LOCATION");
        assert_eq!(
            AppError::Inference("x".to_string()).error_code(),
            "INFERENCE_ERROR"
        );
    }

    #[test]
    fn test_missing_location_message_names_both_modes() {
        let message = AppError::MissingLocation.to_string();
        assert!(message.contains("cod_distrito"));
        assert!(message.contains("coordenada_x_utm"));
    }
}
