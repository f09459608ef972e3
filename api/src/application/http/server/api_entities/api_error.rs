use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nutriscan_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PaymentRequired(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    InternalServerError(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub code: String,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "E_BAD_REQUEST"),
            ApiError::PaymentRequired(_) => (StatusCode::PAYMENT_REQUIRED, "E_PAYMENT_REQUIRED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "E_NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "E_CONFLICT"),
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "E_ANALYSIS_FAILED"),
            ApiError::InternalServerError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "E_INTERNAL_SERVER_ERROR")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::EntitlementDenied(message) => ApiError::PaymentRequired(message),
            CoreError::AnalysisFailed(message) => ApiError::BadGateway(message),
            CoreError::Validation(message) => ApiError::BadRequest(message),
            CoreError::InvalidTransition { .. } | CoreError::AnalysisInProgress => {
                ApiError::Conflict(error.to_string())
            }
            CoreError::NotFound => ApiError::NotFound("Not found".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let body = ApiErrorResponse {
            code: code.to_string(),
            status: status.as_u16(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// JSON body extractor that also runs the `validator` rules of the payload.
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        value
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        Ok(ValidateJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_http_statuses() {
        let cases = [
            (
                CoreError::EntitlementDenied("no credits".to_string()),
                StatusCode::PAYMENT_REQUIRED,
            ),
            (
                CoreError::AnalysisFailed("timeout".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CoreError::Validation("bad coupon".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::AnalysisInProgress, StatusCode::CONFLICT),
            (
                CoreError::InvalidTransition {
                    from: "payment".to_string(),
                    action: "capture_image".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (CoreError::NotFound, StatusCode::NOT_FOUND),
        ];

        for (core_error, status) in cases {
            let response = ApiError::from(core_error).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
