//! HTTP mapping for [`GatewayError`]

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::common::ApiResponse;
use crate::shared::{AuthFailure, GatewayError};

/// Upstream status code, when the upstream answered at all
pub const UPSTREAM_STATUS_HEADER: &str = "x-upstream-status";

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Auth(AuthFailure::MissingCredentials) => StatusCode::UNAUTHORIZED,
            GatewayError::Auth(AuthFailure::InvalidCredentials) => StatusCode::FORBIDDEN,
            GatewayError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::Config(_) | GatewayError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the caller.
    fn public_message(&self) -> String {
        match self {
            GatewayError::Auth(failure) => failure.to_string(),
            GatewayError::Upstream { message, .. } => message.clone(),
            GatewayError::Validation(msg) => msg.clone(),
            GatewayError::NotFound { .. } | GatewayError::Conflict(_) => self.to_string(),
            GatewayError::Config(_) => "Service is not configured".to_string(),
            GatewayError::Storage(_) => "Internal storage error".to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if matches!(self, GatewayError::Config(_) | GatewayError::Storage(_)) {
            error!("Request failed: {}", self);
        }

        let status = self.status_code();
        let mut response =
            (status, Json(ApiResponse::<()>::error(self.public_message()))).into_response();

        if let GatewayError::Upstream {
            status: Some(code), ..
        } = self
        {
            response
                .headers_mut()
                .insert(UPSTREAM_STATUS_HEADER, HeaderValue::from(code));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn auth_failures_split_401_and_403() {
        assert_eq!(
            GatewayError::from(AuthFailure::MissingCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::from(AuthFailure::InvalidCredentials).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn upstream_error_is_502_with_status_header() {
        let resp = GatewayError::upstream(Some(503), "TTS upstream returned an error").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(resp.headers()[UPSTREAM_STATUS_HEADER], "503");
        let body = body_of(resp).await;
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": "TTS upstream returned an error"})
        );
    }

    #[tokio::test]
    async fn storage_details_are_not_leaked() {
        let resp = GatewayError::Storage("no such table: api_keys".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(resp).await;
        assert!(!body["error"].as_str().unwrap().contains("api_keys"));
    }
}
