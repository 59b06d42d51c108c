// Error handling types for the API

use axum::http::header::WWW_AUTHENTICATE;
use axum::http::HeaderValue;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

use crate::services::ProviderError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    BadGateway(String),
    InternalServer(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::BadGateway(msg) => write!(f, "Bad Gateway: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg, "BAD_GATEWAY"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        let mut response = (status, Json(error_response)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Boundary translation from the internal provider error taxonomy to
/// client-facing responses. Messages are deliberately generic and stable:
/// the precise failure (expired vs forged vs malformed) is logged server
/// side but never exposed, and both auth flows go through this one
/// mapping so identical failures read identically to clients.
impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ExchangeRejected(detail) => {
                warn!(detail = %detail, "Authorization code exchange rejected");
                ApiError::BadRequest("authorization code rejected".to_string())
            }
            ProviderError::MissingField(field) => {
                warn!(field = field, "Provider response missing required field");
                ApiError::BadRequest(format!("provider did not return {}", field))
            }
            ProviderError::Verification(detail) => {
                warn!(detail = %detail, "ID token verification failed");
                ApiError::Unauthorized("invalid id_token".to_string())
            }
            ProviderError::MissingClaim(claim) => {
                warn!(claim = claim, "Required identity claim absent");
                ApiError::BadRequest(format!("provider did not supply {}", claim))
            }
            ProviderError::RequestFailed(detail) => {
                error!(detail = %detail, "Provider request failed");
                ApiError::BadGateway("identity provider unavailable".to_string())
            }
            ProviderError::NotConfigured => {
                error!("Provider credentials not configured");
                ApiError::InternalServer("authentication not configured".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_response_carries_bearer_challenge() {
        let response = ApiError::Unauthorized("invalid token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE).unwrap(),
            &HeaderValue::from_static("Bearer")
        );
    }

    #[test]
    fn non_unauthorized_responses_carry_no_challenge() {
        let response = ApiError::BadRequest("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn verification_failure_maps_to_generic_unauthorized() {
        // Internal detail must not leak into the client-facing message.
        let api_err: ApiError =
            ProviderError::Verification("RSA signature mismatch on kid abc".to_string()).into();
        match api_err {
            ApiError::Unauthorized(msg) => {
                assert_eq!(msg, "invalid id_token");
            }
            other => panic!("expected Unauthorized, got {}", other),
        }
    }

    #[test]
    fn exchange_rejection_maps_to_generic_bad_request() {
        let api_err: ApiError =
            ProviderError::ExchangeRejected("HTTP 400: invalid_grant".to_string()).into();
        match api_err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "authorization code rejected"),
            other => panic!("expected BadRequest, got {}", other),
        }
    }
}
