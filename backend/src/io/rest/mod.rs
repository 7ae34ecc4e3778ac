//! # REST API Interface Layer
//!
//! HTTP endpoints for the routine tracker. This layer handles:
//! - Request/response serialization against the `shared` DTOs
//! - Reading the authenticated principal from the `X-User-Id` header
//! - Error translation from domain errors to HTTP status codes
//!
//! It is a pure translation layer; all rules live in the domain services.

pub mod activity_apis;
pub mod identity_apis;
pub mod invite_apis;
pub mod mappers;
pub mod schedule_apis;
pub mod task_apis;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::domain::errors::{DomainError, DomainResult};

/// Header carrying the authenticated principal id, set by the auth proxy.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extract the principal id from the request headers.
pub fn principal_id(headers: &HeaderMap) -> DomainResult<String> {
    let value = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .trim();
    if value.is_empty() {
        return Err(DomainError::AuthenticationRequired);
    }
    Ok(value.to_string())
}

/// Map a domain error onto an HTTP response.
pub fn error_response(error: DomainError) -> Response {
    let status = match &error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
        DomainError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Storage(inner) => {
            error!("Storage failure: {}", inner);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, error.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_id_requires_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            principal_id(&headers),
            Err(DomainError::AuthenticationRequired)
        ));
    }

    #[test]
    fn test_principal_id_trims_value() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, " cg-1 ".parse().unwrap());
        assert_eq!(principal_id(&headers).unwrap(), "cg-1");
    }

    #[test]
    fn test_error_statuses() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::AuthenticationRequired, StatusCode::UNAUTHORIZED),
            (DomainError::PermissionDenied("x".into()), StatusCode::FORBIDDEN),
            (DomainError::NotFound("x".into()), StatusCode::NOT_FOUND),
        ];
        for (error, expected) in cases {
            assert_eq!(error_response(error).status(), expected);
        }
    }
}
