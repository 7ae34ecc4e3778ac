//! # REST API for Identity
//!
//! Resolves the `X-User-Id` principal to their profile. A principal with
//! no profile document gets 404, not a fallback; the fallback identity is
//! an internal policy the clients never see directly.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::{error_response, principal_id};
use crate::AppState;
use shared::IdentityResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_identity))
}

pub async fn get_identity(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let result = principal_id(&headers).and_then(|principal| {
        info!("GET /api/identity for {}", principal);
        state.identity_service.resolve(&principal)
    });

    match result {
        Ok(Some(identity)) => (
            StatusCode::OK,
            Json(IdentityResponse {
                user_id: identity.user_id,
                name: identity.name,
                role: identity.role,
                caregiver_id: identity.caregiver_id,
                teachers: identity.teachers,
            }),
        )
            .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No profile for principal").into_response(),
        Err(error) => error_response(error),
    }
}
