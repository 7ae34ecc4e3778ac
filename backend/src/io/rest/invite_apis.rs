//! # REST API for Invites
//!
//! Caregivers mint one-time codes; invited teachers and children redeem
//! them to register. Redemption reads the registrant's principal id from
//! the same header as every other endpoint.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use crate::domain::commands::invites::RedeemInviteCommand;
use crate::io::rest::{error_response, principal_id};
use crate::AppState;
use shared::{CreateInviteResponse, IdentityResponse, RedeemInviteRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_invite))
        .route("/:code/redeem", post(redeem_invite))
}

pub async fn create_invite(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    info!("POST /api/invites");

    let result = principal_id(&headers)
        .and_then(|principal| state.identity_service.resolve_or_fallback(&principal))
        .and_then(|identity| state.invite_service.create_invite(&identity));

    match result {
        Ok(created) => (
            StatusCode::CREATED,
            Json(CreateInviteResponse {
                code: created.invite.code,
                created_at: created.invite.created_at,
            }),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn redeem_invite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Json(request): Json<RedeemInviteRequest>,
) -> impl IntoResponse {
    info!("POST /api/invites/{}/redeem", code);

    let result = principal_id(&headers).and_then(|principal| {
        state.invite_service.redeem_invite(RedeemInviteCommand {
            code,
            user_id: principal,
            name: request.name,
            email: request.email,
            role: request.role,
        })
    });

    match result {
        Ok(redeemed) => (
            StatusCode::CREATED,
            Json(IdentityResponse {
                user_id: redeemed.user.id,
                name: redeemed.user.name,
                role: redeemed.user.role,
                caregiver_id: redeemed.user.caregiver_id,
                teachers: redeemed.user.teachers,
            }),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}
