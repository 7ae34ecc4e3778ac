//! # REST API for Recent Activities

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::domain::commands::activities::RecordActivityCommand;
use crate::io::rest::mappers::activity_mapper::ActivityMapper;
use crate::io::rest::{error_response, principal_id};
use crate::AppState;
use shared::{RecordActivityRequest, RecordTimerActivityRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_activities).post(record_activity))
        .route("/timer", post(record_timer_activity))
}

pub async fn list_activities(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let result = principal_id(&headers)
        .and_then(|principal| state.identity_service.resolve_or_fallback(&principal))
        .and_then(|identity| state.activity_service.list_recent_activities(&identity));

    match result {
        Ok(activities) => {
            let dtos: Vec<_> = activities.into_iter().map(ActivityMapper::to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub async fn record_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RecordActivityRequest>,
) -> impl IntoResponse {
    info!("POST /api/activities - {}", request.activity_type);

    let result = principal_id(&headers)
        .and_then(|principal| state.identity_service.resolve_or_fallback(&principal))
        .and_then(|identity| {
            state.activity_service.record_activity(
                &identity,
                RecordActivityCommand {
                    activity_type: request.activity_type,
                    title: request.title,
                    icon: request.icon,
                    duration: request.duration,
                    action: request.action,
                },
            )
        });

    match result {
        Ok(activity) => (StatusCode::CREATED, Json(ActivityMapper::to_dto(activity))).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn record_timer_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RecordTimerActivityRequest>,
) -> impl IntoResponse {
    info!("POST /api/activities/timer - {}", request.action);

    let result = principal_id(&headers)
        .and_then(|principal| state.identity_service.resolve_or_fallback(&principal))
        .and_then(|identity| {
            state
                .activity_service
                .record_timer_activity(&identity, &request.action, request.duration)
        });

    match result {
        Ok(activity) => (StatusCode::CREATED, Json(ActivityMapper::to_dto(activity))).into_response(),
        Err(error) => error_response(error),
    }
}
