//! # REST API for Schedules
//!
//! The aggregated list plus the mutation endpoints. Mutations on existing
//! schedules go through the checked service variants, so the permission
//! rules apply uniformly no matter which client calls.

use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::commands::schedules::{CreateScheduleCommand, UpdateScheduleCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity_service::ResolvedIdentity;
use crate::io::rest::mappers::schedule_mapper::ScheduleMapper;
use crate::io::rest::{error_response, principal_id};
use crate::AppState;
use shared::{CanEditResponse, CreateScheduleRequest, UpdateScheduleRequest};

/// How long the list endpoint waits for every source to deliver its
/// initial result set before answering with what it has.
const READY_TIMEOUT: Duration = Duration::from_secs(2);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route(
            "/:schedule_id",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
        .route("/:schedule_id/can-edit", get(can_edit_schedule))
}

#[derive(Debug, Deserialize)]
pub struct ListSchedulesParams {
    /// "published" or "draft"; absent means everything visible.
    pub filter: Option<String>,
}

/// All schedules visible to the principal, newest first.
pub async fn list_schedules(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListSchedulesParams>,
) -> impl IntoResponse {
    info!("GET /api/schedules");

    let result: DomainResult<_> = async {
        let principal = principal_id(&headers)?;
        let identity = state.identity_service.resolve_or_fallback(&principal)?;
        let mut aggregator = state.aggregate_schedules(&identity);

        let snapshot = match tokio::time::timeout(READY_TIMEOUT, aggregator.wait_ready()).await {
            Ok(snapshot) => snapshot,
            // Answer with whatever has arrived; frozen sources are
            // reported in the response.
            Err(_) => aggregator.snapshot(),
        };

        let schedules = match params.filter.as_deref() {
            None => snapshot.schedules.clone(),
            Some("published") => snapshot.published(),
            Some("draft") => snapshot.drafts(),
            Some(other) => {
                return Err(DomainError::Validation(format!(
                    "Unknown filter '{}'; expected 'published' or 'draft'",
                    other
                )))
            }
        };
        Ok(ScheduleMapper::to_list_response(schedules, &snapshot))
    }
    .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn create_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateScheduleRequest>,
) -> impl IntoResponse {
    info!("POST /api/schedules - '{}'", request.name);

    let result = resolve_identity(&state, &headers).and_then(|identity| {
        let command = CreateScheduleCommand {
            name: request.name,
            steps: request.steps.into_iter().map(ScheduleMapper::step_from_dto).collect(),
            is_published: request.is_published,
            routine_type: request.routine_type,
        };
        state.schedule_service.create_schedule(&identity, command)
    });

    match result {
        Ok(created) => {
            (StatusCode::CREATED, Json(ScheduleMapper::to_dto(created.schedule))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub async fn get_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(schedule_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/schedules/{}", schedule_id);

    let result = principal_id(&headers)
        .and_then(|_| state.schedule_service.get_schedule(&schedule_id));

    match result {
        Ok(Some(schedule)) => (StatusCode::OK, Json(ScheduleMapper::to_dto(schedule))).into_response(),
        Ok(None) => error_response(DomainError::NotFound(format!("Schedule {}", schedule_id))),
        Err(error) => error_response(error),
    }
}

pub async fn update_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(schedule_id): Path<String>,
    Json(request): Json<UpdateScheduleRequest>,
) -> impl IntoResponse {
    info!("PUT /api/schedules/{}", schedule_id);

    let result = resolve_identity(&state, &headers).and_then(|identity| {
        let command = UpdateScheduleCommand {
            schedule_id,
            name: request.name,
            steps: request
                .steps
                .map(|steps| steps.into_iter().map(ScheduleMapper::step_from_dto).collect()),
            is_published: request.is_published,
            routine_type: request.routine_type,
        };
        state.schedule_service.checked_update_schedule(&identity, command)
    });

    match result {
        Ok(updated) => (StatusCode::OK, Json(ScheduleMapper::to_dto(updated.schedule))).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(schedule_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/schedules/{}", schedule_id);

    let result = resolve_identity(&state, &headers)
        .and_then(|identity| state.schedule_service.checked_delete_schedule(&identity, &schedule_id));

    match result {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

/// Advisory check the UI uses to show or hide edit controls.
pub async fn can_edit_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(schedule_id): Path<String>,
) -> impl IntoResponse {
    let result = resolve_identity(&state, &headers)
        .and_then(|identity| state.schedule_service.can_edit_schedule(&identity, &schedule_id));

    match result {
        Ok(can_edit) => (StatusCode::OK, Json(CanEditResponse { can_edit })).into_response(),
        Err(error) => error_response(error),
    }
}

fn resolve_identity(state: &AppState, headers: &HeaderMap) -> DomainResult<ResolvedIdentity> {
    let principal = principal_id(headers)?;
    state.identity_service.resolve_or_fallback(&principal)
}
