//! # REST API for Tasks

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use tracing::info;

use crate::domain::commands::tasks::{CreateTaskCommand, UpdateTaskCommand};
use crate::domain::errors::DomainResult;
use crate::domain::identity_service::ResolvedIdentity;
use crate::io::rest::mappers::task_mapper::TaskMapper;
use crate::io::rest::{error_response, principal_id};
use crate::AppState;
use shared::{CreateTaskRequest, UpdateTaskRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:task_id", put(update_task).delete(delete_task))
}

pub async fn list_tasks(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let result = resolve_identity(&state, &headers)
        .and_then(|identity| state.task_service.list_tasks(&identity));

    match result {
        Ok(tasks) => {
            let dtos: Vec<_> = tasks.into_iter().map(TaskMapper::to_dto).collect();
            (StatusCode::OK, Json(dtos)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    info!("POST /api/tasks");

    let result = resolve_identity(&state, &headers).and_then(|identity| {
        state
            .task_service
            .add_task(&identity, CreateTaskCommand { title: request.title })
    });

    match result {
        Ok(task) => (StatusCode::CREATED, Json(TaskMapper::to_dto(task))).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    info!("PUT /api/tasks/{}", task_id);

    let result = resolve_identity(&state, &headers).and_then(|identity| {
        state.task_service.update_task(
            &identity,
            UpdateTaskCommand {
                task_id,
                title: request.title,
                done: request.done,
            },
        )
    });

    match result {
        Ok(task) => (StatusCode::OK, Json(TaskMapper::to_dto(task))).into_response(),
        Err(error) => error_response(error),
    }
}

pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/tasks/{}", task_id);

    let result = resolve_identity(&state, &headers)
        .and_then(|identity| state.task_service.delete_task(&identity, &task_id));

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn resolve_identity(state: &AppState, headers: &HeaderMap) -> DomainResult<ResolvedIdentity> {
    let principal = principal_id(headers)?;
    state.identity_service.resolve_or_fallback(&principal)
}
