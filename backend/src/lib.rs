//! # Routine Tracker Backend
//!
//! Non-UI logic for the visual routine tracker. Layered:
//!
//! ```text
//! IO Layer (REST API, mappers)
//!     |
//! Domain Layer (identity, aggregation, permissions, services)
//!     |
//! Storage Layer (JSON file collections, live change feed)
//! ```
//!
//! The backend is UI-agnostic; any client that can set the `X-User-Id`
//! header can drive it.

pub mod domain;
pub mod io;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::{
    ActivityService, IdentityService, InviteService, ResolvedIdentity, ScheduleAggregator,
    ScheduleService, TaskService,
};
use crate::storage::jsonfile::{JsonFileConnection, ScheduleRepository};

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub schedule_service: ScheduleService,
    pub invite_service: InviteService,
    pub activity_service: ActivityService,
    pub task_service: TaskService,
    schedule_repository: ScheduleRepository,
}

impl AppState {
    /// Start a live aggregation of every schedule visible to `identity`.
    /// The returned handle owns the source tasks; drop it to unsubscribe.
    pub fn aggregate_schedules(&self, identity: &ResolvedIdentity) -> ScheduleAggregator {
        ScheduleAggregator::spawn(identity, self.schedule_repository.clone())
    }
}

/// Initialize the backend with all required services over one storage
/// connection rooted at `data_dir`.
pub fn initialize_backend<P: AsRef<Path>>(data_dir: P) -> Result<AppState> {
    info!("Setting up storage at {}", data_dir.as_ref().display());
    let connection = Arc::new(JsonFileConnection::new(data_dir)?);

    Ok(AppState {
        identity_service: IdentityService::new(connection.clone()),
        schedule_service: ScheduleService::new(connection.clone()),
        invite_service: InviteService::new(connection.clone()),
        activity_service: ActivityService::new(connection.clone()),
        task_service: TaskService::new(connection.clone()),
        schedule_repository: ScheduleRepository::new(connection),
    })
}

/// Create the Axum router with all routes configured.
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow browser frontends to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/api/schedules", io::rest::schedule_apis::router())
        .nest("/api/identity", io::rest::identity_apis::router())
        .nest("/api/invites", io::rest::invite_apis::router())
        .nest("/api/activities", io::rest::activity_apis::router())
        .nest("/api/tasks", io::rest::task_apis::router())
        .layer(cors)
        .with_state(app_state)
}
