//! Department API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Department, DepartmentCreate, DepartmentUpdate};
use crate::db::repository::DepartmentRepository;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// List all departments
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListView<Department>>> {
    let repo = DepartmentRepository::new(state.db.clone());
    let departments = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(list_view(departments)))
}

/// Create a department
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DepartmentCreate>,
) -> AppResult<Json<Department>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let log = NewActivity::new(ActivityAction::DepartmentCreated, "department")
        .actor(user.id, user.username)
        .details(serde_json::json!({ "name": payload.name.clone() }));

    let repo = DepartmentRepository::new(state.db.clone());
    let department = repo.create(payload, log).await.map_err(AppError::from)?;
    Ok(Json(department))
}

/// Rename a department
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<DepartmentUpdate>,
) -> AppResult<Json<Department>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let log = NewActivity::new(ActivityAction::DepartmentUpdated, "department")
        .actor(user.id, user.username)
        .entity_id(id.clone());

    let repo = DepartmentRepository::new(state.db.clone());
    let department = repo.update(&id, payload, log).await.map_err(AppError::from)?;
    Ok(Json(department))
}

/// Delete a department
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let log = NewActivity::new(ActivityAction::DepartmentDeleted, "department")
        .actor(user.id, user.username)
        .entity_id(id.clone());

    let repo = DepartmentRepository::new(state.db.clone());
    let deleted = repo.delete(&id, log).await.map_err(AppError::from)?;
    Ok(Json(deleted))
}
