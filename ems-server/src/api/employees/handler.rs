//! Employee API Handlers
//!
//! Create generates the work id (role/department prefix + sequence)
//! before insert; read-then-format, so concurrent creates can collide.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use crate::db::repository::EmployeeRepository;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_email, validate_required_text};

/// List active employees
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListView<Employee>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employees = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(list_view(employees)))
}

/// List all employees including inactive
pub async fn list_with_inactive(
    State(state): State<ServerState>,
) -> AppResult<Json<ListView<Employee>>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employees = repo.find_all_with_inactive().await.map_err(AppError::from)?;
    Ok(Json(list_view(employees)))
}

/// Get employee by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Employee>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", id)))?;
    Ok(Json(employee))
}

/// Create a new employee with a generated work id
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    validate_required_text(&payload.full_name, "full_name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;

    let repo = EmployeeRepository::new(state.db.clone());
    let work_id = repo
        .next_work_id(payload.role, payload.department.as_deref())
        .await
        .map_err(AppError::from)?;

    let log = NewActivity::new(ActivityAction::EmployeeCreated, "employee")
        .actor(user.id, user.username)
        .details(serde_json::json!({
            "full_name": payload.full_name.clone(),
            "work_id": work_id.clone(),
        }));

    let employee = repo
        .create(payload, work_id, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(employee))
}

/// Update an employee
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    if let Some(name) = &payload.full_name {
        validate_required_text(name, "full_name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }

    let log = NewActivity::new(ActivityAction::EmployeeUpdated, "employee")
        .actor(user.id, user.username)
        .entity_id(id.clone());

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.update(&id, payload, log).await.map_err(AppError::from)?;
    Ok(Json(employee))
}

/// Delete an employee
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let log = NewActivity::new(ActivityAction::EmployeeDeleted, "employee")
        .actor(user.id, user.username)
        .entity_id(id.clone());

    let repo = EmployeeRepository::new(state.db.clone());
    let deleted = repo.delete(&id, log).await.map_err(AppError::from)?;
    Ok(Json(deleted))
}
