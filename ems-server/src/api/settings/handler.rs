//! Settings API Handlers
//!
//! Every mutation logs a `settings_changed` entry naming the table.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Holiday, HolidayCreate, JobRole, JobRoleCreate, LeaveType, LeaveTypeCreate, WorkingHours,
    WorkingHoursCreate,
};
use crate::db::repository::SettingsRepository;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};

fn settings_log(user: CurrentUser, table: &str, op: &str) -> NewActivity {
    NewActivity::new(ActivityAction::SettingsChanged, table)
        .actor(user.id, user.username)
        .details(serde_json::json!({ "table": table, "op": op }))
}

// ========== Job roles ==========

pub async fn list_job_roles(
    State(state): State<ServerState>,
) -> AppResult<Json<ListView<JobRole>>> {
    let repo = SettingsRepository::new(state.db.clone());
    let rows = repo.job_roles().await.map_err(AppError::from)?;
    Ok(Json(list_view(rows)))
}

pub async fn create_job_role(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<JobRoleCreate>,
) -> AppResult<Json<JobRole>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let repo = SettingsRepository::new(state.db.clone());
    let row = repo
        .create_job_role(payload, settings_log(user, "job_role", "create"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

pub async fn delete_job_role(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SettingsRepository::new(state.db.clone());
    let deleted = repo
        .delete_job_role(&id, settings_log(user, "job_role", "delete"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(deleted))
}

// ========== Leave types ==========

pub async fn list_leave_types(
    State(state): State<ServerState>,
) -> AppResult<Json<ListView<LeaveType>>> {
    let repo = SettingsRepository::new(state.db.clone());
    let rows = repo.leave_types().await.map_err(AppError::from)?;
    Ok(Json(list_view(rows)))
}

pub async fn create_leave_type(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveTypeCreate>,
) -> AppResult<Json<LeaveType>> {
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let repo = SettingsRepository::new(state.db.clone());
    let row = repo
        .create_leave_type(payload, settings_log(user, "leave_type", "create"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

pub async fn delete_leave_type(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SettingsRepository::new(state.db.clone());
    let deleted = repo
        .delete_leave_type(&id, settings_log(user, "leave_type", "delete"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(deleted))
}

// ========== Working hours ==========

pub async fn list_working_hours(
    State(state): State<ServerState>,
) -> AppResult<Json<ListView<WorkingHours>>> {
    let repo = SettingsRepository::new(state.db.clone());
    let rows = repo.working_hours().await.map_err(AppError::from)?;
    Ok(Json(list_view(rows)))
}

pub async fn create_working_hours(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<WorkingHoursCreate>,
) -> AppResult<Json<WorkingHours>> {
    validate_required_text(&payload.start, "start", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.end, "end", MAX_SHORT_TEXT_LEN)?;
    let repo = SettingsRepository::new(state.db.clone());
    let row = repo
        .create_working_hours(payload, settings_log(user, "working_hours", "create"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

pub async fn delete_working_hours(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SettingsRepository::new(state.db.clone());
    let deleted = repo
        .delete_working_hours(&id, settings_log(user, "working_hours", "delete"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(deleted))
}

// ========== Holidays ==========

pub async fn list_holidays(
    State(state): State<ServerState>,
) -> AppResult<Json<ListView<Holiday>>> {
    let repo = SettingsRepository::new(state.db.clone());
    let rows = repo.holidays().await.map_err(AppError::from)?;
    Ok(Json(list_view(rows)))
}

pub async fn create_holiday(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<HolidayCreate>,
) -> AppResult<Json<Holiday>> {
    parse_date(&payload.date)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let repo = SettingsRepository::new(state.db.clone());
    let row = repo
        .create_holiday(payload, settings_log(user, "holiday", "create"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

pub async fn delete_holiday(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SettingsRepository::new(state.db.clone());
    let deleted = repo
        .delete_holiday(&id, settings_log(user, "holiday", "delete"))
        .await
        .map_err(AppError::from)?;
    Ok(Json(deleted))
}
