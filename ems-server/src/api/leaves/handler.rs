//! Leave API Handlers
//!
//! Date ordering (end >= start) is validated here, before any write.
//! Decisions append broadcast activity entries so every dashboard scope
//! surfaces them.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{LeaveRequest, LeaveRequestCreate, LeaveStatus};
use crate::db::repository::LeaveRepository;
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_required_text,
};

/// Submit a leave request (starts pending)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<LeaveRequestCreate>,
) -> AppResult<Json<LeaveRequest>> {
    validate_required_text(&payload.leave_type, "leave_type", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let start = parse_date(&payload.start_date)?;
    let end = parse_date(&payload.end_date)?;
    if end < start {
        return Err(AppError::validation("end_date must not precede start_date"));
    }

    let log = NewActivity::new(ActivityAction::LeaveRequested, "leave")
        .actor(user.id.clone(), user.username.clone())
        .audience(vec![
            "admin".to_string(),
            "hr".to_string(),
            "md".to_string(),
        ])
        .details(serde_json::json!({
            "leave_type": payload.leave_type.clone(),
            "start_date": payload.start_date.clone(),
            "end_date": payload.end_date.clone(),
            "reason": payload.reason.clone(),
        }));

    let repo = LeaveRepository::new(state.db.clone());
    let request = repo
        .create(&user.id, payload, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(request))
}

/// The caller's leave requests, newest first
pub async fn my_requests(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ListView<LeaveRequest>>> {
    let repo = LeaveRepository::new(state.db.clone());
    let requests = repo.find_for_user(&user.id).await.map_err(AppError::from)?;
    Ok(Json(list_view(requests)))
}

/// All leave requests, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListView<LeaveRequest>>> {
    let repo = LeaveRepository::new(state.db.clone());
    let requests = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(list_view(requests)))
}

/// Approve a pending request
pub async fn approve(
    state: State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<LeaveRequest>> {
    decide(state, user, id, LeaveStatus::Approved).await
}

/// Reject a pending request
pub async fn reject(
    state: State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<LeaveRequest>> {
    decide(state, user, id, LeaveStatus::Rejected).await
}

async fn decide(
    State(state): State<ServerState>,
    user: CurrentUser,
    id: String,
    status: LeaveStatus,
) -> AppResult<Json<LeaveRequest>> {
    let action = match status {
        LeaveStatus::Approved => ActivityAction::LeaveApproved,
        _ => ActivityAction::LeaveRejected,
    };

    let repo = LeaveRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Leave request {} not found", id)))?;

    // Broadcast entry: the requester's dashboard surfaces the outcome
    let log = NewActivity::new(action, "leave")
        .actor(user.id.clone(), user.username.clone())
        .entity_id(id.clone())
        .notify_all()
        .details(serde_json::json!({
            "status": status.as_str(),
            "leave_type": existing.leave_type,
            "start_date": existing.start_date,
            "end_date": existing.end_date,
        }));

    let request = repo
        .decide(&id, status, &user.username, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(request))
}
