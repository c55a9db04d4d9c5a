//! Task API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{AssigneeDecision, AssigneeStatus, Task, TaskAssignee, TaskCreate};
use crate::db::repository::TaskRepository;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};

#[derive(Debug, Serialize)]
pub struct TaskWithAssignees {
    pub task: Task,
    pub assignees: Vec<TaskAssignee>,
}

/// Create a task and fan it out to its assignees
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<TaskCreate>,
) -> AppResult<Json<TaskWithAssignees>> {
    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let audience: Vec<String> = payload
        .assignees
        .iter()
        .map(|a| a.work_id.clone())
        .collect();

    let log = NewActivity::new(ActivityAction::TaskAssigned, "task")
        .actor(user.id.clone(), user.username.clone())
        .audience(audience)
        .details(serde_json::json!({
            "message": format!("New task: {}", payload.title),
            "title": payload.title.clone(),
            "due_date": payload.due_date.clone(),
        }));

    let repo = TaskRepository::new(state.db.clone());
    let (task, assignees) = repo
        .create(&user.id, payload, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(TaskWithAssignees { task, assignees }))
}

/// The supervisor's own tasks, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ListView<Task>>> {
    let repo = TaskRepository::new(state.db.clone());
    let tasks = repo
        .find_for_supervisor(&user.id)
        .await
        .map_err(AppError::from)?;
    Ok(Json(list_view(tasks)))
}

/// Assignee rows for one task
pub async fn assignees(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ListView<TaskAssignee>>> {
    let repo = TaskRepository::new(state.db.clone());
    let rows = repo.assignees(&id).await.map_err(AppError::from)?;
    Ok(Json(list_view(rows)))
}

/// Tasks assigned to the caller (matched by work id)
pub async fn my_tasks(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ListView<TaskAssignee>>> {
    let work_id = user
        .work_id
        .as_deref()
        .ok_or_else(|| AppError::validation("No work id on the current session"))?;
    let repo = TaskRepository::new(state.db.clone());
    let rows = repo.find_for_work_id(work_id).await.map_err(AppError::from)?;
    Ok(Json(list_view(rows)))
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Employee submission on their assignee row
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> AppResult<Json<TaskAssignee>> {
    validate_optional_text(&payload.remarks, "remarks", MAX_NOTE_LEN)?;

    let log = NewActivity::new(ActivityAction::TaskSubmitted, "task_assignee")
        .actor(user.id.clone(), user.username.clone())
        .entity_id(id.clone())
        .details(serde_json::json!({
            "message": payload.remarks.clone().unwrap_or_default(),
        }));

    let decision = AssigneeDecision {
        status: AssigneeStatus::Submitted,
        remarks: payload.remarks,
    };

    let repo = TaskRepository::new(state.db.clone());
    let row = repo
        .decide_assignee(&id, decision, false, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}

/// Supervisor verdict on one assignee row
pub async fn verdict(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(decision): Json<AssigneeDecision>,
) -> AppResult<Json<TaskAssignee>> {
    let action = match decision.status {
        AssigneeStatus::Approved => ActivityAction::TaskApproved,
        AssigneeStatus::Rejected => ActivityAction::TaskRejected,
        _ => {
            return Err(AppError::validation(
                "Verdict must be approved or rejected",
            ));
        }
    };
    validate_optional_text(&decision.remarks, "remarks", MAX_NOTE_LEN)?;

    // Address the entry to the assignee's work id
    let repo = TaskRepository::new(state.db.clone());
    let existing = repo
        .assignee_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Assignee {} not found", id)))?;

    let log = NewActivity::new(action, "task_assignee")
        .actor(user.id.clone(), user.username.clone())
        .entity_id(id.clone())
        .audience(vec![existing.work_id.clone()])
        .details(serde_json::json!({
            "status": match decision.status {
                AssigneeStatus::Approved => "approved",
                _ => "rejected",
            },
            "reason": decision.remarks.clone().unwrap_or_default(),
        }));

    let row = repo
        .decide_assignee(&id, decision, true, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(row))
}
