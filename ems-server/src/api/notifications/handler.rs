//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::AppError;
use crate::activity::types::{MarkAllReadOutcome, NotificationFilter, NotificationPatch, NotificationView};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::Role;

/// Viewer scope for notification state
///
/// 管理角色共用角色名 scope (同角色仪表盘看到同一份状态)；
/// employee 按工号隔离，无工号时退回角色名。
fn scope_for(user: &CurrentUser) -> String {
    match user.role {
        Role::Employee => user
            .work_id
            .clone()
            .unwrap_or_else(|| user.role.as_str().to_string()),
        role => role.as_str().to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub filter: NotificationFilter,
}

/// List the caller's notifications, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ListView<NotificationView>>> {
    let scope = scope_for(&user);
    let views = state
        .notifications
        .list(&scope, params.filter)
        .await
        .map_err(AppError::from)?;
    Ok(Json(list_view(views)))
}

/// Patch one notification's state (read flag, terminal delete)
pub async fn patch_one(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<NotificationPatch>,
) -> AppResult<Json<bool>> {
    let scope = scope_for(&user);
    state
        .notifications
        .patch(&id, &scope, &patch)
        .await
        .map_err(AppError::from)?;
    Ok(Json(true))
}

/// Mark every unread notification read, sequentially
///
/// 中途失败即停，已完成的保持已读；结果报告 completed/failed。
pub async fn mark_all_read(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<MarkAllReadOutcome>> {
    let scope = scope_for(&user);
    let outcome = state
        .notifications
        .mark_all_read(&scope)
        .await
        .map_err(AppError::from)?;
    Ok(Json(outcome))
}
