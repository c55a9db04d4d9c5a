//! Activity Log API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::AppError;
use crate::activity::types::{ActivityEntry, ActivityEntryView, ActivityListResponse, ActivityQuery};
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::time::local_month;

/// Query the audit trail
pub async fn query(
    State(state): State<ServerState>,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<ActivityListResponse>> {
    let (entries, total) = state
        .activity
        .query(&params)
        .await
        .map_err(AppError::from)?;

    let items: Vec<ActivityEntryView> = entries
        .iter()
        .map(|entry| to_view(entry, &state))
        .collect();
    let placeholder = if items.is_empty() {
        Some(crate::api::render::EMPTY_PLACEHOLDER)
    } else {
        None
    };

    Ok(Json(ActivityListResponse {
        items,
        total,
        placeholder,
    }))
}

fn to_view(entry: &ActivityEntry, state: &ServerState) -> ActivityEntryView {
    let month = local_month(entry.created_at, state.config.timezone);
    ActivityEntryView {
        id: entry.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        actor_name: entry.actor_name.clone(),
        action: entry.action,
        category: entry.action.category(),
        entity: entry.entity.clone(),
        entity_id: entry.entity_id.clone(),
        details: entry.details.clone(),
        quarter: crate::stats::quarter(month),
        created_at: entry.created_at,
    }
}
