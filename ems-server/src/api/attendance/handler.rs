//! Attendance API Handlers
//!
//! Timestamps are Unix millis; the "today" window is local midnight to
//! next local midnight in the configured business timezone.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::AttendanceRecord;
use crate::db::repository::AttendanceRepository;
use crate::utils::AppResult;
use crate::utils::time;

/// Default page size for a user's own history
const MY_RECORDS_LIMIT: usize = 30;

/// Attendance row with the lateness/early-checkout flags resolved
#[derive(Debug, Serialize)]
pub struct AttendanceView {
    pub id: Option<String>,
    pub user: String,
    pub clock_in: i64,
    pub clock_out: Option<i64>,
    pub late: bool,
    pub early_checkout: bool,
}

fn to_view(record: &AttendanceRecord, state: &ServerState) -> AttendanceView {
    let tz = state.config.timezone;
    let policy = &state.config.attendance;
    AttendanceView {
        id: record.id.as_ref().map(|id| id.to_string()),
        user: record.user.to_string(),
        clock_in: record.clock_in,
        clock_out: record.clock_out,
        late: crate::stats::is_late(record.clock_in, tz, policy),
        early_checkout: crate::stats::is_early_checkout(record.clock_out, tz, policy),
    }
}

/// Clock in (one open record per user)
pub async fn clock_in(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AttendanceView>> {
    let now = shared::util::now_millis();
    let log = NewActivity::new(ActivityAction::ClockIn, "attendance")
        .actor(user.id.clone(), user.username.clone());

    let repo = AttendanceRepository::new(state.db.clone());
    let record = repo
        .clock_in(&user.id, now, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(to_view(&record, &state)))
}

/// Clock out (closes the latest open record)
pub async fn clock_out(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AttendanceView>> {
    let now = shared::util::now_millis();
    let log = NewActivity::new(ActivityAction::ClockOut, "attendance")
        .actor(user.id.clone(), user.username.clone());

    let repo = AttendanceRepository::new(state.db.clone());
    let record = repo
        .clock_out(&user.id, now, log)
        .await
        .map_err(AppError::from)?;
    Ok(Json(to_view(&record, &state)))
}

/// The caller's recent attendance records
pub async fn my_records(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ListView<AttendanceView>>> {
    let repo = AttendanceRepository::new(state.db.clone());
    let records = repo
        .find_for_user(&user.id, MY_RECORDS_LIMIT)
        .await
        .map_err(AppError::from)?;
    let views = records.iter().map(|r| to_view(r, &state)).collect();
    Ok(Json(list_view(views)))
}

/// Today's records across all users
pub async fn today(
    State(state): State<ServerState>,
) -> AppResult<Json<ListView<AttendanceView>>> {
    let (from, to) = time::today_bounds(state.config.timezone);
    let repo = AttendanceRepository::new(state.db.clone());
    let records = repo.find_between(from, to).await.map_err(AppError::from)?;
    let views = records.iter().map(|r| to_view(r, &state)).collect();
    Ok(Json(list_view(views)))
}
