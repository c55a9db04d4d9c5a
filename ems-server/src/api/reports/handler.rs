//! Report Handlers
//!
//! Rows stream from the repositories straight into the CSV writer;
//! nothing is persisted server-side.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::TimeZone;
use chrono_tz::Tz;

use crate::AppError;
use crate::core::ServerState;
use crate::db::repository::{AttendanceRepository, LeaveRepository, PayrollRepository};
use crate::stats;
use crate::utils::AppResult;
use crate::utils::csv_export::to_csv;

fn csv_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/csv")], body).into_response()
}

/// Local wall-clock rendering for export rows; empty for missing stamps
fn fmt_local(millis: Option<i64>, tz: Tz) -> String {
    millis
        .and_then(|m| tz.timestamp_millis_opt(m).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Export all attendance records
pub async fn attendance_csv(State(state): State<ServerState>) -> AppResult<Response> {
    let tz = state.config.timezone;
    let policy = &state.config.attendance;
    let records = AttendanceRepository::new(state.db.clone())
        .find_between(0, i64::MAX)
        .await
        .map_err(AppError::from)?;

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.user.to_string(),
                fmt_local(Some(r.clock_in), tz),
                fmt_local(r.clock_out, tz),
                stats::is_late(r.clock_in, tz, policy).to_string(),
                stats::is_early_checkout(r.clock_out, tz, policy).to_string(),
            ]
        })
        .collect();

    let csv = to_csv(
        &["Employee", "Clock In", "Clock Out", "Late", "Early Checkout"],
        &rows,
    )?;
    Ok(csv_response(csv))
}

/// Export all leave requests
pub async fn leaves_csv(State(state): State<ServerState>) -> AppResult<Response> {
    let requests = LeaveRepository::new(state.db.clone())
        .find_all()
        .await
        .map_err(AppError::from)?;

    let rows: Vec<Vec<String>> = requests
        .iter()
        .map(|l| {
            vec![
                l.user.to_string(),
                l.leave_type.clone(),
                l.start_date.clone(),
                l.end_date.clone(),
                stats::leave_days(&l.start_date, &l.end_date).to_string(),
                l.status.as_str().to_string(),
                l.reason.clone(),
            ]
        })
        .collect();

    let csv = to_csv(
        &[
            "Employee",
            "Type",
            "Start Date",
            "End Date",
            "Days",
            "Status",
            "Reason",
        ],
        &rows,
    )?;
    Ok(csv_response(csv))
}

/// Export all payroll records
pub async fn payroll_csv(State(state): State<ServerState>) -> AppResult<Response> {
    let records = PayrollRepository::new(state.db.clone())
        .find_all()
        .await
        .map_err(AppError::from)?;

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|p| {
            vec![
                p.user.to_string(),
                p.period_start.clone(),
                p.period_end.clone(),
                format!("{:.2}", p.basic_salary),
                format!("{:.2}", p.allowances),
                format!("{:.2}", p.deductions),
                format!("{:.2}", p.net_pay),
            ]
        })
        .collect();

    let csv = to_csv(
        &[
            "Employee",
            "Period Start",
            "Period End",
            "Basic Salary",
            "Allowances",
            "Deductions",
            "Net Pay",
        ],
        &rows,
    )?;
    Ok(csv_response(csv))
}
