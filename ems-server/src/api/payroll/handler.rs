//! Payroll API Handlers
//!
//! Batch generation walks active profiles sequentially; users already
//! holding a record for the period are skipped, and a mid-batch failure
//! leaves earlier records committed (the outcome reports the counts).

use axum::{Json, extract::State};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::api::render::{ListView, list_view};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{PayrollGenerateRequest, PayrollRecord};
use crate::db::repository::{PayrollRepository, ProfileRepository, payroll::PayrollBatchOutcome};
use crate::utils::AppResult;
use crate::utils::time::parse_date;
use crate::utils::validation::validate_money;

/// The caller's payroll records, newest first
pub async fn my_records(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ListView<PayrollRecord>>> {
    let repo = PayrollRepository::new(state.db.clone());
    let records = repo.find_for_user(&user.id).await.map_err(AppError::from)?;
    Ok(Json(list_view(records)))
}

/// All payroll records, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ListView<PayrollRecord>>> {
    let repo = PayrollRepository::new(state.db.clone());
    let records = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(list_view(records)))
}

/// Generate records for all active profiles for one pay period
pub async fn generate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PayrollGenerateRequest>,
) -> AppResult<Json<PayrollBatchOutcome>> {
    validate_money(payload.basic_salary, "basic_salary")?;
    validate_money(payload.allowances, "allowances")?;
    validate_money(payload.deductions, "deductions")?;

    let start = parse_date(&payload.period_start)?;
    let end = parse_date(&payload.period_end)?;
    if end < start {
        return Err(AppError::validation(
            "period_end must not precede period_start",
        ));
    }

    let profiles = ProfileRepository::new(state.db.clone())
        .find_all()
        .await
        .map_err(AppError::from)?;

    let repo = PayrollRepository::new(state.db.clone());
    let outcome = repo
        .generate_batch(&profiles, &payload)
        .await
        .map_err(AppError::from)?;

    let entry = NewActivity::new(ActivityAction::PayrollGenerated, "payroll")
        .actor(user.id, user.username)
        .notify_all()
        .details(serde_json::json!({
            "period_start": payload.period_start,
            "period_end": payload.period_end,
            "generated": outcome.generated,
            "skipped": outcome.skipped,
            "failed": outcome.failed,
        }));
    if let Err(e) = state.activity.append(entry).await {
        tracing::warn!(error = %e, "Failed to log payroll generation");
    }

    Ok(Json(outcome))
}
