//! Payroll Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Payroll record matching SurrealDB schema
///
/// `net_pay` is computed at generation time: basic + allowances - deductions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub period_start: String,
    pub period_end: String,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub net_pay: f64,
    #[serde(default)]
    pub created_at: i64,
}

/// Batch payroll generation request (one record per active profile,
/// skipping users that already have a record for the period)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollGenerateRequest {
    pub period_start: String,
    pub period_end: String,
    pub basic_salary: f64,
    #[serde(default)]
    pub allowances: f64,
    #[serde(default)]
    pub deductions: f64,
}
