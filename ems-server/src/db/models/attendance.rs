//! Attendance Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Attendance record matching SurrealDB schema
///
/// Timestamps are Unix millis; `clock_out` stays null while the record is
/// open. At most one open record per user (pre-insert check, not atomic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub clock_in: i64,
    #[serde(default)]
    pub clock_out: Option<i64>,
}
