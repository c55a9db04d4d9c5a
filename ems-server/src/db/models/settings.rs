//! Settings Models
//!
//! Small admin-managed lookup tables: job roles, leave types, working
//! hours, holidays.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Job role lookup row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRole {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRoleCreate {
    pub name: String,
}

/// Leave type lookup row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveType {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub code: String,
    pub name: String,
    pub max_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveTypeCreate {
    pub code: String,
    pub name: String,
    pub max_days: u32,
}

/// Working hours row (`day = None` means the default schedule)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub day: Option<String>,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursCreate {
    #[serde(default)]
    pub day: Option<String>,
    pub start: String,
    pub end: String,
}

/// Holiday row (ISO date)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub date: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCreate {
    pub date: String,
    pub name: String,
}
