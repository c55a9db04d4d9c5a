//! Employee Model
//!
//! Denormalized personnel record. `department` holds the department name
//! (not a link); the work id is generated from role + department + sequence
//! at creation time.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::Role;
use surrealdb::RecordId;

/// Employee model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    pub work_id: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create employee payload (work_id is generated server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub full_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
}

/// Update employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Work-id prefix for a role/department combination.
///
/// - admin → AD, hr → HR, md → MD
/// - supervisor → `S-<DepartmentName>` with whitespace stripped, bare `S`
///   when no department is set
/// - employee → ACC (Accounts), SM (Sales & Marketing), EMP otherwise
pub fn work_id_prefix(role: Role, department: Option<&str>) -> String {
    match role {
        Role::Admin => "AD".to_string(),
        Role::Hr => "HR".to_string(),
        Role::Md => "MD".to_string(),
        Role::Supervisor => match department {
            Some(dept) => format!("S-{}", dept.split_whitespace().collect::<String>()),
            None => "S".to_string(),
        },
        Role::Employee => match department {
            Some("Accounts") => "ACC".to_string(),
            Some("Sales & Marketing") => "SM".to_string(),
            _ => "EMP".to_string(),
        },
    }
}

/// Format a work id as `<prefix>-<sequence>` (sequence zero-padded to 4 digits)
pub fn format_work_id(prefix: &str, sequence: u64) -> String {
    format!("{}-{:04}", prefix, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_by_role() {
        assert_eq!(work_id_prefix(Role::Admin, None), "AD");
        assert_eq!(work_id_prefix(Role::Hr, Some("Accounts")), "HR");
        assert_eq!(work_id_prefix(Role::Md, None), "MD");
        assert_eq!(work_id_prefix(Role::Supervisor, Some("Accounts")), "S-Accounts");
        assert_eq!(
            work_id_prefix(Role::Supervisor, Some("Sales & Marketing")),
            "S-Sales&Marketing"
        );
        assert_eq!(work_id_prefix(Role::Supervisor, None), "S");
        assert_eq!(work_id_prefix(Role::Employee, Some("Accounts")), "ACC");
        assert_eq!(
            work_id_prefix(Role::Employee, Some("Sales & Marketing")),
            "SM"
        );
        assert_eq!(work_id_prefix(Role::Employee, Some("Logistics")), "EMP");
        assert_eq!(work_id_prefix(Role::Employee, None), "EMP");
    }

    #[test]
    fn work_id_is_zero_padded() {
        assert_eq!(format_work_id("EMP", 1), "EMP-0001");
        assert_eq!(format_work_id("EMP", 42), "EMP-0042");
        assert_eq!(format_work_id("S-Accounts", 7), "S-Accounts-0007");
        assert_eq!(format_work_id("EMP", 12345), "EMP-12345");
    }
}
