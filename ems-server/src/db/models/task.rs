//! Task Models
//!
//! Supervisor-assigned tasks. A task fans out to one row per assignee;
//! both assignment and the supervisor's decision append activity entries
//! addressed to the assignees.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Overall task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Active,
    Closed,
}

/// Per-assignee progress status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

/// Task matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Supervisor profile id (string form "profile:xxx")
    pub supervisor: String,
    #[serde(default)]
    pub department: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub supervisor_remarks: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// Task assignee row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssignee {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub task: RecordId,
    #[serde(default)]
    pub assignee_user: Option<String>,
    pub work_id: String,
    pub name: String,
    pub status: AssigneeStatus,
    #[serde(default)]
    pub employee_remarks: Option<String>,
    #[serde(default)]
    pub supervisor_remarks: Option<String>,
}

/// Create task payload (assignees fan out to task_assignee rows)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    #[serde(default)]
    pub department: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub assignees: Vec<TaskAssigneeCreate>,
}

/// One assignee in a task creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssigneeCreate {
    #[serde(default)]
    pub assignee_user: Option<String>,
    pub work_id: String,
    pub name: String,
}

/// Decision payload: employee submission or supervisor verdict on one
/// assignee row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeDecision {
    pub status: AssigneeStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}
