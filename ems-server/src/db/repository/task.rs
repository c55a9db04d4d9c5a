//! Task Repository
//!
//! Task creation fans out one task_assignee row per assignee in a single
//! transaction, together with an activity entry addressed to the
//! assignees' work ids.

use super::{BaseRepository, RepoError, RepoResult};
use crate::activity::storage::insert_content;
use crate::activity::types::NewActivity;
use crate::db::models::{
    AssigneeDecision, AssigneeStatus, Task, TaskAssignee, TaskCreate,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct TaskRepository {
    base: BaseRepository,
}

impl TaskRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Tasks created by one supervisor, newest first
    pub async fn find_for_supervisor(&self, supervisor: &str) -> RepoResult<Vec<Task>> {
        let rows: Vec<Task> = self
            .base
            .db()
            .query(
                "SELECT * FROM task WHERE supervisor = $supervisor ORDER BY created_at DESC",
            )
            .bind(("supervisor", supervisor.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Find task by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Task>> {
        let thing = self.base.parse_id(id)?;
        let row: Option<Task> = self.base.db().select(thing).await?;
        Ok(row)
    }

    /// Assignee rows for a task
    pub async fn assignees(&self, task_id: &str) -> RepoResult<Vec<TaskAssignee>> {
        let thing = self.base.parse_id(task_id)?;
        let rows: Vec<TaskAssignee> = self
            .base
            .db()
            .query("SELECT * FROM task_assignee WHERE task = $task ORDER BY name")
            .bind(("task", thing))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Find one assignee row by id
    pub async fn assignee_by_id(&self, id: &str) -> RepoResult<Option<TaskAssignee>> {
        let thing = self.base.parse_id(id)?;
        if thing.table() != "task_assignee" {
            return Err(RepoError::Validation(format!(
                "Not a task assignee id: {id}"
            )));
        }
        let row: Option<TaskAssignee> = self.base.db().select(thing).await?;
        Ok(row)
    }

    /// Assignee rows addressed to one work id, newest task first
    pub async fn find_for_work_id(&self, work_id: &str) -> RepoResult<Vec<TaskAssignee>> {
        let rows: Vec<TaskAssignee> = self
            .base
            .db()
            .query("SELECT * FROM task_assignee WHERE work_id = $work_id")
            .bind(("work_id", work_id.to_string()))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Create a task plus its assignee rows and the assignment log entry
    /// in one transaction
    pub async fn create(
        &self,
        supervisor: &str,
        data: TaskCreate,
        log: NewActivity,
    ) -> RepoResult<(Task, Vec<TaskAssignee>)> {
        if data.assignees.is_empty() {
            return Err(RepoError::Validation(
                "Task needs at least one assignee".to_string(),
            ));
        }

        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let assignee_contents: Vec<serde_json::Value> = data
            .assignees
            .iter()
            .map(|a| {
                serde_json::json!({
                    "assignee_user": a.assignee_user,
                    "work_id": a.work_id,
                    "name": a.name,
                    "status": "pending",
                })
            })
            .collect();

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                LET $task = (CREATE ONLY task SET
                    supervisor = $supervisor,
                    department = $department,
                    title = $title,
                    description = $description,
                    due_date = $due_date,
                    status = 'active',
                    supervisor_remarks = NONE,
                    created_at = $created_at);
                FOR $row IN $assignee_rows {
                    CREATE task_assignee SET
                        task = $task.id,
                        assignee_user = $row.assignee_user,
                        work_id = $row.work_id,
                        name = $row.name,
                        status = 'pending';
                };
                CREATE activity_log CONTENT $log;
                RETURN $task;
                COMMIT TRANSACTION;"#,
            )
            .bind(("supervisor", supervisor.to_string()))
            .bind(("department", data.department))
            .bind(("title", data.title))
            .bind(("description", data.description))
            .bind(("due_date", data.due_date))
            .bind(("created_at", shared::util::now_millis()))
            .bind(("assignee_rows", assignee_contents))
            .bind(("log", log_content))
            .await?;

        let created: Option<Task> = result.take(result.num_statements() - 1)?;
        let task =
            created.ok_or_else(|| RepoError::Database("Failed to create task".to_string()))?;
        let task_id = task
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| RepoError::Database("Created task has no id".to_string()))?;

        let assignees = self.assignees(&task_id).await?;
        Ok((task, assignees))
    }

    /// Record a decision on one assignee row (employee submission or
    /// supervisor verdict), logging in the same transaction
    pub async fn decide_assignee(
        &self,
        assignee_id: &str,
        decision: AssigneeDecision,
        supervisor_side: bool,
        log: NewActivity,
    ) -> RepoResult<TaskAssignee> {
        let thing = self.base.parse_id(assignee_id)?;
        if thing.table() != "task_assignee" {
            return Err(RepoError::Validation(format!(
                "Not a task assignee id: {assignee_id}"
            )));
        }

        let remarks_field = if supervisor_side {
            "supervisor_remarks"
        } else {
            "employee_remarks"
        };
        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let sql = format!(
            r#"BEGIN TRANSACTION;
            UPDATE $thing SET status = $status, {remarks_field} = $remarks RETURN AFTER;
            CREATE activity_log CONTENT $log;
            COMMIT TRANSACTION;"#
        );

        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("thing", thing))
            .bind(("status", decision.status))
            .bind(("remarks", decision.remarks))
            .bind(("log", log_content))
            .await?;

        result
            .take::<Option<TaskAssignee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Assignee {} not found", assignee_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityAction;
    use crate::db::models::TaskAssigneeCreate;
    use surrealdb::engine::local::Mem;

    async fn repo() -> TaskRepository {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        TaskRepository::new(db)
    }

    fn log() -> NewActivity {
        NewActivity::new(ActivityAction::TaskAssigned, "task")
    }

    fn task_payload() -> TaskCreate {
        TaskCreate {
            department: Some("Accounts".into()),
            title: "Close month-end books".into(),
            description: Some("Reconcile all ledgers".into()),
            due_date: Some("2026-09-05".into()),
            assignees: vec![
                TaskAssigneeCreate {
                    assignee_user: None,
                    work_id: "ACC-0001".into(),
                    name: "Sam Lee".into(),
                },
                TaskAssigneeCreate {
                    assignee_user: None,
                    work_id: "ACC-0002".into(),
                    name: "Ana Diaz".into(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_fans_out_assignee_rows() {
        let repo = repo().await;
        let (task, assignees) = repo
            .create("profile:super", task_payload(), log())
            .await
            .unwrap();

        assert_eq!(task.title, "Close month-end books");
        assert_eq!(assignees.len(), 2);
        assert!(assignees.iter().all(|a| a.status == AssigneeStatus::Pending));

        let mine = repo.find_for_work_id("ACC-0001").await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn empty_assignee_list_is_rejected() {
        let repo = repo().await;
        let mut payload = task_payload();
        payload.assignees.clear();
        let err = repo.create("profile:super", payload, log()).await;
        assert!(matches!(err, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn assignee_decision_sets_status_and_remarks() {
        let repo = repo().await;
        let (_, assignees) = repo
            .create("profile:super", task_payload(), log())
            .await
            .unwrap();
        let id = assignees[0].id.as_ref().unwrap().to_string();

        let submitted = repo
            .decide_assignee(
                &id,
                AssigneeDecision {
                    status: AssigneeStatus::Submitted,
                    remarks: Some("done".into()),
                },
                false,
                log(),
            )
            .await
            .unwrap();
        assert_eq!(submitted.status, AssigneeStatus::Submitted);
        assert_eq!(submitted.employee_remarks.as_deref(), Some("done"));

        let approved = repo
            .decide_assignee(
                &id,
                AssigneeDecision {
                    status: AssigneeStatus::Approved,
                    remarks: Some("good work".into()),
                },
                true,
                log(),
            )
            .await
            .unwrap();
        assert_eq!(approved.status, AssigneeStatus::Approved);
        assert_eq!(approved.supervisor_remarks.as_deref(), Some("good work"));
    }
}
