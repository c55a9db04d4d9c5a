//! Settings Repository
//!
//! CRUD over the four admin lookup tables: job_role, leave_type,
//! working_hours, holiday. Every write logs a settings_changed entry in
//! the same transaction.

use super::{BaseRepository, RepoError, RepoResult};
use crate::activity::storage::insert_content;
use crate::activity::types::NewActivity;
use crate::db::models::{
    Holiday, HolidayCreate, JobRole, JobRoleCreate, LeaveType, LeaveTypeCreate, WorkingHours,
    WorkingHoursCreate,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    async fn create_logged<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        content: serde_json::Value,
        log: NewActivity,
    ) -> RepoResult<T> {
        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;
        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE type::table($tb) CONTENT $content RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("tb", table.to_string()))
            .bind(("content", content))
            .bind(("log", log_content))
            .await?;
        let created: Option<T> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database(format!("Failed to create {table} row")))
    }

    async fn delete_logged(&self, id: &str, table: &str, log: NewActivity) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        if thing.table() != table {
            return Err(RepoError::Validation(format!("Not a {table} id: {id}")));
        }
        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;
        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                DELETE $thing;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", thing))
            .bind(("log", log_content))
            .await?
            .check()?;
        Ok(true)
    }

    // ========== Job Roles ==========

    pub async fn job_roles(&self) -> RepoResult<Vec<JobRole>> {
        let rows: Vec<JobRole> = self
            .base
            .db()
            .query("SELECT * FROM job_role ORDER BY name")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn create_job_role(&self, data: JobRoleCreate, log: NewActivity) -> RepoResult<JobRole> {
        self.create_logged("job_role", serde_json::json!({"name": data.name}), log)
            .await
    }

    pub async fn delete_job_role(&self, id: &str, log: NewActivity) -> RepoResult<bool> {
        self.delete_logged(id, "job_role", log).await
    }

    // ========== Leave Types ==========

    pub async fn leave_types(&self) -> RepoResult<Vec<LeaveType>> {
        let rows: Vec<LeaveType> = self
            .base
            .db()
            .query("SELECT * FROM leave_type ORDER BY code")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn create_leave_type(
        &self,
        data: LeaveTypeCreate,
        log: NewActivity,
    ) -> RepoResult<LeaveType> {
        self.create_logged(
            "leave_type",
            serde_json::json!({"code": data.code, "name": data.name, "max_days": data.max_days}),
            log,
        )
        .await
    }

    pub async fn delete_leave_type(&self, id: &str, log: NewActivity) -> RepoResult<bool> {
        self.delete_logged(id, "leave_type", log).await
    }

    // ========== Working Hours ==========

    pub async fn working_hours(&self) -> RepoResult<Vec<WorkingHours>> {
        let rows: Vec<WorkingHours> = self
            .base
            .db()
            .query("SELECT * FROM working_hours ORDER BY day")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn create_working_hours(
        &self,
        data: WorkingHoursCreate,
        log: NewActivity,
    ) -> RepoResult<WorkingHours> {
        self.create_logged(
            "working_hours",
            serde_json::json!({"day": data.day, "start": data.start, "end": data.end}),
            log,
        )
        .await
    }

    pub async fn delete_working_hours(&self, id: &str, log: NewActivity) -> RepoResult<bool> {
        self.delete_logged(id, "working_hours", log).await
    }

    // ========== Holidays ==========

    pub async fn holidays(&self) -> RepoResult<Vec<Holiday>> {
        let rows: Vec<Holiday> = self
            .base
            .db()
            .query("SELECT * FROM holiday ORDER BY date")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn create_holiday(&self, data: HolidayCreate, log: NewActivity) -> RepoResult<Holiday> {
        self.create_logged(
            "holiday",
            serde_json::json!({"date": data.date, "name": data.name}),
            log,
        )
        .await
    }

    pub async fn delete_holiday(&self, id: &str, log: NewActivity) -> RepoResult<bool> {
        self.delete_logged(id, "holiday", log).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityAction;
    use surrealdb::engine::local::Mem;

    async fn repo() -> SettingsRepository {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        SettingsRepository::new(db)
    }

    fn log() -> NewActivity {
        NewActivity::new(ActivityAction::SettingsChanged, "settings")
    }

    #[tokio::test]
    async fn leave_type_crud() {
        let repo = repo().await;
        let created = repo
            .create_leave_type(
                LeaveTypeCreate {
                    code: "AL".into(),
                    name: "Annual Leave".into(),
                    max_days: 20,
                },
                log(),
            )
            .await
            .unwrap();
        assert_eq!(created.max_days, 20);

        let listed = repo.leave_types().await.unwrap();
        assert_eq!(listed.len(), 1);

        let id = created.id.as_ref().unwrap().to_string();
        assert!(repo.delete_leave_type(&id, log()).await.unwrap());
        assert!(repo.leave_types().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_rejects_foreign_table_ids() {
        let repo = repo().await;
        let err = repo.delete_job_role("holiday:abc", log()).await;
        assert!(matches!(err, Err(RepoError::Validation(_))));
    }
}
