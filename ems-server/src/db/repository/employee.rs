//! Employee Repository
//!
//! Holds the work-id generation sequence: current employee count + 1,
//! zero-padded. Count-then-format is not atomic; two concurrent creates
//! can observe the same count and produce the same work id.

use super::{BaseRepository, RepoError, RepoResult};
use crate::activity::storage::insert_content;
use crate::activity::types::NewActivity;
use crate::db::models::employee::{format_work_id, work_id_prefix};
use crate::db::models::{Employee, EmployeeCreate, EmployeeUpdate};
use shared::Role;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct Count {
    total: u64,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active employees
    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE is_active = true ORDER BY full_name")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Find all employees including inactive
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee ORDER BY full_name")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Find employee by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Employee>> {
        let thing = self.base.parse_id(id)?;
        let emp: Option<Employee> = self.base.db().select(thing).await?;
        Ok(emp)
    }

    /// Find employees of one department (active only)
    pub async fn find_by_department(&self, department: &str) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query(
                "SELECT * FROM employee WHERE department = $department AND is_active = true \
                 ORDER BY full_name",
            )
            .bind(("department", department.to_string()))
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Count all employees (active and inactive; the work-id sequence base)
    pub async fn count_all(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() as total FROM employee GROUP ALL")
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Count active employees
    pub async fn count_active(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() as total FROM employee WHERE is_active = true GROUP ALL")
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Count employees created within [from, to) millis
    pub async fn count_created_between(&self, from: i64, to: i64) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() as total FROM employee \
                 WHERE created_at >= $from AND created_at < $to GROUP ALL",
            )
            .bind(("from", from))
            .bind(("to", to))
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Next work id for a role/department: count + 1, zero-padded.
    ///
    /// Read-then-format with no reservation; concurrent callers can be
    /// handed the same id.
    pub async fn next_work_id(&self, role: Role, department: Option<&str>) -> RepoResult<String> {
        let count = self.count_all().await?;
        let prefix = work_id_prefix(role, department);
        Ok(format_work_id(&prefix, count + 1))
    }

    /// Create a new employee with a pre-generated work id, logging in the
    /// same transaction
    pub async fn create(
        &self,
        data: EmployeeCreate,
        work_id: String,
        log: NewActivity,
    ) -> RepoResult<Employee> {
        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE employee SET
                    full_name = $full_name,
                    email = $email,
                    role = $role,
                    department = $department,
                    work_id = $work_id,
                    is_active = true,
                    created_at = $created_at
                RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("full_name", data.full_name))
            .bind(("email", data.email))
            .bind(("role", data.role))
            .bind(("department", data.department))
            .bind(("work_id", work_id))
            .bind(("created_at", shared::util::now_millis()))
            .bind(("log", log_content))
            .await?;

        let created: Option<Employee> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create employee".to_string()))
    }

    /// Update an employee, logging in the same transaction
    pub async fn update(
        &self,
        id: &str,
        data: EmployeeUpdate,
        log: NewActivity,
    ) -> RepoResult<Employee> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))?;

        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE $thing SET
                    full_name = IF $has_full_name THEN $full_name ELSE full_name END,
                    email = IF $has_email THEN $email ELSE email END,
                    role = IF $has_role THEN $role ELSE role END,
                    department = IF $has_department THEN $department ELSE department END,
                    is_active = IF $has_is_active THEN $is_active ELSE is_active END
                RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", thing))
            .bind(("has_full_name", data.full_name.is_some()))
            .bind(("full_name", data.full_name))
            .bind(("has_email", data.email.is_some()))
            .bind(("email", data.email))
            .bind(("has_role", data.role.is_some()))
            .bind(("role", data.role))
            .bind(("has_department", data.department.is_some()))
            .bind(("department", data.department))
            .bind(("has_is_active", data.is_active.is_some()))
            .bind(("is_active", data.is_active))
            .bind(("log", log_content))
            .await?;

        result
            .take::<Option<Employee>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", id)))
    }

    /// Hard delete an employee, logging in the same transaction
    pub async fn delete(&self, id: &str, log: NewActivity) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        if self.find_by_id(id).await?.is_none() {
            return Ok(false);
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityAction;
    use surrealdb::engine::local::Mem;

    async fn repo() -> EmployeeRepository {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        EmployeeRepository::new(db)
    }

    fn log() -> NewActivity {
        NewActivity::new(ActivityAction::EmployeeCreated, "employee")
    }

    fn payload(email: &str, dept: Option<&str>) -> EmployeeCreate {
        EmployeeCreate {
            full_name: "Sam Lee".into(),
            email: email.into(),
            role: Role::Employee,
            department: dept.map(|s| s.to_string()),
        }
    }

    #[tokio::test]
    async fn work_ids_are_sequential_when_serialized() {
        let repo = repo().await;

        let id1 = repo.next_work_id(Role::Employee, Some("Accounts")).await.unwrap();
        assert_eq!(id1, "ACC-0001");
        repo.create(payload("a@example.com", Some("Accounts")), id1, log())
            .await
            .unwrap();

        let id2 = repo.next_work_id(Role::Employee, None).await.unwrap();
        assert_eq!(id2, "EMP-0002");
    }

    #[tokio::test]
    async fn concurrent_work_id_generation_can_collide() {
        // Count-then-format has no reservation step. Two tasks that read
        // the count before either insert both get the same id.
        let repo = repo().await;
        repo.create(
            payload("seed@example.com", None),
            repo.next_work_id(Role::Employee, None).await.unwrap(),
            log(),
        )
        .await
        .unwrap();

        let (a, b) = tokio::join!(
            repo.next_work_id(Role::Employee, None),
            repo.next_work_id(Role::Employee, None)
        );
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn update_touches_only_given_fields() {
        let repo = repo().await;
        let created = repo
            .create(payload("u@example.com", Some("Accounts")), "ACC-0001".into(), log())
            .await
            .unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let updated = repo
            .update(
                &id,
                EmployeeUpdate {
                    full_name: Some("Sam L. Lee".into()),
                    email: None,
                    role: None,
                    department: None,
                    is_active: None,
                },
                log(),
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Sam L. Lee");
        assert_eq!(updated.email, "u@example.com");
        assert_eq!(updated.department.as_deref(), Some("Accounts"));
        assert!(updated.is_active);
    }

    #[tokio::test]
    async fn department_scoping() {
        let repo = repo().await;
        repo.create(payload("d1@example.com", Some("Accounts")), "ACC-0001".into(), log())
            .await
            .unwrap();
        repo.create(payload("d2@example.com", Some("Logistics")), "EMP-0002".into(), log())
            .await
            .unwrap();

        let accounts = repo.find_by_department("Accounts").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].email, "d1@example.com");
    }
}
