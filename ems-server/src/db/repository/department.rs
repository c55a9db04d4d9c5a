//! Department Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::activity::storage::insert_content;
use crate::activity::types::NewActivity;
use crate::db::models::{Department, DepartmentCreate, DepartmentUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct DepartmentRepository {
    base: BaseRepository,
}

impl DepartmentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all departments
    pub async fn find_all(&self) -> RepoResult<Vec<Department>> {
        let departments: Vec<Department> = self
            .base
            .db()
            .query("SELECT * FROM department ORDER BY name")
            .await?
            .take(0)?;
        Ok(departments)
    }

    /// Find department by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Department>> {
        let thing = self.base.parse_id(id)?;
        let dept: Option<Department> = self.base.db().select(thing).await?;
        Ok(dept)
    }

    /// Find department by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM department WHERE name = $name LIMIT 1")
            .bind(("name", name.to_string()))
            .await?;
        let departments: Vec<Department> = result.take(0)?;
        Ok(departments.into_iter().next())
    }

    /// Count departments
    pub async fn count(&self) -> RepoResult<u64> {
        #[derive(serde::Deserialize)]
        struct Count {
            total: u64,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() as total FROM department GROUP ALL")
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Create a department, logging in the same transaction
    pub async fn create(&self, data: DepartmentCreate, log: NewActivity) -> RepoResult<Department> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Department '{}' already exists",
                data.name
            )));
        }

        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE department SET name = $name, created_at = $created_at RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("name", data.name))
            .bind(("created_at", shared::util::now_millis()))
            .bind(("log", log_content))
            .await?;

        let created: Option<Department> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create department".to_string()))
    }

    /// Rename a department, logging in the same transaction
    pub async fn update(
        &self,
        id: &str,
        data: DepartmentUpdate,
        log: NewActivity,
    ) -> RepoResult<Department> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Department {} not found", id)))?;

        if let Some(ref new_name) = data.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Department '{}' already exists",
                new_name
            )));
        }

        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE $thing SET name = IF $has_name THEN $name ELSE name END RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", thing))
            .bind(("has_name", data.name.is_some()))
            .bind(("name", data.name))
            .bind(("log", log_content))
            .await?;

        result
            .take::<Option<Department>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Department {} not found", id)))
    }

    /// Delete a department, logging in the same transaction
    pub async fn delete(&self, id: &str, log: NewActivity) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        let existing = self.find_by_id(id).await?;
        if existing.is_none() {
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

    async fn repo() -> DepartmentRepository {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        DepartmentRepository::new(db)
    }

    fn log() -> NewActivity {
        NewActivity::new(ActivityAction::DepartmentCreated, "department")
    }

    #[tokio::test]
    async fn create_find_delete() {
        let repo = repo().await;
        let dept = repo
            .create(DepartmentCreate { name: "Accounts".into() }, log())
            .await
            .unwrap();
        let id = dept.id.as_ref().unwrap().to_string();

        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.find_by_name("Accounts").await.unwrap().is_some());

        assert!(repo.delete(&id, log()).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
        // Deleting again reports false
        assert!(!repo.delete(&id, log()).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let repo = repo().await;
        repo.create(DepartmentCreate { name: "HR".into() }, log())
            .await
            .unwrap();
        let err = repo
            .create(DepartmentCreate { name: "HR".into() }, log())
            .await;
        assert!(matches!(err, Err(RepoError::Duplicate(_))));
    }
}
