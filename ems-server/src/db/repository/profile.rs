//! Profile Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::activity::storage::insert_content;
use crate::activity::types::NewActivity;
use crate::db::models::{Profile, ProfileContactUpdate, ProfileCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ProfileRepository {
    base: BaseRepository,
}

impl ProfileRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active profiles
    pub async fn find_all(&self) -> RepoResult<Vec<Profile>> {
        let profiles: Vec<Profile> = self
            .base
            .db()
            .query("SELECT * FROM profile WHERE is_active = true ORDER BY full_name")
            .await?
            .take(0)?;
        Ok(profiles)
    }

    /// Find profile by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Profile>> {
        let thing = self.base.parse_id(id)?;
        let profile: Option<Profile> = self.base.db().select(thing).await?;
        Ok(profile)
    }

    /// Find profile by email (login lookup)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Profile>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM profile WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let profiles: Vec<Profile> = result.take(0)?;
        Ok(profiles.into_iter().next())
    }

    /// Count active profiles
    pub async fn count_active(&self) -> RepoResult<u64> {
        #[derive(serde::Deserialize)]
        struct Count {
            total: u64,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() as total FROM profile WHERE is_active = true GROUP ALL")
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Create a new profile
    pub async fn create(&self, data: ProfileCreate) -> RepoResult<Profile> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                data.email
            )));
        }

        let hash_pass = Profile::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE profile SET
                    full_name = $full_name,
                    email = $email,
                    hash_pass = $hash_pass,
                    role = $role,
                    work_id = $work_id,
                    department = $department,
                    is_active = true,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("full_name", data.full_name))
            .bind(("email", data.email))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("work_id", data.work_id))
            .bind(("department", data.department))
            .bind(("created_at", shared::util::now_millis()))
            .await?;

        let created: Option<Profile> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create profile".to_string()))
    }

    /// Update the self-editable contact fields, logging in the same transaction
    pub async fn update_contact(
        &self,
        id: &str,
        data: ProfileContactUpdate,
        log: NewActivity,
    ) -> RepoResult<Profile> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Profile {} not found", id)))?;

        let log_content =
            insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE $thing SET
                    phone = IF $has_phone THEN $phone ELSE phone END,
                    address = IF $has_address THEN $address ELSE address END,
                    emergency_contact = IF $has_emergency THEN $emergency_contact ELSE emergency_contact END
                RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", thing))
            .bind(("has_phone", data.phone.is_some()))
            .bind(("phone", data.phone))
            .bind(("has_address", data.address.is_some()))
            .bind(("address", data.address))
            .bind(("has_emergency", data.emergency_contact.is_some()))
            .bind(("emergency_contact", data.emergency_contact))
            .bind(("log", log_content))
            .await?;

        result
            .take::<Option<Profile>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Profile {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityAction;
    use shared::Role;
    use surrealdb::engine::local::Mem;

    async fn repo() -> ProfileRepository {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        ProfileRepository::new(db)
    }

    fn create_payload(email: &str) -> ProfileCreate {
        ProfileCreate {
            full_name: "Jane Smith".into(),
            email: email.into(),
            password: "p4ssword!".into(),
            role: Role::Hr,
            work_id: Some("HR-0001".into()),
            department: None,
        }
    }

    #[tokio::test]
    async fn create_and_find_by_email() {
        let repo = repo().await;
        let created = repo.create(create_payload("jane@example.com")).await.unwrap();
        assert!(created.id.is_some());
        assert!(created.verify_password("p4ssword!").unwrap());

        let found = repo.find_by_email("jane@example.com").await.unwrap().unwrap();
        assert_eq!(found.full_name, "Jane Smith");
        assert_eq!(found.role, Role::Hr);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = repo().await;
        repo.create(create_payload("dup@example.com")).await.unwrap();
        let err = repo.create(create_payload("dup@example.com")).await;
        assert!(matches!(err, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn contact_update_is_partial_and_logged() {
        let repo = repo().await;
        let created = repo.create(create_payload("c@example.com")).await.unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let updated = repo
            .update_contact(
                &id,
                ProfileContactUpdate {
                    phone: Some("555-0100".into()),
                    address: None,
                    emergency_contact: None,
                },
                NewActivity::new(ActivityAction::ProfileUpdated, "profile").entity_id(&id),
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert!(updated.address.is_none());

        // The log row landed in the same transaction
        let mut res = repo
            .base
            .db()
            .query("SELECT count() as total FROM activity_log GROUP ALL")
            .await
            .unwrap();
        let counts: Vec<serde_json::Value> = res.take(0).unwrap();
        assert_eq!(counts[0]["total"], 1);
    }
}
