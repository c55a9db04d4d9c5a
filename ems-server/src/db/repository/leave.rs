//! Leave Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::activity::storage::insert_content;
use crate::activity::types::NewActivity;
use crate::db::models::{LeaveRequest, LeaveRequestCreate, LeaveStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct LeaveRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct Count {
    total: u64,
}

impl LeaveRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All requests, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<LeaveRequest>> {
        let rows: Vec<LeaveRequest> = self
            .base
            .db()
            .query("SELECT * FROM leave ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// One user's requests, newest first
    pub async fn find_for_user(&self, user: &str) -> RepoResult<Vec<LeaveRequest>> {
        let user_thing = self.base.parse_id(user)?;
        let rows: Vec<LeaveRequest> = self
            .base
            .db()
            .query("SELECT * FROM leave WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_thing))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Find request by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<LeaveRequest>> {
        let thing = self.base.parse_id(id)?;
        let row: Option<LeaveRequest> = self.base.db().select(thing).await?;
        Ok(row)
    }

    /// Pending request count
    pub async fn pending_count(&self) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() as total FROM leave WHERE status = 'pending' GROUP ALL")
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Rows overlapping a given ISO date with one of the given statuses.
    ///
    /// ISO date strings compare lexicographically, so the overlap test is
    /// plain string comparison.
    pub async fn overlapping_date(
        &self,
        date: &str,
        statuses: &[LeaveStatus],
    ) -> RepoResult<Vec<LeaveRequest>> {
        let status_strs: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
        let rows: Vec<LeaveRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM leave WHERE start_date <= $date AND end_date >= $date \
                 AND status IN $statuses",
            )
            .bind(("date", date.to_string()))
            .bind(("statuses", status_strs))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Approved rows overlapping a calendar year for one user
    pub async fn approved_in_year(&self, user: &str, year: i32) -> RepoResult<Vec<LeaveRequest>> {
        let user_thing = self.base.parse_id(user)?;
        let rows: Vec<LeaveRequest> = self
            .base
            .db()
            .query(
                "SELECT * FROM leave WHERE user = $user AND status = 'approved' \
                 AND start_date <= $year_end AND end_date >= $year_start",
            )
            .bind(("user", user_thing))
            .bind(("year_start", format!("{year}-01-01")))
            .bind(("year_end", format!("{year}-12-31")))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Create a pending request, logging in the same transaction
    pub async fn create(
        &self,
        user: &str,
        data: LeaveRequestCreate,
        log: NewActivity,
    ) -> RepoResult<LeaveRequest> {
        let user_thing = self.base.parse_id(user)?;
        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE leave SET
                    user = $user,
                    leave_type = $leave_type,
                    start_date = $start_date,
                    end_date = $end_date,
                    reason = $reason,
                    status = 'pending',
                    decided_by = NONE,
                    decided_at = NONE,
                    created_at = $created_at
                RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("user", user_thing))
            .bind(("leave_type", data.leave_type))
            .bind(("start_date", data.start_date))
            .bind(("end_date", data.end_date))
            .bind(("reason", data.reason))
            .bind(("created_at", shared::util::now_millis()))
            .bind(("log", log_content))
            .await?;

        let created: Option<LeaveRequest> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create leave request".to_string()))
    }

    /// Record a decision on a pending request, logging in the same
    /// transaction. Only pending requests can be decided.
    pub async fn decide(
        &self,
        id: &str,
        status: LeaveStatus,
        decided_by: &str,
        log: NewActivity,
    ) -> RepoResult<LeaveRequest> {
        if status == LeaveStatus::Pending {
            return Err(RepoError::Validation(
                "Decision must be approved or rejected".to_string(),
            ));
        }
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave request {} not found", id)))?;
        if existing.status != LeaveStatus::Pending {
            return Err(RepoError::Validation(format!(
                "Leave request already {}",
                existing.status.as_str()
            )));
        }

        let thing = self.base.parse_id(id)?;
        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE $thing SET
                    status = $status,
                    decided_by = $decided_by,
                    decided_at = $decided_at
                RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("decided_by", decided_by.to_string()))
            .bind(("decided_at", shared::util::now_millis()))
            .bind(("log", log_content))
            .await?;

        result
            .take::<Option<LeaveRequest>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Leave request {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityAction;
    use crate::db::models::ProfileCreate;
    use crate::db::repository::ProfileRepository;
    use shared::Role;
    use surrealdb::engine::local::Mem;

    async fn setup() -> (LeaveRepository, String) {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        let profiles = ProfileRepository::new(db.clone());
        let profile = profiles
            .create(ProfileCreate {
                full_name: "Worker".into(),
                email: "w@example.com".into(),
                password: "pw-pw-pw".into(),
                role: Role::Employee,
                work_id: Some("EMP-0001".into()),
                department: None,
            })
            .await
            .unwrap();
        (LeaveRepository::new(db), profile.id.unwrap().to_string())
    }

    fn log() -> NewActivity {
        NewActivity::new(ActivityAction::LeaveRequested, "leave")
    }

    fn request(start: &str, end: &str) -> LeaveRequestCreate {
        LeaveRequestCreate {
            leave_type: "annual".into(),
            start_date: start.into(),
            end_date: end.into(),
            reason: "family visit".into(),
        }
    }

    #[tokio::test]
    async fn create_starts_pending() {
        let (repo, user) = setup().await;
        let created = repo
            .create(&user, request("2026-03-16", "2026-03-20"), log())
            .await
            .unwrap();
        assert_eq!(created.status, LeaveStatus::Pending);
        assert_eq!(repo.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn decide_records_metadata_and_is_single_shot() {
        let (repo, user) = setup().await;
        let created = repo
            .create(&user, request("2026-03-16", "2026-03-20"), log())
            .await
            .unwrap();
        let id = created.id.as_ref().unwrap().to_string();

        let approved = repo
            .decide(&id, LeaveStatus::Approved, "profile:boss", log())
            .await
            .unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.decided_by.as_deref(), Some("profile:boss"));
        assert!(approved.decided_at.is_some());

        // Already decided
        let err = repo
            .decide(&id, LeaveStatus::Rejected, "profile:boss", log())
            .await;
        assert!(matches!(err, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn overlap_queries_use_date_strings() {
        let (repo, user) = setup().await;
        let created = repo
            .create(&user, request("2026-03-16", "2026-03-20"), log())
            .await
            .unwrap();
        let id = created.id.as_ref().unwrap().to_string();
        repo.decide(&id, LeaveStatus::Approved, "profile:boss", log())
            .await
            .unwrap();

        let on_date = repo
            .overlapping_date("2026-03-18", &[LeaveStatus::Approved])
            .await
            .unwrap();
        assert_eq!(on_date.len(), 1);

        let off_date = repo
            .overlapping_date("2026-03-21", &[LeaveStatus::Approved])
            .await
            .unwrap();
        assert!(off_date.is_empty());

        let in_year = repo.approved_in_year(&user, 2026).await.unwrap();
        assert_eq!(in_year.len(), 1);
        assert!(repo.approved_in_year(&user, 2025).await.unwrap().is_empty());
    }
}
