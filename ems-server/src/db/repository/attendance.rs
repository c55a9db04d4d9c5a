//! Attendance Repository
//!
//! Clock-in opens a record, clock-out closes the latest open one.
//! "At most one open record per user" is a pre-insert check, not a
//! constraint the store enforces.

use super::{BaseRepository, RepoError, RepoResult};
use crate::activity::storage::insert_content;
use crate::activity::types::NewActivity;
use crate::db::models::AttendanceRecord;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct AttendanceRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct Count {
    total: u64,
}

impl AttendanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// The user's open record (clock_out = null), if any
    pub async fn open_record(&self, user: &str) -> RepoResult<Option<AttendanceRecord>> {
        let user_thing = self.base.parse_id(user)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM attendance WHERE user = $user AND clock_out = NONE \
                 ORDER BY clock_in DESC LIMIT 1",
            )
            .bind(("user", user_thing))
            .await?;
        let records: Vec<AttendanceRecord> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// Clock in: create an open record, logging in the same transaction
    pub async fn clock_in(
        &self,
        user: &str,
        now_millis: i64,
        log: NewActivity,
    ) -> RepoResult<AttendanceRecord> {
        if self.open_record(user).await?.is_some() {
            return Err(RepoError::Validation(
                "Already clocked in; clock out first".to_string(),
            ));
        }

        let user_thing = self.base.parse_id(user)?;
        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE attendance SET
                    user = $user,
                    clock_in = $clock_in,
                    clock_out = NONE
                RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("user", user_thing))
            .bind(("clock_in", now_millis))
            .bind(("log", log_content))
            .await?;

        let created: Option<AttendanceRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to clock in".to_string()))
    }

    /// Clock out: close the latest open record, logging in the same
    /// transaction. Errors if no open record exists.
    pub async fn clock_out(
        &self,
        user: &str,
        now_millis: i64,
        log: NewActivity,
    ) -> RepoResult<AttendanceRecord> {
        let open = self
            .open_record(user)
            .await?
            .ok_or_else(|| RepoError::Validation("No open attendance record".to_string()))?;
        let record_id = open
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Open record has no id".to_string()))?;

        let log_content = insert_content(log).map_err(|e| RepoError::Database(e.to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE $thing SET clock_out = $clock_out RETURN AFTER;
                CREATE activity_log CONTENT $log;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", record_id))
            .bind(("clock_out", now_millis))
            .bind(("log", log_content))
            .await?;

        result
            .take::<Option<AttendanceRecord>>(0)?
            .ok_or_else(|| RepoError::Database("Failed to clock out".to_string()))
    }

    /// All records with clock_in inside [from, to)
    pub async fn find_between(&self, from: i64, to: i64) -> RepoResult<Vec<AttendanceRecord>> {
        let records: Vec<AttendanceRecord> = self
            .base
            .db()
            .query(
                "SELECT * FROM attendance WHERE clock_in >= $from AND clock_in < $to \
                 ORDER BY clock_in DESC",
            )
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// One user's records, newest first
    pub async fn find_for_user(&self, user: &str, limit: usize) -> RepoResult<Vec<AttendanceRecord>> {
        let user_thing = self.base.parse_id(user)?;
        let records: Vec<AttendanceRecord> = self
            .base
            .db()
            .query(
                "SELECT * FROM attendance WHERE user = $user \
                 ORDER BY clock_in DESC LIMIT $limit",
            )
            .bind(("user", user_thing))
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(records)
    }

    /// Distinct users with a record inside [from, to) ("present" count)
    pub async fn present_count(&self, from: i64, to: i64) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() as total FROM \
                 (SELECT user FROM attendance WHERE clock_in >= $from AND clock_in < $to \
                  GROUP BY user) GROUP ALL",
            )
            .bind(("from", from))
            .bind(("to", to))
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityAction;
    use crate::db::models::{Profile, ProfileCreate};
    use crate::db::repository::ProfileRepository;
    use shared::Role;
    use surrealdb::engine::local::Mem;

    async fn setup() -> (AttendanceRepository, String) {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();

        let profiles = ProfileRepository::new(db.clone());
        let profile: Profile = profiles
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

        (
            AttendanceRepository::new(db),
            profile.id.unwrap().to_string(),
        )
    }

    fn log(action: ActivityAction) -> NewActivity {
        NewActivity::new(action, "attendance")
    }

    #[tokio::test]
    async fn clock_in_then_out() {
        let (repo, user) = setup().await;

        let opened = repo
            .clock_in(&user, 1_000, log(ActivityAction::ClockIn))
            .await
            .unwrap();
        assert!(opened.clock_out.is_none());
        assert!(repo.open_record(&user).await.unwrap().is_some());

        let closed = repo
            .clock_out(&user, 9_000, log(ActivityAction::ClockOut))
            .await
            .unwrap();
        assert_eq!(closed.clock_out, Some(9_000));
        assert!(repo.open_record(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn double_clock_in_is_rejected() {
        let (repo, user) = setup().await;
        repo.clock_in(&user, 1_000, log(ActivityAction::ClockIn))
            .await
            .unwrap();
        let err = repo.clock_in(&user, 2_000, log(ActivityAction::ClockIn)).await;
        assert!(matches!(err, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn clock_out_without_open_record_is_rejected() {
        let (repo, user) = setup().await;
        let err = repo.clock_out(&user, 2_000, log(ActivityAction::ClockOut)).await;
        assert!(matches!(err, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn present_counts_distinct_users() {
        let (repo, user) = setup().await;
        repo.clock_in(&user, 1_000, log(ActivityAction::ClockIn))
            .await
            .unwrap();
        repo.clock_out(&user, 2_000, log(ActivityAction::ClockOut))
            .await
            .unwrap();
        repo.clock_in(&user, 3_000, log(ActivityAction::ClockIn))
            .await
            .unwrap();

        // Two records, one user
        assert_eq!(repo.find_between(0, 10_000).await.unwrap().len(), 2);
        assert_eq!(repo.present_count(0, 10_000).await.unwrap(), 1);
        assert_eq!(repo.present_count(5_000, 10_000).await.unwrap(), 0);
    }
}
