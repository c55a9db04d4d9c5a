//! Payroll Repository
//!
//! Batch generation walks active profiles sequentially; a user that
//! already has a record for the period is skipped. Mid-batch failure
//! leaves the earlier records committed.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{PayrollGenerateRequest, PayrollRecord, Profile};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PayrollRepository {
    base: BaseRepository,
}

#[derive(serde::Deserialize)]
struct Count {
    total: u64,
}

/// Batch generation outcome: counts plus the error that stopped the batch
#[derive(Debug, serde::Serialize)]
pub struct PayrollBatchOutcome {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PayrollRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All records, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<PayrollRecord>> {
        let rows: Vec<PayrollRecord> = self
            .base
            .db()
            .query("SELECT * FROM payroll ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// One user's records, newest first
    pub async fn find_for_user(&self, user: &str) -> RepoResult<Vec<PayrollRecord>> {
        let user_thing = self.base.parse_id(user)?;
        let rows: Vec<PayrollRecord> = self
            .base
            .db()
            .query("SELECT * FROM payroll WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user_thing))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Does this user already have a record for the period?
    pub async fn exists_for_period(&self, user: &RecordId, period_start: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() as total FROM payroll \
                 WHERE user = $user AND period_start = $period_start GROUP ALL",
            )
            .bind(("user", user.clone()))
            .bind(("period_start", period_start.to_string()))
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0) > 0)
    }

    /// Records created within [from, to) millis
    pub async fn count_created_between(&self, from: i64, to: i64) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT count() as total FROM payroll \
                 WHERE created_at >= $from AND created_at < $to GROUP ALL",
            )
            .bind(("from", from))
            .bind(("to", to))
            .await?;
        let counts: Vec<Count> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Insert one record (net pay computed here)
    async fn insert(
        &self,
        user: RecordId,
        req: &PayrollGenerateRequest,
    ) -> RepoResult<PayrollRecord> {
        let net_pay = req.basic_salary + req.allowances - req.deductions;
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE payroll SET
                    user = $user,
                    period_start = $period_start,
                    period_end = $period_end,
                    basic_salary = $basic_salary,
                    allowances = $allowances,
                    deductions = $deductions,
                    net_pay = $net_pay,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("user", user))
            .bind(("period_start", req.period_start.clone()))
            .bind(("period_end", req.period_end.clone()))
            .bind(("basic_salary", req.basic_salary))
            .bind(("allowances", req.allowances))
            .bind(("deductions", req.deductions))
            .bind(("net_pay", net_pay))
            .bind(("created_at", shared::util::now_millis()))
            .await?;

        let created: Option<PayrollRecord> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create payroll record".to_string()))
    }

    /// Generate records for all given profiles, sequentially.
    ///
    /// Users with an existing (user, period) record are skipped. A failure
    /// stops the batch; earlier records stay committed and the outcome
    /// reports completed/failed counts.
    pub async fn generate_batch(
        &self,
        profiles: &[Profile],
        req: &PayrollGenerateRequest,
    ) -> RepoResult<PayrollBatchOutcome> {
        let mut generated = 0usize;
        let mut skipped = 0usize;

        for (i, profile) in profiles.iter().enumerate() {
            let Some(user) = profile.id.clone() else {
                skipped += 1;
                continue;
            };
            match self.exists_for_period(&user, &req.period_start).await {
                Ok(true) => {
                    skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    return Ok(PayrollBatchOutcome {
                        generated,
                        skipped,
                        failed: profiles.len() - i,
                        error: Some(e.to_string()),
                    });
                }
            }
            if let Err(e) = self.insert(user, req).await {
                return Ok(PayrollBatchOutcome {
                    generated,
                    skipped,
                    failed: profiles.len() - i,
                    error: Some(e.to_string()),
                });
            }
            generated += 1;
        }

        Ok(PayrollBatchOutcome {
            generated,
            skipped,
            failed: 0,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ProfileCreate;
    use crate::db::repository::ProfileRepository;
    use shared::Role;
    use surrealdb::engine::local::Mem;

    async fn setup(n: usize) -> (PayrollRepository, Vec<Profile>) {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        let profiles_repo = ProfileRepository::new(db.clone());
        let mut profiles = Vec::new();
        for i in 0..n {
            profiles.push(
                profiles_repo
                    .create(ProfileCreate {
                        full_name: format!("Worker {i}"),
                        email: format!("w{i}@example.com"),
                        password: "pw-pw-pw".into(),
                        role: Role::Employee,
                        work_id: Some(format!("EMP{:04}", i + 1)),
                        department: None,
                    })
                    .await
                    .unwrap(),
            );
        }
        (PayrollRepository::new(db), profiles)
    }

    fn request() -> PayrollGenerateRequest {
        PayrollGenerateRequest {
            period_start: "2026-08-01".into(),
            period_end: "2026-08-31".into(),
            basic_salary: 3000.0,
            allowances: 250.0,
            deductions: 100.0,
        }
    }

    #[tokio::test]
    async fn batch_computes_net_pay() {
        let (repo, profiles) = setup(2).await;
        let outcome = repo.generate_batch(&profiles, &request()).await.unwrap();
        assert_eq!(outcome.generated, 2);
        assert_eq!(outcome.skipped, 0);

        let rows = repo.find_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| (r.net_pay - 3150.0).abs() < f64::EPSILON));
    }

    #[tokio::test]
    async fn rerun_skips_existing_period_records() {
        let (repo, profiles) = setup(2).await;
        repo.generate_batch(&profiles, &request()).await.unwrap();

        let outcome = repo.generate_batch(&profiles, &request()).await.unwrap();
        assert_eq!(outcome.generated, 0);
        assert_eq!(outcome.skipped, 2);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }
}
