//! 活动日志 SurrealDB 存储层
//!
//! Append-only 设计，没有任何删除/更新接口。
//! 单条实体变更的日志行由 repository 在同一事务内插入
//! ([`insert_content`] 构造内容)；独立事件走 [`ActivityStorage::append`]。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use super::types::{ActivityEntry, ActivityQuery, NewActivity};
use crate::utils::AppError;

/// 存储错误
#[derive(Debug, Error)]
pub enum ActivityStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<surrealdb::Error> for ActivityStorageError {
    fn from(err: surrealdb::Error) -> Self {
        ActivityStorageError::Database(err.to_string())
    }
}

impl From<ActivityStorageError> for AppError {
    fn from(err: ActivityStorageError) -> Self {
        AppError::database(err.to_string())
    }
}

pub type ActivityStorageResult<T> = Result<T, ActivityStorageError>;

/// COUNT 结果
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

/// 构造插入内容：补充 created_at 和派生的 category 列
///
/// repository 在实体写入事务内绑定该内容执行
/// `CREATE activity_log CONTENT $log`，保证实体变更与日志同生共死。
pub fn insert_content(entry: NewActivity) -> ActivityStorageResult<serde_json::Value> {
    let category = entry.action.category();
    let mut value = serde_json::to_value(&entry)?;
    if let Some(map) = value.as_object_mut() {
        map.insert(
            "created_at".to_string(),
            serde_json::json!(shared::util::now_millis()),
        );
        map.insert("category".to_string(), serde_json::json!(category));
    }
    Ok(value)
}

/// 活动日志存储 (SurrealDB)
///
/// Append-only 设计：仅提供 `append` 和查询方法，没有 delete/update 接口。
#[derive(Clone)]
pub struct ActivityStorage {
    db: Surreal<Db>,
}

impl ActivityStorage {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// 追加一条活动日志（独立事件：登录、重置密码等）
    pub async fn append(&self, entry: NewActivity) -> ActivityStorageResult<ActivityEntry> {
        let content = insert_content(entry)?;
        let mut res = self
            .db
            .query("CREATE activity_log CONTENT $data")
            .bind(("data", content))
            .await?;
        let created: Vec<ActivityEntry> = res.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| ActivityStorageError::Database("Failed to append entry".to_string()))
    }

    /// 查询活动日志（审计表）
    pub async fn query(&self, q: &ActivityQuery) -> ActivityStorageResult<(Vec<ActivityEntry>, u64)> {
        let mut conditions = Vec::new();

        if q.from.is_some() {
            conditions.push("created_at >= $from");
        }
        if q.to.is_some() {
            conditions.push("created_at <= $to");
        }
        if q.category.is_some() {
            conditions.push("category = $category");
        }
        if q.actor.is_some() {
            conditions.push("actor = $actor");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!(
            "SELECT count() as total FROM activity_log{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT * FROM activity_log{} ORDER BY created_at DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.db.query(&sql);

        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }
        if let Some(ref category) = q.category {
            qb = qb.bind(("category", category.clone()));
        }
        if let Some(ref actor) = q.actor {
            qb = qb.bind(("actor", actor.clone()));
        }

        let mut result = qb.await?;
        let counts: Vec<CountResult> = result.take(0)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);
        let items: Vec<ActivityEntry> = result.take(1)?;

        Ok((items, total))
    }

    /// 某个 viewer scope 的通知流条目（最新在前）
    ///
    /// 条目可见当且仅当 notify_all 为真，或 audience 包含该 scope。
    pub async fn feed(&self, scope: &str, limit: usize) -> ActivityStorageResult<Vec<ActivityEntry>> {
        let entries: Vec<ActivityEntry> = self
            .db
            .query(
                "SELECT * FROM activity_log \
                 WHERE notify_all = true OR audience CONTAINS $scope \
                 ORDER BY created_at DESC LIMIT $limit",
            )
            .bind(("scope", scope.to_string()))
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::ActivityAction;
    use surrealdb::engine::local::Mem;

    async fn mem_db() -> Surreal<Db> {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        db
    }

    #[tokio::test]
    async fn append_and_query_roundtrip() {
        let storage = ActivityStorage::new(mem_db().await);

        let entry = storage
            .append(
                NewActivity::new(ActivityAction::EmployeeCreated, "employee")
                    .actor("profile:a1", "Admin One")
                    .entity_id("employee:e1")
                    .details(serde_json::json!({"message": "Welcome"}))
                    .notify_all(),
            )
            .await
            .unwrap();
        assert!(entry.id.is_some());
        assert!(entry.notify_all);

        let (items, total) = storage.query(&ActivityQuery::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].actor_name, "Admin One");
    }

    #[tokio::test]
    async fn category_filter_applies() {
        let storage = ActivityStorage::new(mem_db().await);
        storage
            .append(NewActivity::new(ActivityAction::LoginSuccess, "profile"))
            .await
            .unwrap();
        storage
            .append(NewActivity::new(ActivityAction::LeaveApproved, "leave"))
            .await
            .unwrap();

        let q = ActivityQuery {
            category: Some("leave".to_string()),
            ..Default::default()
        };
        let (items, total) = storage.query(&q).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].action, ActivityAction::LeaveApproved);
    }

    #[tokio::test]
    async fn feed_filters_by_scope() {
        let storage = ActivityStorage::new(mem_db().await);
        storage
            .append(NewActivity::new(ActivityAction::PayrollGenerated, "payroll").notify_all())
            .await
            .unwrap();
        storage
            .append(
                NewActivity::new(ActivityAction::TaskAssigned, "task")
                    .audience(vec!["EMP-0001".to_string()]),
            )
            .await
            .unwrap();

        let broadcast_only = storage.feed("hr", 50).await.unwrap();
        assert_eq!(broadcast_only.len(), 1);

        let assignee = storage.feed("EMP-0001", 50).await.unwrap();
        assert_eq!(assignee.len(), 2);
    }
}
