//! 通知对账
//!
//! 通知视图 = 活动日志 (append-only) ⋈ notification_state (按 scope)。
//! 每个 (日志条目, viewer scope) 一行状态：{read, read_at, deleted,
//! deleted_at}，scope 之间互不干扰。日志行本身永不修改。

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::storage::{ActivityStorage, ActivityStorageError, ActivityStorageResult};
use super::types::{
    ActivityEntry, MarkAllReadOutcome, NotificationFilter, NotificationPatch, NotificationView,
};

/// 默认通知流深度
const FEED_LIMIT: usize = 100;

/// 状态行（反序列化用）
#[derive(Debug, serde::Deserialize)]
struct StateRow {
    log_id: String,
    #[allow(dead_code)]
    scope: String,
    #[serde(default, deserialize_with = "crate::db::models::serde_helpers::bool_false")]
    read: bool,
    #[serde(default, deserialize_with = "crate::db::models::serde_helpers::bool_false")]
    deleted: bool,
}

/// 通知服务：列表、状态补丁、全部已读
#[derive(Clone)]
pub struct NotificationService {
    db: Surreal<Db>,
    storage: ActivityStorage,
}

impl NotificationService {
    pub fn new(db: Surreal<Db>) -> Self {
        let storage = ActivityStorage::new(db.clone());
        Self { db, storage }
    }

    /// 某个 scope 的通知列表（最新在前）
    ///
    /// 排除该 scope 已删除的条目；filter 进一步限定已读/未读。
    /// 一次性序列：结果是查询时刻的快照，刷新需重新查询。
    pub async fn list(
        &self,
        scope: &str,
        filter: NotificationFilter,
    ) -> ActivityStorageResult<Vec<NotificationView>> {
        let entries = self.storage.feed(scope, FEED_LIMIT).await?;

        let states: Vec<StateRow> = self
            .db
            .query("SELECT * FROM notification_state WHERE scope = $scope")
            .bind(("scope", scope.to_string()))
            .await?
            .take(0)?;

        let state_by_log: std::collections::HashMap<String, &StateRow> =
            states.iter().map(|s| (s.log_id.clone(), s)).collect();

        let mut views = Vec::new();
        for entry in &entries {
            let Some(id) = entry.id.as_ref().map(|id| id.to_string()) else {
                continue;
            };
            let state = state_by_log.get(&id);
            if state.map(|s| s.deleted).unwrap_or(false) {
                continue;
            }
            let read = state.map(|s| s.read).unwrap_or(false);
            match filter {
                NotificationFilter::All => {}
                NotificationFilter::Unread if read => continue,
                NotificationFilter::Read if !read => continue,
                _ => {}
            }
            views.push(to_view(entry, &id, read));
        }

        Ok(views)
    }

    /// Upsert (日志条目, scope) 的状态行（浅覆盖）
    ///
    /// 只写补丁给出的字段；时间戳随字段翻转更新。删除是终态：
    /// 不提供恢复 (`deleted = false` 被拒绝)。
    pub async fn patch(
        &self,
        log_id: &str,
        scope: &str,
        patch: &NotificationPatch,
    ) -> ActivityStorageResult<()> {
        let record: RecordId = log_id.parse().map_err(|_| {
            ActivityStorageError::Database(format!("Invalid log id: {}", log_id))
        })?;
        if record.table() != "activity_log" {
            return Err(ActivityStorageError::Database(format!(
                "Not an activity log id: {}",
                log_id
            )));
        }
        if patch.deleted == Some(false) {
            return Err(ActivityStorageError::Database(
                "Notification delete is terminal".to_string(),
            ));
        }

        let now = shared::util::now_millis();
        let mut sets = vec!["log_id = $log_id", "scope = $scope"];
        if patch.read.is_some() {
            sets.push("read = $read");
            sets.push("read_at = $read_at");
        }
        if patch.deleted == Some(true) {
            sets.push("deleted = true");
            sets.push("deleted_at = $deleted_at");
        }

        // 每个 (条目, scope) 一个确定性的状态行主键
        let key = format!("{}_{}", record.key(), scope);
        let sql = format!(
            "UPSERT type::thing('notification_state', $key) SET {}",
            sets.join(", ")
        );

        let mut qb = self
            .db
            .query(sql)
            .bind(("key", key))
            .bind(("log_id", log_id.to_string()))
            .bind(("scope", scope.to_string()));
        if let Some(read) = patch.read {
            qb = qb
                .bind(("read", read))
                .bind(("read_at", read.then_some(now)));
        }
        if patch.deleted == Some(true) {
            qb = qb.bind(("deleted_at", now));
        }
        qb.await?.check()?;

        Ok(())
    }

    /// 顺序标记该 scope 的所有未读通知为已读
    ///
    /// 中途失败即停止；已完成的保持已读，剩余数量和错误如实上报。
    pub async fn mark_all_read(&self, scope: &str) -> ActivityStorageResult<MarkAllReadOutcome> {
        let unread = self.list(scope, NotificationFilter::Unread).await?;
        let ids: Vec<String> = unread.into_iter().map(|view| view.id).collect();
        Ok(self.mark_read_sequence(&ids, scope).await)
    }

    /// 顺序补丁一组条目；首个失败即停止并上报剩余数量
    async fn mark_read_sequence(&self, ids: &[String], scope: &str) -> MarkAllReadOutcome {
        let total = ids.len();
        let mut completed = 0usize;

        for id in ids {
            let patch = NotificationPatch {
                read: Some(true),
                deleted: None,
            };
            match self.patch(id, scope, &patch).await {
                Ok(()) => completed += 1,
                Err(e) => {
                    tracing::warn!(
                        scope = scope,
                        completed = completed,
                        remaining = total - completed,
                        error = %e,
                        "mark_all_read stopped mid-sequence"
                    );
                    return MarkAllReadOutcome {
                        completed,
                        failed: total - completed,
                        error: Some(e.to_string()),
                    };
                }
            }
        }

        MarkAllReadOutcome {
            completed,
            failed: 0,
            error: None,
        }
    }
}

/// 条目 → 视图模型；正文按 message → reason → status → leave_type → "" 回退
fn to_view(entry: &ActivityEntry, id: &str, read: bool) -> NotificationView {
    let body = ["message", "reason", "status", "leave_type"]
        .iter()
        .find_map(|key| entry.details.get(key).and_then(|v| v.as_str()))
        .unwrap_or("")
        .to_string();

    NotificationView {
        id: id.to_string(),
        title: entry.action.title().to_string(),
        body,
        category: entry.action.category(),
        read,
        created_at: entry.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::types::{ActivityAction, NewActivity};
    use surrealdb::engine::local::Mem;

    async fn service() -> NotificationService {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        NotificationService::new(db)
    }

    async fn seed(svc: &NotificationService, n: usize) -> Vec<String> {
        let mut ids = Vec::new();
        for i in 0..n {
            let entry = svc
                .storage
                .append(
                    NewActivity::new(ActivityAction::LeaveApproved, "leave")
                        .details(serde_json::json!({"message": format!("entry {i}")}))
                        .notify_all(),
                )
                .await
                .unwrap();
            ids.push(entry.id.unwrap().to_string());
            // Distinct created_at millis keep newest-first deterministic
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        ids
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filters_are_subsets() {
        let svc = service().await;
        let ids = seed(&svc, 3).await;

        let all = svc.list("hr", NotificationFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);
        // Newest first
        assert_eq!(all[0].id, ids[2]);
        assert_eq!(all[2].id, ids[0]);

        svc.patch(
            &ids[1],
            "hr",
            &NotificationPatch {
                read: Some(true),
                deleted: None,
            },
        )
        .await
        .unwrap();

        let all = svc.list("hr", NotificationFilter::All).await.unwrap();
        let unread = svc.list("hr", NotificationFilter::Unread).await.unwrap();
        let read = svc.list("hr", NotificationFilter::Read).await.unwrap();

        // read and unread partition the full list, preserving order
        assert_eq!(unread.len() + read.len(), all.len());
        for view in &unread {
            assert!(all.iter().any(|v| v.id == view.id));
            assert!(!view.read);
        }
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, ids[1]);
    }

    #[tokio::test]
    async fn patch_then_list_reflects_new_state() {
        let svc = service().await;
        let ids = seed(&svc, 1).await;

        svc.patch(
            &ids[0],
            "admin",
            &NotificationPatch {
                read: Some(true),
                deleted: None,
            },
        )
        .await
        .unwrap();
        let listed = svc.list("admin", NotificationFilter::All).await.unwrap();
        assert!(listed[0].read);

        // read → unread restoration
        svc.patch(
            &ids[0],
            "admin",
            &NotificationPatch {
                read: Some(false),
                deleted: None,
            },
        )
        .await
        .unwrap();
        let listed = svc.list("admin", NotificationFilter::All).await.unwrap();
        assert!(!listed[0].read);
    }

    #[tokio::test]
    async fn scopes_are_isolated() {
        let svc = service().await;
        let ids = seed(&svc, 1).await;

        svc.patch(
            &ids[0],
            "admin",
            &NotificationPatch {
                read: None,
                deleted: Some(true),
            },
        )
        .await
        .unwrap();

        assert!(svc.list("admin", NotificationFilter::All).await.unwrap().is_empty());
        // Other scopes are untouched
        let hr = svc.list("hr", NotificationFilter::All).await.unwrap();
        assert_eq!(hr.len(), 1);
        assert!(!hr[0].read);
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let svc = service().await;
        let ids = seed(&svc, 1).await;

        svc.patch(
            &ids[0],
            "md",
            &NotificationPatch {
                read: None,
                deleted: Some(true),
            },
        )
        .await
        .unwrap();

        let undelete = NotificationPatch {
            read: None,
            deleted: Some(false),
        };
        assert!(svc.patch(&ids[0], "md", &undelete).await.is_err());
    }

    #[tokio::test]
    async fn mark_all_read_marks_everything_when_nothing_fails() {
        let svc = service().await;
        seed(&svc, 4).await;

        let outcome = svc.mark_all_read("supervisor").await.unwrap();
        assert_eq!(outcome.completed, 4);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.error.is_none());

        let unread = svc.list("supervisor", NotificationFilter::Unread).await.unwrap();
        assert!(unread.is_empty());
    }

    #[tokio::test]
    async fn mark_all_read_surfaces_a_mid_sequence_failure() {
        let svc = service().await;
        let ids = seed(&svc, 3).await;

        // A non-log record id makes the second patch fail
        let sequence = vec![ids[0].clone(), "leave:bogus".to_string(), ids[1].clone()];
        let outcome = svc.mark_read_sequence(&sequence, "hr").await;
        assert_eq!(outcome.completed, 1);
        assert_eq!(outcome.failed, 2);
        assert!(outcome.error.is_some());

        // The patch that landed before the stop sticks
        let read = svc.list("hr", NotificationFilter::Read).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].id, ids[0]);
    }

    #[tokio::test]
    async fn body_falls_back_through_detail_keys() {
        let svc = service().await;
        svc.storage
            .append(
                NewActivity::new(ActivityAction::LeaveRejected, "leave")
                    .details(serde_json::json!({"reason": "coverage", "status": "rejected"}))
                    .notify_all(),
            )
            .await
            .unwrap();
        svc.storage
            .append(
                NewActivity::new(ActivityAction::ClockIn, "attendance")
                    .details(serde_json::json!({}))
                    .notify_all(),
            )
            .await
            .unwrap();

        let views = svc.list("employee", NotificationFilter::All).await.unwrap();
        let bodies: Vec<&str> = views.iter().map(|v| v.body.as_str()).collect();
        assert!(bodies.contains(&"coverage"));
        assert!(bodies.contains(&""));
    }
}
