//! 活动日志模块 — append-only 活动追踪 + 通知对账
//!
//! # 架构
//!
//! ```text
//! 受限操作触发
//!   ├─ 单条实体变更: repository 事务内 CREATE activity_log (同一事务)
//!   └─ 独立事件 (登录等): ActivityStorage::append → SurrealDB (activity_log 表)
//!
//! 通知视图 = activity_log ⋈ notification_state (按 viewer scope 对账)
//! ```
//!
//! # 约束
//!
//! - **Append-only**: 日志行无删除/更新接口
//! - **Per-scope 隔离**: 已读/已删状态存在独立的 notification_state 表，
//!   每个 (日志条目, scope) 一行，scope 之间互不干扰
//! - **mark_all_read 顺序执行**: 中途失败接受部分完成并如实上报

pub mod notifications;
pub mod storage;
pub mod types;

pub use notifications::NotificationService;
pub use storage::{ActivityStorage, ActivityStorageError};
pub use types::{
    ActivityAction, ActivityEntry, ActivityListResponse, ActivityQuery, MarkAllReadOutcome,
    NewActivity, NotificationFilter, NotificationPatch, NotificationView,
};
