//! Notification API Module
//!
//! Viewer scope 由身份推导：管理角色使用角色名 (角色仪表盘共享一份
//! 状态)，employee 使用工号。每个 (日志条目, scope) 的已读/删除状态
//! 互相隔离。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/notifications | GET | 通知列表 (?filter=all\|unread\|read) | JWT |
//! | /api/notifications/{id} | PATCH | 更新单条状态 (read / deleted) | JWT |
//! | /api/notifications/mark-all-read | POST | 顺序全部标记已读 | JWT |

mod handler;

use axum::{Router, routing::get, routing::patch, routing::post};

use crate::core::ServerState;

/// Notification router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", patch(handler::patch_one))
        .route("/mark-all-read", post(handler::mark_all_read))
}
