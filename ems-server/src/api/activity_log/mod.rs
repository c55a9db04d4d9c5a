//! Activity Log API Module
//!
//! 审计表查询：时间窗 / 分类 / 操作人过滤，分页，行附加季度桶。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/activity-log | GET | 审计日志查询 | admin / hr / md |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Activity log router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/activity-log", get(handler::query))
        .layer(middleware::from_fn(require_roles(&[
            Role::Admin,
            Role::Hr,
            Role::Md,
        ])))
}
