//! 个人资料路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/profile/contact | PUT | 更新联系方式 (仅本人) | JWT |

mod handler;

use axum::{Router, routing::put};

use crate::core::ServerState;

/// 个人资料路由
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/profile/contact", put(handler::update_contact))
}
