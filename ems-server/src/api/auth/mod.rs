//! 认证路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/auth/login | POST | 登录 (邮箱+密码+工号) | 无 |
//! | /api/auth/password-reset | POST | 请求重置密码 | 无 |
//! | /api/auth/me | GET | 当前用户资料 | JWT |
//! | /api/auth/logout | POST | 登出 (无状态确认) | JWT |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

/// 认证路由
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/password-reset", post(handler::password_reset))
        .route("/me", get(handler::me))
        .route("/logout", post(handler::logout))
}
