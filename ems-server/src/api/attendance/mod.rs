//! Attendance API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/attendance/clock-in | POST | 上班打卡 | 任意 |
//! | /api/attendance/clock-out | POST | 下班打卡 | 任意 |
//! | /api/attendance/me | GET | 本人近期记录 | 任意 |
//! | /api/attendance/today | GET | 今日全员记录 | admin / hr / md |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Attendance router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    let self_routes = Router::new()
        .route("/clock-in", post(handler::clock_in))
        .route("/clock-out", post(handler::clock_out))
        .route("/me", get(handler::my_records));

    let oversight_routes = Router::new()
        .route("/today", get(handler::today))
        .layer(middleware::from_fn(require_roles(&[
            Role::Admin,
            Role::Hr,
            Role::Md,
        ])));

    self_routes.merge(oversight_routes)
}
