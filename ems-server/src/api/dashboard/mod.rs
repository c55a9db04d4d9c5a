//! Dashboard API Module
//!
//! 每个角色一个端点；端点内各子查询用 `tokio::join!` 并发执行，
//! 单个子查询失败只降级对应卡片 (None)，不影响同级。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 角色 |
//! |------|------|------|
//! | /api/dashboards/admin | GET | admin |
//! | /api/dashboards/hr | GET | hr |
//! | /api/dashboards/md | GET | md |
//! | /api/dashboards/supervisor | GET | supervisor |
//! | /api/dashboards/employee | GET | 任意 |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Dashboard router
pub fn router() -> Router<ServerState> {
    let admin = Router::new()
        .route("/admin", get(handler::admin))
        .layer(middleware::from_fn(require_roles(&[Role::Admin])));
    let hr = Router::new()
        .route("/hr", get(handler::hr))
        .layer(middleware::from_fn(require_roles(&[Role::Hr])));
    let md = Router::new()
        .route("/md", get(handler::md))
        .layer(middleware::from_fn(require_roles(&[Role::Md])));
    let supervisor = Router::new()
        .route("/supervisor", get(handler::supervisor))
        .layer(middleware::from_fn(require_roles(&[Role::Supervisor])));
    let employee = Router::new().route("/employee", get(handler::employee));

    Router::new().nest(
        "/api/dashboards",
        admin.merge(hr).merge(md).merge(supervisor).merge(employee),
    )
}
