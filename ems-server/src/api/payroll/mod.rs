//! Payroll API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/payroll/me | GET | 本人薪资记录 | 任意 |
//! | /api/payroll | GET | 全部薪资记录 | admin / hr |
//! | /api/payroll/generate | POST | 按期批量生成 | admin / hr |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Payroll router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payroll", routes())
}

fn routes() -> Router<ServerState> {
    let self_routes = Router::new().route("/me", get(handler::my_records));

    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/generate", post(handler::generate))
        .layer(middleware::from_fn(require_roles(&[Role::Admin, Role::Hr])));

    self_routes.merge(manage_routes)
}
