//! Leave API Module
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/leaves | POST | 提交请假申请 | 任意 |
//! | /api/leaves/me | GET | 本人申请列表 | 任意 |
//! | /api/leaves | GET | 全部申请列表 | admin / hr / md |
//! | /api/leaves/{id}/approve | POST | 批准 | admin / hr / md |
//! | /api/leaves/{id}/reject | POST | 驳回 | admin / hr / md |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Leave router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/leaves", routes())
}

fn routes() -> Router<ServerState> {
    let self_routes = Router::new()
        .route("/", post(handler::create))
        .route("/me", get(handler::my_requests));

    let approval_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .layer(middleware::from_fn(require_roles(&[
            Role::Admin,
            Role::Hr,
            Role::Md,
        ])));

    self_routes.merge(approval_routes)
}
