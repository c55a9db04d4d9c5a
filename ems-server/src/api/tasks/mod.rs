//! Task API Module
//!
//! 主管建任务并指派给若干员工；员工提交，主管裁决。指派与裁决都
//! 追加面向受让人工号的活动条目。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/tasks | POST | 创建并指派任务 | supervisor |
//! | /api/tasks | GET | 本人名下任务 | supervisor |
//! | /api/tasks/{id}/assignees | GET | 任务受让人列表 | supervisor |
//! | /api/tasks/assignees/{id}/verdict | POST | 主管裁决 | supervisor |
//! | /api/tasks/me | GET | 指派给我的任务 | 任意 |
//! | /api/tasks/assignees/{id}/submit | POST | 员工提交 | 任意 |

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Task router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tasks", routes())
}

fn routes() -> Router<ServerState> {
    let assignee_routes = Router::new()
        .route("/me", get(handler::my_tasks))
        .route("/assignees/{id}/submit", post(handler::submit));

    let supervisor_routes = Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/{id}/assignees", get(handler::assignees))
        .route("/assignees/{id}/verdict", post(handler::verdict))
        .layer(middleware::from_fn(require_roles(&[Role::Supervisor])));

    assignee_routes.merge(supervisor_routes)
}
