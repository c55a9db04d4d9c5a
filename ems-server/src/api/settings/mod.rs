//! Settings API Module
//!
//! 系统配置查找表：职位、假期类型、工时、节假日。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/settings/job-roles | GET / POST | 职位 | 读任意，写 admin/hr |
//! | /api/settings/job-roles/{id} | DELETE | 职位删除 | admin / hr |
//! | /api/settings/leave-types | GET / POST | 假期类型 | 读任意，写 admin/hr |
//! | /api/settings/leave-types/{id} | DELETE | 假期类型删除 | admin / hr |
//! | /api/settings/working-hours | GET / POST | 工时 | 读任意，写 admin/hr |
//! | /api/settings/working-hours/{id} | DELETE | 工时删除 | admin / hr |
//! | /api/settings/holidays | GET / POST | 节假日 | 读任意，写 admin/hr |
//! | /api/settings/holidays/{id} | DELETE | 节假日删除 | admin / hr |

mod handler;

use axum::{Router, middleware, routing::delete, routing::get, routing::post};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Settings router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/settings", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/job-roles", get(handler::list_job_roles))
        .route("/leave-types", get(handler::list_leave_types))
        .route("/working-hours", get(handler::list_working_hours))
        .route("/holidays", get(handler::list_holidays));

    let manage_routes = Router::new()
        .route("/job-roles", post(handler::create_job_role))
        .route("/job-roles/{id}", delete(handler::delete_job_role))
        .route("/leave-types", post(handler::create_leave_type))
        .route("/leave-types/{id}", delete(handler::delete_leave_type))
        .route("/working-hours", post(handler::create_working_hours))
        .route("/working-hours/{id}", delete(handler::delete_working_hours))
        .route("/holidays", post(handler::create_holiday))
        .route("/holidays/{id}", delete(handler::delete_holiday))
        .layer(middleware::from_fn(require_roles(&[Role::Admin, Role::Hr])));

    read_routes.merge(manage_routes)
}
