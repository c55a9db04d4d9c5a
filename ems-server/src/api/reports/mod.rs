//! Reports API Module
//!
//! CSV 导出：所有字段加引号，内嵌引号翻倍，首行表头。服务端不留存。
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 角色 |
//! |------|------|------|------|
//! | /api/reports/attendance/csv | GET | 考勤导出 | admin / hr / md |
//! | /api/reports/leaves/csv | GET | 请假导出 | admin / hr / md |
//! | /api/reports/payroll/csv | GET | 薪资导出 | admin / hr / md |

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_roles;
use crate::core::ServerState;
use shared::Role;

/// Reports router
pub fn router() -> Router<ServerState> {
    Router::new()
        .nest(
            "/api/reports",
            Router::new()
                .route("/attendance/csv", get(handler::attendance_csv))
                .route("/leaves/csv", get(handler::leaves_csv))
                .route("/payroll/csv", get(handler::payroll_csv)),
        )
        .layer(middleware::from_fn(require_roles(&[
            Role::Admin,
            Role::Hr,
            Role::Md,
        ])))
}
