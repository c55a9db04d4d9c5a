//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录 / 会话接口
//! - [`profile`] - 个人资料 (联系方式自助编辑)
//! - [`employees`] - 员工管理接口
//! - [`departments`] - 部门管理接口
//! - [`attendance`] - 考勤打卡接口
//! - [`leaves`] - 请假申请与审批接口
//! - [`payroll`] - 薪资记录与批量生成接口
//! - [`notifications`] - 通知对账接口
//! - [`activity_log`] - 审计日志查询接口
//! - [`dashboard`] - 角色仪表盘接口
//! - [`settings`] - 系统配置 (职位/假期类型/工时/节假日)
//! - [`tasks`] - 主管任务指派接口
//! - [`reports`] - CSV 导出接口

pub mod render;

pub mod auth;
pub mod health;
pub mod profile;

// Data models API
pub mod activity_log;
pub mod attendance;
pub mod dashboard;
pub mod departments;
pub mod employees;
pub mod leaves;
pub mod notifications;
pub mod payroll;
pub mod reports;
pub mod settings;
pub mod tasks;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build the fully configured application router
///
/// 所有子路由合并后统一套认证中间件；公共路径 (`/api/health`,
/// `/api/auth/login`, `/api/auth/password-reset`) 由中间件自身放行。
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(profile::router())
        .merge(employees::router())
        .merge(departments::router())
        .merge(attendance::router())
        .merge(leaves::router())
        .merge(payroll::router())
        .merge(notifications::router())
        .merge(activity_log::router())
        .merge(dashboard::router())
        .merge(settings::router())
        .merge(tasks::router())
        .merge(reports::router())
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // JWT authentication - injects CurrentUser before routes run
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use http::{Request, StatusCode, header};
    use surrealdb::Surreal;
    use surrealdb::engine::local::Mem;
    use tower::ServiceExt;

    use crate::core::Config;
    use crate::db::models::ProfileCreate;
    use crate::db::repository::ProfileRepository;
    use shared::Role;

    async fn test_state() -> ServerState {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        ServerState::with_db(Config::default(), db)
    }

    async fn seed_admin(state: &ServerState) {
        ProfileRepository::new(state.db.clone())
            .create(ProfileCreate {
                full_name: "Ada Admin".to_string(),
                email: "ada@example.com".to_string(),
                password: "correct horse battery".to_string(),
                role: Role::Admin,
                work_id: Some("AD-0001".to_string()),
                department: None,
            })
            .await
            .unwrap();
    }

    fn login_body(work_id: &str) -> Body {
        Body::from(
            serde_json::json!({
                "email": "ada@example.com",
                "password": "correct horse battery",
                "work_id": work_id,
            })
            .to_string(),
        )
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = router(test_state().await);
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = router(test_state().await);
        let response = app
            .oneshot(Request::get("/api/employees").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_rejects_work_id_mismatch() {
        let state = test_state().await;
        seed_admin(&state).await;
        let app = router(state);

        let response = app
            .oneshot(
                Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(login_body("HR-0001"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_issues_a_working_token() {
        let state = test_state().await;
        seed_admin(&state).await;
        let app = router(state);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(login_body("AD-0001"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let token = body["token"].as_str().unwrap().to_string();
        assert_eq!(body["user"]["dashboard_path"], "/dashboards/admin");

        // Empty employee list carries the placeholder marker
        let response = app
            .oneshot(
                Request::get("/api/employees")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["rows"].as_array().unwrap().len(), 0);
        assert_eq!(body["placeholder"], "No records found.");
    }

    #[tokio::test]
    async fn role_gate_redirects_to_login() {
        let state = test_state().await;
        seed_admin(&state).await;
        let app = router(state);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(login_body("AD-0001"))
                    .unwrap(),
            )
            .await
            .unwrap();
        let token = json_body(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        // An admin token on the HR dashboard fails closed: redirect, no body
        let response = app
            .oneshot(
                Request::get("/api/dashboards/hr")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login"
        );
    }
}
