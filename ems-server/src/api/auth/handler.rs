//! Authentication Handlers
//!
//! Login requires the credential pair plus a matching work id; every
//! mismatch returns the same error so neither accounts nor work ids can
//! be enumerated.

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::activity::types::{ActivityAction, NewActivity};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Profile;
use crate::db::repository::ProfileRepository;
use crate::utils::AppResult;
use shared::Role;

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub work_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub full_name: String,
    pub role: Role,
    pub work_id: Option<String>,
    /// Landing page after login, per role
    pub dashboard_path: &'static str,
}

/// Login handler
///
/// 三要素匹配：邮箱查档、密码校验、工号 (trim 后) 比对。任何一项
/// 不匹配都返回同一错误；失败与成功都写入活动日志。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = ProfileRepository::new(state.db.clone());
    let email = req.email.trim().to_lowercase();

    let profile = repo
        .find_by_email(&email)
        .await
        .map_err(AppError::from)?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let profile = match profile {
        Some(p) if p.is_active => p,
        _ => return Err(login_failed(&state, &email, "unknown_or_inactive").await),
    };

    let password_ok = profile
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_ok {
        return Err(login_failed(&state, &email, "bad_password").await);
    }

    // Entered work id must match the stored one after trimming
    let entered = req.work_id.trim();
    let stored = profile.work_id.as_deref().unwrap_or("").trim();
    if entered != stored {
        return Err(login_failed(&state, &email, "work_id_mismatch").await);
    }

    let user_id = profile.id_string();
    let token = state
        .jwt_service
        .generate_token(
            &user_id,
            &profile.full_name,
            profile.role.as_str(),
            profile.work_id.as_deref(),
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    let entry = NewActivity::new(ActivityAction::LoginSuccess, "auth")
        .actor(user_id.clone(), profile.full_name.clone())
        .details(serde_json::json!({ "email": email }));
    if let Err(e) = state.activity.append(entry).await {
        tracing::warn!(error = %e, "Failed to log successful login");
    }

    tracing::info!(user = %profile.full_name, role = %profile.role, "Login");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.token_lifetime_seconds(),
        user: UserInfo {
            id: user_id,
            full_name: profile.full_name,
            role: profile.role,
            work_id: profile.work_id,
            dashboard_path: profile.role.dashboard_path(),
        },
    }))
}

/// Log a failed attempt and return the uniform credential error
async fn login_failed(state: &ServerState, email: &str, reason: &str) -> AppError {
    let entry = NewActivity::new(ActivityAction::LoginFailed, "auth")
        .details(serde_json::json!({ "email": email, "reason": reason }));
    if let Err(e) = state.activity.append(entry).await {
        tracing::warn!(error = %e, "Failed to log login failure");
    }
    tracing::warn!(email = %email, reason = %reason, "Login failed");
    AppError::invalid_credentials()
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct NeutralResponse {
    pub message: &'static str,
}

/// Password reset request
///
/// 无论邮箱是否存在都返回同一中性文案；请求本身写入日志。
pub async fn password_reset(
    State(state): State<ServerState>,
    Json(req): Json<PasswordResetRequest>,
) -> AppResult<Json<NeutralResponse>> {
    let email = req.email.trim().to_lowercase();
    let entry = NewActivity::new(ActivityAction::PasswordResetRequested, "auth")
        .details(serde_json::json!({ "email": email }));
    if let Err(e) = state.activity.append(entry).await {
        tracing::warn!(error = %e, "Failed to log password reset request");
    }

    Ok(Json(NeutralResponse {
        message: "If the account exists, reset instructions have been sent.",
    }))
}

/// Current user's profile
///
/// 无档案行时合成一份默认 employee 档案而不是报错。
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Profile>> {
    let repo = ProfileRepository::new(state.db.clone());
    let profile = repo.find_by_id(&user.id).await.map_err(AppError::from)?;

    let profile = profile.unwrap_or_else(|| Profile {
        id: None,
        full_name: user.username.clone(),
        email: String::new(),
        hash_pass: String::new(),
        role: Role::Employee,
        work_id: user.work_id.clone(),
        department: None,
        phone: None,
        address: None,
        emergency_contact: None,
        is_active: true,
        created_at: 0,
    });

    Ok(Json(profile))
}

/// Logout - stateless acknowledgment (clients discard the JWT)
pub async fn logout(user: CurrentUser) -> Json<NeutralResponse> {
    tracing::info!(user = %user.username, "Logout");
    Json(NeutralResponse {
        message: "Logged out.",
    })
}
