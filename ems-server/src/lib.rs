//! EMS Server - 员工管理系统服务端
//!
//! # 架构概述
//!
//! 自包含的员工管理服务：嵌入式 SurrealDB 存储 + axum HTTP API。
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系，角色门禁
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储，repository-per-entity
//! - **活动日志** (`activity`): Append-only 活动日志 + 通知对账
//! - **统计** (`stats`): 仪表盘聚合的纯函数层
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! ems-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色门禁
//! ├── db/            # 数据库层 (models + repository)
//! ├── activity/      # 活动日志与通知
//! ├── stats/         # 聚合策略函数
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 工具函数
//! ```

pub mod activity;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod stats;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ______ __  ___ _____
   / ____//  |/  // ___/
  / __/  / /|_/ / \__ \
 / /___ / /  / / ___/ /
/_____//_/  /_/ /____/
    "#
    );
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
