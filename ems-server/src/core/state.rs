use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::activity::{ActivityStorage, NotificationService};
use crate::auth::JwtService;
use crate::core::Config;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务端的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc / 可 Clone 的句柄实现浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | activity | ActivityStorage | 活动日志存储 |
/// | notifications | NotificationService | 通知对账服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 活动日志存储 (append-only)
    pub activity: ActivityStorage,
    /// 通知对账服务
    pub notifications: NotificationService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录 (确保存在)
    /// 2. 数据库 (work_dir/database)
    /// 3. JWT / 活动日志 / 通知服务
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db = crate::db::connect(&config.work_dir).await?;
        Ok(Self::with_db(config.clone(), db))
    }

    /// 用已有数据库句柄构造状态 (测试用 in-memory 引擎)
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let activity = ActivityStorage::new(db.clone());
        let notifications = NotificationService::new(db.clone());

        Self {
            config,
            db,
            jwt_service,
            activity,
            notifications,
        }
    }
}
