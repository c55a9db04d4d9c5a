use chrono_tz::Tz;

use crate::auth::JwtConfig;
use crate::stats::AttendancePolicy;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/ems | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | BUSINESS_TIMEZONE | UTC | 业务时区 (IANA 名称) |
/// | LATE_HOUR | 9 | 迟到判定小时 |
/// | EARLY_CHECKOUT_HOUR | 17 | 早退判定小时 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/ems HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 业务时区 (打卡迟到/当天区间判定)
    pub timezone: Tz,
    /// 考勤策略阈值 (聚合的唯一事实来源)
    pub attendance: AttendancePolicy,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let timezone = std::env::var("BUSINESS_TIMEZONE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(chrono_tz::UTC);

        let attendance = AttendancePolicy {
            late_hour: std::env::var("LATE_HOUR")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(9),
            early_checkout_hour: std::env::var("EARLY_CHECKOUT_HOUR")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(17),
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/ems".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            timezone,
            attendance,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
