//! 角色定义 - 固定的封闭角色集
//!
//! 所有页面访问控制、通知隔离都基于这五个角色。
//! 角色比较始终大小写不敏感 (`Role::parse` 先转小写)。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed role set. Every profile carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Hr,
    /// Managing Director
    Md,
    Supervisor,
    Employee,
}

/// Unknown role string
#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl Role {
    /// Case-insensitive parse. Whitespace is trimmed first.
    pub fn parse(s: &str) -> Result<Role, RoleParseError> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "hr" => Ok(Role::Hr),
            "md" => Ok(Role::Md),
            "supervisor" => Ok(Role::Supervisor),
            "employee" => Ok(Role::Employee),
            other => Err(RoleParseError(other.to_string())),
        }
    }

    /// Stable lowercase tag (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Hr => "hr",
            Role::Md => "md",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
        }
    }

    /// Dashboard landing path for this role (role-mismatch redirects land here)
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/dashboards/admin",
            Role::Hr => "/dashboards/hr",
            Role::Md => "/dashboards/md",
            Role::Supervisor => "/dashboards/supervisor",
            Role::Employee => "/dashboards/employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("Admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse(" HR ").unwrap(), Role::Hr);
        assert_eq!(Role::parse("SUPERVISOR").unwrap(), Role::Supervisor);
        assert!(Role::parse("root").is_err());
    }

    #[test]
    fn serde_round_trip_uses_snake_case() {
        let json = serde_json::to_string(&Role::Md).unwrap();
        assert_eq!(json, "\"md\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Md);
    }
}
