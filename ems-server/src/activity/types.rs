//! 活动日志类型定义
//!
//! 所有日志条目不可变、不可删除；通知状态单独存放在
//! notification_state 表，每个 (条目, viewer scope) 一行。

use serde::{Deserialize, Serialize};

use crate::db::models::serde_helpers;

/// 活动操作类型（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    // ═══ 认证 ═══
    /// 登录成功
    LoginSuccess,
    /// 登录失败
    LoginFailed,
    /// 请求重置密码
    PasswordResetRequested,

    // ═══ 人事 ═══
    /// 员工创建
    EmployeeCreated,
    /// 员工更新
    EmployeeUpdated,
    /// 员工删除
    EmployeeDeleted,
    /// 部门创建
    DepartmentCreated,
    /// 部门更新
    DepartmentUpdated,
    /// 部门删除
    DepartmentDeleted,
    /// 个人资料联系方式更新
    ProfileUpdated,

    // ═══ 考勤 ═══
    /// 上班打卡
    ClockIn,
    /// 下班打卡
    ClockOut,

    // ═══ 请假 ═══
    /// 请假申请
    LeaveRequested,
    /// 请假批准
    LeaveApproved,
    /// 请假驳回
    LeaveRejected,

    // ═══ 薪资 ═══
    /// 薪资批量生成
    PayrollGenerated,

    // ═══ 任务 ═══
    /// 任务指派
    TaskAssigned,
    /// 任务提交
    TaskSubmitted,
    /// 任务通过
    TaskApproved,
    /// 任务驳回
    TaskRejected,

    // ═══ 系统配置 ═══
    /// 设置变更 (职位/假期类型/工时/节假日)
    SettingsChanged,
}

impl ActivityAction {
    /// 审计表的分类过滤键 (admin-pages 风格: employee / leave / payroll / login ...)
    pub fn category(&self) -> &'static str {
        match self {
            ActivityAction::LoginSuccess
            | ActivityAction::LoginFailed
            | ActivityAction::PasswordResetRequested => "login",
            ActivityAction::EmployeeCreated
            | ActivityAction::EmployeeUpdated
            | ActivityAction::EmployeeDeleted => "employee",
            ActivityAction::DepartmentCreated
            | ActivityAction::DepartmentUpdated
            | ActivityAction::DepartmentDeleted => "department",
            ActivityAction::ProfileUpdated => "profile",
            ActivityAction::ClockIn | ActivityAction::ClockOut => "attendance",
            ActivityAction::LeaveRequested
            | ActivityAction::LeaveApproved
            | ActivityAction::LeaveRejected => "leave",
            ActivityAction::PayrollGenerated => "payroll",
            ActivityAction::TaskAssigned
            | ActivityAction::TaskSubmitted
            | ActivityAction::TaskApproved
            | ActivityAction::TaskRejected => "task",
            ActivityAction::SettingsChanged => "settings",
        }
    }

    /// 通知标题
    pub fn title(&self) -> &'static str {
        match self {
            ActivityAction::LoginSuccess => "Login",
            ActivityAction::LoginFailed => "Failed login attempt",
            ActivityAction::PasswordResetRequested => "Password reset requested",
            ActivityAction::EmployeeCreated => "Employee added",
            ActivityAction::EmployeeUpdated => "Employee updated",
            ActivityAction::EmployeeDeleted => "Employee removed",
            ActivityAction::DepartmentCreated => "Department added",
            ActivityAction::DepartmentUpdated => "Department updated",
            ActivityAction::DepartmentDeleted => "Department removed",
            ActivityAction::ProfileUpdated => "Profile updated",
            ActivityAction::ClockIn => "Clock in",
            ActivityAction::ClockOut => "Clock out",
            ActivityAction::LeaveRequested => "Leave requested",
            ActivityAction::LeaveApproved => "Leave approved",
            ActivityAction::LeaveRejected => "Leave rejected",
            ActivityAction::PayrollGenerated => "Payroll generated",
            ActivityAction::TaskAssigned => "New task assigned",
            ActivityAction::TaskSubmitted => "Task submitted",
            ActivityAction::TaskApproved => "Task approved",
            ActivityAction::TaskRejected => "Task rejected",
            ActivityAction::SettingsChanged => "Settings changed",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 活动日志条目（不可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<surrealdb::RecordId>,
    /// 操作人 profile id ("profile:xxx"，系统事件为空串)
    pub actor: String,
    /// 操作人名称
    pub actor_name: String,
    /// 操作类型
    pub action: ActivityAction,
    /// 资源类型（如 "employee", "leave"）
    pub entity: String,
    /// 资源 ID
    #[serde(default)]
    pub entity_id: Option<String>,
    /// 结构化详情（JSON）
    pub details: serde_json::Value,
    /// 广播条目：所有 scope 的通知流都呈现为未读
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub notify_all: bool,
    /// 定向受众 (scope 列表，如工号或角色名；空 = 仅 notify_all 广播)
    #[serde(default)]
    pub audience: Vec<String>,
    /// 时间戳（Unix 毫秒）
    pub created_at: i64,
}

/// 新条目（插入用，不含 id；created_at 由 storage 填充）
#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub actor: String,
    pub actor_name: String,
    pub action: ActivityAction,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: serde_json::Value,
    pub notify_all: bool,
    pub audience: Vec<String>,
}

impl NewActivity {
    pub fn new(action: ActivityAction, entity: impl Into<String>) -> Self {
        Self {
            actor: String::new(),
            actor_name: String::new(),
            action,
            entity: entity.into(),
            entity_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
            notify_all: false,
            audience: Vec::new(),
        }
    }

    pub fn actor(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.actor = id.into();
        self.actor_name = name.into();
        self
    }

    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn notify_all(mut self) -> Self {
        self.notify_all = true;
        self
    }

    pub fn audience(mut self, scopes: Vec<String>) -> Self {
        self.audience = scopes;
        self
    }
}

/// 活动日志查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityQuery {
    /// 起始时间（Unix 毫秒，含）
    pub from: Option<i64>,
    /// 截止时间（Unix 毫秒，含）
    pub to: Option<i64>,
    /// 分类过滤 (employee / leave / payroll / login / ...)
    pub category: Option<String>,
    /// 操作人过滤
    pub actor: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            category: None,
            actor: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// 活动日志列表响应
#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub items: Vec<ActivityEntryView>,
    pub total: u64,
    /// 空集占位文案 (列表面板统一契约)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

/// 审计表行视图：附加季度桶和分类
#[derive(Debug, Serialize)]
pub struct ActivityEntryView {
    pub id: String,
    pub actor_name: String,
    pub action: ActivityAction,
    pub category: &'static str,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: serde_json::Value,
    /// created_at 月份的季度桶 (Q1-Q4)
    pub quarter: &'static str,
    pub created_at: i64,
}

/// 通知过滤器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Read,
}

/// 通知状态补丁（浅覆盖：只更新给出的字段）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationPatch {
    pub read: Option<bool>,
    pub deleted: Option<bool>,
}

/// 通知视图模型
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    /// 日志条目 id ("activity_log:xxx")
    pub id: String,
    pub title: String,
    /// 正文：details 键回退链 message → reason → status → leave_type → ""
    pub body: String,
    pub category: &'static str,
    pub read: bool,
    pub created_at: i64,
}

/// mark_all_read 结果：顺序执行，接受部分完成
#[derive(Debug, Clone, Serialize)]
pub struct MarkAllReadOutcome {
    pub completed: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
