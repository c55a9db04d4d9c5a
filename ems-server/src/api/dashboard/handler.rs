//! Dashboard API Handlers
//!
//! 所有派生数字都经由 `stats` 的纯函数计算；这里只负责发查询和
//! 把失败的子查询降级成 None 卡片。

use axum::{Json, extract::State};
use chrono::Datelike;
use serde::Serialize;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::LeaveStatus;
use crate::db::repository::{
    AttendanceRepository, DepartmentRepository, EmployeeRepository, LeaveRepository,
    PayrollRepository, ProfileRepository,
};
use crate::stats;
use crate::utils::AppResult;
use crate::utils::time;

/// Degrade a failed sub-query to a missing tile
fn tile<T, E: std::fmt::Display>(name: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(tile = name, error = %e, "Dashboard tile query failed");
            None
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub total_employees: Option<u64>,
    pub total_departments: Option<u64>,
    pub present_today: Option<u64>,
    pub pending_leaves: Option<u64>,
    pub on_leave_today: Option<u64>,
    /// max(total - present - on_leave, 0) + on_leave (combined figure)
    pub absent_today: Option<u64>,
    pub payroll_this_month: Option<u64>,
}

pub async fn admin(State(state): State<ServerState>) -> AppResult<Json<AdminDashboard>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let departments = DepartmentRepository::new(state.db.clone());
    let attendance = AttendanceRepository::new(state.db.clone());
    let leaves = LeaveRepository::new(state.db.clone());
    let payroll = PayrollRepository::new(state.db.clone());

    let tz = state.config.timezone;
    let (day_from, day_to) = time::today_bounds(tz);
    let today = time::today(tz).to_string();
    let (month_from, month_to) = time::current_month_bounds(tz);

    let (total, depts, present, pending, on_leave, payroll_month) = tokio::join!(
        employees.count_active(),
        departments.count(),
        attendance.present_count(day_from, day_to),
        leaves.pending_count(),
        leaves.overlapping_date(&today, &[LeaveStatus::Pending, LeaveStatus::Approved]),
        payroll.count_created_between(month_from, month_to),
    );

    let total = tile("total_employees", total);
    let present = tile("present_today", present);
    let on_leave = tile("on_leave_today", on_leave).map(|rows| rows.len() as u64);
    let absent = match (total, present, on_leave) {
        (Some(t), Some(p), Some(l)) => Some(stats::absent_today(t, p, l)),
        _ => None,
    };

    Ok(Json(AdminDashboard {
        total_employees: total,
        total_departments: tile("total_departments", depts),
        present_today: present,
        pending_leaves: tile("pending_leaves", pending),
        on_leave_today: on_leave,
        absent_today: absent,
        payroll_this_month: tile("payroll_this_month", payroll_month),
    }))
}

#[derive(Debug, Serialize)]
pub struct HrDashboard {
    pub total_employees: Option<u64>,
    pub new_this_month: Option<u64>,
    pub on_leave_today: Option<u64>,
    pub pending_leaves: Option<u64>,
    /// 今日迟到或早退的记录数 (缺下班卡不算早退)
    pub attendance_issues_today: Option<u64>,
}

pub async fn hr(State(state): State<ServerState>) -> AppResult<Json<HrDashboard>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let attendance = AttendanceRepository::new(state.db.clone());
    let leaves = LeaveRepository::new(state.db.clone());

    let tz = state.config.timezone;
    let policy = state.config.attendance.clone();
    let (day_from, day_to) = time::today_bounds(tz);
    let today = time::today(tz).to_string();
    let (month_from, month_to) = time::current_month_bounds(tz);

    let (total, new_month, on_leave, pending, today_rows) = tokio::join!(
        employees.count_active(),
        employees.count_created_between(month_from, month_to),
        leaves.overlapping_date(&today, &[LeaveStatus::Approved]),
        leaves.pending_count(),
        attendance.find_between(day_from, day_to),
    );

    let issues = tile("attendance_issues_today", today_rows).map(|rows| {
        rows.iter()
            .filter(|r| {
                stats::is_late(r.clock_in, tz, &policy)
                    || stats::is_early_checkout(r.clock_out, tz, &policy)
            })
            .count() as u64
    });

    Ok(Json(HrDashboard {
        total_employees: tile("total_employees", total),
        new_this_month: tile("new_this_month", new_month),
        on_leave_today: tile("on_leave_today", on_leave).map(|rows| rows.len() as u64),
        pending_leaves: tile("pending_leaves", pending),
        attendance_issues_today: issues,
    }))
}

#[derive(Debug, Serialize)]
pub struct MdDashboard {
    pub total_employees: Option<u64>,
    pub present_today: Option<u64>,
    pub on_leave_today: Option<u64>,
    pub pending_approvals: Option<u64>,
    /// round(present / total * 100), 0 when no employees
    pub attendance_compliance_pct: Option<u64>,
}

pub async fn md(State(state): State<ServerState>) -> AppResult<Json<MdDashboard>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let attendance = AttendanceRepository::new(state.db.clone());
    let leaves = LeaveRepository::new(state.db.clone());

    let tz = state.config.timezone;
    let (day_from, day_to) = time::today_bounds(tz);
    let today = time::today(tz).to_string();

    let (total, present, on_leave, pending) = tokio::join!(
        employees.count_active(),
        attendance.present_count(day_from, day_to),
        leaves.overlapping_date(&today, &[LeaveStatus::Pending, LeaveStatus::Approved]),
        leaves.pending_count(),
    );

    let total = tile("total_employees", total);
    let present = tile("present_today", present);
    let compliance = match (present, total) {
        (Some(p), Some(t)) => Some(stats::compliance_pct(p, t)),
        _ => None,
    };

    Ok(Json(MdDashboard {
        total_employees: total,
        present_today: present,
        on_leave_today: tile("on_leave_today", on_leave).map(|rows| rows.len() as u64),
        pending_approvals: tile("pending_approvals", pending),
        attendance_compliance_pct: compliance,
    }))
}

#[derive(Debug, Serialize)]
pub struct SupervisorDashboard {
    /// 主管所属部门；档案缺部门时所有卡片为 None
    pub department: Option<String>,
    pub department_employees: Option<u64>,
    pub present_today: Option<u64>,
    pub late_today: Option<u64>,
    /// max(dept_size - present, 0)
    pub absent_today: Option<u64>,
    pub pending_leaves: Option<u64>,
    /// late + absent
    pub issues_today: Option<u64>,
}

pub async fn supervisor(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<SupervisorDashboard>> {
    let profiles = ProfileRepository::new(state.db.clone());
    let attendance = AttendanceRepository::new(state.db.clone());
    let leaves = LeaveRepository::new(state.db.clone());

    let tz = state.config.timezone;
    let policy = state.config.attendance.clone();
    let (day_from, day_to) = time::today_bounds(tz);

    let department = profiles
        .find_by_id(&user.id)
        .await
        .map_err(AppError::from)?
        .and_then(|p| p.department);

    let Some(department) = department else {
        tracing::warn!(user = %user.username, "Supervisor profile has no department");
        return Ok(Json(SupervisorDashboard {
            department: None,
            department_employees: None,
            present_today: None,
            late_today: None,
            absent_today: None,
            pending_leaves: None,
            issues_today: None,
        }));
    };

    let (all_profiles, today_rows, all_leaves) = tokio::join!(
        profiles.find_all(),
        attendance.find_between(day_from, day_to),
        leaves.find_all(),
    );

    // Department membership by profile id string
    let member_ids: Option<std::collections::HashSet<String>> =
        tile("department_employees", all_profiles).map(|rows| {
            rows.iter()
                .filter(|p| p.department.as_deref() == Some(department.as_str()))
                .map(|p| p.id_string())
                .collect()
        });

    let dept_size = member_ids.as_ref().map(|ids| ids.len() as u64);

    let dept_rows = match (tile("attendance_today", today_rows), member_ids.as_ref()) {
        (Some(rows), Some(ids)) => Some(
            rows.into_iter()
                .filter(|r| ids.contains(&r.user.to_string()))
                .collect::<Vec<_>>(),
        ),
        _ => None,
    };

    let present = dept_rows.as_ref().map(|rows| {
        rows.iter()
            .map(|r| r.user.to_string())
            .collect::<std::collections::HashSet<_>>()
            .len() as u64
    });
    let late = dept_rows.as_ref().map(|rows| {
        rows.iter()
            .filter(|r| stats::is_late(r.clock_in, tz, &policy))
            .count() as u64
    });
    let absent = match (dept_size, present) {
        (Some(size), Some(p)) => Some(stats::dept_absent(size, p)),
        _ => None,
    };
    let pending = match (tile("pending_leaves", all_leaves), member_ids.as_ref()) {
        (Some(rows), Some(ids)) => Some(
            rows.iter()
                .filter(|l| l.status == LeaveStatus::Pending && ids.contains(&l.user.to_string()))
                .count() as u64,
        ),
        _ => None,
    };
    let issues = match (late, absent) {
        (Some(l), Some(a)) => Some(l + a),
        _ => None,
    };

    Ok(Json(SupervisorDashboard {
        department: Some(department),
        department_employees: dept_size,
        present_today: present,
        late_today: late,
        absent_today: absent,
        pending_leaves: pending,
        issues_today: issues,
    }))
}

#[derive(Debug, Serialize)]
pub struct EmployeeDashboard {
    /// 本年度已批准假期天数 (含首尾；畸形行记 0)
    pub leave_days_used: Option<i64>,
    pub my_pending_leaves: Option<u64>,
    pub clocked_in_today: Option<bool>,
}

pub async fn employee(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<EmployeeDashboard>> {
    let leaves = LeaveRepository::new(state.db.clone());
    let attendance = AttendanceRepository::new(state.db.clone());

    let tz = state.config.timezone;
    let year = time::today(tz).year();

    let (approved, mine, open) = tokio::join!(
        leaves.approved_in_year(&user.id, year),
        leaves.find_for_user(&user.id),
        attendance.open_record(&user.id),
    );

    let days_used =
        tile("leave_days_used", approved).map(|rows| stats::leave_days_used_in_year(&rows, year));
    let pending = tile("my_pending_leaves", mine).map(|rows| {
        rows.iter()
            .filter(|l| l.status == LeaveStatus::Pending)
            .count() as u64
    });

    Ok(Json(EmployeeDashboard {
        leave_days_used: days_used,
        my_pending_leaves: pending,
        clocked_in_today: tile("clocked_in_today", open).map(|r| r.is_some()),
    }))
}
