//! 聚合策略函数
//!
//! 仪表盘数字全部由这里的纯函数推导；打卡迟到/早退阈值集中在
//! [`AttendancePolicy`]，任何聚合都不得重新硬编码。

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::db::models::{LeaveRequest, LeaveStatus};
use crate::utils::time;

/// 考勤策略阈值（单一事实来源，由 Config 持有）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttendancePolicy {
    /// 本地打卡小时 >= 此值视为迟到
    pub late_hour: u32,
    /// 非空下班打卡的本地小时 < 此值视为早退
    pub early_checkout_hour: u32,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            late_hour: 9,
            early_checkout_hour: 17,
        }
    }
}

/// 迟到判定：本地打卡小时 >= late_hour (8:59 不迟到，9:00 迟到)
pub fn is_late(clock_in_millis: i64, tz: Tz, policy: &AttendancePolicy) -> bool {
    time::local_hour(clock_in_millis, tz) >= policy.late_hour
}

/// 早退判定：仅对非空下班打卡生效；缺失下班打卡不算早退
pub fn is_early_checkout(clock_out_millis: Option<i64>, tz: Tz, policy: &AttendancePolicy) -> bool {
    match clock_out_millis {
        Some(millis) => time::local_hour(millis, tz) < policy.early_checkout_hour,
        None => false,
    }
}

/// 管理员口径的今日缺勤：max(total - present - on_leave, 0) + on_leave
///
/// 合并口径：缺勤数把在假人数也计入（"不在岗"），但钳制保证
/// present + absent 不会因数据噪声变成负数。
pub fn absent_today(total: u64, present: u64, on_leave: u64) -> u64 {
    total.saturating_sub(present).saturating_sub(on_leave) + on_leave
}

/// 部门口径的缺勤：max(dept_size - present, 0)
pub fn dept_absent(dept_size: u64, present: u64) -> u64 {
    dept_size.saturating_sub(present)
}

/// 出勤达标率 % = round(present / total * 100)，total 为 0 时为 0
pub fn compliance_pct(present: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((present as f64 / total as f64) * 100.0).round() as u64
}

/// 单条请假的天数：end - start + 1；end < start 的畸形行贡献 0
pub fn leave_days(start_date: &str, end_date: &str) -> i64 {
    let (Ok(start), Ok(end)) = (time::parse_date(start_date), time::parse_date(end_date)) else {
        return 0;
    };
    if end < start {
        return 0;
    }
    (end - start).num_days() + 1
}

/// 年度已用假期天数：已批准且与当年重叠的行逐条求和
///
/// 重叠判定按行的起止覆盖当年任一天；天数仍按行自身的
/// end - start + 1 计（原系统口径，不按年度截断）。
pub fn leave_days_used_in_year(rows: &[LeaveRequest], year: i32) -> i64 {
    let year_start = format!("{year}-01-01");
    let year_end = format!("{year}-12-31");

    rows.iter()
        .filter(|row| row.status == LeaveStatus::Approved)
        .filter(|row| row.start_date.as_str() <= year_end.as_str())
        .filter(|row| row.end_date.as_str() >= year_start.as_str())
        .map(|row| leave_days(&row.start_date, &row.end_date))
        .sum()
}

/// 月份 → 季度桶 (Q1-Q4)
pub fn quarter(month: u32) -> &'static str {
    match month {
        1..=3 => "Q1",
        4..=6 => "Q2",
        7..=9 => "Q3",
        _ => "Q4",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::UTC;

    fn millis(h: u32, m: u32) -> i64 {
        let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        time::date_hms_to_millis(date, h, m, 0, UTC)
    }

    fn leave_row(start: &str, end: &str, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: None,
            user: "profile:u1".parse().unwrap(),
            leave_type: "annual".into(),
            start_date: start.into(),
            end_date: end.into(),
            reason: "test".into(),
            status,
            decided_by: None,
            decided_at: None,
            created_at: 0,
        }
    }

    #[test]
    fn late_boundary_is_nine_oclock() {
        let policy = AttendancePolicy::default();
        assert!(!is_late(millis(8, 59), UTC, &policy));
        assert!(is_late(millis(9, 0), UTC, &policy));
        assert!(is_late(millis(14, 30), UTC, &policy));
    }

    #[test]
    fn early_checkout_needs_a_clock_out() {
        let policy = AttendancePolicy::default();
        assert!(is_early_checkout(Some(millis(16, 59)), UTC, &policy));
        assert!(!is_early_checkout(Some(millis(17, 0)), UTC, &policy));
        assert!(!is_early_checkout(None, UTC, &policy));
    }

    #[test]
    fn absent_is_clamped_and_includes_on_leave() {
        // 10 total, 6 present, 2 on leave → 2 truly missing + 2 on leave
        assert_eq!(absent_today(10, 6, 2), 4);
        // Noisy data: present + on_leave exceeds total, clamp holds
        assert_eq!(absent_today(5, 5, 2), 2);
        assert_eq!(absent_today(0, 3, 0), 0);
        // With clean data, present + absent adds back up to total
        assert_eq!(6 + absent_today(10, 6, 2), 10);
        assert_eq!(10 + absent_today(10, 10, 0), 10);
    }

    #[test]
    fn compliance_rounds_and_handles_zero() {
        assert_eq!(compliance_pct(0, 0), 0);
        assert_eq!(compliance_pct(1, 3), 33);
        assert_eq!(compliance_pct(2, 3), 67);
        assert_eq!(compliance_pct(3, 3), 100);
    }

    #[test]
    fn leave_days_are_inclusive() {
        // Mon-Fri → 5 days
        assert_eq!(leave_days("2026-03-16", "2026-03-20"), 5);
        assert_eq!(leave_days("2026-03-16", "2026-03-16"), 1);
        // Malformed: end before start
        assert_eq!(leave_days("2026-03-20", "2026-03-16"), 0);
        assert_eq!(leave_days("not-a-date", "2026-03-16"), 0);
    }

    #[test]
    fn year_usage_sums_approved_overlapping_rows() {
        let rows = vec![
            leave_row("2026-03-16", "2026-03-20", LeaveStatus::Approved), // 5
            leave_row("2026-06-01", "2026-06-01", LeaveStatus::Approved), // 1
            leave_row("2026-07-01", "2026-07-10", LeaveStatus::Pending),  // not approved
            leave_row("2025-02-01", "2025-02-05", LeaveStatus::Approved), // other year
            leave_row("2026-08-10", "2026-08-01", LeaveStatus::Approved), // malformed → 0
        ];
        assert_eq!(leave_days_used_in_year(&rows, 2026), 6);
    }

    #[test]
    fn quarter_buckets() {
        assert_eq!(quarter(1), "Q1");
        assert_eq!(quarter(3), "Q1");
        assert_eq!(quarter(4), "Q2");
        assert_eq!(quarter(9), "Q3");
        assert_eq!(quarter(12), "Q4");
    }
}
