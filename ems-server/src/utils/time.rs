//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis 或 ISO 日期字符串。

use chrono::{Datelike, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date
        .and_hms_opt(hour, min, sec)
        .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).unwrap_or_default());
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

/// 当前业务时区的本地日期
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// 今天的 [start, end) 时间戳区间 (业务时区)
pub fn today_bounds(tz: Tz) -> (i64, i64) {
    let date = today(tz);
    (day_start_millis(date, tz), day_end_millis(date, tz))
}

/// 当前月份的 [start, end) 时间戳区间 (业务时区)
pub fn current_month_bounds(tz: Tz) -> (i64, i64) {
    let now = Utc::now().with_timezone(&tz);
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or(now.date_naive());
    let next_first = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1)
    }
    .unwrap_or(first);
    (day_start_millis(first, tz), day_start_millis(next_first, tz))
}

/// Unix millis → 业务时区的本地小时 (0-23)
pub fn local_hour(millis: i64, tz: Tz) -> u32 {
    match Utc.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&tz).hour(),
        _ => 0,
    }
}

/// Unix millis → 业务时区的本地月份 (1-12)
pub fn local_month(millis: i64, tz: Tz) -> u32 {
    match Utc.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&tz).month(),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso() {
        assert!(parse_date("2026-03-15").is_ok());
        assert!(parse_date("15/03/2026").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn day_bounds_are_half_open() {
        let tz = chrono_tz::UTC;
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let start = day_start_millis(date, tz);
        let end = day_end_millis(date, tz);
        assert_eq!(end - start, 24 * 3600 * 1000);
    }

    #[test]
    fn local_hour_respects_timezone() {
        // 2026-03-15 08:59 UTC
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let millis = date_hms_to_millis(date, 8, 59, 0, chrono_tz::UTC);
        assert_eq!(local_hour(millis, chrono_tz::UTC), 8);
        // Same instant in a +8 timezone is late afternoon
        assert_eq!(local_hour(millis, chrono_tz::Asia::Shanghai), 16);
    }
}
