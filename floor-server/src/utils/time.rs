//! 时间工具函数 — 营业时间解析与业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。
//!
//! 钟点字符串 (营业时间、预订时间) 同时接受 24 小时制 ("21:00") 与
//! 12 小时制 ("9:00 PM") 写法，全部经 [`parse_clock`] 归一为当日分钟数。
//! 无法解析的输入返回 [`ClockParseError`]，绝不静默退回 00:00。

use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 钟点字符串解析失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time string: {0}")]
pub struct ClockParseError(pub String);

impl From<ClockParseError> for AppError {
    fn from(e: ClockParseError) -> Self {
        AppError::validation(e.to_string())
    }
}

/// 解析钟点字符串为当日分钟数 (0..1440)
///
/// 接受的形式：
/// - 24 小时制: `"09:00"`, `"9:30"`, `"21:05"`
/// - 12 小时制: `"9:00 AM"`, `"12:30pm"`, `"12 AM"` (午夜 = 0)
pub fn parse_clock(input: &str) -> Result<u16, ClockParseError> {
    let lower = input.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return Err(ClockParseError(input.to_string()));
    }

    let (body, meridiem) = if let Some(b) = lower.strip_suffix("am") {
        (b.trim_end(), Some(false))
    } else if let Some(b) = lower.strip_suffix("pm") {
        (b.trim_end(), Some(true))
    } else {
        (lower.as_str(), None)
    };

    let (hour_str, minute_str) = match body.split_once(':') {
        Some((h, m)) => (h, m),
        // "9 PM": bare hour only makes sense with a meridiem
        None if meridiem.is_some() => (body, "0"),
        None => return Err(ClockParseError(input.to_string())),
    };

    let hour: u16 = hour_str
        .trim()
        .parse()
        .map_err(|_| ClockParseError(input.to_string()))?;
    let minute: u16 = minute_str
        .trim()
        .parse()
        .map_err(|_| ClockParseError(input.to_string()))?;
    if minute >= 60 {
        return Err(ClockParseError(input.to_string()));
    }

    let hour24 = match meridiem {
        None => {
            if hour >= 24 {
                return Err(ClockParseError(input.to_string()));
            }
            hour
        }
        Some(pm) => {
            if hour == 0 || hour > 12 {
                return Err(ClockParseError(input.to_string()));
            }
            // 12 AM → 0, 12 PM → 12
            (hour % 12) + if pm { 12 } else { 0 }
        }
    };

    Ok(hour24 * 60 + minute)
}

/// 当日分钟数 → "HH:MM" (24 小时制)
pub fn format_minutes(minute_of_day: u16) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期 + 当日分钟数 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_minute_to_millis(date: NaiveDate, minute_of_day: u16, tz: Tz) -> i64 {
    let naive = date
        .and_hms_opt(u32::from(minute_of_day) / 60, u32::from(minute_of_day) % 60, 0)
        .expect("minute_of_day is always < 1440");
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_minute_to_millis(date, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_minute_to_millis(next_day, 0, tz)
}

/// 今天的日期 (业务时区)
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 周一为 0 的星期下标，用于营业时间表查询
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}
