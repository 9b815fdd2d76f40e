//! Restaurant Model
//!
//! 餐厅及其营业时间。营业时间按星期存储原始钟点字符串
//! (12/24 小时制皆可)，查询前统一编译为当日分钟数窗口。

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::utils::time::{ClockParseError, parse_clock, weekday_index};

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
}

/// Opening/closing clock strings for one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

impl DayHours {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Weekly opening hours as stored; absent weekday means closed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

impl OpeningHours {
    /// Same hours every day of the week
    pub fn all_week(open: &str, close: &str) -> Self {
        let hours = DayHours::new(open, close);
        Self {
            monday: Some(hours.clone()),
            tuesday: Some(hours.clone()),
            wednesday: Some(hours.clone()),
            thursday: Some(hours.clone()),
            friday: Some(hours.clone()),
            saturday: Some(hours.clone()),
            sunday: Some(hours),
        }
    }

    /// 编译为分钟数窗口表
    ///
    /// 每个钟点字符串只在这里解析一次；之后的营业时间判断
    /// 都是整数比较。
    pub fn compile(&self) -> Result<WeekSchedule, ClockParseError> {
        let raw = [
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
            &self.sunday,
        ];
        let mut days: [Option<DayWindow>; 7] = [None; 7];
        for (idx, entry) in raw.into_iter().enumerate() {
            if let Some(hours) = entry {
                let open = parse_clock(&hours.open)?;
                let close = parse_clock(&hours.close)?;
                if close <= open {
                    return Err(ClockParseError(format!(
                        "close {} is not after open {}",
                        hours.close, hours.open
                    )));
                }
                days[idx] = Some(DayWindow { open, close });
            }
        }
        Ok(WeekSchedule { days })
    }
}

/// One weekday's window, minute-of-day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub open: u16,
    pub close: u16,
}

/// Compiled weekly schedule, Monday-first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSchedule {
    days: [Option<DayWindow>; 7],
}

impl WeekSchedule {
    pub fn window_for(&self, weekday: Weekday) -> Option<DayWindow> {
        self.days[weekday_index(weekday)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_mixed_clock_styles() {
        let hours = OpeningHours {
            monday: Some(DayHours::new("9:00 AM", "10:00 PM")),
            tuesday: Some(DayHours::new("09:00", "22:00")),
            ..Default::default()
        };
        let schedule = hours.compile().unwrap();
        let monday = schedule.window_for(Weekday::Mon).unwrap();
        let tuesday = schedule.window_for(Weekday::Tue).unwrap();
        assert_eq!(monday, tuesday);
        assert_eq!(monday.open, 540);
        assert_eq!(monday.close, 1320);
        assert!(schedule.window_for(Weekday::Sun).is_none());
    }

    #[test]
    fn rejects_inverted_window() {
        let hours = OpeningHours {
            friday: Some(DayHours::new("22:00", "09:00")),
            ..Default::default()
        };
        assert!(hours.compile().is_err());
    }

    #[test]
    fn rejects_unparseable_hours() {
        let hours = OpeningHours {
            monday: Some(DayHours::new("open-ish", "22:00")),
            ..Default::default()
        };
        assert!(hours.compile().is_err());
    }
}
