//! Availability Engine
//!
//! 给定餐厅、日期、钟点与人数：
//!
//! 1. 求请求窗口 `[start, start+90min)`
//! 2. 取该餐厅所有与窗口重叠的非取消预订
//! 3. 重叠预订占用的桌台构成占用集
//! 4. 候选桌台 = 不在占用集 且 座位数 ≥ 人数
//! 5. 有候选 → `available = true` 直接返回
//! 6. 否则在 ±30/±60/±90 分钟内搜索备选时段：越界营业时间或距打烊
//!    不足 120 分钟的偏移被丢弃；收满 3 个有空桌的时段即停

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::error::{BookingError, BookingResult};
use super::interval::TimeSlot;
use super::{ALTERNATIVE_OFFSETS, CLOSING_BUFFER_MINUTES, DEFAULT_RESERVATION_MINUTES};
use crate::db::models::{DiningTable, WeekSchedule};
use crate::db::repository::{
    DiningTableRepository, ReservationRepository, RestaurantRepository, parse_record,
};
use crate::utils::time::{date_minute_to_millis, format_minutes};

/// A table free for the requested window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTable {
    pub id: String,
    pub number: i32,
    pub seats: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl From<&DiningTable> for AvailableTable {
    fn from(table: &DiningTable) -> Self {
        Self {
            id: table
                .id
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_default(),
            number: table.number,
            seats: table.seats,
            section: table.section.clone(),
        }
    }
}

/// One proposed nearby time slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeSlot {
    /// "HH:MM" label in restaurant-local time
    pub time: String,
    /// Window start, Unix millis
    pub start_time: i64,
    pub tables: Vec<AvailableTable>,
}

/// Availability engine result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub available: bool,
    pub tables: Vec<AvailableTable>,
    pub alternatives: Vec<AlternativeSlot>,
}

/// Computes free tables and nearby alternative slots
#[derive(Clone)]
pub struct AvailabilityEngine {
    db: Surreal<Db>,
    tz: Tz,
}

impl AvailabilityEngine {
    pub fn new(db: Surreal<Db>, tz: Tz) -> Self {
        Self { db, tz }
    }

    /// Run the availability check for `guests` at `date` + `minute_of_day`
    pub async fn check(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
        minute_of_day: u16,
        guests: i32,
    ) -> BookingResult<AvailabilityReport> {
        let rid = parse_record(restaurant_id)?;
        let restaurant = RestaurantRepository::new(self.db.clone())
            .find_by_id(restaurant_id)
            .await?
            .ok_or_else(|| BookingError::RestaurantNotFound(restaurant_id.to_string()))?;
        let schedule = restaurant.opening_hours.compile()?;

        let requested = self.slot_at(date, minute_of_day);
        let free = self.free_tables(&rid, requested, guests).await?;
        if !free.is_empty() {
            return Ok(AvailabilityReport {
                available: true,
                tables: free,
                alternatives: Vec::new(),
            });
        }

        let alternatives = self
            .search_alternatives(&rid, &schedule, date, minute_of_day, guests)
            .await?;

        Ok(AvailabilityReport {
            available: false,
            tables: Vec::new(),
            alternatives,
        })
    }

    /// 步骤 6：按偏移表顺序 (近者优先，同距离负偏移在前) 搜索备选时段
    async fn search_alternatives(
        &self,
        restaurant: &RecordId,
        schedule: &WeekSchedule,
        date: NaiveDate,
        minute_of_day: u16,
        guests: i32,
    ) -> BookingResult<Vec<AlternativeSlot>> {
        const MAX_ALTERNATIVES: usize = 3;

        let window = match schedule.window_for(date.weekday()) {
            Some(w) => w,
            // closed that day: nothing to propose
            None => return Ok(Vec::new()),
        };

        let mut alternatives = Vec::new();
        for offset in ALTERNATIVE_OFFSETS {
            let shifted = i32::from(minute_of_day) + offset;
            if shifted < 0 || shifted >= 24 * 60 {
                continue;
            }
            let candidate = shifted as u16;

            // inside opening hours, and not within the pre-close buffer
            if candidate < window.open {
                continue;
            }
            if u32::from(candidate) + DEFAULT_RESERVATION_MINUTES as u32 > u32::from(window.close) {
                continue;
            }
            if u32::from(candidate) + u32::from(CLOSING_BUFFER_MINUTES) > u32::from(window.close) {
                continue;
            }

            let slot = self.slot_at(date, candidate);
            let free = self.free_tables(restaurant, slot, guests).await?;
            if free.is_empty() {
                continue;
            }

            alternatives.push(AlternativeSlot {
                time: format_minutes(candidate),
                start_time: slot.start,
                tables: free,
            });
            if alternatives.len() == MAX_ALTERNATIVES {
                break;
            }
        }

        Ok(alternatives)
    }

    /// 步骤 1–4：占用集之外且容量足够的桌台
    async fn free_tables(
        &self,
        restaurant: &RecordId,
        slot: TimeSlot,
        guests: i32,
    ) -> BookingResult<Vec<AvailableTable>> {
        let overlapping = ReservationRepository::new(self.db.clone())
            .find_overlapping(restaurant, slot.start, slot.end)
            .await?;

        let occupied: HashSet<String> = overlapping
            .iter()
            .filter_map(|r| r.assigned_table.as_ref().map(|t| t.to_string()))
            .collect();

        let tables = DiningTableRepository::new(self.db.clone())
            .find_by_restaurant(restaurant)
            .await?;

        Ok(tables
            .iter()
            .filter(|t| t.seats >= guests)
            .filter(|t| {
                t.id.as_ref()
                    .map(|id| !occupied.contains(&id.to_string()))
                    .unwrap_or(false)
            })
            .map(AvailableTable::from)
            .collect())
    }

    fn slot_at(&self, date: NaiveDate, minute_of_day: u16) -> TimeSlot {
        let start = date_minute_to_millis(date, minute_of_day, self.tz);
        TimeSlot::from_start(start, DEFAULT_RESERVATION_MINUTES)
    }
}
