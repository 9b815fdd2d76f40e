//! Dining Table Model
//!
//! 桌台实体：每家餐厅内桌号唯一，形状决定必填尺寸字段。
//! `version` 用于乐观并发控制，所有写入都带版本检查。

use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;

use super::serde_helpers;

/// Geometric shape on the floor plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableShape {
    Round,
    Rectangle,
    Square,
}

impl TableShape {
    /// The dimension fields this shape requires
    pub fn required_dimensions(&self) -> &'static str {
        match self {
            TableShape::Round => "radius",
            TableShape::Rectangle | TableShape::Square => "width and height",
        }
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableShape::Round => write!(f, "round"),
            TableShape::Rectangle => write!(f, "rectangle"),
            TableShape::Square => write!(f, "square"),
        }
    }
}

/// Table status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Reserved,
    Occupied,
    Maintenance,
    Inactive,
}

impl TableStatus {
    /// Statuses an operator may set directly via the status endpoint.
    ///
    /// `reserved` and `occupied` are only ever written by the assignment
    /// coordinator or the reservation-Seated trigger.
    pub fn directly_settable(&self) -> bool {
        matches!(
            self,
            TableStatus::Available | TableStatus::Maintenance | TableStatus::Inactive
        )
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableStatus::Available => "available",
            TableStatus::Reserved => "reserved",
            TableStatus::Occupied => "occupied",
            TableStatus::Maintenance => "maintenance",
            TableStatus::Inactive => "inactive",
        };
        f.write_str(s)
    }
}

/// Floor-plan coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    /// Restaurant reference
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    /// Unique within the restaurant
    pub number: i32,
    pub seats: i32,
    pub shape: TableShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub status: TableStatus,
    /// The reservation occupying the table right now, if any
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub current_reservation: Option<RecordId>,
    /// Optimistic concurrency counter, bumped on every write
    #[serde(default)]
    pub version: i64,
}

impl DiningTable {
    /// Shape-specific dimension check: round needs a radius,
    /// rectangle/square need width and height.
    pub fn dimensions_valid(
        shape: TableShape,
        radius: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    ) -> bool {
        match shape {
            TableShape::Round => radius.is_some(),
            TableShape::Rectangle | TableShape::Square => width.is_some() && height.is_some(),
        }
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    /// "restaurant:id" reference
    pub restaurant_id: String,
    pub number: i32,
    pub seats: i32,
    pub shape: TableShape,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub status: Option<TableStatus>,
}

/// Update table details payload; only supplied fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    #[serde(default)]
    pub seats: Option<i32>,
    #[serde(default)]
    pub shape: Option<TableShape>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub status: Option<TableStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_rules_per_shape() {
        assert!(DiningTable::dimensions_valid(TableShape::Round, Some(0.6), None, None));
        assert!(!DiningTable::dimensions_valid(TableShape::Round, None, Some(1.0), Some(1.0)));
        assert!(DiningTable::dimensions_valid(
            TableShape::Rectangle,
            None,
            Some(1.2),
            Some(0.8)
        ));
        assert!(!DiningTable::dimensions_valid(TableShape::Square, None, Some(1.0), None));
    }

    #[test]
    fn only_idle_statuses_are_directly_settable() {
        assert!(TableStatus::Available.directly_settable());
        assert!(TableStatus::Maintenance.directly_settable());
        assert!(TableStatus::Inactive.directly_settable());
        assert!(!TableStatus::Reserved.directly_settable());
        assert!(!TableStatus::Occupied.directly_settable());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(TableStatus::Maintenance).unwrap(),
            "maintenance"
        );
        assert_eq!(serde_json::to_value(TableShape::Round).unwrap(), "round");
    }
}
