//! Reservation Model
//!
//! 预订实体。时间窗口为半开区间 `[start_time, end_time)`，Unix millis。
//! 客户身份是 registered/guest 双态引用，核心逻辑不关心注册细节。

use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;

use super::serde_helpers;

/// Reservation status
///
/// Transitions: Planning → Seated → Done; Planning/Seated → Cancelled.
/// Nothing leaves Done or Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Planning,
    Seated,
    Done,
    Cancelled,
}

impl ReservationStatus {
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Planning, Seated) | (Seated, Done) | (Planning, Cancelled) | (Seated, Cancelled)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReservationStatus::Planning => "Planning",
            ReservationStatus::Seated => "Seated",
            ReservationStatus::Done => "Done",
            ReservationStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

/// Which client table a [`ClientRef`] points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientKind {
    Registered,
    Guest,
}

/// Tagged client reference: registered or guest, never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub kind: ClientKind,
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
}

impl ClientRef {
    pub fn registered(id: RecordId) -> Self {
        Self {
            kind: ClientKind::Registered,
            id,
        }
    }

    pub fn guest(id: RecordId) -> Self {
        Self {
            kind: ClientKind::Guest,
            id,
        }
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub restaurant: RecordId,
    pub client: ClientRef,
    pub guests: i32,
    pub status: ReservationStatus,
    /// Unix millis
    pub created_at: i64,
    /// Window start, Unix millis (inclusive)
    pub start_time: i64,
    /// Window end, Unix millis (exclusive); always > start_time
    pub end_time: i64,
    /// Attached later by the assignment coordinator
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub assigned_table: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn happy_path_transitions() {
        assert!(Planning.can_transition_to(Seated));
        assert!(Seated.can_transition_to(Done));
        assert!(Planning.can_transition_to(Cancelled));
        assert!(Seated.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_are_final() {
        for next in [Planning, Seated, Done, Cancelled] {
            assert!(!Done.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn no_shortcuts() {
        // Planning cannot jump straight to Done
        assert!(!Planning.can_transition_to(Done));
        assert!(!Seated.can_transition_to(Planning));
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_value(Planning).unwrap(), "PLANNING");
        assert_eq!(serde_json::to_value(Cancelled).unwrap(), "CANCELLED");
    }
}
