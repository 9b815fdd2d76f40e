//! API view types
//!
//! Entities already serialize with "table:id" string ids; the views here
//! only add the per-table daily schedule used by the floor endpoints.

use std::collections::HashMap;

use serde::Serialize;

use crate::db::models::{ClientRef, DiningTable, Reservation, ReservationStatus};

/// Reservation as exposed by list endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub id: String,
    pub client: ClientRef,
    pub guests: i32,
    pub status: ReservationStatus,
    pub created_at: i64,
    pub start_time: i64,
    pub end_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
}

impl From<&Reservation> for ReservationView {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            client: r.client.clone(),
            guests: r.guests,
            status: r.status,
            created_at: r.created_at,
            start_time: r.start_time,
            end_time: r.end_time,
            table_id: r.assigned_table.as_ref().map(|t| t.to_string()),
            table_number: r.table_number,
        }
    }
}

impl From<Reservation> for ReservationView {
    fn from(r: Reservation) -> Self {
        ReservationView::from(&r)
    }
}

/// Table with its schedule for one day
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    #[serde(flatten)]
    pub table: DiningTable,
    pub reservations: Vec<ReservationView>,
}

/// Pair tables with their reservations for the day
pub fn tables_with_schedule(
    tables: Vec<DiningTable>,
    reservations: Vec<Reservation>,
) -> Vec<TableView> {
    let mut by_table: HashMap<String, Vec<ReservationView>> = HashMap::new();
    for reservation in &reservations {
        if let Some(table_id) = reservation.assigned_table.as_ref() {
            by_table
                .entry(table_id.to_string())
                .or_default()
                .push(ReservationView::from(reservation));
        }
    }

    tables
        .into_iter()
        .map(|table| {
            let key = table.id.as_ref().map(|t| t.to_string()).unwrap_or_default();
            let reservations = by_table.remove(&key).unwrap_or_default();
            TableView {
                table,
                reservations,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ClientKind, Position, TableShape, TableStatus};
    use surrealdb::RecordId;

    fn table(key: &str, number: i32) -> DiningTable {
        DiningTable {
            id: Some(RecordId::from_table_key("dining_table", key)),
            restaurant: RecordId::from_table_key("restaurant", "r1"),
            number,
            seats: 4,
            shape: TableShape::Square,
            radius: None,
            width: Some(1.0),
            height: Some(1.0),
            position: Position::default(),
            section: None,
            status: TableStatus::Available,
            current_reservation: None,
            version: 0,
        }
    }

    fn reservation(table_key: Option<&str>) -> Reservation {
        Reservation {
            id: Some(RecordId::from_table_key("reservation", "x")),
            restaurant: RecordId::from_table_key("restaurant", "r1"),
            client: ClientRef {
                kind: ClientKind::Guest,
                id: RecordId::from_table_key("guest_client", "g"),
            },
            guests: 2,
            status: ReservationStatus::Planning,
            created_at: 0,
            start_time: 1_000,
            end_time: 2_000,
            assigned_table: table_key.map(|k| RecordId::from_table_key("dining_table", k)),
            table_number: None,
        }
    }

    #[test]
    fn schedule_groups_by_table() {
        let views = tables_with_schedule(
            vec![table("a", 1), table("b", 2)],
            vec![reservation(Some("a")), reservation(None)],
        );
        assert_eq!(views[0].reservations.len(), 1);
        assert!(views[1].reservations.is_empty());
    }
}
