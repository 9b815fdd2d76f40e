//! Assignment Coordinator
//!
//! 把预订绑定到具体桌台：
//!
//! - 桌台必须处于 available，容量足够，且窗口与该桌已有的
//!   非取消/非完成预订不重叠
//! - 成功后写入绑定；预订窗口含当前时刻且状态为 Seated 时桌台转
//!   occupied，状态为 Planning 时转 reserved
//! - 桌台写入走版本化 CAS；并发写入方竞争失败返回冲突而不是双重占用

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::{BookingError, BookingResult};
use super::interval::TimeSlot;
use crate::db::models::{DiningTable, Reservation, ReservationStatus, TableStatus};
use crate::db::repository::{DiningTableRepository, RepoError, ReservationRepository};
use crate::notify::EventNotifier;

/// Binds reservations to tables and drives table status
#[derive(Clone)]
pub struct AssignmentCoordinator {
    db: Surreal<Db>,
    notifier: Arc<EventNotifier>,
}

impl AssignmentCoordinator {
    pub fn new(db: Surreal<Db>, notifier: Arc<EventNotifier>) -> Self {
        Self { db, notifier }
    }

    /// Assign `reservation_id` to `table_id`; `now_ms` decides occupancy
    pub async fn assign_table(
        &self,
        table_id: &str,
        reservation_id: &str,
        now_ms: i64,
    ) -> BookingResult<(DiningTable, Reservation)> {
        let tables = DiningTableRepository::new(self.db.clone());
        let reservations = ReservationRepository::new(self.db.clone());

        let table = tables
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| BookingError::TableNotFound(table_id.to_string()))?;
        let reservation = reservations
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| BookingError::ReservationNotFound(reservation_id.to_string()))?;

        if table.status != TableStatus::Available {
            return Err(BookingError::TableNotAvailable {
                number: table.number,
            });
        }

        if table.seats < reservation.guests {
            return Err(BookingError::InsufficientCapacity {
                number: table.number,
                seats: table.seats,
                guests: reservation.guests,
            });
        }

        let table_ref = table
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("table record missing id".to_string()))?;
        let reservation_ref = reservation
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("reservation record missing id".to_string()))?;

        let conflicts = reservations
            .find_table_conflicts(
                &table_ref,
                reservation.start_time,
                reservation.end_time,
                &reservation_ref,
            )
            .await?;
        if !conflicts.is_empty() {
            return Err(BookingError::TimeConflict {
                number: table.number,
            });
        }

        // persist the binding first, then flip the table under CAS
        let reservation = reservations
            .set_table(reservation_id, &table_ref, table.number)
            .await?;

        let window = TimeSlot::new(reservation.start_time, reservation.end_time);
        let mut updated = table;
        if window.contains(now_ms) && reservation.status == ReservationStatus::Seated {
            updated.status = TableStatus::Occupied;
            updated.current_reservation = Some(reservation_ref);
        } else if reservation.status == ReservationStatus::Planning {
            updated.status = TableStatus::Reserved;
        }

        let number = updated.number;
        let stored = tables
            .update_checked(&updated)
            .await?
            .ok_or(BookingError::VersionConflict { number })?;

        self.notifier
            .reservation_assigned(&reservation, &stored)
            .await;

        Ok((stored, reservation))
    }
}
