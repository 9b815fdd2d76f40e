//! Reservation Store
//!
//! 预订生命周期：创建 (Planning) → 入座 (Seated) → 完成 (Done)，
//! Planning/Seated 可取消。创建时校验营业时间；转入 Seated 时若已
//! 绑定桌台则同步将桌台置为 occupied。

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::{BookingError, BookingResult};
use super::DEFAULT_RESERVATION_MINUTES;
use crate::db::models::{ClientRef, Reservation, ReservationStatus, TableStatus};
use crate::db::repository::{
    DiningTableRepository, RepoError, ReservationRepository, RestaurantRepository, parse_record,
};
use crate::notify::EventNotifier;
use crate::utils::time::date_minute_to_millis;

/// Input for a new reservation
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub restaurant_id: String,
    pub client: ClientRef,
    pub guests: i32,
    pub date: NaiveDate,
    pub minute_of_day: u16,
    /// Defaults to the canonical 90 minutes
    pub duration_minutes: Option<i64>,
}

/// Owns reservation records and their status machine
#[derive(Clone)]
pub struct ReservationService {
    db: Surreal<Db>,
    notifier: Arc<EventNotifier>,
    tz: Tz,
}

impl ReservationService {
    pub fn new(db: Surreal<Db>, notifier: Arc<EventNotifier>, tz: Tz) -> Self {
        Self { db, notifier, tz }
    }

    fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.db.clone())
    }

    /// Create a reservation inside the restaurant's opening hours
    pub async fn create(&self, input: NewReservation, now_ms: i64) -> BookingResult<Reservation> {
        let rid = parse_record(&input.restaurant_id)?;
        let restaurant = RestaurantRepository::new(self.db.clone())
            .find_by_id(&input.restaurant_id)
            .await?
            .ok_or_else(|| BookingError::RestaurantNotFound(input.restaurant_id.clone()))?;

        let duration = input.duration_minutes.unwrap_or(DEFAULT_RESERVATION_MINUTES);
        if duration <= 0 {
            return Err(RepoError::Validation(
                "duration_minutes must be positive".to_string(),
            )
            .into());
        }

        let schedule = restaurant.opening_hours.compile()?;
        let window = schedule
            .window_for(input.date.weekday())
            .ok_or(BookingError::RestaurantClosed)?;
        let end_minute = u32::from(input.minute_of_day) + duration as u32;
        if input.minute_of_day < window.open || end_minute > u32::from(window.close) {
            return Err(BookingError::RestaurantClosed);
        }

        let start_time = date_minute_to_millis(input.date, input.minute_of_day, self.tz);
        let reservation = Reservation {
            id: None,
            restaurant: rid,
            client: input.client,
            guests: input.guests,
            status: ReservationStatus::Planning,
            created_at: now_ms,
            start_time,
            end_time: start_time + duration * 60_000,
            assigned_table: None,
            table_number: None,
        };

        Ok(self.reservations().create(reservation).await?)
    }

    /// Apply a status transition, enforcing the reservation state machine
    ///
    /// A transition to Seated on a reservation with an assigned table also
    /// marks that table occupied (the "guests arrived" trigger).
    pub async fn update_status(
        &self,
        reservation_id: &str,
        next: ReservationStatus,
    ) -> BookingResult<Reservation> {
        let reservation = self
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| BookingError::ReservationNotFound(reservation_id.to_string()))?;

        if !reservation.status.can_transition_to(next) {
            return Err(BookingError::InvalidTransition {
                from: reservation.status,
                to: next,
            });
        }

        let updated = self.reservations().update_status(reservation_id, next).await?;

        if next == ReservationStatus::Seated
            && let Some(table_ref) = updated.assigned_table.clone()
        {
            self.occupy_table(&table_ref.to_string(), &updated).await?;
        }

        Ok(updated)
    }

    /// Cancel a reservation and notify the restaurant
    pub async fn cancel(&self, reservation_id: &str) -> BookingResult<Reservation> {
        let reservation = self
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| BookingError::ReservationNotFound(reservation_id.to_string()))?;

        if !reservation
            .status
            .can_transition_to(ReservationStatus::Cancelled)
        {
            return Err(BookingError::InvalidTransition {
                from: reservation.status,
                to: ReservationStatus::Cancelled,
            });
        }

        let cancelled = self
            .reservations()
            .update_status(reservation_id, ReservationStatus::Cancelled)
            .await?;

        self.notifier.order_cancelled(&cancelled).await;
        Ok(cancelled)
    }

    /// reserved → occupied when the party is seated
    async fn occupy_table(&self, table_id: &str, reservation: &Reservation) -> BookingResult<()> {
        let tables = DiningTableRepository::new(self.db.clone());
        let mut table = match tables.find_by_id(table_id).await? {
            Some(t) => t,
            None => {
                // binding points at a deleted table; the reservation status
                // change itself stays valid
                tracing::warn!(table_id, "Seated reservation references missing table");
                return Ok(());
            }
        };

        table.status = TableStatus::Occupied;
        table.current_reservation = reservation.id.clone();
        let number = table.number;
        let stored = tables
            .update_checked(&table)
            .await?
            .ok_or(BookingError::VersionConflict { number })?;

        self.notifier.table_status_updated(&stored);
        Ok(())
    }
}
