//! Reservation Repository
//!
//! 区间查询统一使用半开区间重叠判定：
//! `start_time < $end AND end_time > $start`。

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record};
use crate::db::models::{Reservation, ReservationStatus};

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find reservation by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let thing = parse_record(id)?;
        let reservation: Option<Reservation> = self.base.db().select(thing).await?;
        Ok(reservation)
    }

    /// Create a new reservation
    pub async fn create(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let created: Option<Reservation> =
            self.base.db().create(TABLE).content(reservation).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Non-cancelled reservations of a restaurant overlapping `[start, end)`
    pub async fn find_overlapping(
        &self,
        restaurant: &RecordId,
        start: i64,
        end: i64,
    ) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE restaurant = $restaurant \
                   AND status != 'CANCELLED' \
                   AND start_time < $end AND end_time > $start",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Active (non-cancelled, non-done) reservations bound to a table that
    /// overlap `[start, end)`, excluding the reservation being assigned
    pub async fn find_table_conflicts(
        &self,
        table: &RecordId,
        start: i64,
        end: i64,
        exclude: &RecordId,
    ) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE assigned_table = $table \
                   AND status != 'CANCELLED' AND status != 'DONE' \
                   AND id != $exclude \
                   AND start_time < $end AND end_time > $start",
            )
            .bind(("table", table.to_string()))
            .bind(("exclude", exclude.clone()))
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Non-cancelled reservations bound to a table within `[from, to)`,
    /// ordered by start time (the table's daily schedule)
    pub async fn find_for_table_between(
        &self,
        table: &RecordId,
        from: i64,
        to: i64,
    ) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE assigned_table = $table \
                   AND status != 'CANCELLED' \
                   AND start_time < $to AND end_time > $from \
                 ORDER BY start_time",
            )
            .bind(("table", table.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Non-cancelled reservations of a restaurant within `[from, to)`
    pub async fn find_for_restaurant_between(
        &self,
        restaurant: &RecordId,
        from: i64,
        to: i64,
    ) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE restaurant = $restaurant \
                   AND status != 'CANCELLED' \
                   AND start_time < $to AND end_time > $from \
                 ORDER BY start_time",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("from", from))
            .bind(("to", to))
            .await?
            .take(0)?;
        Ok(reservations)
    }

    /// Does any non-cancelled reservation with a future end reference this table?
    pub async fn has_future_for_table(&self, table: &RecordId, now: i64) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM reservation \
                 WHERE assigned_table = $table \
                   AND status != 'CANCELLED' \
                   AND end_time > $now \
                 LIMIT 1",
            )
            .bind(("table", table.to_string()))
            .bind(("now", now))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(!reservations.is_empty())
    }

    /// Update reservation status
    pub async fn update_status(
        &self,
        id: &str,
        status: ReservationStatus,
    ) -> RepoResult<Reservation> {
        let thing = parse_record(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;
        let updated: Vec<Reservation> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }

    /// Bind the reservation to a table
    pub async fn set_table(
        &self,
        id: &str,
        table: &RecordId,
        table_number: i32,
    ) -> RepoResult<Reservation> {
        let thing = parse_record(id)?;
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET assigned_table = $table, table_number = $number RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("table", table.to_string()))
            .bind(("number", table_number))
            .await?;
        let updated: Vec<Reservation> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }
}
