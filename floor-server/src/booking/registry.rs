//! Table Registry
//!
//! 桌台登记：每家餐厅内桌号唯一，删除前校验当前与未来预订。
//! 直接状态设置只允许 available / maintenance / inactive；
//! reserved / occupied 由指派协调器写入。

use std::sync::Arc;

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::{BookingError, BookingResult};
use crate::db::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, Position, TableShape, TableStatus,
};
use crate::db::repository::{
    DiningTableRepository, RepoError, ReservationRepository, RestaurantRepository, parse_record,
};
use crate::notify::EventNotifier;

/// One table's new floor-plan position in a bulk layout save
#[derive(Debug, Clone, Deserialize)]
pub struct TableMove {
    pub table_id: String,
    pub x: f64,
    pub y: f64,
}

/// Authoritative set of physical tables per restaurant
#[derive(Clone)]
pub struct TableRegistry {
    db: Surreal<Db>,
    notifier: Arc<EventNotifier>,
}

impl TableRegistry {
    pub fn new(db: Surreal<Db>, notifier: Arc<EventNotifier>) -> Self {
        Self { db, notifier }
    }

    fn tables(&self) -> DiningTableRepository {
        DiningTableRepository::new(self.db.clone())
    }

    fn reservations(&self) -> ReservationRepository {
        ReservationRepository::new(self.db.clone())
    }

    fn restaurants(&self) -> RestaurantRepository {
        RestaurantRepository::new(self.db.clone())
    }

    /// All tables of a restaurant, ordered by number
    pub async fn list_tables(&self, restaurant_id: &str) -> BookingResult<Vec<DiningTable>> {
        let rid = parse_record(restaurant_id)?;
        if self.restaurants().find_by_id(restaurant_id).await?.is_none() {
            return Err(BookingError::RestaurantNotFound(restaurant_id.to_string()));
        }
        Ok(self.tables().find_by_restaurant(&rid).await?)
    }

    /// Create a table; fails on duplicate number or missing dimensions
    pub async fn create_table(&self, input: DiningTableCreate) -> BookingResult<DiningTable> {
        let rid = parse_record(&input.restaurant_id)?;
        if self
            .restaurants()
            .find_by_id(&input.restaurant_id)
            .await?
            .is_none()
        {
            return Err(BookingError::RestaurantNotFound(input.restaurant_id.clone()));
        }

        if !DiningTable::dimensions_valid(input.shape, input.radius, input.width, input.height) {
            return Err(BookingError::InvalidShapeDimensions {
                shape: input.shape.to_string(),
                required: input.shape.required_dimensions(),
            });
        }

        if self
            .tables()
            .find_by_number(&rid, input.number)
            .await?
            .is_some()
        {
            return Err(BookingError::DuplicateTable {
                number: input.number,
            });
        }

        // only the active shape's dimensions are stored
        let (radius, width, height) = match input.shape {
            TableShape::Round => (input.radius, None, None),
            TableShape::Rectangle | TableShape::Square => (None, input.width, input.height),
        };

        let table = DiningTable {
            id: None,
            restaurant: rid,
            number: input.number,
            seats: input.seats,
            shape: input.shape,
            radius,
            width,
            height,
            position: input.position.unwrap_or_default(),
            section: input.section,
            status: input.status.unwrap_or(TableStatus::Available),
            current_reservation: None,
            version: 0,
        };

        let created = self.tables().create(table).await?;
        self.notifier.table_added(&created);
        Ok(created)
    }

    /// Move a single table on the floor plan
    pub async fn update_position(
        &self,
        table_id: &str,
        x: f64,
        y: f64,
    ) -> BookingResult<DiningTable> {
        let mut table = self.get_table(table_id).await?;
        table.position = Position { x, y };
        let updated = self.write_checked(table).await?;
        self.notifier.table_position_updated(&updated);
        Ok(updated)
    }

    /// Partial details update; changing shape swaps the dimension fields
    pub async fn update_details(
        &self,
        table_id: &str,
        update: DiningTableUpdate,
    ) -> BookingResult<DiningTable> {
        let mut table = self.get_table(table_id).await?;

        if let Some(seats) = update.seats {
            table.seats = seats;
        }
        if let Some(section) = update.section {
            table.section = Some(section);
        }

        match update.shape {
            Some(new_shape) if new_shape != table.shape => {
                // the previous shape's dimensions are cleared, so the new
                // shape's dimensions must arrive in this same update
                if !DiningTable::dimensions_valid(
                    new_shape,
                    update.radius,
                    update.width,
                    update.height,
                ) {
                    return Err(BookingError::InvalidShapeDimensions {
                        shape: new_shape.to_string(),
                        required: new_shape.required_dimensions(),
                    });
                }
                table.shape = new_shape;
                match new_shape {
                    TableShape::Round => {
                        table.radius = update.radius;
                        table.width = None;
                        table.height = None;
                    }
                    TableShape::Rectangle | TableShape::Square => {
                        table.radius = None;
                        table.width = update.width;
                        table.height = update.height;
                    }
                }
            }
            _ => match table.shape {
                TableShape::Round => {
                    if update.radius.is_some() {
                        table.radius = update.radius;
                    }
                }
                TableShape::Rectangle | TableShape::Square => {
                    if update.width.is_some() {
                        table.width = update.width;
                    }
                    if update.height.is_some() {
                        table.height = update.height;
                    }
                }
            },
        }

        if let Some(status) = update.status {
            Self::apply_status(&mut table, status)?;
        }

        let updated = self.write_checked(table).await?;
        self.notifier.table_details_updated(&updated);
        Ok(updated)
    }

    /// Set table status directly
    pub async fn set_status(
        &self,
        table_id: &str,
        status: TableStatus,
    ) -> BookingResult<DiningTable> {
        let mut table = self.get_table(table_id).await?;
        Self::apply_status(&mut table, status)?;
        let updated = self.write_checked(table).await?;
        self.notifier.table_status_updated(&updated);
        Ok(updated)
    }

    /// Delete a table with no current and no upcoming reservations
    pub async fn delete_table(&self, table_id: &str, now_ms: i64) -> BookingResult<DiningTable> {
        let table = self.get_table(table_id).await?;

        if table.current_reservation.is_some() {
            return Err(BookingError::HasActiveReservation {
                number: table.number,
            });
        }

        let tid = table
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("table record missing id".to_string()))?;
        if self
            .reservations()
            .has_future_for_table(&tid, now_ms)
            .await?
        {
            return Err(BookingError::HasFutureReservations {
                number: table.number,
            });
        }

        self.tables().delete(table_id).await?;
        self.notifier
            .table_deleted(&table.restaurant, table_id, table.number);
        Ok(table)
    }

    /// Bulk position save from the floor editor
    pub async fn update_layout(
        &self,
        restaurant_id: &str,
        moves: Vec<TableMove>,
    ) -> BookingResult<Vec<DiningTable>> {
        let rid = parse_record(restaurant_id)?;
        if self.restaurants().find_by_id(restaurant_id).await?.is_none() {
            return Err(BookingError::RestaurantNotFound(restaurant_id.to_string()));
        }

        let mut updated = Vec::with_capacity(moves.len());
        for mv in moves {
            let mut table = self.get_table(&mv.table_id).await?;
            if table.restaurant != rid {
                return Err(BookingError::TableNotFound(mv.table_id.clone()));
            }
            table.position = Position { x: mv.x, y: mv.y };
            updated.push(self.write_checked(table).await?);
        }

        self.notifier.floor_layout_updated(&rid, &updated);
        Ok(updated)
    }

    async fn get_table(&self, table_id: &str) -> BookingResult<DiningTable> {
        self.tables()
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| BookingError::TableNotFound(table_id.to_string()))
    }

    fn apply_status(table: &mut DiningTable, status: TableStatus) -> BookingResult<()> {
        if !status.directly_settable() {
            return Err(BookingError::StatusNotSettable(status));
        }
        if status == TableStatus::Available {
            table.current_reservation = None;
        }
        table.status = status;
        Ok(())
    }

    async fn write_checked(&self, table: DiningTable) -> BookingResult<DiningTable> {
        let number = table.number;
        self.tables()
            .update_checked(&table)
            .await?
            .ok_or(BookingError::VersionConflict { number })
    }
}
