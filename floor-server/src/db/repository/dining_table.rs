//! Dining Table Repository
//!
//! 所有写入走 [`DiningTableRepository::update_checked`] 的版本检查路径；
//! 版本不匹配返回 `None`，由调用方决定重试或报冲突。

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record};
use crate::db::models::DiningTable;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = parse_record(id)?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// All tables of a restaurant, ordered by table number
    pub async fn find_by_restaurant(&self, restaurant: &RecordId) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE restaurant = $restaurant ORDER BY number")
            .bind(("restaurant", restaurant.to_string()))
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by number within a restaurant
    pub async fn find_by_number(
        &self,
        restaurant: &RecordId,
        number: i32,
    ) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM dining_table WHERE restaurant = $restaurant AND number = $number LIMIT 1",
            )
            .bind(("restaurant", restaurant.to_string()))
            .bind(("number", number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, table: DiningTable) -> RepoResult<DiningTable> {
        let created: Option<DiningTable> = self.base.db().create(TABLE).content(table).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Versioned full-row update (compare-and-swap)
    ///
    /// Writes every mutable field and bumps `version`, guarded by
    /// `WHERE version = $expected`. Returns `None` when a concurrent writer
    /// got there first.
    pub async fn update_checked(&self, table: &DiningTable) -> RepoResult<Option<DiningTable>> {
        let id = table
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Table has no id".to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET \
                    number = $number, \
                    seats = $seats, \
                    shape = $shape, \
                    radius = $radius, \
                    width = $width, \
                    height = $height, \
                    position = $position, \
                    section = $section, \
                    status = $status, \
                    current_reservation = $current_reservation, \
                    version = $next_version \
                 WHERE version = $expected_version \
                 RETURN AFTER",
            )
            .bind(("thing", id))
            .bind(("number", table.number))
            .bind(("seats", table.seats))
            .bind(("shape", table.shape))
            .bind(("radius", table.radius))
            .bind(("width", table.width))
            .bind(("height", table.height))
            .bind(("position", table.position))
            .bind(("section", table.section.clone()))
            .bind(("status", table.status))
            .bind((
                "current_reservation",
                table.current_reservation.as_ref().map(|r| r.to_string()),
            ))
            .bind(("next_version", table.version + 1))
            .bind(("expected_version", table.version))
            .await?;
        let updated: Vec<DiningTable> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Hard delete a dining table
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record(id)?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
