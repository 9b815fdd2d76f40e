//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod client;
pub mod dining_table;
pub mod reservation;
pub mod restaurant;

// Re-exports
pub use client::ClientRepository;
pub use dining_table::DiningTableRepository;
pub use reservation::ReservationRepository;
pub use restaurant::RestaurantRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "dining_table:abc".parse()?;
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId
//
// 记录之间的引用字段 (restaurant, assigned_table, client.id) 一律以
// "table:id" 字符串形式入库；查询时绑定 to_string() 后的值，
// 保证比较两侧类型一致。

/// Parse a "table:id" string into a RecordId
pub fn parse_record(id: &str) -> RepoResult<RecordId> {
    id.parse::<RecordId>()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
