//! Database Module
//!
//! 嵌入式 SurrealDB (RocksDB 引擎)。启动时应用 schema 定义；
//! 测试使用内存引擎。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "floor";
const DATABASE: &str = "floor";

/// 唯一索引保证桌号/邮箱的复合唯一性；
/// 其余索引服务于按餐厅/按桌台的区间查询。
const SCHEMA: &str = "\
    DEFINE INDEX IF NOT EXISTS uniq_dining_table_number ON TABLE dining_table FIELDS restaurant, number UNIQUE;\n\
    DEFINE INDEX IF NOT EXISTS idx_reservation_restaurant ON TABLE reservation FIELDS restaurant;\n\
    DEFINE INDEX IF NOT EXISTS idx_reservation_table ON TABLE reservation FIELDS assigned_table;\n\
    DEFINE INDEX IF NOT EXISTS uniq_registered_client_email ON TABLE registered_client FIELDS email UNIQUE;\n\
    DEFINE INDEX IF NOT EXISTS uniq_guest_client_email ON TABLE guest_client FIELDS email UNIQUE;\n";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(db).await
    }

    /// In-memory database (tests, oneshot tooling)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema statement failed: {e}")))?;

        tracing::info!("Database ready (SurrealDB embedded)");
        Ok(Self { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_on_disk_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.db");
        let service = DbService::new(&path.to_string_lossy()).await.unwrap();
        service.db.query("INFO FOR DB").await.unwrap();
    }

    #[tokio::test]
    async fn unique_table_number_index_is_enforced() {
        let service = DbService::memory().await.unwrap();
        service
            .db
            .query("CREATE dining_table SET restaurant = 'restaurant:a', number = 1")
            .await
            .unwrap()
            .check()
            .unwrap();
        let result = service
            .db
            .query("CREATE dining_table SET restaurant = 'restaurant:a', number = 1")
            .await
            .unwrap()
            .check();
        assert!(result.is_err());
    }
}
