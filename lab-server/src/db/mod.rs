//! Database Module
//!
//! Embedded SurrealDB handle and schema bootstrap.

pub mod models;
pub mod repository;

use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

use crate::utils::AppError;

const NAMESPACE: &str = "lab";
const DATABASE: &str = "orders";

/// Index definitions, mirroring the query patterns of the repositories:
/// owner-scoped listing/filtering on orders, unique email lookup on users.
const SCHEMA: &str = r#"
    DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS order_owner_created ON TABLE order FIELDS user_id, created_at;
    DEFINE INDEX IF NOT EXISTS order_owner_state ON TABLE order FIELDS user_id, state;
    DEFINE INDEX IF NOT EXISTS order_owner_status ON TABLE order FIELDS user_id, status;
    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS user_email ON TABLE user FIELDS email UNIQUE;
"#;

/// Database service owning the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::bootstrap(db).await?;
        tracing::info!(path = %db_path, "Database connection established");
        Ok(service)
    }

    /// Open a fresh in-memory database. Used by the test suites in place of
    /// the on-disk engine; everything above the engine is identical.
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::bootstrap(db).await
    }

    async fn bootstrap(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        Ok(Self { db })
    }
}
