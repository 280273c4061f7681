//! Server State
//!
//! Shared handles for every request: configuration, the embedded database,
//! and the JWT service. Cloning is shallow (Arc / handle copies).

use std::fs;
use std::sync::Arc;

use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use crate::auth::{JwtConfig, JwtService};
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT service (Arc shared ownership)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize server state: working directory, on-disk database, JWT.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_dir = config.database_dir();
        fs::create_dir_all(&db_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = db_dir.join("lab.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
        })
    }

    /// Initialize with an in-memory database. Test seam: everything above
    /// the storage engine behaves identically.
    pub async fn initialize_in_memory(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::open_in_memory().await?;
        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service: Arc::new(JwtService::with_config(JwtConfig {
                secret: "test-secret-key-at-least-32-characters!!".to_string(),
                ..config.jwt.clone()
            })),
        })
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// JWT service handle
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
