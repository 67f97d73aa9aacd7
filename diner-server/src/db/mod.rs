//! Database Module
//!
//! Embedded SurrealDB connection plus the repository layer.

pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, SurrealKv};

use crate::utils::AppError;

const NAMESPACE: &str = "diner";
const DATABASE: &str = "diner";

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the persistent store under `data_dir`
    pub async fn new(data_dir: &Path) -> Result<Self, AppError> {
        let path = data_dir.join("diner.db");
        let db = Surreal::new::<SurrealKv>(path.to_string_lossy().as_ref())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        tracing::info!(path = %path.display(), "Database connection established (SurrealKV)");
        Self::select(db).await
    }

    /// Volatile store, gone when the process exits
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::select(db).await
    }

    async fn select(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        Ok(Self { db })
    }
}
