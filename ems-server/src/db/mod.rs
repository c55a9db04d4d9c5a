//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend). Repositories issue bound
//! SurrealQL queries against a shared `Surreal<Db>` handle.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "ems";
const DATABASE: &str = "ems";

/// Open the embedded database under `work_dir/database`
pub async fn connect(work_dir: &str) -> Result<Surreal<Db>, AppError> {
    let path = format!("{}/database", work_dir);
    let db = Surreal::new::<RocksDb>(path.as_str())
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    tracing::info!("Database opened at {}", path);
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_opens_rocksdb_under_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().to_str().unwrap();

        let db = connect(work_dir).await.unwrap();
        db.query("CREATE department SET name = 'Operations', created_at = 0")
            .await
            .unwrap();

        assert!(dir.path().join("database").exists());
    }
}
