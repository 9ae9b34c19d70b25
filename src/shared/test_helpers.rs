#[cfg(test)]
use crate::features::files::store::SqliteFileStore;

#[cfg(test)]
use sqlx::sqlite::SqlitePoolOptions;

/// In-memory metadata store with migrations applied.
///
/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is limited to a single connection.
#[cfg(test)]
pub async fn memory_file_store() -> SqliteFileStore {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqliteFileStore::new(pool);
    store.migrate().await.unwrap();
    store
}
