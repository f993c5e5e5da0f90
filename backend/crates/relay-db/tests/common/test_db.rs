#![allow(dead_code)]

use relay_db::{DEFAULT_SEARCH_LIMIT, SqliteStore, StoreOptions, open_in_memory_pool};

use std::path::Path;

use sqlx::SqlitePool;

/// In-memory store on a single connection
pub async fn create_test_store() -> SqliteStore {
    let pool = open_in_memory_pool()
        .await
        .expect("Failed to create test pool");
    SqliteStore::new(pool, DEFAULT_SEARCH_LIMIT)
}

pub async fn create_test_store_with_limit(limit: u32) -> SqliteStore {
    let pool = open_in_memory_pool()
        .await
        .expect("Failed to create test pool");
    SqliteStore::new(pool, limit)
}

/// File-backed store with several connections, for concurrency tests
pub async fn create_file_store(dir: &Path) -> SqliteStore {
    let options = StoreOptions::new(dir.join("events.db"));
    SqliteStore::connect(&options, DEFAULT_SEARCH_LIMIT)
        .await
        .expect("Failed to open file store")
}

/// Column names of `table` in table order
pub async fn column_names(pool: &SqlitePool, table: &str) -> Vec<String> {
    // Use sqlx::query (not query!) to avoid offline mode issues in tests
    sqlx::query_scalar("SELECT name FROM pragma_table_info(?) ORDER BY cid")
        .bind(table)
        .fetch_all(pool)
        .await
        .expect("Failed to read columns")
}

pub async fn row_count(pool: &SqlitePool, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM \"{}\"", table);
    sqlx::query_scalar(&sql)
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
