//! Prepared statement cache keyed by query text.

use sqlx::sqlite::{SqlitePool, SqliteStatement};
use sqlx::{Executor, Statement};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::common::DatabaseResult;

/// Parsed statement metadata, one entry per distinct query text.
///
/// A cached [`SqliteStatement`] holds the SQL plus its parameter and column
/// descriptions; it is not tied to a connection, and each pooled connection
/// still prepares it in its own sqlx statement cache on first execution.
///
/// Entries are created lazily on first use and never evicted. When two tasks
/// miss on the same text concurrently both prepare, the first insert wins and
/// the loser's value is dropped before it is ever handed out.
#[derive(Default)]
pub struct StatementCache {
    statements: RwLock<HashMap<String, Arc<SqliteStatement<'static>>>>,
}

impl StatementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached statement for `sql`, preparing it on a miss.
    pub async fn get_or_prepare(
        &self,
        pool: &SqlitePool,
        sql: &str,
    ) -> DatabaseResult<Arc<SqliteStatement<'static>>> {
        if let Some(statement) = self.lookup(sql) {
            return Ok(statement);
        }

        let prepared = pool.prepare(sql).await?;
        let prepared = Arc::new(Statement::to_owned(&prepared));

        let mut statements = self
            .statements
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let statement = statements
            .entry(sql.to_string())
            .or_insert_with(|| {
                debug!(sql, "Prepared statement cached");
                prepared
            })
            .clone();
        Ok(statement)
    }

    fn lookup(&self, sql: &str) -> Option<Arc<SqliteStatement<'static>>> {
        self.statements
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(sql)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.statements
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached statement.
    pub fn clear(&self) {
        self.statements
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_same_text_reuses_handle() {
        let pool = pool().await;
        let cache = StatementCache::new();

        let first = cache.get_or_prepare(&pool, "SELECT 1").await.unwrap();
        let second = cache.get_or_prepare(&pool, "SELECT 1").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cached_statement_is_not_tied_to_a_connection() {
        let cache = StatementCache::new();
        let statement = cache.get_or_prepare(&pool().await, "SELECT 7 AS n").await.unwrap();

        assert_eq!(statement.sql(), "SELECT 7 AS n");
        assert_eq!(statement.columns().len(), 1);

        let other = pool().await;
        let row = statement.query().fetch_one(&other).await.unwrap();
        assert_eq!(sqlx::Row::get::<i64, _>(&row, "n"), 7);
    }

    #[tokio::test]
    async fn test_distinct_text_gets_distinct_entries() {
        let pool = pool().await;
        let cache = StatementCache::new();

        cache.get_or_prepare(&pool, "SELECT 1").await.unwrap();
        cache.get_or_prepare(&pool, "SELECT 2").await.unwrap();

        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_converge_on_one_entry() {
        let pool = pool().await;
        let cache = Arc::new(StatementCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let pool = pool.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_prepare(&pool, "SELECT 1 + 1")
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut statements = Vec::new();
        for handle in handles {
            statements.push(handle.await.unwrap());
        }

        assert_eq!(cache.len(), 1);
        let cached = cache.get_or_prepare(&pool, "SELECT 1 + 1").await.unwrap();
        assert!(statements.iter().all(|s| Arc::ptr_eq(s, &cached)));
    }

    #[tokio::test]
    async fn test_invalid_sql_is_not_cached() {
        let pool = pool().await;
        let cache = StatementCache::new();

        assert!(cache.get_or_prepare(&pool, "SELEC nothing").await.is_err());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let pool = pool().await;
        let cache = StatementCache::new();
        cache.get_or_prepare(&pool, "SELECT 1").await.unwrap();

        cache.clear();

        assert!(cache.is_empty());
    }
}
