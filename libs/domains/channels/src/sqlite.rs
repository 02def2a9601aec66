use async_trait::async_trait;
use database::Store;
use sqlx::{Row, Statement};

use crate::error::ChannelResult;
use crate::repository::MembershipRepository;

const COUNT_SQL: &str =
    "SELECT COUNT(*) FROM accounts_modules WHERE module_name = ? AND account_id = ?";
const INSERT_SQL: &str =
    "INSERT OR IGNORE INTO accounts_modules (module_name, account_id) VALUES (?, ?)";

/// [`MembershipRepository`] over the `accounts_modules` table.
#[derive(Clone)]
pub struct SqliteMembershipRepository {
    store: Store,
}

impl SqliteMembershipRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MembershipRepository for SqliteMembershipRepository {
    async fn count(&self, module: &str, account: &str) -> ChannelResult<u64> {
        let statement = self.store.prepared(COUNT_SQL).await?;
        let row = statement
            .query()
            .bind(module)
            .bind(account)
            .fetch_one(self.store.pool())
            .await?;
        let count: i64 = row.try_get(0)?;
        Ok(count.max(0) as u64)
    }

    async fn insert_membership(&self, module: &str, account: &str) -> ChannelResult<()> {
        let statement = self.store.prepared(INSERT_SQL).await?;
        let result = statement
            .query()
            .bind(module)
            .bind(account)
            .execute(self.store.pool())
            .await?;
        tracing::debug!(
            module,
            account,
            inserted = result.rows_affected(),
            "Membership stored"
        );
        Ok(())
    }
}
