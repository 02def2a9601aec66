use async_trait::async_trait;

use crate::error::ChannelResult;

/// Module/account membership storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Number of membership rows for the pair.
    async fn count(&self, module: &str, account: &str) -> ChannelResult<u64>;

    /// Link `account` to `module`. Inserting an existing pair is a no-op.
    async fn insert_membership(&self, module: &str, account: &str) -> ChannelResult<()>;
}
