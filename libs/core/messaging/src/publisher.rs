use async_trait::async_trait;

use crate::PublishError;

/// Sends one message to a topic. Implementations must be cheap to share
/// between tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError>;
}
