use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to connect to message bus: {0}")]
    Connect(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The outbound queue is at capacity; the message was not accepted.
    #[error("outbound queue is full")]
    QueueFull,

    /// The drain side of the queue has gone away.
    #[error("outbound queue is closed")]
    QueueClosed,
}
