//! NATS backend for [`Publisher`].

use async_nats::Client;
use async_trait::async_trait;
use tracing::{info, instrument};

use crate::{PublishError, Publisher};

/// Core NATS publisher. Fire-and-forget: no JetStream acknowledgement.
#[derive(Clone)]
pub struct NatsPublisher {
    client: Client,
}

impl NatsPublisher {
    pub async fn connect(url: &str) -> Result<Self, PublishError> {
        let client = async_nats::ConnectOptions::new()
            .name("module-update-router")
            .connect(url)
            .await
            .map_err(|e| PublishError::Connect(format!("{url}: {e}")))?;

        info!(url, "Connected to NATS");
        Ok(Self { client })
    }
}

#[async_trait]
impl Publisher for NatsPublisher {
    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        self.client
            .publish(topic.to_string(), payload.into())
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))
    }
}
