use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{PublishError, Publisher};

/// Pause before a failed message goes back on the queue, so a bus outage
/// does not turn into a hot loop.
pub const DEFAULT_REQUEUE_DELAY: Duration = Duration::from_secs(1);

/// Producer half of the mirror. Cheap to clone.
///
/// [`OutboundQueue::enqueue`] never waits: a full queue rejects the message.
#[derive(Clone, Debug)]
pub struct OutboundQueue {
    tx: mpsc::Sender<Vec<u8>>,
}

/// Consumer half, turned into a background task with
/// [`OutboundReceiver::spawn_drain`].
pub struct OutboundReceiver {
    rx: mpsc::Receiver<Vec<u8>>,
    requeue: mpsc::WeakSender<Vec<u8>>,
    requeue_delay: Duration,
}

impl OutboundQueue {
    /// Create a queue holding at most `capacity` messages.
    pub fn new(capacity: usize) -> (Self, OutboundReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let requeue = tx.downgrade();
        (
            Self { tx },
            OutboundReceiver {
                rx,
                requeue,
                requeue_delay: DEFAULT_REQUEUE_DELAY,
            },
        )
    }

    pub fn enqueue(&self, payload: Vec<u8>) -> Result<(), PublishError> {
        self.tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => PublishError::QueueFull,
            TrySendError::Closed(_) => PublishError::QueueClosed,
        })
    }

    /// Messages currently waiting to be published.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutboundReceiver {
    pub fn with_requeue_delay(mut self, delay: Duration) -> Self {
        self.requeue_delay = delay;
        self
    }

    /// Publish every queued message to `topic` until all [`OutboundQueue`]
    /// handles are dropped.
    ///
    /// Each message is published on its own task. On failure the message is
    /// put back on the queue after the requeue delay; if the queue is full or
    /// closed by then it is dropped.
    pub fn spawn_drain<P>(self, publisher: Arc<P>, topic: impl Into<String>) -> JoinHandle<()>
    where
        P: Publisher + ?Sized + 'static,
    {
        let topic: Arc<str> = Arc::from(topic.into());
        let Self {
            mut rx,
            requeue,
            requeue_delay,
        } = self;

        tokio::spawn(async move {
            info!(routine = "mirror", topic = %topic, "Started event mirror");

            while let Some(payload) = rx.recv().await {
                let publisher = publisher.clone();
                let topic = topic.clone();
                let requeue = requeue.clone();

                tokio::spawn(async move {
                    let Err(e) = publisher.publish(&topic, payload.clone()).await else {
                        debug!(topic = %topic, "Mirrored event");
                        return;
                    };

                    error!(topic = %topic, error = %e, "Message publish failed; will try again");
                    tokio::time::sleep(requeue_delay).await;

                    let Some(tx) = requeue.upgrade() else {
                        warn!(topic = %topic, "Outbound queue closed, dropping message");
                        return;
                    };
                    match tx.try_send(payload) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            warn!(topic = %topic, "Outbound queue full, dropping message");
                        }
                        Err(TrySendError::Closed(_)) => {
                            warn!(topic = %topic, "Outbound queue closed, dropping message");
                        }
                    }
                });
            }

            info!(routine = "mirror", "Event mirror stopped");
        })
    }
}
