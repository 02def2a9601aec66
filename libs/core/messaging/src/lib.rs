//! Best-effort mirroring of recorded events to a message bus.
//!
//! Producers hand serialized messages to an [`OutboundQueue`]; a background
//! drain task publishes them through a [`Publisher`]. A publish that fails is
//! pushed back onto the same in-memory queue once, and dropped with a warning
//! if the queue is full at that moment.
//!
//! # Delivery guarantees
//!
//! None beyond "usually". The queue lives in process memory: anything still
//! queued or being retried is lost when the process exits, and there is no
//! acknowledgement or persistence. Do not rely on this crate where
//! at-least-once delivery matters.
//!
//! # Example
//!
//! ```rust,ignore
//! use messaging::{OutboundQueue, nats::NatsPublisher};
//!
//! let publisher = Arc::new(NatsPublisher::connect("nats://localhost:4222").await?);
//! let (queue, receiver) = OutboundQueue::new(1000);
//! let drain = receiver.spawn_drain(publisher, "client-metrics");
//!
//! queue.enqueue(serde_json::to_vec(&event)?)?;
//! ```

mod error;
mod publisher;
mod queue;

#[cfg(feature = "nats")]
pub mod nats;

pub use error::PublishError;
pub use publisher::Publisher;
#[cfg(test)]
pub use publisher::MockPublisher;
pub use queue::{DEFAULT_REQUEUE_DELAY, OutboundQueue, OutboundReceiver};
