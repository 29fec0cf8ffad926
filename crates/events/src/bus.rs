//! Message publishing/subscription abstraction (mechanics only).
//!
//! The bus is the **transport layer** for status-change notifications: the
//! excluded use-case handlers change a stock request's status, then publish a
//! message here; workers subscribe and feed the messages into the workflow
//! dispatcher.
//!
//! Delivery is **at-least-once**: a message may arrive more than once (worker
//! crash, infrastructure retry). Consumers must be idempotent - in this
//! workspace idempotency lives in the transition deduplicator, not in the
//! transport.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a message stream.
///
/// Each subscription gets a copy of every message published after it was
/// created (broadcast semantics). Designed for single-threaded consumption;
/// one worker per subscription.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic message bus (pub/sub abstraction).
///
/// - **Transport-agnostic**: in-memory channels for tests/dev; a broker-backed
///   implementation slots in behind the same trait.
/// - **No ordering guarantees** across publishers.
/// - **No persistence**: the bus distributes, it does not store.
///
/// `publish` failures are surfaced to the caller; since the status change is
/// already recorded by the excluded use-case layer, republishing is safe.
pub trait MessageBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> MessageBus<M> for Arc<B>
where
    B: MessageBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
