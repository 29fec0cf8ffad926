//! `stockyard-events` - messaging mechanics.
//!
//! Domain-agnostic transport and idempotency building blocks: a pub/sub bus
//! abstraction with an in-memory implementation, and the transition
//! deduplicator that makes at-least-once delivery safe for stock mutations.

pub mod bus;
pub mod dedup;
pub mod in_memory_bus;

pub use bus::{MessageBus, Subscription};
pub use dedup::{DedupToken, Deduplicator, InMemoryDeduplicator};
pub use in_memory_bus::{InMemoryBus, InMemoryBusError};
