//! `stockyard-infra` - process wiring around the workflow core.
//!
//! Builds the dispatch table, runs the background worker over a bus
//! subscription and provides notifier adapters for environments where the
//! real order/realtime modules are not wired in.

pub mod notifiers;
pub mod worker;


pub use notifiers::{TracingOrderStatusSink, TracingRealtimePublisher};
pub use worker::{StockWorker, WorkerHandle};
