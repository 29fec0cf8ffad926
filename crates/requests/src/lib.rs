//! `stockyard-requests` - the stock-request surface the core consumes.
//!
//! The request aggregate itself (forms, use cases, admin pages) lives in the
//! excluded web layer. This crate models what the workflow needs from it:
//! immutable event snapshots, their material lines, the status enumeration,
//! the lookup/resolver contract and the status-change message.

pub mod event;
pub mod message;
pub mod status;
pub mod store;

pub use event::{MaterialLine, StockRequestEvent};
pub use message::StatusChangeMessage;
pub use status::RequestStatus;
pub use store::{InMemoryRequestStore, RequestStore};
