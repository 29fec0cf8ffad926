//! `stockyard-workflow` - the stock-reservation state machine.
//!
//! One handler per status transition; each resolves the material lines for
//! its status, deduplicates, and walks quantities unit by unit against the
//! stock store. Handlers are registered into a status-keyed dispatch table
//! at process startup and fed by a worker consuming the status-change bus.

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod notify;

mod units;

pub use dispatcher::StatusDispatcher;
pub use error::WorkflowError;
pub use handler::StatusChangeHandler;
pub use handlers::{
    CancelReleaseHandler, CompletedOrderHandler, ExtraditionOrderHandler, IncomingStockHandler,
    MovingReserveHandler, PackageReserveHandler, WarehouseArrivalHandler,
};
pub use notify::{
    NotifyError, OrderStatus, OrderStatusSink, RealtimePublisher, RecordingOrderStatusSink,
    RecordingRealtimePublisher,
};
