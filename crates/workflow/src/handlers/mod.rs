//! One handler per status transition.

pub mod cancel;
pub mod completed;
pub mod extradition;
pub mod incoming;
pub mod moving;
pub mod package;
pub mod warehouse;

pub use cancel::CancelReleaseHandler;
pub use completed::CompletedOrderHandler;
pub use extradition::ExtraditionOrderHandler;
pub use incoming::IncomingStockHandler;
pub use moving::MovingReserveHandler;
pub use package::PackageReserveHandler;
pub use warehouse::WarehouseArrivalHandler;
