// ============================================================================
// Domain Services - Operations spanning more than one aggregate
// ============================================================================

pub mod dispatcher;
pub mod free_couriers;

pub use dispatcher::{Dispatcher, DispatcherError};
pub use free_couriers::free_couriers;
