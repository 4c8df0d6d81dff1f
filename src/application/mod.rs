// ============================================================================
// Application Layer - Use cases over the dispatch aggregates
// ============================================================================
//
// - commands/        - Caller intent (create courier, create order, ...)
// - command_handler/ - Load → mutate aggregate → persist
// - queries/         - Read models for couriers and open orders
//
// ============================================================================

pub mod commands;
pub mod errors;
pub mod command_handler;
pub mod queries;

pub use commands::{AddStoragePlace, Assignment, CreateCourier, CreateOrder, MoveReport};
pub use errors::DispatchError;
pub use command_handler::DispatchCommandHandler;
pub use queries::{CourierView, DispatchQueries, OrderView, StoragePlaceView};
