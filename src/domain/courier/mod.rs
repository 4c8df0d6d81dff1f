// ============================================================================
// Courier Domain - Business Logic for Courier Aggregate
// ============================================================================
//
// - Storage place entity (single-slot compartment)
// - Errors (CourierError, StoragePlaceError)
// - Aggregate (Courier: movement, order taking, compartments)
//
// ============================================================================

pub mod errors;
pub mod storage_place;
pub mod aggregate;

pub use errors::*;
pub use storage_place::*;
pub use aggregate::*;
