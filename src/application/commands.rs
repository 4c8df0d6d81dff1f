use uuid::Uuid;

// ============================================================================
// Dispatch Commands - Represent caller intent
// ============================================================================
//
// Coordinates arrive as raw integers; the handler turns them into
// validated Locations.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateCourier {
    pub name: String,
    pub speed: i32,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct AddStoragePlace {
    pub courier_id: Uuid,
    pub name: String,
    pub volume: i32,
}

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub order_id: Uuid,
    pub x: i32,
    pub y: i32,
    pub volume: i32,
}

/// Result of a successful `assign_orders` run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub order_id: Uuid,
    pub courier_id: Uuid,
}

/// Result of a `move_couriers` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub moved: usize,
    pub completed: usize,
    /// Orders whose courier could not be advanced this run
    pub failed: usize,
}
