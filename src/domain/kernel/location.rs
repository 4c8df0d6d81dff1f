use serde::{Deserialize, Serialize};
use std::fmt;

use super::guard::{join, require_in_range, ValidationErrors};

// ============================================================================
// Location Value Object - A point on the delivery grid
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    x: i32,
    y: i32,
}

impl Location {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 1000;

    /// Build a location, reporting both coordinates when both are out of range
    pub fn new(x: i32, y: i32) -> Result<Self, ValidationErrors> {
        Self::check(x, y)?;
        Ok(Self { x, y })
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// Manhattan distance to `other`
    pub fn distance_to(&self, other: &Location) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Self::check(self.x, self.y)
    }

    fn check(x: i32, y: i32) -> Result<(), ValidationErrors> {
        join([
            require_in_range("x", x, Self::MIN, Self::MAX),
            require_in_range("y", y, Self::MIN, Self::MAX),
        ])
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
