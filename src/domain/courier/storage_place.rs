use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::kernel::guard::{join, require_id, require_positive, require_text, GuardError};
use crate::domain::kernel::ValidationErrors;
use super::errors::StoragePlaceError;

// ============================================================================
// Storage Place - Single-slot compartment owned by a courier
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePlace {
    id: Uuid,
    name: String,
    total_volume: i32,
    order_id: Option<Uuid>,
}

impl StoragePlace {
    /// Fresh, empty compartment
    pub fn new(id: Uuid, name: impl Into<String>, total_volume: i32) -> Result<Self, ValidationErrors> {
        let name = name.into();
        Self::check_fields(id, &name, total_volume, None)?;

        Ok(Self {
            id,
            name,
            total_volume,
            order_id: None,
        })
    }

    /// Rehydrate a compartment that may already hold an order
    pub fn restore(
        id: Uuid,
        name: impl Into<String>,
        total_volume: i32,
        order_id: Option<Uuid>,
    ) -> Result<Self, ValidationErrors> {
        let name = name.into();
        Self::check_fields(id, &name, total_volume, order_id)?;

        Ok(Self {
            id,
            name,
            total_volume,
            order_id,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_volume(&self) -> i32 {
        self.total_volume
    }

    pub fn order_id(&self) -> Option<Uuid> {
        self.order_id
    }

    pub fn is_occupied(&self) -> bool {
        self.order_id.is_some()
    }

    /// Whether an order of `volume` fits into this (empty) place
    pub fn can_store(&self, volume: i32) -> Result<bool, StoragePlaceError> {
        self.ensure_constructed()?;
        require_positive("volume", volume)?;
        Ok(!self.is_occupied() && self.total_volume >= volume)
    }

    pub fn store(&mut self, order_id: Uuid, volume: i32) -> Result<(), StoragePlaceError> {
        self.ensure_constructed()?;
        require_id("order id", order_id)?;

        if !self.can_store(volume)? {
            return Err(match self.order_id {
                Some(current) => StoragePlaceError::Occupied {
                    place_id: self.id,
                    order_id: current,
                },
                None => StoragePlaceError::VolumeExceeded {
                    volume,
                    capacity: self.total_volume,
                },
            });
        }

        self.order_id = Some(order_id);
        Ok(())
    }

    pub fn clear(&mut self, order_id: Uuid) -> Result<(), StoragePlaceError> {
        self.ensure_constructed()?;
        require_id("order id", order_id)?;

        match self.order_id {
            None => Err(StoragePlaceError::Empty(self.id)),
            Some(stored) if stored != order_id => Err(StoragePlaceError::OrderMismatch {
                stored,
                requested: order_id,
            }),
            Some(_) => {
                self.order_id = None;
                Ok(())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Self::check_fields(self.id, &self.name, self.total_volume, self.order_id)
    }

    /// Deserialized instances skip the factories; refuse to operate on a broken one
    fn ensure_constructed(&self) -> Result<(), GuardError> {
        self.validate()
            .map_err(|_| GuardError::not_constructed("storage place"))
    }

    fn check_fields(
        id: Uuid,
        name: &str,
        total_volume: i32,
        order_id: Option<Uuid>,
    ) -> Result<(), ValidationErrors> {
        let occupant: Result<(), GuardError> = match order_id {
            Some(order_id) => require_id("stored order id", order_id),
            None => Ok(()),
        };

        join([
            require_id("storage place id", id),
            require_text("storage place name", name),
            require_positive("storage place total volume", total_volume),
            occupant,
        ])
    }
}

impl PartialEq for StoragePlace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StoragePlace {}

// ============================================================================
// Unit Tests
// ============================================================================
