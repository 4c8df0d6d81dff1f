use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::kernel::guard::{join_nested, require_id, require_positive, require_text};
use crate::domain::kernel::{AggregateRoot, GuardError, Location, ValidationErrors};
use crate::domain::order::Order;
use super::errors::{CourierError, StoragePlaceError};
use super::storage_place::StoragePlace;

pub const DEFAULT_STORAGE_PLACE_NAME: &str = "Bag";
pub const DEFAULT_STORAGE_PLACE_VOLUME: i32 = 10;

// ============================================================================
// Courier Aggregate - Domain Logic
// ============================================================================
//
// Root of the courier cluster: owns its storage places in insertion order
// (first-fit scans depend on it) and its position on the grid. Identity,
// name and speed never change after construction.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courier {
    id: Uuid,
    name: String,
    speed: i32,
    location: Location,
    storage_places: Vec<StoragePlace>,
}

impl Courier {
    /// New courier carrying the default compartment
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        speed: i32,
        location: Location,
    ) -> Result<Self, ValidationErrors> {
        let name = name.into();
        let fields = Self::check_fields(id, &name, speed, &location);
        let default_place = StoragePlace::new(
            Uuid::new_v4(),
            DEFAULT_STORAGE_PLACE_NAME,
            DEFAULT_STORAGE_PLACE_VOLUME,
        );

        match (fields, default_place) {
            (Ok(()), Ok(place)) => Ok(Self {
                id,
                name,
                speed,
                location,
                storage_places: vec![place],
            }),
            (Err(mut errors), Err(place_errors)) => {
                errors.extend(place_errors);
                Err(errors)
            }
            (Err(errors), Ok(_)) | (Ok(()), Err(errors)) => Err(errors),
        }
    }

    /// Rehydrate a persisted courier with its storage places
    pub fn restore(
        id: Uuid,
        name: impl Into<String>,
        speed: i32,
        location: Location,
        storage_places: Vec<StoragePlace>,
    ) -> Result<Self, CourierError> {
        let courier = Self {
            id,
            name: name.into(),
            speed,
            location,
            storage_places,
        };
        courier.validate()?;
        Ok(courier)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn storage_places(&self) -> &[StoragePlace] {
        &self.storage_places
    }

    /// Append a new compartment and return its id
    pub fn add_storage_place(&mut self, name: impl Into<String>, volume: i32) -> Result<Uuid, ValidationErrors> {
        self.ensure_constructed()?;
        let place = StoragePlace::new(Uuid::new_v4(), name, volume)?;
        let id = place.id();
        self.storage_places.push(place);
        Ok(id)
    }

    pub fn can_take_order(&self, order: &Order) -> Result<bool, CourierError> {
        self.ensure_constructed()?;
        order.validate()?;
        Ok(self.first_fit(order.volume())?.is_some())
    }

    /// Store the order in the first compartment it fits into
    pub fn take_order(&mut self, order: &Order) -> Result<(), CourierError> {
        self.ensure_constructed()?;
        order.validate()?;

        let index = self
            .first_fit(order.volume())?
            .ok_or(CourierError::StoragePlaceNotFound(order.id()))?;

        self.storage_places[index].store(order.id(), order.volume())?;
        Ok(())
    }

    /// Free the compartment holding `order_id`
    pub fn complete_order(&mut self, order_id: Uuid) -> Result<(), CourierError> {
        self.ensure_constructed()?;
        require_id("order id", order_id)?;

        let place = self
            .storage_places
            .iter_mut()
            .find(|place| place.order_id() == Some(order_id))
            .ok_or(CourierError::StoragePlaceNotFound(order_id))?;

        place.clear(order_id)?;
        Ok(())
    }

    /// Estimated number of moves needed to reach `target`
    pub fn calculate_time_to_location(&self, target: Location) -> Result<f64, CourierError> {
        self.ensure_constructed()?;
        target.validate()?;
        Ok(f64::from(self.location.distance_to(&target)) / f64::from(self.speed))
    }

    /// Advance up to `speed` cells toward `target`, X axis first then Y
    pub fn move_towards(&mut self, target: Location) -> Result<(), CourierError> {
        self.ensure_constructed()?;
        target.validate()?;

        let distance = self.location.distance_to(&target);
        if distance == 0 {
            return Ok(());
        }

        let mut remaining = self.speed.unsigned_abs().min(distance) as i32;

        let dx = target.x() - self.location.x();
        let step_x = dx.signum() * dx.abs().min(remaining);
        remaining -= step_x.abs();

        let dy = target.y() - self.location.y();
        let step_y = dy.signum() * dy.abs().min(remaining);

        self.location = Location::new(self.location.x() + step_x, self.location.y() + step_y)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CourierError> {
        Self::check_fields(self.id, &self.name, self.speed, &self.location)?;

        if self.storage_places.is_empty() {
            return Err(CourierError::StoragePlacesRequired);
        }

        for place in &self.storage_places {
            place.validate()?;
        }

        Ok(())
    }

    /// Deserialized instances skip the factories; refuse to operate on a broken one
    fn ensure_constructed(&self) -> Result<(), GuardError> {
        self.validate().map_err(|_| GuardError::not_constructed("courier"))
    }

    fn first_fit(&self, volume: i32) -> Result<Option<usize>, StoragePlaceError> {
        for (index, place) in self.storage_places.iter().enumerate() {
            if place.can_store(volume)? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    fn check_fields(id: Uuid, name: &str, speed: i32, location: &Location) -> Result<(), ValidationErrors> {
        join_nested(
            [
                require_id("courier id", id),
                require_text("courier name", name),
                require_positive("courier speed", speed),
            ],
            location.validate(),
        )
    }
}

impl PartialEq for Courier {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Courier {}

impl AggregateRoot for Courier {
    type Error = CourierError;

    const AGGREGATE_TYPE: &'static str = "Courier";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<(), Self::Error> {
        Courier::validate(self)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
