use uuid::Uuid;

use crate::domain::courier::{Courier, CourierError};
use crate::domain::order::{Order, OrderError};

// ============================================================================
// Dispatcher - Picks a courier for an order
// ============================================================================
//
// Selection: among couriers able to take the order, the one with the
// smallest estimated time to the order's location; ties go to the courier
// that comes first. Both aggregates are only mutated once the courier has
// accepted the order.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatcherError {
    #[error("No courier can take order {0}")]
    NoCourierAvailable(Uuid),

    #[error(transparent)]
    Courier(#[from] CourierError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Assign `order` to the best courier in `couriers` and return that courier
    pub fn dispatch<'a>(
        &self,
        order: &mut Order,
        couriers: &'a mut [Courier],
    ) -> Result<&'a Courier, DispatcherError> {
        let index = self
            .select(order, couriers)?
            .ok_or(DispatcherError::NoCourierAvailable(order.id()))?;

        let courier = &mut couriers[index];

        let mut assigned = order.clone();
        assigned.assign(courier.id())?;
        courier.take_order(&assigned)?;
        *order = assigned;

        Ok(courier)
    }

    fn select(&self, order: &Order, couriers: &[Courier]) -> Result<Option<usize>, DispatcherError> {
        let mut best: Option<(usize, f64)> = None;

        for (index, courier) in couriers.iter().enumerate() {
            if !courier.can_take_order(order)? {
                continue;
            }

            let time = courier.calculate_time_to_location(order.location())?;
            match best {
                Some((_, best_time)) if best_time <= time => {}
                _ => best = Some((index, time)),
            }
        }

        Ok(best.map(|(index, _)| index))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kernel::Location;
    use crate::domain::order::OrderStatus;

    fn location(x: i32, y: i32) -> Location {
        Location::new(x, y).unwrap()
    }

    fn courier(name: &str, speed: i32, at: Location) -> Courier {
        Courier::new(Uuid::new_v4(), name, speed, at).unwrap()
    }

    fn order(volume: i32, at: Location) -> Order {
        Order::new(Uuid::new_v4(), at, volume).unwrap()
    }

    #[test]
    fn test_dispatch_picks_fastest_courier() {
        let mut couriers = vec![
            courier("walker", 1, location(0, 0)),
            courier("cyclist", 3, location(0, 0)),
            courier("neighbour", 1, location(9, 9)),
        ];
        let mut order = order(5, location(10, 10));

        let chosen = Dispatcher::new().dispatch(&mut order, &mut couriers).unwrap().id();

        assert_eq!(chosen, couriers[2].id());
        assert_eq!(order.status(), OrderStatus::Assigned);
        assert_eq!(order.courier_id(), Some(chosen));
        assert_eq!(couriers[2].storage_places()[0].order_id(), Some(order.id()));
        assert!(!couriers[0].storage_places()[0].is_occupied());
    }

    #[test]
    fn test_dispatch_ties_go_to_first_courier() {
        let mut couriers = vec![
            courier("first", 2, location(0, 0)),
            courier("second", 2, location(0, 0)),
        ];
        let mut order = order(1, location(4, 4));

        let chosen = Dispatcher::new().dispatch(&mut order, &mut couriers).unwrap().id();
        assert_eq!(chosen, couriers[0].id());
    }

    #[test]
    fn test_dispatch_skips_couriers_without_room() {
        let mut busy = courier("busy", 5, location(1, 1));
        busy.take_order(&order(10, location(1, 1))).unwrap();
        let mut couriers = vec![busy, courier("slow", 1, location(0, 0))];
        let mut order = order(4, location(1, 1));

        let chosen = Dispatcher::new().dispatch(&mut order, &mut couriers).unwrap().id();
        assert_eq!(chosen, couriers[1].id());
    }

    #[test]
    fn test_dispatch_without_candidates_leaves_order_untouched() {
        let mut couriers = vec![courier("small bag", 1, location(0, 0))];
        let mut order = order(50, location(1, 1));

        let error = Dispatcher::new().dispatch(&mut order, &mut couriers).unwrap_err();
        assert_eq!(error, DispatcherError::NoCourierAvailable(order.id()));
        assert_eq!(order.status(), OrderStatus::Created);

        let error = Dispatcher::new().dispatch(&mut order, &mut []).unwrap_err();
        assert!(matches!(error, DispatcherError::NoCourierAvailable(_)));
    }

    #[test]
    fn test_dispatch_completed_order_fails() {
        let mut couriers = vec![courier("any", 1, location(0, 0))];
        let mut order = Order::restore(
            Uuid::new_v4(),
            location(1, 1),
            1,
            OrderStatus::Completed,
            Some(Uuid::new_v4()),
        )
        .unwrap();

        let error = Dispatcher::new().dispatch(&mut order, &mut couriers).unwrap_err();
        assert!(matches!(error, DispatcherError::Order(OrderError::InvalidStatusToAssign(_))));
        assert!(!couriers[0].storage_places()[0].is_occupied());
    }
}
