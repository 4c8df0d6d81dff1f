use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::courier::Courier;
use crate::domain::order::{Order, OrderStatus};

// ============================================================================
// Free-Courier Query
// ============================================================================
//
// A courier is free when no order referencing it is in `Assigned` status.
// `Created` orders carry no courier and `Completed` orders are finished, so
// neither disqualifies anyone; couriers without any order are free too.
//
// ============================================================================

/// Couriers not currently delivering an assigned order, in input order
pub fn free_couriers<'a, C, O>(couriers: C, orders: O) -> Vec<Courier>
where
    C: IntoIterator<Item = &'a Courier>,
    O: IntoIterator<Item = &'a Order>,
{
    let busy: HashSet<Uuid> = orders
        .into_iter()
        .filter(|order| order.status() == OrderStatus::Assigned)
        .filter_map(Order::courier_id)
        .collect();

    couriers
        .into_iter()
        .filter(|courier| !busy.contains(&courier.id()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kernel::Location;

    fn location() -> Location {
        Location::new(1, 1).unwrap()
    }

    fn courier(name: &str) -> Courier {
        Courier::new(Uuid::new_v4(), name, 1, location()).unwrap()
    }

    fn order_for(courier: &Courier, status: OrderStatus) -> Order {
        let courier_id = match status {
            OrderStatus::Created => None,
            _ => Some(courier.id()),
        };
        Order::restore(Uuid::new_v4(), location(), 1, status, courier_id).unwrap()
    }

    #[test]
    fn test_assigned_courier_is_not_free() {
        let a = courier("A");
        let b = courier("B");
        let orders = vec![
            order_for(&a, OrderStatus::Assigned),
            order_for(&b, OrderStatus::Completed),
        ];

        let free = free_couriers(&[a, b.clone()], &orders);
        assert_eq!(free, vec![b]);
    }

    #[test]
    fn test_courier_without_orders_is_free() {
        let a = courier("A");
        let free = free_couriers(&[a.clone()], &[]);
        assert_eq!(free, vec![a]);
    }

    #[test]
    fn test_created_orders_do_not_disqualify() {
        let a = courier("A");
        let orders = vec![order_for(&a, OrderStatus::Created)];

        let free = free_couriers(&[a.clone()], &orders);
        assert_eq!(free, vec![a]);
    }

    #[test]
    fn test_one_assigned_order_among_completed_ones_disqualifies() {
        let a = courier("A");
        let orders = vec![
            order_for(&a, OrderStatus::Completed),
            order_for(&a, OrderStatus::Completed),
            order_for(&a, OrderStatus::Assigned),
        ];

        assert!(free_couriers(&[a], &orders).is_empty());
    }
}
