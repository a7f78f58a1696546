//! Resolve order identifiers into delivery stops.
//!
//! The `OrderStore` trait abstracts the order-management platform. It returns
//! the records it knows about; [`resolve_stops`] then insists that every
//! requested identifier resolved to a pending, geocoded order. A batch with
//! any unusable order fails as a whole rather than silently dropping a stop.

mod error;
mod memory;
mod record;

pub use error::OrderStoreError;
pub use memory::InMemoryOrderStore;
pub use record::{OrderRecord, OrderStatus};

use std::collections::HashMap;

use crate::{OrderId, RequestValidationError, Stop};

/// Look up order records by identifier.
///
/// Implementations return the records they find, in any order; unknown
/// identifiers are simply absent from the result.
///
/// # Examples
/// ```
/// use lastmile_core::{OrderId, OrderRecord, OrderStore, OrderStoreError};
///
/// struct NoOrders;
///
/// impl OrderStore for NoOrders {
///     fn resolve_orders(&self, _ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError> {
///         Ok(Vec::new())
///     }
/// }
///
/// assert!(NoOrders.resolve_orders(&[OrderId(1)])?.is_empty());
/// # Ok::<(), OrderStoreError>(())
/// ```
pub trait OrderStore: Send + Sync {
    /// Fetch records for `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderStoreError`] when the store cannot be queried.
    fn resolve_orders(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError>;
}

/// Turn fetched records into stops in the order `ids` lists them.
///
/// # Errors
///
/// Returns [`RequestValidationError::UnknownOrder`] for an identifier with no
/// record, and the errors of [`OrderRecord::to_stop`] for unusable orders.
pub fn resolve_stops(
    ids: &[OrderId],
    records: Vec<OrderRecord>,
) -> Result<Vec<Stop>, RequestValidationError> {
    let by_id: HashMap<OrderId, OrderRecord> = records
        .into_iter()
        .map(|record| (record.id, record))
        .collect();
    ids.iter()
        .map(|id| {
            by_id
                .get(id)
                .ok_or(RequestValidationError::UnknownOrder(*id))
                .and_then(OrderRecord::to_stop)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryOrderStore {
        let origin = Location::new(0.0, 0.0).expect("valid");
        let mut delivered = OrderRecord::pending(OrderId(3), origin);
        delivered.status = OrderStatus::Delivered;
        InMemoryOrderStore::with_records([
            OrderRecord::pending(OrderId(1), origin),
            OrderRecord::pending(OrderId(2), origin),
            delivered,
        ])
    }

    #[rstest]
    fn stops_follow_requested_order(store: InMemoryOrderStore) {
        let ids = [OrderId(2), OrderId(1)];
        let records = store.resolve_orders(&ids).expect("resolve");
        let stops = resolve_stops(&ids, records).expect("stops");
        let order: Vec<_> = stops.iter().map(|stop| stop.order_id).collect();
        assert_eq!(order, ids);
    }

    #[rstest]
    fn unknown_order_fails_the_batch(store: InMemoryOrderStore) {
        let ids = [OrderId(1), OrderId(99)];
        let records = store.resolve_orders(&ids).expect("resolve");
        assert_eq!(
            resolve_stops(&ids, records),
            Err(RequestValidationError::UnknownOrder(OrderId(99)))
        );
    }

    #[rstest]
    fn delivered_order_fails_the_batch(store: InMemoryOrderStore) {
        let ids = [OrderId(3)];
        let records = store.resolve_orders(&ids).expect("resolve");
        assert!(matches!(
            resolve_stops(&ids, records),
            Err(RequestValidationError::OrderNotPending { .. })
        ));
    }
}
