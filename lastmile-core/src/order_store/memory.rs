use std::collections::BTreeMap;

use crate::{OrderId, OrderRecord, OrderStore, OrderStoreError};

/// `OrderStore` backed by a map, for tests and file-driven runs.
///
/// # Examples
/// ```
/// use lastmile_core::{InMemoryOrderStore, Location, OrderId, OrderRecord, OrderStore};
///
/// let store = InMemoryOrderStore::with_records([OrderRecord::pending(
///     OrderId(1),
///     Location::new(0.0, 0.0)?,
/// )]);
/// let found = store.resolve_orders(&[OrderId(1), OrderId(2)])?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    records: BTreeMap<OrderId, OrderRecord>,
}

impl InMemoryOrderStore {
    /// Build a store from records; later duplicates replace earlier ones.
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = OrderRecord>,
    {
        Self {
            records: records.into_iter().map(|record| (record.id, record)).collect(),
        }
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: OrderRecord) {
        self.records.insert(record.id, record);
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn resolve_orders(&self, ids: &[OrderId]) -> Result<Vec<OrderRecord>, OrderStoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id))
            .cloned()
            .collect())
    }
}
