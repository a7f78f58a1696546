//! Response types for the platform's order listing endpoint.
//!
//! `GET /api/orders` answers with a bare JSON array of orders. Some
//! deployments wrap the list as `{"orders": [...]}`; both shapes decode.
//! Order export files use the same shapes.
//!
//! Entries are kept as raw JSON until selected, so one malformed order in
//! the listing does not prevent planning with the others. A requested
//! entry that fails to decode is logged and skipped, and later surfaces as
//! an unknown order.

use std::collections::HashSet;

use lastmile_core::{OrderId, OrderRecord};
use serde::Deserialize;
use serde_json::Value;

/// Body of an order listing response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OrdersResponse {
    /// Bare array of orders.
    List(Vec<Value>),
    /// Orders wrapped in an envelope.
    Wrapped {
        /// The listed orders, undecoded.
        orders: Vec<Value>,
    },
}

impl OrdersResponse {
    fn entries(self) -> Vec<Value> {
        match self {
            Self::List(orders) | Self::Wrapped { orders } => orders,
        }
    }

    /// All listed records that decode, whichever shape the body had.
    #[must_use]
    pub fn into_records(self) -> Vec<OrderRecord> {
        self.entries().into_iter().filter_map(decode_record).collect()
    }

    /// Decode only the records whose identifiers were requested.
    #[must_use]
    pub fn select(self, ids: &[OrderId]) -> Vec<OrderRecord> {
        let wanted: HashSet<OrderId> = ids.iter().copied().collect();
        self.entries()
            .into_iter()
            .filter(|entry| entry_id(entry).is_some_and(|id| wanted.contains(&id)))
            .filter_map(decode_record)
            .collect()
    }
}

fn entry_id(entry: &Value) -> Option<OrderId> {
    entry.get("id").and_then(Value::as_u64).map(OrderId)
}

fn decode_record(entry: Value) -> Option<OrderRecord> {
    let id = entry_id(&entry);
    match serde_json::from_value(entry) {
        Ok(record) => Some(record),
        Err(err) => {
            match id {
                Some(id) => log::warn!("skipping undecodable order {id}: {err}"),
                None => log::warn!("skipping undecodable order entry: {err}"),
            }
            None
        }
    }
}
