//! Order-store adapters for the order-management platform.
//!
//! This module provides [`HttpOrderStore`], an implementation of
//! [`lastmile_core::OrderStore`] that lists pending orders from the platform's
//! REST API.
//!
//! # Example
//!
//! ```no_run
//! use lastmile_core::{OrderId, OrderStore};
//! use lastmile_data::orders::{HttpOrderStore, HttpOrderStoreConfig};
//! use std::time::Duration;
//!
//! let config = HttpOrderStoreConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_bearer_token("token-from-login");
//! let store = HttpOrderStore::with_config(config)?;
//!
//! let records = store.resolve_orders(&[OrderId(12), OrderId(15)])?;
//! println!("resolved {} orders", records.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod api;
mod store;

pub use api::OrdersResponse;
pub use store::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpOrderStore, HttpOrderStoreConfig,
    OrderStoreBuildError,
};
