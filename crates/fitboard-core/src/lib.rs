//! fitboard-core - State store and view wiring for the fitboard dashboard
//!
//! This crate provides the core of a single-page data-exploration
//! dashboard: pick a dataset, look at its variables, log-transform the
//! skewed ones, and send a fit request to a remote modeling service.
//!
//! - **State**: one immutable application-state tree shared via `Arc`
//! - **Action**: named transitions applied by a pure reducer
//! - **Store**: single writer with projection-keyed observers and a
//!   deferred-action queue drained after each notification round
//! - **Surface**: the rendering contract (fixed regions, menus, panels) and
//!   the intents attached to everything clickable
//! - **Views**: one synchronizer per region, each an observer on the store
//! - **Effect**: dataset loads and model fits the host performs, guarded by
//!   tickets so stale replies are dropped
//! - **Service**: request URL building, plus a `reqwest` client behind the
//!   `native` feature
//! - **Config**: service endpoint and dataset catalog, from TOML
//!
//! # Architecture
//!
//! ```text
//! intent → Dashboard::handle → Store::dispatch → reduce
//!                                     ↓
//!                         observers (registration order)
//!                          ↓            ↓           ↓
//!                       Surface     defer(action)  Effects → host I/O
//! ```
//!
//! Nothing here blocks or spawns. A host runs the queued effects and reports
//! back with [`Dashboard::complete_dataset`] and [`Dashboard::complete_fit`].

pub mod action;
pub mod config;
pub mod dashboard;
pub mod effect;
pub mod error;
pub mod service;
pub mod state;
pub mod store;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod views;

pub use action::{reduce, Action};
pub use config::{DashboardConfig, ServiceConfig};
pub use dashboard::Dashboard;
pub use effect::{Effect, Effects, Ticket};
pub use error::{
    ActionError, ConfigError, DashboardError, IoError, Result, ServiceError, StoreError,
};
pub use service::{format_result, ModelRequest};
pub use state::{
    AppState, Axis, Binding, DataState, ExploratoryVis, InputBindings, ModelKind, Modeling, Slot,
    VarRef, Variable,
};
pub use store::{Store, StoreHandle, Subscription, SubscriptionId};
pub use surface::{Intent, Menu, PanelKind, Region, Surface};

pub use fitboard_io::{Catalog, DatasetMeta, Table};

#[cfg(feature = "native")]
pub use service::ModelClient;

/// Returns the version of fitboard-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_model_kind_round_trip_through_str() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.as_str().parse::<ModelKind>().unwrap(), kind);
        }
    }
}
