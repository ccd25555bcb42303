//! View synchronizers
//!
//! One synchronizer per surface region. Each registers observers on the
//! store; an observer's callback renders its region from the projected
//! slice and, where the region reacts to a change by asking for more state,
//! defers the follow-up action rather than dispatching it.
//!
//! Installation order is registration order, which is the order observers
//! run within a notification round. Slot controls, for instance, must exist
//! before the slot labels are written.

pub mod dataset_menu;
pub mod exploratory;
pub mod keyed;
pub mod model_results;
pub mod model_selector;
pub mod variables;

use std::cell::RefCell;
use std::rc::Rc;

use crate::effect::Effects;
use crate::store::{Store, StoreHandle, Subscription};
use crate::surface::Surface;

/// What every synchronizer needs to reach
pub struct ViewContext<S: Surface> {
    pub store: StoreHandle,
    pub surface: Rc<RefCell<S>>,
    pub effects: Rc<Effects>,
}

impl<S: Surface> Clone for ViewContext<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            surface: self.surface.clone(),
            effects: self.effects.clone(),
        }
    }
}

impl<S: Surface> ViewContext<S> {
    pub fn new(store: &Store, surface: Rc<RefCell<S>>, effects: Rc<Effects>) -> Self {
        Self {
            store: store.handle(),
            surface,
            effects,
        }
    }
}

/// Install every synchronizer, in region order
pub fn install_all<S: Surface + 'static>(store: &Store, ctx: &ViewContext<S>) -> Vec<Subscription> {
    let mut subscriptions = Vec::new();
    subscriptions.extend(dataset_menu::install(store, ctx));
    subscriptions.extend(variables::install(store, ctx));
    subscriptions.extend(exploratory::install(store, ctx));
    subscriptions.extend(model_selector::install(store, ctx));
    subscriptions.extend(model_results::install(store, ctx));
    subscriptions
}

/// `"<display>: <name>"` once bound, the bare display label otherwise
pub(crate) fn bound_label(display: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}: {}", display, name),
        None => display.to_string(),
    }
}
