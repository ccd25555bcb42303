//! The dashboard facade
//!
//! Owns the store, the surface and the effect queue, installs the views and
//! turns intents from the surface into actions. Hosts drive it with three
//! calls: [`Dashboard::handle`] when the user activates something,
//! [`Dashboard::take_effects`] to learn which reads to perform, and the
//! `complete_*` methods when a read finishes.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;

use fitboard_io::{DatasetMeta, Table};
use fitboard_stats::log_transform;
use serde_json::Value;
use tracing::{debug, info};

use crate::action::Action;
use crate::config::DashboardConfig;
use crate::effect::{Effect, Effects, Ticket};
use crate::error::{DashboardError, Result};
use crate::service::format_result;
use crate::state::{AppState, Binding, VarRef};
use crate::store::{Store, Subscription};
use crate::surface::{Intent, Region, Surface};
use crate::views::{install_all, ViewContext};

pub struct Dashboard<S: Surface + 'static> {
    store: Store,
    surface: Rc<RefCell<S>>,
    effects: Rc<Effects>,
    subscriptions: Vec<Subscription>,
}

impl<S: Surface + 'static> Dashboard<S> {
    /// Install the views on `surface` and publish the dataset catalog
    pub fn new(datasets: Vec<DatasetMeta>, surface: S) -> Result<Self> {
        let store = Store::new();
        let surface = Rc::new(RefCell::new(surface));
        let effects = Rc::new(Effects::new());

        let ctx = ViewContext::new(&store, surface.clone(), effects.clone());
        let subscriptions = install_all(&store, &ctx);

        let dashboard = Self {
            store,
            surface,
            effects,
            subscriptions,
        };
        dashboard.store.dispatch(Action::SetDatasetList(datasets))?;
        Ok(dashboard)
    }

    pub fn from_config(config: &DashboardConfig, surface: S) -> Result<Self> {
        config.validate()?;
        Self::new(config.catalog.datasets.clone(), surface)
    }

    /// Current state snapshot
    pub fn state(&self) -> Arc<AppState> {
        self.store.state()
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    pub fn surface_mut(&self) -> RefMut<'_, S> {
        self.surface.borrow_mut()
    }

    /// Replace the dataset catalog, e.g. after the config was reloaded
    ///
    /// The selection is cleared, so a load still in flight is retired.
    pub fn set_datasets(&self, datasets: Vec<DatasetMeta>) -> Result<()> {
        let ticket = self.effects.invalidate_dataset();
        debug!(%ticket, "dataset catalog replaced");
        self.store.dispatch(Action::SetDatasetList(datasets))
    }

    /// Act on an activated entry
    ///
    /// Named targets are looked up in the current state; a target that is
    /// gone yields `UnknownDataset` / `UnknownVariable` and changes nothing.
    pub fn handle(&self, intent: Intent) -> Result<()> {
        debug!(%intent, "handling intent");
        let state = self.store.state();

        match intent {
            Intent::SelectDataset { identity } => {
                let (index, dataset) = state
                    .data
                    .datasets
                    .iter()
                    .enumerate()
                    .find(|(_, d)| d.identity() == identity)
                    .ok_or(DashboardError::UnknownDataset(identity))?;
                self.store.dispatch(Action::SetActiveDataset(Some(index)))?;
                let ticket = self.effects.load_dataset(dataset.clone());
                info!(dataset = %dataset.name, %ticket, "loading dataset");
                Ok(())
            }

            Intent::ComputeLog { name } => {
                let source = state
                    .vars
                    .iter()
                    .find(|v| v.name == name)
                    .ok_or(DashboardError::UnknownVariable(name))?;
                self.store.dispatch(Action::CreateLogVariable {
                    source: source.name.clone(),
                    values: log_transform(&source.data),
                })
            }

            Intent::ChooseModel(kind) => self.store.dispatch(Action::SetModelType(kind)),

            Intent::BindModelVar { slot, name } => {
                let variable = state
                    .find_var(&name)
                    .ok_or(DashboardError::UnknownVariable(name))?;
                self.store.dispatch(Action::SetModelingVar {
                    slot,
                    var: VarRef::new(variable.clone(), Binding::Model(slot)),
                })
            }

            Intent::BindExploratory { axis, name } => {
                let variable = state
                    .find_var(&name)
                    .ok_or(DashboardError::UnknownVariable(name))?;
                self.store.dispatch(Action::SetExploratoryVar {
                    axis,
                    var: VarRef::new(variable.clone(), Binding::Explore(axis)),
                })
            }
        }
    }

    /// Take the reads queued since the last call
    pub fn take_effects(&self) -> Vec<Effect> {
        self.effects.drain()
    }

    /// Install a loaded table; returns `false` if a newer selection made
    /// this load obsolete
    pub fn complete_dataset(&self, ticket: Ticket, table: Table) -> Result<bool> {
        if !self.effects.is_current_dataset(ticket) {
            debug!(%ticket, "dropping stale dataset load");
            return Ok(false);
        }
        self.store
            .dispatch(Action::SetActiveData(Some(Arc::new(table))))?;
        Ok(true)
    }

    /// Show a fit result; returns `false` if the bindings changed since the
    /// request was issued
    pub fn complete_fit(&self, ticket: Ticket, result: &Value) -> Result<bool> {
        if !self.effects.is_current_model(ticket) {
            debug!(%ticket, "dropping stale fit result");
            return Ok(false);
        }
        let text = format_result(result)?;
        let mut surface = self.surface.borrow_mut();
        surface.set_hidden(Region::ModelInfo, false);
        surface.show_info(&text);
        Ok(true)
    }

    /// Remove every view observer; the surface keeps what was last drawn
    pub fn teardown(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}
