//! Model selector
//!
//! The model menu is static. The slot controls follow the chosen model and
//! the known variables: when either the model or the original variable list
//! changes the controls are rebuilt and the input bindings reset, in two
//! deferred steps, to the empty slot set of the model. A change that only
//! adds or drops derived variables updates the slot menus in place and keeps
//! the bindings.

use tracing::debug;

use crate::action::Action;
use crate::state::{AppState, ModelKind, Slot};
use crate::store::{Store, Subscription};
use crate::surface::{Intent, Menu, Region, Surface};

use super::keyed::diff;
use super::{bound_label, ViewContext};

pub const MODEL_LABEL: &str = "Model";

/// What the slot controls are built from
#[derive(Debug, Clone, PartialEq)]
struct SelectorSlice {
    model: Option<ModelKind>,
    originals: Vec<String>,
    derived: Vec<String>,
}

impl SelectorSlice {
    fn from_state(state: &AppState) -> Self {
        Self {
            model: state.modeling.model,
            originals: state.vars.iter().map(|v| v.name.clone()).collect(),
            derived: state.log_vars.iter().map(|v| v.name.clone()).collect(),
        }
    }

    fn slots(&self) -> &'static [Slot] {
        self.model.map(|m| m.slots()).unwrap_or(&[])
    }

    fn names(&self) -> Vec<String> {
        self.originals.iter().chain(&self.derived).cloned().collect()
    }
}

fn slot_entry(slot: Slot, name: &str) -> Intent {
    Intent::BindModelVar {
        slot,
        name: name.to_string(),
    }
}

pub fn install<S: Surface + 'static>(store: &Store, ctx: &ViewContext<S>) -> Vec<Subscription> {
    {
        let mut surface = ctx.surface.borrow_mut();
        surface.clear_menu(Menu::Models);
        for kind in ModelKind::ALL {
            surface.add_entry(Menu::Models, kind.as_str(), kind.as_str(), Intent::ChooseModel(kind));
        }
    }

    let button = {
        let surface = ctx.surface.clone();
        store.observe(
            "model_button",
            |s| s.modeling.model,
            move |model, _| {
                let label = bound_label(MODEL_LABEL, model.map(|m| m.as_str()));
                surface.borrow_mut().set_text(Region::ModelButton, &label);
                Ok(())
            },
        )
    };

    let slots = {
        let surface = ctx.surface.clone();
        let handle = ctx.store.clone();
        store.observe(
            "slot_controls",
            SelectorSlice::from_state,
            move |next: &SelectorSlice, prev: Option<&SelectorSlice>| {
                let rebuild = prev.map_or(true, |p| {
                    p.model != next.model || p.originals != next.originals
                });

                if !rebuild {
                    let prev_names = prev.map(|p| p.names()).unwrap_or_default();
                    let next_names = next.names();
                    let changes = diff(&prev_names, &next_names, |name| name);
                    let mut surface = surface.borrow_mut();
                    for &slot in next.slots() {
                        for name in &changes.removed {
                            surface.remove_entry(Menu::Slot(slot), name);
                        }
                        for name in &changes.added {
                            surface.add_entry(Menu::Slot(slot), name, name, slot_entry(slot, name));
                        }
                    }
                    return Ok(());
                }

                {
                    let mut surface = surface.borrow_mut();
                    surface.show_slot_controls(next.slots());
                    for &slot in next.slots() {
                        surface.set_text(Region::SlotButton(slot), &slot.label());
                        for name in next.names() {
                            surface.add_entry(Menu::Slot(slot), &name, &name, slot_entry(slot, &name));
                        }
                    }
                }

                // Nothing to reset on first render
                if prev.is_none() {
                    return Ok(());
                }
                debug!(model = ?next.model, "resetting model inputs");
                handle.defer(Action::SetModelInputVars(None))?;
                if let Some(model) = next.model {
                    handle.defer(Action::SetModelInputVars(Some(model.slots().to_vec())))?;
                }
                Ok(())
            },
        )
    };

    vec![button, slots]
}
