//! Model inputs and results
//!
//! Labels each slot button with its bound variable and, whenever the input
//! bindings change, retires any fit still in flight. A new fit is queued only
//! once every slot of the model is bound.

use tracing::debug;

use crate::service::ModelRequest;
use crate::state::Modeling;
use crate::store::{Store, Subscription};
use crate::surface::{Region, Surface};

use super::ViewContext;

pub fn install<S: Surface + 'static>(store: &Store, ctx: &ViewContext<S>) -> Vec<Subscription> {
    ctx.surface.borrow_mut().set_hidden(Region::ModelInfo, true);

    let labels = {
        let surface = ctx.surface.clone();
        store.observe(
            "slot_labels",
            |s| s.modeling.input_vars.clone(),
            move |inputs, _| {
                let Some(inputs) = inputs else {
                    return Ok(());
                };
                let mut surface = surface.borrow_mut();
                for (slot, var) in inputs {
                    let label = match var {
                        Some(var) => format!("{}: {}", slot.display_name(), var.name()),
                        None => slot.label(),
                    };
                    surface.set_text(Region::SlotButton(*slot), &label);
                }
                Ok(())
            },
        )
    };

    let trigger = {
        let effects = ctx.effects.clone();
        store.observe(
            "model_request",
            |s| s.modeling.clone(),
            move |next: &Modeling, prev: Option<&Modeling>| {
                if prev.map(|p| &p.input_vars) == Some(&next.input_vars) {
                    return Ok(());
                }
                let ticket = effects.invalidate_model();
                if let Some(request) = ModelRequest::from_modeling(next) {
                    debug!(%ticket, model = %request.kind, "queueing fit");
                    effects.fit_model(request);
                }
                Ok(())
            },
        )
    };

    vec![labels, trigger]
}
