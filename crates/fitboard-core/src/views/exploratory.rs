//! Exploratory scatter: X/Y menus, axis button labels and the scatter itself

use crate::state::{Axis, Variable};
use crate::store::{Store, Subscription};
use crate::surface::{Intent, Menu, Region, Surface};

use super::keyed::diff;
use super::{bound_label, ViewContext};

/// Pair two series up to the shorter length
pub fn scatter_points(x: &Variable, y: &Variable) -> Vec<(f64, f64)> {
    x.data
        .iter()
        .zip(y.data.iter())
        .map(|(&x, &y)| (x, y))
        .collect()
}

pub fn install<S: Surface + 'static>(store: &Store, ctx: &ViewContext<S>) -> Vec<Subscription> {
    let menus = {
        let surface = ctx.surface.clone();
        store.observe(
            "exploratory_menus",
            |s| s.all_vars().map(|v| v.name.clone()).collect::<Vec<_>>(),
            move |next, prev| {
                let prev = prev.map(|p| p.as_slice()).unwrap_or(&[]);
                let changes = diff(prev, next.as_slice(), |name| name);

                let mut surface = surface.borrow_mut();
                for axis in [Axis::X, Axis::Y] {
                    for name in &changes.removed {
                        surface.remove_entry(Menu::Axis(axis), name);
                    }
                    for name in &changes.added {
                        surface.add_entry(
                            Menu::Axis(axis),
                            name,
                            name,
                            Intent::BindExploratory {
                                axis,
                                name: name.to_string(),
                            },
                        );
                    }
                }
                Ok(())
            },
        )
    };

    let labels = {
        let surface = ctx.surface.clone();
        store.observe(
            "axis_labels",
            |s| {
                [Axis::X, Axis::Y].map(|axis| {
                    s.exploratory_vis
                        .get(axis)
                        .map(|v| v.name().to_string())
                })
            },
            move |names, _| {
                let mut surface = surface.borrow_mut();
                for (axis, name) in [Axis::X, Axis::Y].into_iter().zip(names) {
                    let label = bound_label(axis.display_name(), name.as_deref());
                    surface.set_text(Region::AxisButton(axis), &label);
                }
                Ok(())
            },
        )
    };

    let scatter = {
        let surface = ctx.surface.clone();
        store.observe(
            "scatter",
            |s| {
                let x = s.exploratory_vis.x_var.as_ref().map(|v| v.variable.clone());
                let y = s.exploratory_vis.y_var.as_ref().map(|v| v.variable.clone());
                x.zip(y)
            },
            move |next, prev| {
                let mut surface = surface.borrow_mut();
                match next {
                    Some((x, y)) => surface.render_scatter(&scatter_points(x, y)),
                    None if matches!(prev, Some(Some(_))) => surface.clear_scatter(),
                    None => {}
                }
                Ok(())
            },
        )
    };

    vec![menus, labels, scatter]
}
