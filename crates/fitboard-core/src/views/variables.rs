//! Variable panels
//!
//! Derives the original variables from a freshly loaded table, keeps one
//! distribution panel per original and derived variable, enables the log
//! affordance only while no `log_<name>` sibling exists, and hides the
//! sections that have nothing to show.

use fitboard_io::Table;
use fitboard_stats::NormalPlot;
use tracing::debug;

use crate::action::Action;
use crate::error::Result;
use crate::state::Variable;
use crate::store::{Store, Subscription};
use crate::surface::{Intent, PanelKind, Region, Surface};

use super::keyed::diff;
use super::ViewContext;

/// One variable per numeric column, in column order; missing cells are NaN
pub fn derive_variables(table: &Table) -> Result<Vec<Variable>> {
    table
        .columns()
        .iter()
        .filter(|c| c.dtype.is_numeric())
        .map(|c| Ok(Variable::new(c.name.clone(), table.numeric_column(&c.name)?)))
        .collect()
}

pub fn install<S: Surface + 'static>(store: &Store, ctx: &ViewContext<S>) -> Vec<Subscription> {
    let derive = {
        let handle = ctx.store.clone();
        store.observe(
            "derive_variables",
            |s| s.data.data.clone(),
            move |table, _| {
                let Some(table) = table else {
                    return Ok(());
                };
                let vars = derive_variables(table)?;
                debug!(count = vars.len(), "derived variables");
                handle.defer(Action::SetVariables(vars))
            },
        )
    };

    let originals = {
        let surface = ctx.surface.clone();
        store.observe(
            "original_panels",
            |s| s.vars.clone(),
            move |next, prev| {
                let prev = prev.map(|p| p.as_slice()).unwrap_or(&[]);
                // Keyed on the whole variable: same name with new data is a
                // different panel.
                let changes = diff(prev, next.as_slice(), |v| v);

                let mut surface = surface.borrow_mut();
                for var in changes.removed {
                    surface.remove_panel(PanelKind::Original, &var.name);
                }
                for var in changes.added {
                    let plot = NormalPlot::from_data(&var.data);
                    let log = Intent::ComputeLog {
                        name: var.name.clone(),
                    };
                    surface.add_panel(PanelKind::Original, &var.name, &plot, Some(log));
                }
                Ok(())
            },
        )
    };

    let log_enabled = {
        let surface = ctx.surface.clone();
        store.observe(
            "log_affordances",
            |s| {
                s.vars
                    .iter()
                    .map(|v| (v.name.clone(), !s.has_log_of(&v.name)))
                    .collect::<Vec<_>>()
            },
            move |next, prev| {
                let prev = prev.map(|p| p.as_slice()).unwrap_or(&[]);
                let mut surface = surface.borrow_mut();
                for (name, enabled) in next.iter().filter(|entry| !prev.contains(entry)) {
                    surface.set_log_enabled(name, *enabled);
                }
                Ok(())
            },
        )
    };

    let derived = {
        let surface = ctx.surface.clone();
        store.observe(
            "derived_panels",
            |s| s.log_vars.clone(),
            move |next, prev| {
                let prev = prev.map(|p| p.as_slice()).unwrap_or(&[]);
                let changes = diff(prev, next.as_slice(), |v| v);

                let mut surface = surface.borrow_mut();
                for var in changes.removed {
                    surface.remove_panel(PanelKind::Derived, &var.name);
                }
                for var in changes.added {
                    let plot = NormalPlot::from_data(&var.data);
                    surface.add_panel(PanelKind::Derived, &var.name, &plot, None);
                }
                Ok(())
            },
        )
    };

    let sections = {
        let surface = ctx.surface.clone();
        store.observe(
            "variable_sections",
            |s| (s.vars.is_empty(), s.log_vars.is_empty()),
            move |&(no_vars, no_log_vars), _| {
                let mut surface = surface.borrow_mut();
                surface.set_hidden(Region::OriginalVariables, no_vars);
                surface.set_hidden(Region::DerivedVariables, no_log_vars);
                surface.set_hidden(Region::ExploratoryVis, no_vars && no_log_vars);
                surface.set_hidden(Region::Modeling, no_vars && no_log_vars);
                Ok(())
            },
        )
    };

    vec![derive, originals, log_enabled, derived, sections]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitboard_io::read_table;

    #[test]
    fn test_derive_numeric_columns_only() {
        let table = read_table(b"name,mpg,cyl,auto\nfiat,32.4,4,true\nvolvo,,6,false\n").unwrap();
        let vars = derive_variables(&table).unwrap();

        let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["mpg", "cyl"]);
        assert_eq!(vars[0].data[0], 32.4);
        assert!(vars[0].data[1].is_nan());
        assert_eq!(&*vars[1].data, &[4.0, 6.0]);
    }
}
