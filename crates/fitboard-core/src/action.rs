//! The action set and its reducer
//!
//! Every state transition is one [`Action`] applied by [`reduce`]. The
//! reducer never mutates the prior tree; it returns a new one. An `Err`
//! means the payload was invalid for the prior state, which is a bug in the
//! dispatching code rather than something a user can cause.

use std::sync::Arc;

use fitboard_io::{DatasetMeta, Table};
use fitboard_stats::log_name;

use crate::error::ActionError;
use crate::state::{AppState, Axis, Binding, ModelKind, Slot, VarRef, Variable};

/// A named state-transition request with its payload
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the catalog; clears the selection and the loaded table
    SetDatasetList(Vec<DatasetMeta>),
    /// Select a dataset by index (`None` deselects); does not load it, but
    /// drops the table loaded for a previous selection
    SetActiveDataset(Option<usize>),
    /// Install the loaded table
    SetActiveData(Option<Arc<Table>>),
    /// Replace the original variables with a freshly derived list
    SetVariables(Vec<Variable>),
    /// Add `log_<source>` unless it already exists
    CreateLogVariable { source: String, values: Vec<f64> },
    SetModelType(ModelKind),
    /// Bind a variable into an existing input slot
    SetModelingVar { slot: Slot, var: VarRef },
    /// Replace the input binding set wholesale: `None`, or every slot unbound
    SetModelInputVars(Option<Vec<Slot>>),
    SetExploratoryVar { axis: Axis, var: VarRef },
}

impl Action {
    /// Stable name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetDatasetList(_) => "set_dataset_list",
            Action::SetActiveDataset(_) => "set_active_dataset",
            Action::SetActiveData(_) => "set_active_data",
            Action::SetVariables(_) => "set_variables",
            Action::CreateLogVariable { .. } => "create_log_variable",
            Action::SetModelType(_) => "set_model_type",
            Action::SetModelingVar { .. } => "set_modeling_var",
            Action::SetModelInputVars(_) => "set_model_input_vars",
            Action::SetExploratoryVar { .. } => "set_exploratory_var",
        }
    }

    /// `setExploratoryVar(which, var)` with `which` ∈ {0, 1}
    pub fn set_exploratory_var(which: usize, var: VarRef) -> Result<Self, ActionError> {
        Ok(Action::SetExploratoryVar {
            axis: Axis::from_index(which)?,
            var,
        })
    }
}

/// Apply one action to the prior state, producing the next state
pub fn reduce(prior: &AppState, action: Action) -> Result<AppState, ActionError> {
    let mut next = prior.clone();

    match action {
        Action::SetDatasetList(list) => {
            next.data.datasets = Arc::new(list);
            next.data.which = None;
            next.data.data = None;
            if next.data != prior.data {
                invalidate_variables(&mut next);
            }
        }

        Action::SetActiveDataset(which) => {
            if let Some(index) = which.filter(|&i| i >= prior.data.datasets.len()) {
                return Err(ActionError::DatasetOutOfRange(index));
            }
            if which != prior.data.which {
                next.data.which = which;
                next.data.data = None;
                invalidate_variables(&mut next);
            }
        }

        Action::SetActiveData(table) => {
            if table != prior.data.data {
                next.data.data = table;
                invalidate_variables(&mut next);
            }
        }

        Action::SetVariables(vars) => {
            next.vars = Arc::new(vars);
            clear_bindings(&mut next);
        }

        Action::CreateLogVariable { source, values } => {
            let name = log_name(&source);
            if !next.log_vars.iter().any(|v| v.name == name) {
                let mut log_vars = next.log_vars.as_ref().clone();
                log_vars.push(Variable::new(name, values));
                next.log_vars = Arc::new(log_vars);
            }
        }

        Action::SetModelType(kind) => {
            next.modeling.model = Some(kind);
        }

        Action::SetModelingVar { slot, var } => {
            if var.binding != Binding::Model(slot) {
                return Err(ActionError::BindingMismatch {
                    bound: var.binding.to_string(),
                    target: slot.to_string(),
                });
            }
            let inputs = next
                .modeling
                .input_vars
                .as_mut()
                .ok_or_else(|| ActionError::InputsUnset {
                    slot: slot.to_string(),
                })?;
            let entry = inputs
                .get_mut(&slot)
                .ok_or_else(|| ActionError::SlotNotBound {
                    slot: slot.to_string(),
                })?;
            *entry = Some(var);
        }

        Action::SetModelInputVars(slots) => {
            next.modeling.input_vars = match slots {
                None => None,
                Some(slots) => {
                    check_slot_set(prior.modeling.model, &slots)?;
                    Some(slots.into_iter().map(|slot| (slot, None)).collect())
                }
            };
        }

        Action::SetExploratoryVar { axis, var } => {
            if var.binding != Binding::Explore(axis) {
                return Err(ActionError::BindingMismatch {
                    bound: var.binding.to_string(),
                    target: axis.variable_name().to_string(),
                });
            }
            match axis {
                Axis::X => next.exploratory_vis.x_var = Some(var),
                Axis::Y => next.exploratory_vis.y_var = Some(var),
            }
        }
    }

    Ok(next)
}

/// A dataset switch: variables are pending re-derivation and every binding
/// that pointed at the old variables is dropped
fn invalidate_variables(state: &mut AppState) {
    state.vars = Arc::new(Vec::new());
    clear_bindings(state);
}

fn clear_bindings(state: &mut AppState) {
    state.log_vars = Arc::new(Vec::new());
    state.exploratory_vis.x_var = None;
    state.exploratory_vis.y_var = None;
    state.modeling.input_vars = None;
}

/// The slot set must be exactly the one the current model implies
fn check_slot_set(model: Option<ModelKind>, slots: &[Slot]) -> Result<(), ActionError> {
    let expected: &[Slot] = model.map(|m| m.slots()).unwrap_or(&[]);

    let mut actual = slots.to_vec();
    actual.sort();
    actual.dedup();
    let mut wanted = expected.to_vec();
    wanted.sort();

    if actual.len() != slots.len() || actual != wanted || model.is_none() {
        return Err(ActionError::SlotMismatch {
            model: model.map(|m| m.to_string()).unwrap_or_else(|| "none".to_string()),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            actual: slots.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitboard_io::{ColumnDescriptor, ColumnType, Value};

    fn table(values: &[f64]) -> Arc<Table> {
        Arc::new(
            Table::new(
                vec![ColumnDescriptor::new("x", ColumnType::Number)],
                values.iter().map(|v| vec![Value::Number(*v)]).collect(),
            )
            .unwrap(),
        )
    }

    fn var(name: &str) -> Variable {
        Variable::new(name, vec![1.0, 2.0, 3.0])
    }

    fn apply(state: &AppState, actions: Vec<Action>) -> AppState {
        actions
            .into_iter()
            .fold(state.clone(), |s, a| reduce(&s, a).unwrap())
    }

    /// A state with everything populated, for invalidation checks
    fn populated() -> AppState {
        let state = apply(
            &AppState::default(),
            vec![
                Action::SetDatasetList(vec![DatasetMeta::new("a"), DatasetMeta::new("b")]),
                Action::SetActiveDataset(Some(0)),
                Action::SetActiveData(Some(table(&[1.0, 2.0]))),
                Action::SetVariables(vec![var("x"), var("y")]),
                Action::CreateLogVariable {
                    source: "x".to_string(),
                    values: vec![0.0],
                },
                Action::SetModelType(ModelKind::Linear),
                Action::SetModelInputVars(Some(ModelKind::Linear.slots().to_vec())),
                Action::SetModelingVar {
                    slot: Slot::Response,
                    var: VarRef::new(var("y"), Binding::Model(Slot::Response)),
                },
                Action::SetExploratoryVar {
                    axis: Axis::X,
                    var: VarRef::new(var("x"), Binding::Explore(Axis::X)),
                },
            ],
        );
        assert!(state.modeling.input_vars.is_some());
        state
    }

    fn assert_invalidated(state: &AppState) {
        assert!(state.vars.is_empty());
        assert!(state.log_vars.is_empty());
        assert!(state.exploratory_vis.x_var.is_none());
        assert!(state.exploratory_vis.y_var.is_none());
        assert!(state.modeling.input_vars.is_none());
    }

    #[test]
    fn test_set_dataset_list_resets_selection() {
        let state = reduce(
            &populated(),
            Action::SetDatasetList(vec![DatasetMeta::new("c")]),
        )
        .unwrap();
        assert_eq!(state.data.which, None);
        assert!(state.data.data.is_none());
        assert_eq!(state.data.datasets.len(), 1);
        assert_invalidated(&state);
    }

    #[test]
    fn test_new_table_invalidates() {
        let state = reduce(
            &populated(),
            Action::SetActiveData(Some(table(&[5.0, 6.0]))),
        )
        .unwrap();
        assert_invalidated(&state);
        assert_eq!(state.modeling.model, Some(ModelKind::Linear));
    }

    #[test]
    fn test_same_table_is_noop() {
        let prior = populated();
        let state = reduce(&prior, Action::SetActiveData(Some(table(&[1.0, 2.0])))).unwrap();
        assert_eq!(state, prior);
    }

    #[test]
    fn test_switching_dataset_invalidates() {
        let state = reduce(&populated(), Action::SetActiveDataset(Some(1))).unwrap();
        assert_eq!(state.data.which, Some(1));
        assert_invalidated(&state);
        assert!(state.data.data.is_none());
    }

    #[test]
    fn test_dataset_index_past_catalog() {
        let prior = populated();
        assert_eq!(
            reduce(&prior, Action::SetActiveDataset(Some(2))),
            Err(ActionError::DatasetOutOfRange(2))
        );
        assert!(reduce(&prior, Action::SetActiveDataset(None)).is_ok());
    }

    #[test]
    fn test_reselecting_dataset_keeps_table() {
        let prior = populated();
        let state = reduce(&prior, Action::SetActiveDataset(Some(0))).unwrap();
        assert_eq!(state, prior);
    }

    #[test]
    fn test_set_variables_clears_bindings() {
        let state = reduce(&populated(), Action::SetVariables(vec![var("z")])).unwrap();
        assert_eq!(state.vars.len(), 1);
        assert!(state.log_vars.is_empty());
        assert!(state.exploratory_vis.x_var.is_none());
        assert!(state.modeling.input_vars.is_none());
    }

    #[test]
    fn test_log_variable_is_idempotent() {
        let state = apply(
            &AppState::default(),
            vec![
                Action::CreateLogVariable {
                    source: "x".to_string(),
                    values: vec![0.0, 1.0],
                },
                Action::CreateLogVariable {
                    source: "x".to_string(),
                    values: vec![9.0],
                },
            ],
        );
        assert_eq!(state.log_vars.len(), 1);
        assert_eq!(state.log_vars[0].name, "log_x");
        assert_eq!(&*state.log_vars[0].data, &[0.0, 1.0]);
    }

    #[test]
    fn test_set_model_type_keeps_inputs() {
        let prior = populated();
        let state = reduce(&prior, Action::SetModelType(ModelKind::Quadratic)).unwrap();
        assert_eq!(state.modeling.model, Some(ModelKind::Quadratic));
        assert_eq!(state.modeling.input_vars, prior.modeling.input_vars);
    }

    #[test]
    fn test_input_vars_slot_sets() {
        let base = apply(
            &AppState::default(),
            vec![Action::SetModelType(ModelKind::Quadratic)],
        );
        let state = reduce(
            &base,
            Action::SetModelInputVars(Some(ModelKind::Quadratic.slots().to_vec())),
        )
        .unwrap();
        let inputs = state.modeling.input_vars.unwrap();
        assert_eq!(inputs.len(), 3);
        assert!(inputs.values().all(|v| v.is_none()));

        let wrong = reduce(
            &base,
            Action::SetModelInputVars(Some(ModelKind::Linear.slots().to_vec())),
        );
        assert!(matches!(wrong, Err(ActionError::SlotMismatch { .. })));

        let cleared = reduce(&base, Action::SetModelInputVars(None)).unwrap();
        assert!(cleared.modeling.input_vars.is_none());
    }

    #[test]
    fn test_input_vars_require_model() {
        let result = reduce(&AppState::default(), Action::SetModelInputVars(Some(vec![])));
        assert!(matches!(result, Err(ActionError::SlotMismatch { .. })));
    }

    #[test]
    fn test_modeling_var_requires_inputs() {
        let result = reduce(
            &AppState::default(),
            Action::SetModelingVar {
                slot: Slot::Response,
                var: VarRef::new(var("y"), Binding::Model(Slot::Response)),
            },
        );
        assert!(matches!(result, Err(ActionError::InputsUnset { .. })));
    }

    #[test]
    fn test_modeling_var_unknown_slot() {
        let result = reduce(
            &populated(),
            Action::SetModelingVar {
                slot: Slot::QuadraticVariables,
                var: VarRef::new(var("y"), Binding::Model(Slot::QuadraticVariables)),
            },
        );
        assert!(matches!(result, Err(ActionError::SlotNotBound { .. })));
    }

    #[test]
    fn test_binding_mismatch() {
        let result = reduce(
            &populated(),
            Action::SetModelingVar {
                slot: Slot::Response,
                var: VarRef::new(var("y"), Binding::Explore(Axis::Y)),
            },
        );
        assert!(matches!(result, Err(ActionError::BindingMismatch { .. })));
    }

    #[test]
    fn test_exploratory_index() {
        let action = Action::set_exploratory_var(
            1,
            VarRef::new(var("y"), Binding::Explore(Axis::Y)),
        )
        .unwrap();
        let state = reduce(&AppState::default(), action).unwrap();
        assert_eq!(state.exploratory_vis.y_var.as_ref().map(|v| v.name()), Some("y"));

        assert!(Action::set_exploratory_var(
            3,
            VarRef::new(var("y"), Binding::Explore(Axis::Y))
        )
        .is_err());
    }

    #[test]
    fn test_prior_state_untouched() {
        let prior = populated();
        let snapshot = prior.clone();
        let _ = reduce(&prior, Action::SetVariables(Vec::new())).unwrap();
        assert_eq!(prior, snapshot);
    }
}
