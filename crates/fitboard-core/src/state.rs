//! The application state tree
//!
//! One immutable [`AppState`] value is current at any time. Actions never
//! mutate it; the reducer builds a new tree and the store swaps it in.
//! Large pieces (tables, variable lists, series) sit behind `Arc` so a new
//! tree shares everything the action did not touch.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use fitboard_io::{DatasetMeta, Table};

use crate::error::ActionError;

/// The whole dashboard state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub data: DataState,
    /// Variables derived from the active table's columns
    pub vars: Arc<Vec<Variable>>,
    /// Log-transformed derived variables
    pub log_vars: Arc<Vec<Variable>>,
    pub exploratory_vis: ExploratoryVis,
    pub modeling: Modeling,
}

impl AppState {
    /// Original and derived variables, originals first
    pub fn all_vars(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter().chain(self.log_vars.iter())
    }

    /// Find a variable by name among originals and derived ones
    pub fn find_var(&self, name: &str) -> Option<&Variable> {
        self.all_vars().find(|v| v.name == name)
    }

    /// The active dataset, if one is selected
    pub fn active_dataset(&self) -> Option<&DatasetMeta> {
        self.data.which.and_then(|i| self.data.datasets.get(i))
    }

    /// Whether a `log_<name>` sibling already exists
    pub fn has_log_of(&self, name: &str) -> bool {
        let log_name = fitboard_stats::log_name(name);
        self.log_vars.iter().any(|v| v.name == log_name)
    }
}

/// Dataset catalog, selection and the loaded table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataState {
    pub datasets: Arc<Vec<DatasetMeta>>,
    /// Index into `datasets`; `None` means nothing selected
    pub which: Option<usize>,
    pub data: Option<Arc<Table>>,
}

/// Variables bound to the exploratory scatter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExploratoryVis {
    pub x_var: Option<VarRef>,
    pub y_var: Option<VarRef>,
}

impl ExploratoryVis {
    pub fn get(&self, axis: Axis) -> Option<&VarRef> {
        match axis {
            Axis::X => self.x_var.as_ref(),
            Axis::Y => self.y_var.as_ref(),
        }
    }
}

/// Model choice and its input bindings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modeling {
    pub model: Option<ModelKind>,
    /// When set, holds exactly the slot set of `model`
    pub input_vars: Option<InputBindings>,
}

impl Modeling {
    /// Bound variables in slot order, or `None` unless every slot is bound
    pub fn complete_bindings(&self) -> Option<Vec<&VarRef>> {
        let inputs = self.input_vars.as_ref()?;
        if inputs.is_empty() {
            return None;
        }
        inputs.values().map(|v| v.as_ref()).collect()
    }
}

/// Slot → bound variable
pub type InputBindings = BTreeMap<Slot, Option<VarRef>>;

/// A named numeric series
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub data: Arc<[f64]>,
}

impl Variable {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[f64]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Shared series compare by pointer first; otherwise bitwise, so NaN
// entries from missing cells do not make a variable unequal to itself.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && (Arc::ptr_eq(&self.data, &other.data)
                || (self.data.len() == other.data.len()
                    && self
                        .data
                        .iter()
                        .zip(other.data.iter())
                        .all(|(a, b)| a.to_bits() == b.to_bits())))
    }
}

/// A variable annotated with the slot or axis it was bound into
#[derive(Debug, Clone, PartialEq)]
pub struct VarRef {
    pub variable: Variable,
    pub binding: Binding,
}

impl VarRef {
    pub fn new(variable: Variable, binding: Binding) -> Self {
        Self { variable, binding }
    }

    /// The variable's own name
    pub fn name(&self) -> &str {
        &self.variable.name
    }

    /// Name of the slot it is bound into (`predictor_variables`, `x`, ...)
    pub fn variable_name(&self) -> &'static str {
        self.binding.variable_name()
    }

    pub fn display_name(&self) -> &'static str {
        self.binding.display_name()
    }
}

/// Where a [`VarRef`] is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Model(Slot),
    Explore(Axis),
}

impl Binding {
    pub fn variable_name(&self) -> &'static str {
        match self {
            Binding::Model(slot) => slot.variable_name(),
            Binding::Explore(axis) => axis.variable_name(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Binding::Model(slot) => slot.display_name(),
            Binding::Explore(axis) => axis.display_name(),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable_name())
    }
}

/// Model kinds the remote service can fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    Linear,
    Quadratic,
    Loess,
}

impl ModelKind {
    /// Menu order
    pub const ALL: [ModelKind; 3] = [ModelKind::Linear, ModelKind::Quadratic, ModelKind::Loess];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Quadratic => "quadratic",
            ModelKind::Loess => "loess",
        }
    }

    /// Input slots this model needs, in display order
    pub fn slots(&self) -> &'static [Slot] {
        const TWO: [Slot; 2] = [Slot::PredictorVariables, Slot::Response];
        const THREE: [Slot; 3] = [
            Slot::PredictorVariables,
            Slot::Response,
            Slot::QuadraticVariables,
        ];
        match self {
            ModelKind::Linear | ModelKind::Loess => &TWO,
            ModelKind::Quadratic => &THREE,
        }
    }

    /// A fresh binding set with every slot of this model unbound
    pub fn empty_bindings(&self) -> InputBindings {
        self.slots().iter().map(|slot| (*slot, None)).collect()
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(ModelKind::Linear),
            "quadratic" => Ok(ModelKind::Quadratic),
            "loess" => Ok(ModelKind::Loess),
            other => Err(ActionError::UnknownModel(other.to_string())),
        }
    }
}

/// Named model input roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    PredictorVariables,
    Response,
    QuadraticVariables,
}

impl Slot {
    /// Query-parameter name sent to the modeling service
    pub fn variable_name(&self) -> &'static str {
        match self {
            Slot::PredictorVariables => "predictor_variables",
            Slot::Response => "response",
            Slot::QuadraticVariables => "quadratic_variables",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Slot::PredictorVariables => "predictor",
            Slot::Response => "response",
            Slot::QuadraticVariables => "quadratic",
        }
    }

    /// Button label when nothing is bound
    pub fn label(&self) -> String {
        capitalize(self.display_name())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable_name())
    }
}

impl FromStr for Slot {
    type Err = ActionError;

    /// Accepts either the wire name or the display name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predictor_variables" | "predictor" => Ok(Slot::PredictorVariables),
            "response" => Ok(Slot::Response),
            "quadratic_variables" | "quadratic" => Ok(Slot::QuadraticVariables),
            other => Err(ActionError::UnknownSlot(other.to_string())),
        }
    }
}

/// Axes of the exploratory scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// 0 → X, 1 → Y
    pub fn from_index(which: usize) -> Result<Self, ActionError> {
        match which {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            other => Err(ActionError::AxisOutOfRange(other)),
        }
    }

    pub fn variable_name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
