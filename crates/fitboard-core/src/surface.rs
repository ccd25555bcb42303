//! The rendering surface contract
//!
//! Views never draw anything themselves. They address a fixed set of
//! regions, menus and variable panels on a [`Surface`], and every clickable
//! thing they create carries an [`Intent`]. When the host sees an entry
//! activated it hands that intent back to the dashboard, which resolves the
//! named target against the state current at that moment.

use std::fmt;

use fitboard_stats::NormalPlot;

use crate::state::{Axis, ModelKind, Slot};

/// Fixed element identities on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Label of the dataset dropdown
    DatasetToggle,
    OriginalVariables,
    DerivedVariables,
    ExploratoryVis,
    Modeling,
    AxisButton(Axis),
    ModelButton,
    SlotButton(Slot),
    /// Preformatted block showing the fit result
    ModelInfo,
}

/// Menus holding intent-carrying entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Menu {
    Datasets,
    Axis(Axis),
    Models,
    Slot(Slot),
}

/// Which variables section a panel lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelKind {
    Original,
    Derived,
}

/// What activating an entry asks for
///
/// Targets are named, not captured: a variable is referred to by name and a
/// dataset by identity, so an intent never holds on to data that a later
/// state has replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    SelectDataset { identity: String },
    ComputeLog { name: String },
    ChooseModel(ModelKind),
    BindModelVar { slot: Slot, name: String },
    BindExploratory { axis: Axis, name: String },
}

/// The host's rendering surface
pub trait Surface {
    fn set_text(&mut self, region: Region, text: &str);

    fn set_hidden(&mut self, region: Region, hidden: bool);

    /// Add an entry; `key` identifies it within the menu
    fn add_entry(&mut self, menu: Menu, key: &str, label: &str, intent: Intent);

    /// Remove an entry and its intent
    fn remove_entry(&mut self, menu: Menu, key: &str);

    fn clear_menu(&mut self, menu: Menu);

    /// Replace the per-slot buttons and menus of the modeling section
    fn show_slot_controls(&mut self, slots: &[Slot]);

    /// Add a variable panel with its distribution plot; `log_intent` is the
    /// "compute log transform" affordance, present on original panels only
    fn add_panel(
        &mut self,
        kind: PanelKind,
        name: &str,
        plot: &NormalPlot,
        log_intent: Option<Intent>,
    );

    fn remove_panel(&mut self, kind: PanelKind, name: &str);

    /// Enable or disable the log affordance of an original panel
    fn set_log_enabled(&mut self, name: &str, enabled: bool);

    fn render_scatter(&mut self, points: &[(f64, f64)]);

    fn clear_scatter(&mut self);

    /// Show text in the model info block
    fn show_info(&mut self, text: &str);
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::DatasetToggle => f.write_str("dataset-toggle"),
            Region::OriginalVariables => f.write_str("original-variables"),
            Region::DerivedVariables => f.write_str("derived-variables"),
            Region::ExploratoryVis => f.write_str("exploratory-vis"),
            Region::Modeling => f.write_str("modeling"),
            Region::AxisButton(axis) => write!(f, "{}-button", axis.variable_name()),
            Region::ModelButton => f.write_str("model-button"),
            Region::SlotButton(slot) => write!(f, "{}-button", slot.variable_name()),
            Region::ModelInfo => f.write_str("model-info"),
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Menu::Datasets => f.write_str("datasets"),
            Menu::Axis(axis) => f.write_str(axis.variable_name()),
            Menu::Models => f.write_str("models"),
            Menu::Slot(slot) => f.write_str(slot.variable_name()),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::SelectDataset { identity } => write!(f, "select {}", identity),
            Intent::ComputeLog { name } => write!(f, "log {}", name),
            Intent::ChooseModel(kind) => write!(f, "model {}", kind),
            Intent::BindModelVar { slot, name } => write!(f, "bind {} {}", slot, name),
            Intent::BindExploratory { axis, name } => {
                write!(f, "{} {}", axis.variable_name(), name)
            }
        }
    }
}
