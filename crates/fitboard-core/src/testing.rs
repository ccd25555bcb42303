//! In-memory rendering surface for tests
//!
//! [`RecordingSurface`] logs every call it receives and keeps the state
//! those calls leave behind: labels, visibility, menu entries with their
//! intents, panels, slot controls, the scatter and the info block.

use std::collections::BTreeMap;

use fitboard_stats::NormalPlot;

use crate::state::Slot;
use crate::surface::{Intent, Menu, PanelKind, Region, Surface};

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    SetText(Region, String),
    SetHidden(Region, bool),
    AddEntry(Menu, String),
    RemoveEntry(Menu, String),
    ClearMenu(Menu),
    ShowSlotControls(Vec<Slot>),
    AddPanel(PanelKind, String),
    RemovePanel(PanelKind, String),
    SetLogEnabled(String, bool),
    RenderScatter(usize),
    ClearScatter,
    ShowInfo,
}

/// A menu entry as currently shown
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub label: String,
    pub intent: Intent,
}

/// A variable panel as currently shown
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub name: String,
    pub plot: NormalPlot,
    pub log_intent: Option<Intent>,
    pub log_enabled: bool,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    texts: BTreeMap<Region, String>,
    hidden: BTreeMap<Region, bool>,
    menus: BTreeMap<Menu, Vec<Entry>>,
    panels: Vec<Panel>,
    slots: Vec<Slot>,
    scatter: Option<Vec<(f64, f64)>>,
    info: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call since creation or the last [`clear_ops`](Self::clear_ops)
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Entry additions and removals on `menu` among the recorded calls
    pub fn entry_changes(&self, menu: Menu) -> usize {
        self.ops
            .iter()
            .filter(|op| {
                matches!(op, SurfaceOp::AddEntry(m, _) | SurfaceOp::RemoveEntry(m, _) if *m == menu)
            })
            .count()
    }

    pub fn text(&self, region: Region) -> Option<&str> {
        self.texts.get(&region).map(String::as_str)
    }

    /// Regions never hidden or shown count as visible
    pub fn is_hidden(&self, region: Region) -> bool {
        self.hidden.get(&region).copied().unwrap_or(false)
    }

    pub fn entries(&self, menu: Menu) -> &[Entry] {
        self.menus.get(&menu).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entry_keys(&self, menu: Menu) -> Vec<&str> {
        self.entries(menu).iter().map(|e| e.key.as_str()).collect()
    }

    /// The intent behind the entry with this key, as a click would deliver it
    pub fn intent(&self, menu: Menu, key: &str) -> Option<Intent> {
        self.entries(menu)
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.intent.clone())
    }

    pub fn panels(&self, kind: PanelKind) -> Vec<&Panel> {
        self.panels.iter().filter(|p| p.kind == kind).collect()
    }

    pub fn panel(&self, kind: PanelKind, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind && p.name == name)
    }

    pub fn slot_controls(&self) -> &[Slot] {
        &self.slots
    }

    pub fn scatter(&self) -> Option<&[(f64, f64)]> {
        self.scatter.as_deref()
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }
}

impl Surface for RecordingSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        self.ops.push(SurfaceOp::SetText(region, text.to_string()));
        self.texts.insert(region, text.to_string());
    }

    fn set_hidden(&mut self, region: Region, hidden: bool) {
        self.ops.push(SurfaceOp::SetHidden(region, hidden));
        self.hidden.insert(region, hidden);
    }

    fn add_entry(&mut self, menu: Menu, key: &str, label: &str, intent: Intent) {
        self.ops.push(SurfaceOp::AddEntry(menu, key.to_string()));
        self.menus.entry(menu).or_default().push(Entry {
            key: key.to_string(),
            label: label.to_string(),
            intent,
        });
    }

    fn remove_entry(&mut self, menu: Menu, key: &str) {
        self.ops.push(SurfaceOp::RemoveEntry(menu, key.to_string()));
        if let Some(entries) = self.menus.get_mut(&menu) {
            entries.retain(|e| e.key != key);
        }
    }

    fn clear_menu(&mut self, menu: Menu) {
        self.ops.push(SurfaceOp::ClearMenu(menu));
        self.menus.remove(&menu);
    }

    fn show_slot_controls(&mut self, slots: &[Slot]) {
        self.ops.push(SurfaceOp::ShowSlotControls(slots.to_vec()));
        for slot in self.slots.drain(..) {
            self.menus.remove(&Menu::Slot(slot));
            self.texts.remove(&Region::SlotButton(slot));
        }
        self.slots = slots.to_vec();
    }

    fn add_panel(
        &mut self,
        kind: PanelKind,
        name: &str,
        plot: &NormalPlot,
        log_intent: Option<Intent>,
    ) {
        self.ops.push(SurfaceOp::AddPanel(kind, name.to_string()));
        self.panels.push(Panel {
            kind,
            name: name.to_string(),
            plot: plot.clone(),
            log_enabled: log_intent.is_some(),
            log_intent,
        });
    }

    fn remove_panel(&mut self, kind: PanelKind, name: &str) {
        self.ops.push(SurfaceOp::RemovePanel(kind, name.to_string()));
        self.panels.retain(|p| !(p.kind == kind && p.name == name));
    }

    fn set_log_enabled(&mut self, name: &str, enabled: bool) {
        self.ops.push(SurfaceOp::SetLogEnabled(name.to_string(), enabled));
        if let Some(panel) = self
            .panels
            .iter_mut()
            .find(|p| p.kind == PanelKind::Original && p.name == name)
        {
            panel.log_enabled = enabled;
        }
    }

    fn render_scatter(&mut self, points: &[(f64, f64)]) {
        self.ops.push(SurfaceOp::RenderScatter(points.len()));
        self.scatter = Some(points.to_vec());
    }

    fn clear_scatter(&mut self) {
        self.ops.push(SurfaceOp::ClearScatter);
        self.scatter = None;
    }

    fn show_info(&mut self, text: &str) {
        self.ops.push(SurfaceOp::ShowInfo);
        self.info = Some(text.to_string());
    }
}
