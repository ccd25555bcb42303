//! Line-oriented rendering surface
//!
//! Keeps what a graphical surface would show (menus with their intents,
//! labels, panels) so commands can be resolved against it, and turns every
//! visible change into a line of output.

use std::collections::BTreeMap;

use fitboard_core::{Intent, Menu, PanelKind, Region, Slot, Surface};
use fitboard_stats::{NormalPlot, SummaryStats};

#[derive(Debug, Clone)]
pub struct Entry {
    pub key: String,
    pub label: String,
    pub intent: Intent,
}

#[derive(Debug, Clone)]
pub struct PanelLine {
    pub kind: PanelKind,
    pub name: String,
    pub summary: SummaryStats,
    pub log_intent: Option<Intent>,
    pub log_enabled: bool,
}

#[derive(Debug, Default)]
pub struct TerminalSurface {
    texts: BTreeMap<Region, String>,
    hidden: BTreeMap<Region, bool>,
    menus: BTreeMap<Menu, Vec<Entry>>,
    panels: Vec<PanelLine>,
    slots: Vec<Slot>,
    output: Vec<String>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines produced since the last call
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn text(&self, region: Region) -> &str {
        self.texts.get(&region).map(String::as_str).unwrap_or("")
    }

    pub fn is_hidden(&self, region: Region) -> bool {
        self.hidden.get(&region).copied().unwrap_or(false)
    }

    pub fn entries(&self, menu: Menu) -> &[Entry] {
        self.menus.get(&menu).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find an entry by key, or failing that by label
    pub fn find_entry(&self, menu: Menu, name: &str) -> Option<&Entry> {
        let entries = self.entries(menu);
        entries
            .iter()
            .find(|e| e.key == name)
            .or_else(|| entries.iter().find(|e| e.label.eq_ignore_ascii_case(name)))
    }

    pub fn panels(&self) -> &[PanelLine] {
        &self.panels
    }

    /// The enabled log affordance of an original panel
    pub fn log_intent(&self, name: &str) -> Option<Intent> {
        self.panels
            .iter()
            .find(|p| p.kind == PanelKind::Original && p.name == name && p.log_enabled)
            .and_then(|p| p.log_intent.clone())
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn emit(&mut self, line: String) {
        self.output.push(line);
    }
}

pub fn describe(summary: &SummaryStats) -> String {
    if summary.is_empty() {
        return format!("n=0 missing={}", summary.missing);
    }
    format!(
        "n={} missing={} mean={:.3} sd={:.3} min={:.3} max={:.3}",
        summary.count, summary.missing, summary.mean, summary.std_dev, summary.min, summary.max
    )
}

fn kind_name(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Original => "variable",
        PanelKind::Derived => "derived",
    }
}

impl Surface for TerminalSurface {
    fn set_text(&mut self, region: Region, text: &str) {
        if self.texts.get(&region).map(String::as_str) != Some(text) {
            self.texts.insert(region, text.to_string());
            self.emit(format!("[{}] {}", region, text));
        }
    }

    fn set_hidden(&mut self, region: Region, hidden: bool) {
        self.hidden.insert(region, hidden);
    }

    fn add_entry(&mut self, menu: Menu, key: &str, label: &str, intent: Intent) {
        self.menus.entry(menu).or_default().push(Entry {
            key: key.to_string(),
            label: label.to_string(),
            intent,
        });
    }

    fn remove_entry(&mut self, menu: Menu, key: &str) {
        if let Some(entries) = self.menus.get_mut(&menu) {
            entries.retain(|e| e.key != key);
        }
    }

    fn clear_menu(&mut self, menu: Menu) {
        self.menus.remove(&menu);
    }

    fn show_slot_controls(&mut self, slots: &[Slot]) {
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
        self.emit(format!(
            "+ {} {}: {}",
            kind_name(kind),
            name,
            describe(&plot.summary)
        ));
        self.panels.push(PanelLine {
            kind,
            name: name.to_string(),
            summary: plot.summary.clone(),
            log_enabled: log_intent.is_some(),
            log_intent,
        });
    }

    fn remove_panel(&mut self, kind: PanelKind, name: &str) {
        self.panels.retain(|p| !(p.kind == kind && p.name == name));
        self.emit(format!("- {} {}", kind_name(kind), name));
    }

    fn set_log_enabled(&mut self, name: &str, enabled: bool) {
        if let Some(panel) = self
            .panels
            .iter_mut()
            .find(|p| p.kind == PanelKind::Original && p.name == name)
        {
            panel.log_enabled = enabled;
        }
    }

    fn render_scatter(&mut self, points: &[(f64, f64)]) {
        let finite = points
            .iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .count();
        self.emit(format!(
            "scatter: {} points ({} complete)",
            points.len(),
            finite
        ));
    }

    fn clear_scatter(&mut self) {
        self.emit("scatter cleared".to_string());
    }

    fn show_info(&mut self, text: &str) {
        self.emit(format!("[{}]", Region::ModelInfo));
        for line in text.lines() {
            self.emit(format!("  {}", line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_entry_by_key_or_label() {
        let mut surface = TerminalSurface::new();
        surface.add_entry(
            Menu::Datasets,
            "mtcars",
            "Cars",
            Intent::SelectDataset {
                identity: "mtcars".to_string(),
            },
        );

        assert!(surface.find_entry(Menu::Datasets, "mtcars").is_some());
        assert!(surface.find_entry(Menu::Datasets, "cars").is_some());
        assert!(surface.find_entry(Menu::Datasets, "iris").is_none());
    }

    #[test]
    fn test_unchanged_text_is_quiet() {
        let mut surface = TerminalSurface::new();
        surface.set_text(Region::ModelButton, "Model");
        surface.set_text(Region::ModelButton, "Model");
        assert_eq!(surface.take_output(), vec!["[model-button] Model".to_string()]);
    }

    #[test]
    fn test_disabled_log_affordance() {
        let mut surface = TerminalSurface::new();
        let plot = NormalPlot::from_data(&[1.0, 2.0]);
        let log = Intent::ComputeLog {
            name: "wt".to_string(),
        };
        surface.add_panel(PanelKind::Original, "wt", &plot, Some(log.clone()));
        assert_eq!(surface.log_intent("wt"), Some(log));

        surface.set_log_enabled("wt", false);
        assert!(surface.log_intent("wt").is_none());
    }
}
