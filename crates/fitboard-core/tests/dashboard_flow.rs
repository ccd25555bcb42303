//! Full dashboard sessions against the recording surface

use fitboard_core::testing::RecordingSurface;
use fitboard_core::{
    Axis, Dashboard, DatasetMeta, Effect, Intent, Menu, ModelKind, PanelKind, Region, Slot,
    Ticket,
};
use fitboard_io::{read_table, Table};
use serde_json::json;

const BASE: &str = "http://127.0.0.1:8080/d3mLm";

fn cars() -> Table {
    read_table(b"model,wt,mpg\nfiat,2.2,32.4\nvolvo,3.0,21.4\nbuick,3.8,17.0\n").unwrap()
}

fn iris() -> Table {
    read_table(b"sepal_length,species\n5.1,setosa\n4.9,setosa\n").unwrap()
}

fn catalog() -> Vec<DatasetMeta> {
    vec![
        DatasetMeta::new("Iris"),
        DatasetMeta::new("Cars").with_key("mtcars"),
    ]
}

fn new_dashboard() -> Dashboard<RecordingSurface> {
    Dashboard::new(catalog(), RecordingSurface::new()).unwrap()
}

/// Activate the entry `key` of `menu` the way a click would
fn click(dash: &Dashboard<RecordingSurface>, menu: Menu, key: &str) {
    let intent = dash
        .surface()
        .intent(menu, key)
        .unwrap_or_else(|| panic!("no entry {} in menu {}", key, menu));
    dash.handle(intent).unwrap();
}

fn load_ticket(effects: &[Effect]) -> Ticket {
    match effects {
        [Effect::LoadDataset { ticket, .. }] => *ticket,
        other => panic!("expected one dataset load, got {:?}", other),
    }
}

/// Select Cars and deliver its table
fn with_cars() -> Dashboard<RecordingSurface> {
    let dash = new_dashboard();
    click(&dash, Menu::Datasets, "mtcars");
    let ticket = load_ticket(&dash.take_effects());
    assert!(dash.complete_dataset(ticket, cars()).unwrap());
    dash
}

fn fits(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::FitModel { .. }))
        .count()
}

#[test]
fn loading_a_dataset_derives_variables() {
    let dash = with_cars();
    let state = dash.state();

    let names: Vec<_> = state.vars.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["wt", "mpg"]);

    let surface = dash.surface();
    assert_eq!(surface.text(Region::DatasetToggle), Some("Cars"));
    assert!(!surface.is_hidden(Region::OriginalVariables));
    assert!(surface.is_hidden(Region::DerivedVariables));
    assert!(!surface.is_hidden(Region::ExploratoryVis));
    assert!(!surface.is_hidden(Region::Modeling));

    let panel = surface.panel(PanelKind::Original, "wt").unwrap();
    assert_eq!(panel.plot.len(), 3);
    assert!(panel.log_enabled);
    assert_eq!(surface.entry_keys(Menu::Axis(Axis::X)), vec!["wt", "mpg"]);
}

#[test]
fn log_transform_is_idempotent_and_disables_affordance() {
    let dash = with_cars();
    let intent = dash
        .surface()
        .panel(PanelKind::Original, "wt")
        .and_then(|p| p.log_intent.clone())
        .unwrap();

    dash.handle(intent.clone()).unwrap();
    dash.handle(intent).unwrap();

    let state = dash.state();
    assert_eq!(state.log_vars.len(), 1);
    assert_eq!(state.log_vars[0].name, "log_wt");
    assert!((state.log_vars[0].data[0] - 2.2f64.ln()).abs() < 1e-12);

    let surface = dash.surface();
    assert!(!surface.panel(PanelKind::Original, "wt").unwrap().log_enabled);
    assert!(surface.panel(PanelKind::Original, "mpg").unwrap().log_enabled);
    assert_eq!(surface.panels(PanelKind::Derived).len(), 1);
    assert!(!surface.is_hidden(Region::DerivedVariables));
    assert!(surface
        .entry_keys(Menu::Axis(Axis::Y))
        .contains(&"log_wt"));
}

#[test]
fn exploratory_scatter_needs_both_axes() {
    let dash = with_cars();
    click(&dash, Menu::Axis(Axis::X), "wt");
    assert!(dash.surface().scatter().is_none());
    assert_eq!(dash.surface().text(Region::AxisButton(Axis::X)), Some("X: wt"));
    assert_eq!(dash.surface().text(Region::AxisButton(Axis::Y)), Some("Y"));

    click(&dash, Menu::Axis(Axis::Y), "mpg");
    let surface = dash.surface();
    let points = surface.scatter().unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0], (2.2, 32.4));
}

#[test]
fn choosing_a_model_builds_empty_slots() {
    let dash = with_cars();
    click(&dash, Menu::Models, "quadratic");

    let state = dash.state();
    let inputs = state.modeling.input_vars.as_ref().unwrap();
    assert_eq!(
        inputs.keys().copied().collect::<Vec<_>>(),
        vec![
            Slot::PredictorVariables,
            Slot::Response,
            Slot::QuadraticVariables
        ]
    );
    assert!(inputs.values().all(|v| v.is_none()));

    let surface = dash.surface();
    assert_eq!(surface.text(Region::ModelButton), Some("Model: quadratic"));
    assert_eq!(surface.slot_controls().len(), 3);
    assert_eq!(
        surface.text(Region::SlotButton(Slot::QuadraticVariables)),
        Some("Quadratic")
    );
    assert_eq!(
        surface.entry_keys(Menu::Slot(Slot::Response)),
        vec!["wt", "mpg"]
    );
}

#[test]
fn fit_fires_only_when_every_slot_is_bound() {
    let dash = with_cars();
    click(&dash, Menu::Models, "linear");
    assert_eq!(fits(&dash.take_effects()), 0);

    click(&dash, Menu::Slot(Slot::Response), "mpg");
    assert_eq!(fits(&dash.take_effects()), 0);
    assert_eq!(
        dash.surface().text(Region::SlotButton(Slot::Response)),
        Some("response: mpg")
    );

    click(&dash, Menu::Slot(Slot::PredictorVariables), "wt");
    let effects = dash.take_effects();
    assert_eq!(fits(&effects), 1);

    let (ticket, url) = match &effects[..] {
        [Effect::FitModel { ticket, request }] => (*ticket, request.url(BASE).unwrap()),
        other => panic!("unexpected effects {:?}", other),
    };
    assert!(url.starts_with("http://127.0.0.1:8080/d3mLm/linear?data="));
    assert!(url.contains("predictor_variables=%22wt%22"));
    assert!(url.contains("response=%22mpg%22"));

    assert!(dash.complete_fit(ticket, &json!({"coef": [1.0, 2.0]})).unwrap());
    let surface = dash.surface();
    assert!(!surface.is_hidden(Region::ModelInfo));
    assert!(surface.info().unwrap().contains("\"coef\""));
}

#[test]
fn stale_fit_is_dropped() {
    let dash = with_cars();
    click(&dash, Menu::Models, "loess");
    click(&dash, Menu::Slot(Slot::Response), "mpg");
    click(&dash, Menu::Slot(Slot::PredictorVariables), "wt");
    let first = dash.take_effects()[0].ticket();

    // Rebinding supersedes the request in flight
    click(&dash, Menu::Slot(Slot::Response), "wt");
    let second = dash.take_effects()[0].ticket();

    assert!(!dash.complete_fit(first, &json!({"stale": true})).unwrap());
    assert!(dash.surface().info().is_none());
    assert!(dash.complete_fit(second, &json!({"fresh": true})).unwrap());
}

#[test]
fn stale_dataset_load_is_dropped() {
    let dash = new_dashboard();
    click(&dash, Menu::Datasets, "Iris");
    let iris_ticket = load_ticket(&dash.take_effects());
    click(&dash, Menu::Datasets, "mtcars");
    let cars_ticket = load_ticket(&dash.take_effects());

    assert!(!dash.complete_dataset(iris_ticket, iris()).unwrap());
    assert!(dash.state().vars.is_empty());
    assert!(dash.state().data.data.is_none());

    assert!(dash.complete_dataset(cars_ticket, cars()).unwrap());
    assert_eq!(dash.state().vars.len(), 2);
}

#[test]
fn catalog_reload_retires_load_in_flight() {
    let dash = new_dashboard();
    click(&dash, Menu::Datasets, "mtcars");
    let ticket = load_ticket(&dash.take_effects());

    dash.set_datasets(vec![DatasetMeta::new("Other")]).unwrap();
    assert!(!dash.complete_dataset(ticket, cars()).unwrap());

    let state = dash.state();
    assert_eq!(state.data.which, None);
    assert!(state.data.data.is_none());
    assert!(state.vars.is_empty());
    assert_eq!(dash.surface().text(Region::DatasetToggle), Some("Select dataset"));
}

#[test]
fn switching_dataset_invalidates_and_restores_slots() {
    let dash = with_cars();
    click(&dash, Menu::Models, "linear");
    click(&dash, Menu::Slot(Slot::Response), "mpg");
    click(&dash, Menu::Axis(Axis::X), "wt");
    click(&dash, Menu::Axis(Axis::Y), "mpg");
    dash.take_effects();

    click(&dash, Menu::Datasets, "Iris");
    let state = dash.state();
    assert!(state.vars.is_empty());
    assert!(state.exploratory_vis.x_var.is_none());
    {
        let surface = dash.surface();
        assert!(surface.panels(PanelKind::Original).is_empty());
        assert!(surface.entries(Menu::Axis(Axis::X)).is_empty());
        assert!(surface.scatter().is_none());
        assert_eq!(surface.text(Region::AxisButton(Axis::X)), Some("X"));
    }

    let ticket = load_ticket(&dash.take_effects());
    assert!(dash.complete_dataset(ticket, iris()).unwrap());

    let state = dash.state();
    assert_eq!(state.vars.len(), 1);
    assert_eq!(state.modeling.model, Some(ModelKind::Linear));
    let inputs = state.modeling.input_vars.as_ref().unwrap();
    assert_eq!(inputs.len(), 2);
    assert!(inputs.values().all(|v| v.is_none()));
    assert_eq!(
        dash.surface().entry_keys(Menu::Slot(Slot::PredictorVariables)),
        vec!["sepal_length"]
    );
}

#[test]
fn derived_variable_keeps_bindings() {
    let dash = with_cars();
    click(&dash, Menu::Models, "linear");
    click(&dash, Menu::Slot(Slot::Response), "mpg");

    dash.handle(Intent::ComputeLog {
        name: "wt".to_string(),
    })
    .unwrap();

    let state = dash.state();
    let inputs = state.modeling.input_vars.as_ref().unwrap();
    assert_eq!(
        inputs[&Slot::Response].as_ref().map(|v| v.name()),
        Some("mpg")
    );
    assert!(dash
        .surface()
        .entry_keys(Menu::Slot(Slot::PredictorVariables))
        .contains(&"log_wt"));

    click(&dash, Menu::Slot(Slot::PredictorVariables), "log_wt");
    assert_eq!(fits(&dash.take_effects()), 1);
}

#[test]
fn identical_dataset_list_touches_nothing() {
    let dash = new_dashboard();
    dash.surface_mut().clear_ops();

    dash.set_datasets(catalog()).unwrap();
    assert_eq!(dash.surface().entry_changes(Menu::Datasets), 0);

    let rekeyed = vec![
        DatasetMeta::new("Iris"),
        DatasetMeta::new("Cars").with_key("mtcars-2024"),
    ];
    dash.set_datasets(rekeyed).unwrap();
    let surface = dash.surface();
    assert_eq!(surface.entry_changes(Menu::Datasets), 2);
    assert_eq!(surface.entry_keys(Menu::Datasets), vec!["Iris", "mtcars-2024"]);
}

#[test]
fn removed_entries_cannot_be_activated() {
    let dash = with_cars();
    let stale = dash.surface().intent(Menu::Axis(Axis::X), "wt").unwrap();

    click(&dash, Menu::Datasets, "Iris");
    assert!(dash.surface().intent(Menu::Axis(Axis::X), "wt").is_none());
    assert!(dash.handle(stale).is_err());
}
