//! Console session: commands in, intents to the dashboard, effects out

use std::str::FromStr;

use fitboard_core::{
    Catalog, Dashboard, DashboardConfig, DashboardError, Effect, Intent, Menu, ModelClient,
    PanelKind, Region, Slot,
};
use fitboard_io::read_table;
use thiserror::Error;
use tracing::{debug, warn};

use crate::commands::{Command, HELP};
use crate::terminal::{describe, TerminalSurface};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("Nothing named '{name}' in the {menu} menu")]
    NotShown { menu: String, name: String },

    #[error("No log transform available for '{0}'")]
    LogUnavailable(String),
}

pub struct App {
    dashboard: Dashboard<TerminalSurface>,
    catalog: Catalog,
    client: ModelClient,
    base_url: String,
}

impl App {
    pub fn new(config: DashboardConfig) -> Result<Self, AppError> {
        let client = ModelClient::new(&config.service).map_err(DashboardError::from)?;
        let dashboard = Dashboard::from_config(&config, TerminalSurface::new())?;
        Ok(Self {
            dashboard,
            catalog: config.catalog,
            client,
            base_url: config.service.base_url,
        })
    }

    /// Print whatever the surface rendered since the last flush
    pub fn flush(&self) {
        let lines = self.dashboard.surface_mut().take_output();
        for line in lines {
            println!("{}", line);
        }
    }

    /// Run one command line; returns `false` once the session should end
    pub async fn execute(&self, line: &str) -> Result<bool, AppError> {
        let command = match Command::from_str(line) {
            Ok(command) => command,
            Err(err) => {
                self.say(err.to_string());
                return Ok(true);
            }
        };

        match command {
            Command::Quit => return Ok(false),
            Command::Help => self.say(HELP.to_string()),
            Command::Datasets => self.list_datasets(),
            Command::Vars => self.list_vars(),
            Command::State => self.summarize(),
            Command::Select(name) => self.activate(Menu::Datasets, &name)?,
            Command::Log(name) => {
                let intent = self
                    .dashboard
                    .surface()
                    .log_intent(&name)
                    .ok_or(AppError::LogUnavailable(name))?;
                self.dashboard.handle(intent)?;
            }
            Command::Explore(axis, name) => self.activate(Menu::Axis(axis), &name)?,
            Command::Model(kind) => self.activate(Menu::Models, &kind)?,
            Command::Bind { slot, var } => {
                let slot = Slot::from_str(&slot).map_err(DashboardError::from)?;
                self.activate(Menu::Slot(slot), &var)?;
            }
        }

        self.run_effects().await;
        Ok(true)
    }

    /// Resolve a name to an entry the surface shows and hand its intent over
    fn activate(&self, menu: Menu, name: &str) -> Result<(), AppError> {
        let intent: Intent = self
            .dashboard
            .surface()
            .find_entry(menu, name)
            .map(|e| e.intent.clone())
            .ok_or_else(|| AppError::NotShown {
                menu: menu.to_string(),
                name: name.to_string(),
            })?;
        self.dashboard.handle(intent)?;
        Ok(())
    }

    /// Perform queued reads until none are left; completions may queue more
    async fn run_effects(&self) {
        loop {
            let effects = self.dashboard.take_effects();
            if effects.is_empty() {
                return;
            }
            for effect in effects {
                if let Err(err) = self.run_effect(effect).await {
                    warn!(error = %err, "effect failed");
                    self.say(format!("error: {}", err));
                }
            }
        }
    }

    async fn run_effect(&self, effect: Effect) -> Result<(), DashboardError> {
        match effect {
            Effect::LoadDataset { ticket, dataset } => {
                let path = self.catalog.resolve(&dataset);
                debug!(path = %path.display(), %ticket, "reading dataset");
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(fitboard_core::IoError::from)?;
                let table = read_table(&bytes)?;
                self.say(format!(
                    "loaded {} ({} rows)",
                    dataset.name,
                    table.num_rows()
                ));
                self.dashboard.complete_dataset(ticket, table)?;
            }
            Effect::FitModel { ticket, request } => {
                debug!(url = %request.url(&self.base_url)?, %ticket, "requesting fit");
                self.say(format!("fitting {} model...", request.kind));
                let result = self.client.fit(&request).await?;
                self.dashboard.complete_fit(ticket, &result)?;
            }
        }
        Ok(())
    }

    fn list_datasets(&self) {
        let surface = self.dashboard.surface();
        let active = surface.text(Region::DatasetToggle).to_string();
        let lines: Vec<String> = surface
            .entries(Menu::Datasets)
            .iter()
            .map(|e| {
                let marker = if e.label == active { "*" } else { " " };
                format!("{} {} ({})", marker, e.label, e.key)
            })
            .collect();
        drop(surface);
        if lines.is_empty() {
            self.say("no datasets configured".to_string());
        }
        for line in lines {
            self.say(line);
        }
    }

    fn list_vars(&self) {
        let surface = self.dashboard.surface();
        let lines: Vec<String> = surface
            .panels()
            .iter()
            .map(|p| {
                let tag = match (p.kind, p.log_enabled) {
                    (PanelKind::Derived, _) => " [derived]",
                    (PanelKind::Original, true) => " [log available]",
                    (PanelKind::Original, false) => "",
                };
                format!("{}{}: {}", p.name, tag, describe(&p.summary))
            })
            .collect();
        drop(surface);
        if lines.is_empty() {
            self.say("no variables; select a dataset first".to_string());
        }
        for line in lines {
            self.say(line);
        }
    }

    fn summarize(&self) {
        let state = self.dashboard.state();
        let surface = self.dashboard.surface();
        let mut lines = vec![
            format!("dataset: {}", surface.text(Region::DatasetToggle)),
            format!(
                "variables: {} original, {} derived",
                state.vars.len(),
                state.log_vars.len()
            ),
            format!(
                "explore: {} / {}",
                surface.text(Region::AxisButton(fitboard_core::Axis::X)),
                surface.text(Region::AxisButton(fitboard_core::Axis::Y))
            ),
            format!("model: {}", surface.text(Region::ModelButton)),
        ];
        for slot in surface.slots() {
            lines.push(format!("  {}", surface.text(Region::SlotButton(*slot))));
        }
        if surface.is_hidden(Region::Modeling) {
            lines.push("(modeling unavailable until a dataset is loaded)".to_string());
        }
        lines.push(format!("store version: {}", self.dashboard.version()));
        drop(surface);
        for line in lines {
            self.say(line);
        }
    }

    fn say(&self, line: String) {
        self.flush();
        println!("{}", line);
    }
}
