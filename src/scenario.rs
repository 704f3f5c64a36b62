use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    catalog::GardenLayout,
    error::GardenError,
    events::EventSink,
    forecast::ForecastSettings,
    garden::{GardenCommand, GardenSimulation, DEFAULT_TEMPERATURE_F},
};

fn default_initial_temperature() -> i32 {
    DEFAULT_TEMPERATURE_F
}

fn default_report_interval_days() -> u64 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

const DEFAULT_FORECAST_DAYS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub days: Option<u64>,
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature_f: i32,
    #[serde(default = "default_report_interval_days")]
    pub report_interval_days: u64,
    #[serde(default)]
    pub garden: Option<GardenLayout>,
    #[serde(default)]
    pub events: Vec<GardenCommand>,
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario = Scenario::from_yaml_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        Ok(scenario)
    }

    pub fn layout(&self) -> GardenLayout {
        self.garden.clone().unwrap_or_else(GardenLayout::reference)
    }

    /// Builds and initializes a garden for this scenario.
    pub fn build_garden<S: EventSink>(&self, sink: S) -> Result<GardenSimulation<S>, GardenError> {
        let mut garden =
            GardenSimulation::with_sink(sink).with_initial_temperature(self.initial_temperature_f);
        garden.initialize_with(&self.layout())?;
        Ok(garden)
    }

    /// Number of environmental days to run. A scripted scenario without an
    /// explicit count runs exactly its script.
    pub fn days(&self, override_days: Option<u64>) -> u64 {
        override_days.or(self.days).unwrap_or_else(|| {
            if self.events.is_empty() {
                DEFAULT_FORECAST_DAYS
            } else {
                self.events.iter().filter(|c| c.advances_day()).count() as u64
            }
        })
    }
}
