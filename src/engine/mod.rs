use std::collections::VecDeque;

use crate::{
    events::EventSink,
    forecast::{Forecast, ForecastSettings},
    garden::{GardenCommand, GardenSimulation, GardenSnapshot, GardenState},
    scenario::Scenario,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    /// Ask the garden for a state report every this many days. Zero turns
    /// periodic reports off.
    pub report_interval_days: u64,
    pub forecast: ForecastSettings,
}

impl EngineSettings {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            scenario_name: scenario.name.clone(),
            seed: scenario.seed,
            report_interval_days: scenario.report_interval_days,
            forecast: scenario.forecast.clone(),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    script: Vec<GardenCommand>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            script: Vec::new(),
        }
    }

    pub fn with_script(mut self, commands: impl IntoIterator<Item = GardenCommand>) -> Self {
        self.script.extend(commands);
        self
    }

    pub fn push_command(&mut self, command: GardenCommand) {
        self.script.push(command);
    }

    pub fn build(self) -> Engine {
        Engine {
            forecast: Forecast::new(self.settings.seed, self.settings.forecast.clone()),
            script: self.script.into(),
            settings: self.settings,
        }
    }
}

/// Drives a garden day by day. Scripted commands run first; once the
/// script is used up the forecast supplies the rest.
pub struct Engine {
    forecast: Forecast,
    script: VecDeque<GardenCommand>,
    settings: EngineSettings,
}

impl Engine {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        EngineBuilder::new(EngineSettings::from_scenario(scenario))
            .with_script(scenario.events.iter().cloned())
            .build()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn remaining_script(&self) -> usize {
        self.script.len()
    }

    /// Runs until `days` more days have passed and returns every state
    /// report produced on the way.
    pub fn run<S: EventSink>(
        &mut self,
        garden: &mut GardenSimulation<S>,
        days: u64,
    ) -> Vec<GardenState> {
        self.run_with_hook(garden, days, |_| {})
    }

    /// Like [`run`](Self::run), calling `hook` with a snapshot after every
    /// day. State commands at the head of the script run even once the
    /// day budget is spent.
    pub fn run_with_hook<S, F>(
        &mut self,
        garden: &mut GardenSimulation<S>,
        days: u64,
        mut hook: F,
    ) -> Vec<GardenState>
    where
        S: EventSink,
        F: FnMut(&GardenSnapshot),
    {
        let start = garden.day();
        let mut reports = Vec::new();
        loop {
            let elapsed = garden.day() - start;
            let state_next = matches!(self.script.front(), Some(GardenCommand::State));
            let command = if state_next || (elapsed < days && !self.script.is_empty()) {
                self.script.pop_front()
            } else if elapsed < days {
                Some(self.forecast.next_command())
            } else {
                None
            };
            let Some(command) = command else {
                break;
            };

            if let Some(state) = garden.apply(&command) {
                reports.push(state);
                continue;
            }

            hook(&garden.snapshot(&self.settings.scenario_name));
            let interval = self.settings.report_interval_days;
            if interval > 0 && garden.day() % interval == 0 {
                reports.push(garden.state());
            }
        }
        reports
    }
}
