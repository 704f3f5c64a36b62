use serde::{Deserialize, Serialize};

use crate::catalog::{GardenLayout, PlantCatalog};
use crate::error::GardenError;
use crate::events::{EventSink, GardenEvent, TracingSink};
use crate::pests::PestVulnerabilityTable;
use crate::plant::{Plant, WeatherCategory};

pub const DEFAULT_TEMPERATURE_F: i32 = 75;

/// One daily input to the garden, as scripted in a scenario or drawn from
/// a forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GardenCommand {
    Rain { amount: i32 },
    Temperature { fahrenheit: i32 },
    Parasite { pest: String },
    State,
}

impl GardenCommand {
    /// Whether applying this command advances the day counter.
    pub fn advances_day(&self) -> bool {
        !matches!(self, GardenCommand::State)
    }
}

/// What the presentation layer gets from `plants()`. The three lists are
/// positionally aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlantsReport {
    pub names: Vec<String>,
    pub water_requirements: Vec<i32>,
    pub parasites: Vec<Vec<String>>,
}

impl PlantsReport {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn water_of(&self, name: &str) -> Option<i32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.water_requirements[idx])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GardenState {
    pub day: u64,
    pub alive: usize,
    pub dead: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantSnapshot {
    pub name: String,
    pub row: u32,
    pub col: u32,
    pub water: i32,
    pub lifespan: i32,
    pub pest_attacks: u32,
    pub parasites: Vec<String>,
    pub dead: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GardenSnapshot {
    pub scenario: String,
    pub day: u64,
    pub temperature_f: i32,
    pub weather: WeatherCategory,
    pub alive: usize,
    pub dead: usize,
    pub plants: Vec<PlantSnapshot>,
}

/// One garden session: owns its plants, the vulnerability table and the
/// clock. Sessions share nothing.
///
/// Plants are kept in insertion order with unique kind names, so every
/// listing comes back in the order the layout declared them.
#[derive(Debug)]
pub struct GardenSimulation<S: EventSink = TracingSink> {
    catalog: PlantCatalog,
    plants: Vec<Plant>,
    pest_vulnerabilities: PestVulnerabilityTable,
    initial_temperature: i32,
    current_temperature: i32,
    day: u64,
    sink: S,
}

impl GardenSimulation<TracingSink> {
    pub fn new() -> Self {
        Self::with_sink(TracingSink)
    }
}

impl Default for GardenSimulation<TracingSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> GardenSimulation<S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            catalog: PlantCatalog::standard(),
            plants: Vec::new(),
            pest_vulnerabilities: PestVulnerabilityTable::default(),
            initial_temperature: DEFAULT_TEMPERATURE_F,
            current_temperature: DEFAULT_TEMPERATURE_F,
            day: 0,
            sink,
        }
    }

    pub fn with_catalog(mut self, catalog: PlantCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Temperature the garden resets to on every initialization.
    pub fn with_initial_temperature(mut self, fahrenheit: i32) -> Self {
        self.initial_temperature = fahrenheit;
        self.current_temperature = fahrenheit;
        self
    }

    /// Plants the reference garden: one Corn, Pineapple, Watermelon and
    /// Carrot at their home beds with the standard pest table.
    pub fn initialize_garden(&mut self) -> Result<(), GardenError> {
        self.initialize_with(&GardenLayout::reference())
    }

    /// Replaces the whole garden with `layout`. Nothing changes unless
    /// every bed resolves to a known kind. A kind listed twice keeps its
    /// first slot and takes the later bed.
    pub fn initialize_with(&mut self, layout: &GardenLayout) -> Result<(), GardenError> {
        let standard = PestVulnerabilityTable::standard();
        let mut plants: Vec<Plant> = Vec::with_capacity(layout.plants.len());
        let mut table = PestVulnerabilityTable::default();

        for spec in &layout.plants {
            let plant = match spec.position {
                Some(position) => self.catalog.create_at(&spec.kind, position)?,
                None => self.catalog.create(&spec.kind)?,
            };
            let name = plant.name();
            match &spec.parasites {
                Some(pests) => table.insert(name, pests.iter().cloned()),
                None => table.insert(name, standard.vulnerabilities(name).iter().cloned()),
            }
            match plants.iter_mut().find(|existing| existing.name() == name) {
                Some(slot) => *slot = plant,
                None => plants.push(plant),
            }
        }

        self.plants = plants;
        self.pest_vulnerabilities = table;
        self.current_temperature = self.initial_temperature;
        self.day = 0;

        self.emit(GardenEvent::Initializing);
        for idx in 0..self.plants.len() {
            let plant = self.plants[idx].name().to_string();
            self.emit(GardenEvent::PlantAdded { plant });
        }
        self.emit(GardenEvent::GardenInitialized {
            plants: self.plants.len(),
        });
        Ok(())
    }

    /// Read-only listing for the presentation layer. Emits no event.
    pub fn plants(&self) -> PlantsReport {
        let mut report = PlantsReport::default();
        for plant in &self.plants {
            report.names.push(plant.name().to_string());
            report.water_requirements.push(plant.current_water());
            report.parasites.push(
                self.pest_vulnerabilities
                    .vulnerabilities(plant.name())
                    .to_vec(),
            );
        }
        report
    }

    pub fn rain(&mut self, amount: i32) {
        self.emit(GardenEvent::Rainfall { amount });
        for idx in 0..self.plants.len() {
            let plant = &mut self.plants[idx];
            let before = plant.current_water();
            plant.set_current_water(before.wrapping_add(amount));
            let event = GardenEvent::Watered {
                plant: plant.name().to_string(),
                before,
                after: plant.current_water(),
            };
            self.emit(event);
        }
        self.day += 1;
    }

    /// Sets the ambient temperature and applies its weather to every
    /// plant, dead or alive.
    pub fn temperature(&mut self, fahrenheit: i32) -> WeatherCategory {
        let weather = WeatherCategory::classify(fahrenheit);
        let previous_f = self.current_temperature;
        self.current_temperature = fahrenheit;
        self.emit(GardenEvent::TemperatureChanged {
            previous_f,
            fahrenheit,
            weather,
        });
        for idx in 0..self.plants.len() {
            let plant = &mut self.plants[idx];
            let before = plant.lifespan();
            plant.adjust_lifespan_for_weather(weather);
            let event = GardenEvent::WeatherAdjusted {
                plant: plant.name().to_string(),
                weather,
                before,
                after: plant.lifespan(),
            };
            self.emit(event);
        }
        self.day += 1;
        weather
    }

    /// Attacks every plant vulnerable to `pest`. Unknown pests match
    /// nothing but still cost a day. Returns how many plants were hit.
    pub fn parasite(&mut self, pest: &str) -> usize {
        self.emit(GardenEvent::Infestation {
            parasite: pest.to_string(),
        });
        let mut attacked = 0;
        for idx in 0..self.plants.len() {
            if !self
                .pest_vulnerabilities
                .is_vulnerable(self.plants[idx].name(), pest)
            {
                continue;
            }
            let plant = &mut self.plants[idx];
            let before = plant.pest_attacks();
            plant.increment_pest_attacks();
            let event = GardenEvent::PestAttack {
                plant: plant.name().to_string(),
                parasite: pest.to_string(),
                before,
                attacks: plant.pest_attacks(),
            };
            self.emit(event);
            attacked += 1;
        }
        self.day += 1;
        attacked
    }

    /// Counts living and dead plants and reports them to the sink.
    pub fn state(&mut self) -> GardenState {
        let state = self.peek_state();
        self.emit(GardenEvent::StateReport {
            alive: state.alive,
            dead: state.dead,
        });
        state
    }

    /// Same counts as [`state`](Self::state) without reporting them.
    pub fn peek_state(&self) -> GardenState {
        let dead = self.plants.iter().filter(|plant| plant.is_dead()).count();
        GardenState {
            day: self.day,
            alive: self.plants.len() - dead,
            dead,
        }
    }

    /// Runs one command. Only `State` produces a report.
    pub fn apply(&mut self, command: &GardenCommand) -> Option<GardenState> {
        match command {
            GardenCommand::Rain { amount } => {
                self.rain(*amount);
                None
            }
            GardenCommand::Temperature { fahrenheit } => {
                self.temperature(*fahrenheit);
                None
            }
            GardenCommand::Parasite { pest } => {
                self.parasite(pest);
                None
            }
            GardenCommand::State => Some(self.state()),
        }
    }

    pub fn snapshot(&self, scenario: &str) -> GardenSnapshot {
        let state = self.peek_state();
        let plants = self
            .plants
            .iter()
            .map(|plant| {
                let position = plant.position();
                PlantSnapshot {
                    name: plant.name().to_string(),
                    row: position.row,
                    col: position.col,
                    water: plant.current_water(),
                    lifespan: plant.lifespan(),
                    pest_attacks: plant.pest_attacks(),
                    parasites: self
                        .pest_vulnerabilities
                        .vulnerabilities(plant.name())
                        .to_vec(),
                    dead: plant.is_dead(),
                }
            })
            .collect();
        GardenSnapshot {
            scenario: scenario.to_string(),
            day: self.day,
            temperature_f: self.current_temperature,
            weather: self.weather(),
            alive: state.alive,
            dead: state.dead,
            plants,
        }
    }

    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn current_temperature(&self) -> i32 {
        self.current_temperature
    }

    pub fn weather(&self) -> WeatherCategory {
        WeatherCategory::classify(self.current_temperature)
    }

    pub fn plant(&self, name: &str) -> Option<&Plant> {
        self.plants.iter().find(|plant| plant.name() == name)
    }

    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    pub fn pest_vulnerabilities(&self) -> &PestVulnerabilityTable {
        &self.pest_vulnerabilities
    }

    pub fn catalog(&self) -> &PlantCatalog {
        &self.catalog
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, event: GardenEvent) {
        self.sink.record(self.day, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlantSpec;
    use crate::events::{EventLog, LogChannel};

    fn garden() -> GardenSimulation<EventLog> {
        let mut garden = GardenSimulation::with_sink(EventLog::new());
        garden.initialize_garden().unwrap();
        garden
    }

    #[test]
    fn initialize_plants_reference_garden_in_order() {
        let garden = garden();
        let report = garden.plants();
        assert_eq!(
            report.names,
            vec!["Corn", "Pineapple", "Watermelon", "Carrot"]
        );
        assert_eq!(report.water_requirements, vec![5, 8, 4, 8]);
        assert_eq!(report.parasites[0], vec!["Spider", "Caterpillar"]);
        assert_eq!(report.parasites[1], vec!["Caterpillar"]);
        assert_eq!(garden.day(), 0);
        assert_eq!(garden.current_temperature(), DEFAULT_TEMPERATURE_F);
    }

    #[test]
    fn initialize_logs_each_plant() {
        let garden = garden();
        let log = garden.sink();
        assert_eq!(log.entries()[0].event, GardenEvent::Initializing);
        assert_eq!(
            log.last().map(|e| &e.event),
            Some(&GardenEvent::GardenInitialized { plants: 4 })
        );
        assert_eq!(log.len(), 6);
    }

    #[test]
    fn reinitialize_resets_everything() {
        let mut garden = garden();
        garden.rain(3);
        garden.temperature(20);
        garden.parasite("Spider");
        garden.initialize_garden().unwrap();
        assert_eq!(garden.day(), 0);
        assert_eq!(garden.plant_count(), 4);
        assert_eq!(garden.current_temperature(), DEFAULT_TEMPERATURE_F);
        let corn = garden.plant("Corn").unwrap();
        assert_eq!(corn.current_water(), 5);
        assert_eq!(corn.pest_attacks(), 0);
    }

    #[test]
    fn rain_logs_before_and_after() {
        let mut garden = garden();
        garden.sink_mut().clear();
        garden.rain(7);
        let watered: Vec<_> = garden.sink().channel(LogChannel::Watering).collect();
        assert_eq!(watered.len(), 4);
        assert_eq!(
            watered[0].event,
            GardenEvent::Watered {
                plant: "Corn".into(),
                before: 5,
                after: 12
            }
        );
        assert_eq!(watered[0].day, 0, "events carry the day they happened on");
        assert_eq!(garden.day(), 1);
    }

    #[test]
    fn temperature_applies_one_classification() {
        let mut garden = garden();
        assert_eq!(garden.temperature(30), WeatherCategory::Cold);
        assert_eq!(garden.plant("Corn").unwrap().lifespan(), 7);
        assert_eq!(garden.plant("Pineapple").unwrap().lifespan(), 8);
        assert_eq!(garden.plant("Watermelon").unwrap().lifespan(), 6);
        assert_eq!(garden.plant("Carrot").unwrap().lifespan(), 9);
        assert_eq!(garden.current_temperature(), 30);
        assert_eq!(garden.weather(), WeatherCategory::Cold);
    }

    #[test]
    fn parasite_reports_hits() {
        let mut garden = garden();
        assert_eq!(garden.parasite("Caterpillar"), 2);
        assert_eq!(garden.parasite("Locust"), 0);
        assert_eq!(garden.day(), 2);
        assert_eq!(garden.plant("Watermelon").unwrap().pest_attacks(), 0);
    }

    #[test]
    fn state_does_not_advance_day() {
        let mut garden = garden();
        garden.parasite("Spider");
        garden.parasite("Spider");
        let state = garden.state();
        assert_eq!(
            state,
            GardenState {
                day: 2,
                alive: 3,
                dead: 1
            }
        );
        assert_eq!(garden.day(), 2);
        assert_eq!(
            garden.sink().last().map(|e| &e.event),
            Some(&GardenEvent::StateReport { alive: 3, dead: 1 })
        );
    }

    #[test]
    fn plants_listing_is_silent() {
        let mut garden = garden();
        let logged = garden.sink().len();
        let report = garden.plants();
        assert_eq!(report.len(), 4);
        assert_eq!(garden.sink().len(), logged);
        garden.state();
        assert_eq!(garden.sink().len(), logged + 1);
    }

    #[test]
    fn events_carry_previous_values() {
        let mut garden = garden();
        garden.temperature(30);
        garden.sink_mut().clear();
        garden.temperature(110);
        garden.parasite("Caterpillar");
        let log = garden.sink();
        assert_eq!(
            log.entries()[0].event,
            GardenEvent::TemperatureChanged {
                previous_f: 30,
                fahrenheit: 110,
                weather: WeatherCategory::Sunny
            }
        );
        let corn_attack = log
            .channel(LogChannel::Insect)
            .find(|entry| entry.event.plant() == Some("Corn"))
            .map(|entry| entry.event.clone());
        assert_eq!(
            corn_attack,
            Some(GardenEvent::PestAttack {
                plant: "Corn".into(),
                parasite: "Caterpillar".into(),
                before: 0,
                attacks: 1
            })
        );
    }

    #[test]
    fn default_session_logs_through_tracing() {
        let mut garden = GardenSimulation::new();
        garden.initialize_garden().unwrap();
        garden.rain(4);
        garden.temperature(20);
        garden.parasite("Spider");
        let state = garden.state();
        assert_eq!(state.day, 3);
        assert_eq!(state.alive + state.dead, 4);
        assert_eq!(garden.plants().water_of("Carrot"), Some(12));
    }

    #[test]
    fn failed_initialize_keeps_previous_garden() {
        let mut garden = garden();
        garden.rain(10);
        let layout = GardenLayout {
            plants: vec![PlantSpec::new("Corn"), PlantSpec::new("Tomato")],
        };
        let err = garden.initialize_with(&layout).unwrap_err();
        assert_eq!(err, GardenError::InvalidArgument("Tomato".into()));
        assert_eq!(garden.plant_count(), 4);
        assert_eq!(garden.day(), 1);
        assert_eq!(garden.plants().water_of("Corn"), Some(15));
    }

    #[test]
    fn custom_layout_overrides_position_and_pests() {
        let mut garden = GardenSimulation::with_sink(EventLog::new()).with_initial_temperature(50);
        let layout = GardenLayout {
            plants: vec![
                PlantSpec::new("carrot").at(0, 1).with_parasites(["Aphid"]),
                PlantSpec::new("Corn"),
                PlantSpec::new("Carrot").at(2, 2),
            ],
        };
        garden.initialize_with(&layout).unwrap();
        let report = garden.plants();
        assert_eq!(report.names, vec!["Carrot", "Corn"]);
        assert_eq!(report.parasites[0], vec!["Spider"]);
        assert_eq!(garden.plant("Carrot").unwrap().position().row, 2);
        assert_eq!(garden.current_temperature(), 50);
    }

    #[test]
    fn apply_dispatches_commands() {
        let mut garden = garden();
        assert_eq!(garden.apply(&GardenCommand::Rain { amount: 2 }), None);
        assert_eq!(
            garden.apply(&GardenCommand::Temperature { fahrenheit: 120 }),
            None
        );
        assert_eq!(
            garden.apply(&GardenCommand::Parasite {
                pest: "Spider".into()
            }),
            None
        );
        let state = garden.apply(&GardenCommand::State).unwrap();
        assert_eq!(state.day, 3);
        assert_eq!(state.alive + state.dead, 4);
    }

    #[test]
    fn snapshot_mirrors_plants() {
        let mut garden = garden();
        garden.temperature(105);
        let snapshot = garden.snapshot("test");
        assert_eq!(snapshot.scenario, "test");
        assert_eq!(snapshot.weather, WeatherCategory::Sunny);
        assert_eq!(snapshot.plants.len(), 4);
        let carrot = &snapshot.plants[3];
        assert_eq!((carrot.row, carrot.col), (1, 5));
        assert_eq!(carrot.lifespan, 7);
        assert!(!carrot.dead);
    }

    #[test]
    fn commands_parse_from_yaml() {
        let yaml = r#"
- event: rain
  amount: 10
- event: temperature
  fahrenheit: 110
- event: parasite
  pest: Spider
- event: state
"#;
        let commands: Vec<GardenCommand> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0], GardenCommand::Rain { amount: 10 });
        assert!(!commands[3].advances_day());
    }
}
