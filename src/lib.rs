pub mod catalog;
pub mod engine;
pub mod error;
pub mod events;
pub mod forecast;
pub mod garden;
pub mod pests;
pub mod plant;
pub mod scenario;

pub use catalog::{GardenLayout, PlantCatalog, PlantSpec};
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use error::GardenError;
pub use events::{EventLog, EventSink, GardenEvent, LogChannel, TextLogSink, TracingSink};
pub use garden::{GardenCommand, GardenSimulation, GardenSnapshot, GardenState, PlantsReport};
pub use pests::PestVulnerabilityTable;
pub use plant::{Plant, Position, Species, WeatherCategory};
pub use scenario::{Scenario, ScenarioLoader};
