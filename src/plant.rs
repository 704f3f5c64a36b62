use std::fmt;

use serde::{Deserialize, Serialize};

/// Temperatures strictly above this are Sunny.
pub const SUNNY_ABOVE_F: i32 = 100;
/// Temperatures strictly below this are Cold.
pub const COLD_BELOW_F: i32 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCategory {
    Sunny,
    Cold,
    Moderate,
}

impl WeatherCategory {
    /// Classifies an ambient temperature in Fahrenheit. Depends on nothing
    /// but the temperature itself.
    pub fn classify(fahrenheit: i32) -> Self {
        if fahrenheit > SUNNY_ABOVE_F {
            WeatherCategory::Sunny
        } else if fahrenheit < COLD_BELOW_F {
            WeatherCategory::Cold
        } else {
            WeatherCategory::Moderate
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCategory::Sunny => "Sunny",
            WeatherCategory::Cold => "Cold",
            WeatherCategory::Moderate => "Moderate",
        }
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Per-kind parameters and weather response. Implemented once per plant
/// kind and registered in the [`PlantCatalog`](crate::catalog::PlantCatalog).
pub trait Species: fmt::Debug + Sync {
    fn name(&self) -> &'static str;

    /// Water level a freshly planted instance starts with.
    fn baseline_water(&self) -> i32;

    /// Starting lifespan. The plant dies once this drops to zero.
    fn lifespan(&self) -> i32;

    fn weather_delta(&self, weather: WeatherCategory) -> i32;

    /// Number of pest attacks that kills the plant.
    fn pest_tolerance(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Corn;

impl Species for Corn {
    fn name(&self) -> &'static str {
        "Corn"
    }

    fn baseline_water(&self) -> i32 {
        5
    }

    fn lifespan(&self) -> i32 {
        10
    }

    fn weather_delta(&self, weather: WeatherCategory) -> i32 {
        match weather {
            WeatherCategory::Sunny => -2,
            WeatherCategory::Cold => -3,
            WeatherCategory::Moderate => 1,
        }
    }

    fn pest_tolerance(&self) -> u32 {
        3
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pineapple;

impl Species for Pineapple {
    fn name(&self) -> &'static str {
        "Pineapple"
    }

    fn baseline_water(&self) -> i32 {
        8
    }

    fn lifespan(&self) -> i32 {
        12
    }

    fn weather_delta(&self, weather: WeatherCategory) -> i32 {
        // tropical: shrugs off heat, hates frost
        match weather {
            WeatherCategory::Sunny => -1,
            WeatherCategory::Cold => -4,
            WeatherCategory::Moderate => 0,
        }
    }

    fn pest_tolerance(&self) -> u32 {
        4
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Watermelon;

impl Species for Watermelon {
    fn name(&self) -> &'static str {
        "Watermelon"
    }

    fn baseline_water(&self) -> i32 {
        4
    }

    fn lifespan(&self) -> i32 {
        9
    }

    fn weather_delta(&self, weather: WeatherCategory) -> i32 {
        match weather {
            WeatherCategory::Sunny => -1,
            WeatherCategory::Cold => -3,
            WeatherCategory::Moderate => 1,
        }
    }

    fn pest_tolerance(&self) -> u32 {
        2
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Carrot;

impl Species for Carrot {
    fn name(&self) -> &'static str {
        "Carrot"
    }

    fn baseline_water(&self) -> i32 {
        8
    }

    fn lifespan(&self) -> i32 {
        10
    }

    fn weather_delta(&self, weather: WeatherCategory) -> i32 {
        match weather {
            WeatherCategory::Sunny => -3,
            WeatherCategory::Cold => -1,
            WeatherCategory::Moderate => 0,
        }
    }

    fn pest_tolerance(&self) -> u32 {
        3
    }
}

/// One cultivated plant. Water and lifespan are not clamped: rain can push
/// water arbitrarily high and nothing stops it going negative. Counters
/// wrap on overflow instead of panicking.
#[derive(Debug, Clone)]
pub struct Plant {
    species: &'static dyn Species,
    position: Position,
    current_water: i32,
    lifespan: i32,
    pest_attacks: u32,
}

impl Plant {
    pub fn new(species: &'static dyn Species, position: Position) -> Self {
        Self {
            species,
            position,
            current_water: species.baseline_water(),
            lifespan: species.lifespan(),
            pest_attacks: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.species.name()
    }

    pub fn species(&self) -> &'static dyn Species {
        self.species
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn current_water(&self) -> i32 {
        self.current_water
    }

    pub fn set_current_water(&mut self, value: i32) {
        self.current_water = value;
    }

    pub fn lifespan(&self) -> i32 {
        self.lifespan
    }

    pub fn pest_attacks(&self) -> u32 {
        self.pest_attacks
    }

    pub fn adjust_lifespan_for_weather(&mut self, weather: WeatherCategory) {
        self.lifespan = self.lifespan.wrapping_add(self.species.weather_delta(weather));
    }

    pub fn increment_pest_attacks(&mut self) {
        self.pest_attacks = self.pest_attacks.wrapping_add(1);
    }

    pub fn is_dead(&self) -> bool {
        self.lifespan <= 0 || self.pest_attacks >= self.species.pest_tolerance()
    }
}
