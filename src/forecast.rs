//! Seeded daily weather and pest generator.
//!
//! Each concern (which event happens, how much rain, what temperature,
//! which pest) draws from its own ChaCha stream derived from the master
//! seed, so tweaking one range leaves the others' sequences untouched.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::garden::GardenCommand;

fn default_rain_min() -> i32 {
    0
}

fn default_rain_max() -> i32 {
    20
}

fn default_temperature_min() -> i32 {
    30
}

fn default_temperature_max() -> i32 {
    115
}

fn default_pests() -> Vec<String> {
    vec!["Spider".to_string(), "Caterpillar".to_string()]
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForecastSettings {
    #[serde(default = "default_rain_min")]
    pub rain_min: i32,
    #[serde(default = "default_rain_max")]
    pub rain_max: i32,
    #[serde(default = "default_temperature_min")]
    pub temperature_min: i32,
    #[serde(default = "default_temperature_max")]
    pub temperature_max: i32,
    #[serde(default = "default_pests")]
    pub pests: Vec<String>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            rain_min: default_rain_min(),
            rain_max: default_rain_max(),
            temperature_min: default_temperature_min(),
            temperature_max: default_temperature_max(),
            pests: default_pests(),
        }
    }
}

impl ForecastSettings {
    /// Swaps inverted bounds.
    fn normalized(mut self) -> Self {
        if self.rain_min > self.rain_max {
            std::mem::swap(&mut self.rain_min, &mut self.rain_max);
        }
        if self.temperature_min > self.temperature_max {
            std::mem::swap(&mut self.temperature_min, &mut self.temperature_max);
        }
        self
    }
}

pub struct Forecast {
    master: ChaCha8Rng,
    streams: HashMap<&'static str, ChaCha8Rng>,
    settings: ForecastSettings,
}

impl Forecast {
    pub fn new(seed: u64, settings: ForecastSettings) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
            settings: settings.normalized(),
        }
    }

    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Draws the next environmental event. Never returns `State`.
    pub fn next_command(&mut self) -> GardenCommand {
        let choices = if self.settings.pests.is_empty() { 2 } else { 3 };
        match self.stream("event").gen_range(0..choices) {
            0 => {
                let (min, max) = (self.settings.rain_min, self.settings.rain_max);
                GardenCommand::Rain {
                    amount: self.stream("rain").gen_range(min..=max),
                }
            }
            1 => {
                let (min, max) = (self.settings.temperature_min, self.settings.temperature_max);
                GardenCommand::Temperature {
                    fahrenheit: self.stream("temperature").gen_range(min..=max),
                }
            }
            _ => {
                let rng = self.streams.entry("pest").or_insert_with(|| {
                    ChaCha8Rng::seed_from_u64(self.master.next_u64())
                });
                let pest = self
                    .settings
                    .pests
                    .choose(rng)
                    .cloned()
                    .unwrap_or_default();
                GardenCommand::Parasite { pest }
            }
        }
    }

    pub fn take(&mut self, days: usize) -> Vec<GardenCommand> {
        (0..days).map(|_| self.next_command()).collect()
    }

    fn stream(&mut self, name: &'static str) -> &mut ChaCha8Rng {
        let master = &mut self.master;
        self.streams
            .entry(name)
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(master.next_u64()))
    }
}
