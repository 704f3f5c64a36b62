//! Structured facts emitted by the garden, and the sinks that consume them.
//!
//! The simulation never formats log lines itself. Every operation hands a
//! [`GardenEvent`] to an [`EventSink`] together with the current day; the
//! sink decides whether to forward it to `tracing`, keep it in memory, or
//! write it out as text.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::plant::WeatherCategory;

/// Log file section an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogChannel {
    Day,
    Watering,
    Heating,
    Insect,
}

impl LogChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogChannel::Day => "DAY",
            LogChannel::Watering => "WATERING",
            LogChannel::Heating => "HEATING",
            LogChannel::Insect => "INSECT",
        }
    }
}

impl fmt::Display for LogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GardenEvent {
    Initializing,
    PlantAdded {
        plant: String,
    },
    GardenInitialized {
        plants: usize,
    },
    Rainfall {
        amount: i32,
    },
    Watered {
        plant: String,
        before: i32,
        after: i32,
    },
    TemperatureChanged {
        previous_f: i32,
        fahrenheit: i32,
        weather: WeatherCategory,
    },
    WeatherAdjusted {
        plant: String,
        weather: WeatherCategory,
        before: i32,
        after: i32,
    },
    Infestation {
        parasite: String,
    },
    PestAttack {
        plant: String,
        parasite: String,
        before: u32,
        attacks: u32,
    },
    StateReport {
        alive: usize,
        dead: usize,
    },
}

impl GardenEvent {
    pub fn channel(&self) -> LogChannel {
        match self {
            GardenEvent::Initializing
            | GardenEvent::PlantAdded { .. }
            | GardenEvent::GardenInitialized { .. }
            | GardenEvent::Rainfall { .. }
            | GardenEvent::TemperatureChanged { .. }
            | GardenEvent::StateReport { .. } => LogChannel::Day,
            GardenEvent::Watered { .. } => LogChannel::Watering,
            GardenEvent::WeatherAdjusted { .. } => LogChannel::Heating,
            GardenEvent::Infestation { .. } | GardenEvent::PestAttack { .. } => {
                LogChannel::Insect
            }
        }
    }

    /// Name of the plant this event concerns, if it is a per-plant event.
    pub fn plant(&self) -> Option<&str> {
        match self {
            GardenEvent::PlantAdded { plant }
            | GardenEvent::Watered { plant, .. }
            | GardenEvent::WeatherAdjusted { plant, .. }
            | GardenEvent::PestAttack { plant, .. } => Some(plant),
            _ => None,
        }
    }
}

impl fmt::Display for GardenEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GardenEvent::Initializing => write!(f, "Initializing garden - Day 0 begins"),
            GardenEvent::PlantAdded { plant } => write!(f, "Added plant: {plant}"),
            GardenEvent::GardenInitialized { plants } => {
                write!(f, "Garden initialized with {plants} plants.")
            }
            GardenEvent::Rainfall { amount } => write!(f, "Rainfall event: {amount} units"),
            GardenEvent::Watered { plant, after, .. } => write!(
                f,
                "Rain added water to {plant}. Current water level: {after}"
            ),
            GardenEvent::TemperatureChanged {
                fahrenheit,
                weather,
                ..
            } => write!(f, "Temperature changed to {fahrenheit}°F ({weather})"),
            GardenEvent::WeatherAdjusted {
                plant,
                weather,
                before,
                after,
            } => write!(
                f,
                "{plant} temperature adjusted for {weather} weather. Lifespan: {before} -> {after}"
            ),
            GardenEvent::Infestation { parasite } => {
                write!(f, "Parasite infestation: {parasite}")
            }
            GardenEvent::PestAttack {
                plant, parasite, ..
            } => write!(f, "{plant} attacked by {parasite}"),
            GardenEvent::StateReport { alive, dead } => {
                write!(f, "Garden State Report - Alive: {alive}, Dead: {dead}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub day: u64,
    pub channel: LogChannel,
    #[serde(flatten)]
    pub event: GardenEvent,
}

/// Receives every event the garden emits.
pub trait EventSink {
    fn record(&mut self, day: u64, event: GardenEvent);
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn record(&mut self, day: u64, event: GardenEvent) {
        (**self).record(day, event);
    }
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn record(&mut self, day: u64, event: GardenEvent) {
        self.0.record(day, event.clone());
        self.1.record(day, event);
    }
}

/// Forwards events to `tracing`. Day-level events log at info, per-plant
/// events at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, day: u64, event: GardenEvent) {
        let channel = event.channel();
        match &event {
            GardenEvent::Watered {
                plant,
                before,
                after,
            } => debug!(day, %channel, plant = %plant, before, after, "{event}"),
            GardenEvent::WeatherAdjusted {
                plant,
                weather,
                before,
                after,
            } => debug!(day, %channel, plant = %plant, %weather, before, after, "{event}"),
            GardenEvent::PestAttack {
                plant,
                parasite,
                before,
                attacks,
            } => debug!(
                day,
                %channel,
                plant = %plant,
                parasite = %parasite,
                before,
                attacks,
                "{event}"
            ),
            GardenEvent::TemperatureChanged {
                previous_f,
                fahrenheit,
                weather,
            } => info!(day, %channel, previous_f, fahrenheit, %weather, "{event}"),
            GardenEvent::PlantAdded { plant } => debug!(day, %channel, plant = %plant, "{event}"),
            GardenEvent::StateReport { alive, dead } => {
                info!(day, %channel, alive, dead, "{event}")
            }
            _ => info!(day, %channel, "{event}"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn channel(&self, channel: LogChannel) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.channel == channel)
    }

    pub fn for_plant<'a>(&'a self, plant: &'a str) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| entry.event.plant() == Some(plant))
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl EventSink for EventLog {
    fn record(&mut self, day: u64, event: GardenEvent) {
        self.entries.push(LogEntry {
            day,
            channel: event.channel(),
            event,
        });
    }
}

/// Writes one human-readable line per event:
/// `[Day 3] [WATERING] Rain added water to Corn. Current water level: 15`.
///
/// Write failures are reported once through `tracing` and the sink goes
/// quiet afterwards; the simulation itself never fails on logging.
#[derive(Debug)]
pub struct TextLogSink<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> TextLogSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for TextLogSink<W> {
    fn record(&mut self, day: u64, event: GardenEvent) {
        if self.failed {
            return;
        }
        let result = writeln!(self.writer, "[Day {day}] [{}] {event}", event.channel())
            .and_then(|_| self.writer.flush());
        if let Err(err) = result {
            warn!(error = %err, "event log write failed, further events dropped");
            self.failed = true;
        }
    }
}
