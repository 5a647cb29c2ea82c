//! Generator configuration
//!
//! Handles the tunable parameters, their validation, and loading them from an
//! rc-style text file or JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GenerationError, Result};

/// How the main-room size threshold scales with `main_room_frequency`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MainRoomThreshold {
    /// `(2.35 - f) * average`: a higher frequency gives more main rooms
    #[default]
    Subtractive,
    /// `(1 + f) * average`: a higher frequency gives fewer main rooms
    Additive,
}

impl MainRoomThreshold {
    /// Multiplier applied to the average room side
    pub fn scale(self, frequency: f32) -> f32 {
        match self {
            MainRoomThreshold::Subtractive => SUBTRACTIVE_THRESHOLD_BASE - frequency,
            MainRoomThreshold::Additive => 1.0 + frequency,
        }
    }

    fn name(self) -> &'static str {
        match self {
            MainRoomThreshold::Subtractive => "subtractive",
            MainRoomThreshold::Additive => "additive",
        }
    }
}

/// Parameters of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub room_count: u32,
    pub radius: u32,
    pub main_room_frequency: f32,
    pub room_connection_frequency: f32,
    pub main_room_threshold: MainRoomThreshold,
    pub max_settle_steps: u32,
    /// Fixed seed; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            room_count: 300,
            radius: 50,
            main_room_frequency: 1.0,
            room_connection_frequency: 0.15,
            main_room_threshold: MainRoomThreshold::Subtractive,
            max_settle_steps: DEFAULT_MAX_SETTLE_STEPS,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Load a configuration from a file.
    ///
    /// Files ending in `.json` are read as JSON, anything else as rc text.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| GenerationError::Config(e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| GenerationError::Config(e.to_string()))
        } else {
            Self::parse_config(&contents)
        }
    }

    /// Parse a configuration from rc text (`OPTIONS=room_count:300,radius:50`)
    pub fn parse_config(contents: &str) -> Result<Self> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    config.parse_option(opt.trim())?;
                }
            } else {
                return Err(GenerationError::Config(format!("Unrecognized line: {}", line)));
            }
        }

        Ok(config)
    }

    fn parse_option(&mut self, opt: &str) -> Result<()> {
        if opt.is_empty() {
            return Ok(());
        }
        let (key, value) = opt
            .split_once(':')
            .or_else(|| opt.split_once('='))
            .ok_or_else(|| GenerationError::Config(format!("Missing value for option '{}'", opt)))?;
        self.set_option(key.trim(), value.trim())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        fn parse<T: core::str::FromStr>(name: &str, value: &str) -> Result<T> {
            value.parse().map_err(|_| {
                GenerationError::Config(format!("Invalid value '{}' for option '{}'", value, name))
            })
        }

        match name {
            "room_count" => self.room_count = parse(name, value)?,
            "radius" => self.radius = parse(name, value)?,
            "main_room_frequency" => self.main_room_frequency = parse(name, value)?,
            "room_connection_frequency" => self.room_connection_frequency = parse(name, value)?,
            "max_settle_steps" => self.max_settle_steps = parse(name, value)?,
            "seed" => self.seed = Some(parse(name, value)?),
            "main_room_threshold" => {
                self.main_room_threshold = match value {
                    "subtractive" => MainRoomThreshold::Subtractive,
                    "additive" => MainRoomThreshold::Additive,
                    _ => {
                        return Err(GenerationError::Config(format!(
                            "Invalid value '{}' for option '{}'",
                            value, name
                        )));
                    }
                }
            }
            _ => return Err(GenerationError::Config(format!("Unknown option: {}", name))),
        }
        Ok(())
    }

    /// Render as rc text that `parse_config` reads back
    pub fn to_config_string(&self) -> String {
        let mut opts = vec![
            format!("room_count:{}", self.room_count),
            format!("radius:{}", self.radius),
            format!("main_room_frequency:{}", self.main_room_frequency),
            format!("room_connection_frequency:{}", self.room_connection_frequency),
            format!("main_room_threshold:{}", self.main_room_threshold.name()),
            format!("max_settle_steps:{}", self.max_settle_steps),
        ];
        if let Some(seed) = self.seed {
            opts.push(format!("seed:{}", seed));
        }
        format!("# delve generator options\nOPTIONS={}\n", opts.join(","))
    }

    /// Check every parameter against its declared range
    pub fn validate(&self) -> Result<()> {
        check_range("room_count", self.room_count, ROOM_COUNT_RANGE)?;
        check_range("radius", self.radius, RADIUS_RANGE)?;
        check_range(
            "main_room_frequency",
            self.main_room_frequency,
            MAIN_ROOM_FREQUENCY_RANGE,
        )?;
        check_range(
            "room_connection_frequency",
            self.room_connection_frequency,
            ROOM_CONNECTION_FREQUENCY_RANGE,
        )?;
        check_range("max_settle_steps", self.max_settle_steps, MAX_SETTLE_STEPS_RANGE)?;
        Ok(())
    }
}

fn check_range<T>(parameter: &'static str, value: T, (lo, hi): (T, T)) -> Result<()>
where
    T: PartialOrd + core::fmt::Display,
{
    // NaN fails both comparisons and is rejected here
    if value >= lo && value <= hi {
        Ok(())
    } else {
        Err(GenerationError::InvalidConfiguration {
            parameter,
            value: value.to_string(),
            range: format!("{}..={}", lo, hi),
        })
    }
}
