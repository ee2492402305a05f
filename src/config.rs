//! Per-instance simulation constants.
//!
//! A [`SimulationConfig`] is handed to [`crate::Simulation`] at construction and
//! never changes afterwards, so several panels can run side by side with
//! different settings. Every field has a default, which lets a JSON file name
//! only what it overrides:
//!
//! ```json
//! {
//!   "dt": 0.005,
//!   "orbital_init": "sum_of_pairs",
//!   "seed": 42
//! }
//! ```

use crate::error::{Error, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How construction assigns orbital velocities after the jitter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OrbitalInit {
    /// Every pair (i, j > i) overwrites body i's velocity, so only the last
    /// partner survives and the last body keeps its jitter velocity.
    #[default]
    LastPairWins,
    /// Body i gets the sum of the orbital contributions of every other body.
    SumOfPairs,
    /// Keep the jitter velocities.
    Disabled,
}

/// Where construction places bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// `sin(i * placement_spacing)` broadcast to x, y and z, unit masses.
    /// A spreading heuristic, not a physical configuration.
    #[default]
    SineDiagonal,
    /// Uniform positions in a cube of half-width `cube_half_width`, masses
    /// uniform in `[0.5, 2.5)`.
    RandomCube,
}

/// Largest accepted `max_trail_length`.
pub const MAX_TRAIL_LENGTH: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub g: f64,                  // gravitational constant
    pub dt: f64,                 // fixed time step
    pub min_distance: f64,       // softening floor
    pub max_trail_length: usize, // trail capacity per body
    pub placement_spacing: f64,  // k in sin(i * k)
    pub velocity_jitter: f64,    // half-width of the initial velocity interval
    pub cube_half_width: f64,
    pub layout: Layout,
    pub orbital_init: OrbitalInit,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            g: 1.0,
            dt: 0.01,
            min_distance: 0.1,
            max_trail_length: 100,
            placement_spacing: 2.0,
            velocity_jitter: 0.1,
            cube_half_width: 2.0,
            layout: Layout::default(),
            orbital_init: OrbitalInit::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_orbital_init(mut self, orbital_init: OrbitalInit) -> Self {
        self.orbital_init = orbital_init;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.g.is_finite() && self.g >= 0.0) {
            return Err(Error::config(format!("g must be finite and >= 0, got {}", self.g)));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(Error::config(format!("dt must be finite and > 0, got {}", self.dt)));
        }
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err(Error::config(format!(
                "min_distance must be finite and > 0, got {}",
                self.min_distance
            )));
        }
        if self.max_trail_length > MAX_TRAIL_LENGTH {
            return Err(Error::config(format!(
                "max_trail_length must be at most {}, got {}",
                MAX_TRAIL_LENGTH, self.max_trail_length
            )));
        }
        if !self.placement_spacing.is_finite() {
            return Err(Error::config("placement_spacing must be finite"));
        }
        if !(self.velocity_jitter.is_finite() && self.velocity_jitter >= 0.0) {
            return Err(Error::config(format!(
                "velocity_jitter must be finite and >= 0, got {}",
                self.velocity_jitter
            )));
        }
        if !(self.cube_half_width.is_finite() && self.cube_half_width >= 0.0) {
            return Err(Error::config(format!(
                "cube_half_width must be finite and >= 0, got {}",
                self.cube_half_width
            )));
        }
        Ok(())
    }

    /// Loads and validates a config from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: SimulationConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_page_constants() {
        let c = SimulationConfig::default();
        assert_eq!(c.g, 1.0);
        assert_eq!(c.dt, 0.01);
        assert_eq!(c.min_distance, 0.1);
        assert_eq!(c.max_trail_length, 100);
        assert_eq!(c.orbital_init, OrbitalInit::LastPairWins);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let mut c = SimulationConfig::default();
        c.dt = 0.0;
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));

        let mut c = SimulationConfig::default();
        c.min_distance = -0.1;
        assert!(c.validate().is_err());

        let mut c = SimulationConfig::default();
        c.g = f64::NAN;
        assert!(c.validate().is_err());

        let mut c = SimulationConfig::default();
        c.velocity_jitter = -1.0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn oversized_trail_length_is_rejected() {
        let mut c = SimulationConfig::default();
        c.max_trail_length = usize::MAX;
        assert!(matches!(c.validate(), Err(Error::InvalidConfig(_))));

        c.max_trail_length = MAX_TRAIL_LENGTH;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn oversized_trail_length_in_json_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "max_trail_length": 1000000000000 }"#).unwrap();
        assert!(matches!(
            SimulationConfig::from_json_file(&path),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut f = File::create(&path).unwrap();
        write!(f, r#"{{ "dt": 0.005, "orbital_init": "sum_of_pairs", "seed": 7 }}"#).unwrap();
        drop(f);

        let c = SimulationConfig::from_json_file(&path).unwrap();
        assert_eq!(c.dt, 0.005);
        assert_eq!(c.orbital_init, OrbitalInit::SumOfPairs);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.max_trail_length, 100);
        assert_eq!(c.layout, Layout::SineDiagonal);
    }

    #[test]
    fn invalid_json_config_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "dt": -1.0 }"#).unwrap();
        assert!(matches!(
            SimulationConfig::from_json_file(&path),
            Err(Error::InvalidConfig(_))
        ));
    }
}
