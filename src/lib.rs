//! N-body toy simulation: softened pairwise gravity, semi-implicit Euler
//! stepping at a fixed `dt`, bounded per-body trails and reset to the
//! captured initial state. Drawing is left to a [`RenderTarget`].

pub mod body;
pub mod config;
pub mod energy;
pub mod error;
pub mod export;
pub mod forces;
pub mod render;
pub mod scenario;
pub mod simulation;
pub mod vector;

pub use body::{Body, Color};
pub use config::{Layout, OrbitalInit, SimulationConfig};
pub use energy::EnergyMonitor;
pub use error::{body_count, Error, Result};
pub use export::{append_run_summary, CsvTrailRecorder, RunSummary};
pub use forces::SoftenedGravity;
pub use render::{BodySnapshot, NullTarget, RenderTarget};
pub use simulation::Simulation;
pub use vector::Vec3;
