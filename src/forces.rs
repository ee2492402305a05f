//! Pairwise gravity with a softening floor.

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::vector::{normalize_or_zero, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftenedGravity {
    pub g: f64,
    pub min_distance: f64,
}

impl SoftenedGravity {
    pub fn new(g: f64, min_distance: f64) -> Self {
        Self { g, min_distance }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.g, config.min_distance)
    }

    /// Distance with the softening floor applied.
    #[inline]
    pub fn softened(&self, r: f64) -> f64 {
        r.max(self.min_distance)
    }

    /// Force exerted on `a` by `b`, pointing from `a` toward `b`.
    /// The force on `b` is the negation; callers apply it.
    pub fn force_between(&self, a: &Body, b: &Body) -> Vec3 {
        let r_vec = b.position - a.position;
        let r = self.softened(r_vec.norm());
        let magnitude = self.g * a.mass() * b.mass() / (r * r);
        normalize_or_zero(&r_vec) * magnitude
    }

    /// Upper bound on `|force_between|` for two masses, reached inside the floor.
    pub fn max_force(&self, m1: f64, m2: f64) -> f64 {
        self.g * m1 * m2 / (self.min_distance * self.min_distance)
    }

    /// Softened pair potential `-G m1 m2 / max(r, min_distance)`.
    pub fn potential_between(&self, a: &Body, b: &Body) -> f64 {
        let r = self.softened((b.position - a.position).norm());
        -self.g * a.mass() * b.mass() / r
    }
}

impl Default for SoftenedGravity {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}
