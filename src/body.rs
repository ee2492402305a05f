// src/body.rs

use crate::error::{Error, Result};
use crate::vector::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// Upper bound on trail storage reserved up front; longer trails grow on demand.
const TRAIL_PREALLOC: usize = 256;

/// 24-bit RGB color. Rendering only, no physical effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    /// Distinct color for body `index`: `(index + 1) * 0x0FFFFF`, masked to 24 bits.
    pub fn from_index(index: usize) -> Self {
        let step = (index as u32).wrapping_add(1).wrapping_mul(0x0F_FFFF);
        Color(step & 0xFF_FFFF)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    mass: f64,
    color: Color,
    initial_position: Vec3,
    initial_velocity: Vec3,
    trail: VecDeque<Vec3>,
    trail_capacity: usize,
}

impl Body {
    pub fn new(
        position: Vec3,
        velocity: Vec3,
        mass: f64,
        color: Color,
        trail_capacity: usize,
    ) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(Error::InvalidMass { mass });
        }
        Ok(Body {
            position,
            velocity,
            mass,
            color,
            initial_position: position,
            initial_velocity: velocity,
            trail: VecDeque::with_capacity(trail_capacity.saturating_add(1).min(TRAIL_PREALLOC)),
            trail_capacity,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    pub fn initial_velocity(&self) -> Vec3 {
        self.initial_velocity
    }

    /// Makes the current position and velocity the state `reset` returns to.
    pub(crate) fn capture_initial_state(&mut self) {
        self.initial_position = self.position;
        self.initial_velocity = self.velocity;
    }

    /// `v += (F / m) * dt`
    pub fn apply_force(&mut self, force: Vec3, dt: f64) {
        self.velocity += force / self.mass * dt;
    }

    /// `x += v * dt`
    pub fn update_position(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Appends the current position, dropping the oldest sample once the
    /// trail is over capacity. Returns the trail length.
    pub fn update_trail(&mut self) -> usize {
        self.trail.push_back(self.position);
        if self.trail.len() > self.trail_capacity {
            self.trail.pop_front();
        }
        self.trail.len()
    }

    /// Trail points, oldest first.
    pub fn trail(&self) -> &VecDeque<Vec3> {
        &self.trail
    }

    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    /// Changes the trail capacity, dropping the oldest samples that no longer fit.
    pub(crate) fn set_trail_capacity(&mut self, capacity: usize) {
        self.trail_capacity = capacity;
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }

    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.velocity = self.initial_velocity;
        self.trail.clear();
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    pub fn momentum(&self) -> Vec3 {
        self.velocity * self.mass
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Body(m={:.2e}, p=[{:.3}, {:.3}, {:.3}], v=[{:.3}, {:.3}, {:.3}], {})",
            self.mass,
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
            self.color
        )
    }
}
