use crate::body::Body;
use crate::config::SimulationConfig;
use crate::energy;
use crate::error::Result;
use crate::forces::SoftenedGravity;
use crate::render::{BodySnapshot, RenderTarget};
use crate::scenario::generate_bodies;
use crate::vector::Vec3;
use log::{debug, info};

/// An N-body system stepped with semi-implicit Euler at a fixed `dt`.
///
/// The body set is fixed at construction. `step`, `advance`, `reset` and
/// `request_reset` are the only operations that mutate it.
#[derive(Debug, Clone)]
pub struct Simulation {
    bodies: Vec<Body>,
    config: SimulationConfig,
    gravity: SoftenedGravity,
    ticks: u64,
    reset_pending: bool,
}

impl Simulation {
    /// Generates `num_bodies` bodies per `config` and captures them as the reset state.
    pub fn new(num_bodies: usize, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let bodies = generate_bodies(num_bodies, &config)?;
        debug!(
            "built simulation with {} bodies ({:?}, {:?})",
            bodies.len(),
            config.layout,
            config.orbital_init
        );
        Ok(Self::assemble(bodies, config))
    }

    /// Wraps caller-built bodies. Their current state is what `reset` restores,
    /// and their trails are capped at `config.max_trail_length`.
    pub fn from_bodies(mut bodies: Vec<Body>, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        for body in bodies.iter_mut() {
            body.set_trail_capacity(config.max_trail_length);
            body.capture_initial_state();
        }
        Ok(Self::assemble(bodies, config))
    }

    fn assemble(bodies: Vec<Body>, config: SimulationConfig) -> Self {
        Self {
            gravity: SoftenedGravity::from_config(&config),
            bodies,
            config,
            ticks: 0,
            reset_pending: false,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn gravity(&self) -> &SoftenedGravity {
        &self.gravity
    }

    /// Steps taken since construction or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Advances the system by one `dt`.
    ///
    /// Pairs are visited once each. Body `i` moves right after its own pair
    /// loop, so later pairs see the already-moved positions of lower indices.
    pub fn step(&mut self) {
        let dt = self.config.dt;
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                let (a, b) = (&mut head[i], &mut tail[0]);
                let force = self.gravity.force_between(a, b);
                a.apply_force(force, dt);
                b.apply_force(-force, dt);
            }
            let body = &mut self.bodies[i];
            body.update_position(dt);
            body.update_trail();
        }
        self.ticks += 1;
    }

    /// Host-driven tick: applies a pending reset, steps once and hands the
    /// new state to `target`.
    pub fn advance<R: RenderTarget + ?Sized>(&mut self, target: &mut R) -> Result<()> {
        if self.reset_pending {
            self.reset();
            target.on_reset()?;
        }
        self.step();
        target.on_tick(self.ticks, &self.snapshots())
    }

    /// Returns every body to its captured initial state and clears trails.
    pub fn reset(&mut self) {
        for body in self.bodies.iter_mut() {
            body.reset();
        }
        self.ticks = 0;
        self.reset_pending = false;
        info!("simulation reset ({} bodies)", self.bodies.len());
    }

    /// Schedules a reset to run before the next `advance`.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    pub fn snapshots(&self) -> Vec<BodySnapshot<'_>> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| BodySnapshot::of(i, body))
            .collect()
    }

    /// Net gravitational force on each body, evaluated independently for every
    /// ordered pair at the current positions.
    pub fn net_forces(&self) -> Vec<Vec3> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, a)| {
                self.bodies
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, b)| self.gravity.force_between(a, b))
                    .sum::<Vec3>()
            })
            .collect()
    }

    pub fn total_energy(&self) -> f64 {
        energy::total_energy(&self.bodies, &self.gravity)
    }

    pub fn total_momentum(&self) -> Vec3 {
        energy::total_momentum(&self.bodies)
    }
}
