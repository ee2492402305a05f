// src/scenario.rs

use crate::body::{Body, Color};
use crate::config::{Layout, OrbitalInit, SimulationConfig};
use crate::error::{Error, Result};
use crate::vector::{distance, normalize_or_zero, perpendicular_xy, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn uniform(half_width: f64) -> Result<Uniform<f64>> {
    Uniform::new_inclusive(-half_width, half_width)
        .map_err(|e| Error::config(format!("bad sampling interval ±{}: {}", half_width, e)))
}

fn sample_vec(rng: &mut StdRng, range: &Uniform<f64>) -> Vec3 {
    Vec3::new(rng.sample(range), rng.sample(range), rng.sample(range))
}

/// Circular-orbit speed of `body` around `central`, `sqrt(G m_central / r)`,
/// with `r` floored at the softening distance.
fn orbital_speed(body: &Body, central: &Body, config: &SimulationConfig) -> f64 {
    let r = distance(&body.position, &central.position).max(config.min_distance);
    (config.g * central.mass() / r).sqrt()
}

/// Velocity perpendicular (in the xy-plane) to the line from `central` to `body`.
fn orbital_velocity(body: &Body, central: &Body, config: &SimulationConfig) -> Vec3 {
    let direction = normalize_or_zero(&(body.position - central.position));
    perpendicular_xy(&direction) * orbital_speed(body, central, config)
}

/// Places `num_bodies` bodies according to `config.layout`, with jitter velocities.
pub fn place_bodies(num_bodies: usize, config: &SimulationConfig, rng: &mut StdRng) -> Result<Vec<Body>> {
    let jitter = uniform(config.velocity_jitter)?;
    let cube = uniform(config.cube_half_width)?;
    let mut bodies = Vec::with_capacity(num_bodies);

    for i in 0..num_bodies {
        let (position, mass) = match config.layout {
            Layout::SineDiagonal => {
                let s = (i as f64 * config.placement_spacing).sin();
                (Vec3::new(s, s, s), 1.0)
            }
            Layout::RandomCube => (sample_vec(rng, &cube), rng.random_range(0.5..2.5)),
        };
        let velocity = sample_vec(rng, &jitter);
        bodies.push(Body::new(
            position,
            velocity,
            mass,
            Color::from_index(i),
            config.max_trail_length,
        )?);
    }
    Ok(bodies)
}

/// Overwrites initial velocities with the orbital heuristic selected by `mode`.
pub fn assign_orbital_velocities(bodies: &mut [Body], mode: OrbitalInit, config: &SimulationConfig) {
    let n = bodies.len();
    match mode {
        OrbitalInit::Disabled => {}
        OrbitalInit::LastPairWins => {
            for i in 0..n {
                for j in (i + 1)..n {
                    bodies[i].velocity = orbital_velocity(&bodies[i], &bodies[j], config);
                }
            }
        }
        OrbitalInit::SumOfPairs => {
            let velocities: Vec<Vec3> = (0..n)
                .map(|i| {
                    (0..n)
                        .filter(|&j| j != i)
                        .map(|j| orbital_velocity(&bodies[i], &bodies[j], config))
                        .sum::<Vec3>()
                })
                .collect();
            for (body, v) in bodies.iter_mut().zip(velocities) {
                body.velocity = v;
            }
        }
    }
}

/// Builds the full initial body set for a simulation and captures it as the
/// state `reset` returns to.
pub fn generate_bodies(num_bodies: usize, config: &SimulationConfig) -> Result<Vec<Body>> {
    let mut rng = make_rng(config.seed);
    let mut bodies = place_bodies(num_bodies, config, &mut rng)?;
    assign_orbital_velocities(&mut bodies, config.orbital_init, config);
    for body in bodies.iter_mut() {
        body.capture_initial_state();
    }
    Ok(bodies)
}
