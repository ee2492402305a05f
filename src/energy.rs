use crate::body::Body;
use crate::forces::SoftenedGravity;
use crate::vector::Vec3;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Relative energy drifts reported by [`EnergyMonitor`].
pub const DRIFT_THRESHOLDS: [f64; 10] = [0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 100.0];

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

pub fn potential_energy(bodies: &[Body], gravity: &SoftenedGravity) -> f64 {
    bodies
        .iter()
        .tuple_combinations()
        .map(|(a, b)| gravity.potential_between(a, b))
        .sum()
}

pub fn total_energy(bodies: &[Body], gravity: &SoftenedGravity) -> f64 {
    kinetic_energy(bodies) + potential_energy(bodies, gravity)
}

pub fn total_momentum(bodies: &[Body]) -> Vec3 {
    bodies.iter().map(Body::momentum).sum()
}

/// Tracks relative drift of total energy against a baseline and remembers the
/// first tick at which each threshold in [`DRIFT_THRESHOLDS`] was crossed.
#[derive(Debug, Clone)]
pub struct EnergyMonitor {
    baseline: f64,
    latest: f64,
    crossed: BTreeMap<OrderedFloat<f64>, Option<u64>>,
}

impl EnergyMonitor {
    pub fn new(baseline: f64) -> Self {
        let crossed = DRIFT_THRESHOLDS
            .iter()
            .map(|&t| (OrderedFloat(t), None))
            .collect();
        Self {
            baseline,
            latest: baseline,
            crossed,
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn latest(&self) -> f64 {
        self.latest
    }

    /// `|E - E0| / |E0|`, or the absolute change when the baseline is zero.
    pub fn relative_drift(&self) -> f64 {
        let delta = (self.latest - self.baseline).abs();
        if self.baseline.abs() > f64::EPSILON {
            delta / self.baseline.abs()
        } else {
            delta
        }
    }

    /// Records the energy seen at `tick`. Returns the thresholds crossed for the first time.
    pub fn record(&mut self, tick: u64, energy: f64) -> Vec<f64> {
        self.latest = energy;
        let drift = self.relative_drift();
        let mut newly_crossed = Vec::new();
        for (threshold, seen) in self.crossed.iter_mut() {
            if seen.is_none() && drift > threshold.into_inner() {
                *seen = Some(tick);
                newly_crossed.push(threshold.into_inner());
            }
        }
        newly_crossed
    }

    /// Restarts tracking from a new baseline, e.g. after a reset.
    pub fn rebase(&mut self, baseline: f64) {
        *self = Self::new(baseline);
    }

    /// `(threshold, first tick crossed)` pairs, ascending by threshold.
    pub fn crossings(&self) -> Vec<(f64, Option<u64>)> {
        self.crossed
            .iter()
            .map(|(k, v)| (k.into_inner(), *v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Color;

    fn body(x: f64, vx: f64) -> Body {
        Body::new(Vec3::new(x, 0.0, 0.0), Vec3::new(vx, 0.0, 0.0), 1.0, Color(0), 4).unwrap()
    }

    #[test]
    fn energy_of_two_bodies() {
        let bodies = vec![body(0.0, 1.0), body(2.0, -1.0)];
        let gravity = SoftenedGravity::default();
        assert!((kinetic_energy(&bodies) - 1.0).abs() < 1e-12);
        assert!((potential_energy(&bodies, &gravity) + 0.5).abs() < 1e-12);
        assert!((total_energy(&bodies, &gravity) - 0.5).abs() < 1e-12);
        assert!(total_momentum(&bodies).norm() < 1e-12);
    }

    #[test]
    fn empty_system_has_zero_energy() {
        let gravity = SoftenedGravity::default();
        assert_eq!(total_energy(&[], &gravity), 0.0);
        assert_eq!(total_momentum(&[]), Vec3::zeros());
    }

    #[test]
    fn monitor_records_first_crossing_only() {
        let mut monitor = EnergyMonitor::new(-2.0);
        assert!(monitor.record(1, -2.01).is_empty());
        let crossed = monitor.record(2, -2.3);
        assert_eq!(crossed, vec![0.01, 0.05, 0.1]);
        assert!(monitor.record(3, -2.3).is_empty());
        let crossings = monitor.crossings();
        assert_eq!(crossings[0], (0.01, Some(2)));
        assert_eq!(crossings[3], (0.2, None));
        assert!((monitor.relative_drift() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn rebase_clears_crossings() {
        let mut monitor = EnergyMonitor::new(1.0);
        monitor.record(5, 3.0);
        monitor.rebase(1.0);
        assert!(monitor.crossings().iter().all(|(_, t)| t.is_none()));
        assert_eq!(monitor.latest(), 1.0);
    }
}
