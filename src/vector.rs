// src/vector.rs

use nalgebra::Vector3;

pub type Vec3 = Vector3<f64>;

/// Unit vector along `v`, or the zero vector when `v` has no usable length.
///
/// Coincident bodies produce a zero separation; returning zero here keeps
/// NaN out of the force and velocity fields.
#[inline]
pub fn normalize_or_zero(v: &Vec3) -> Vec3 {
    let len = v.norm();
    if len.is_normal() {
        v / len
    } else {
        Vec3::zeros()
    }
}

#[inline]
pub fn distance(a: &Vec3, b: &Vec3) -> f64 {
    (a - b).norm()
}

/// In-plane perpendicular `(-y, x, 0)`, used by the orbital velocity heuristic.
#[inline]
pub fn perpendicular_xy(d: &Vec3) -> Vec3 {
    Vec3::new(-d.y, d.x, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_vector_is_zero() {
        assert_eq!(normalize_or_zero(&Vec3::zeros()), Vec3::zeros());
    }

    #[test]
    fn normalize_has_unit_length() {
        let n = normalize_or_zero(&Vec3::new(3.0, 4.0, 12.0));
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!((n.x - 3.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_is_orthogonal_in_plane() {
        let d = Vec3::new(0.3, -0.7, 0.5);
        let p = perpendicular_xy(&d);
        assert_eq!(p.z, 0.0);
        assert!((p.x * d.x + p.y * d.y).abs() < 1e-15);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-1.0, 0.0, 3.0);
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert!((distance(&a, &b) - 8f64.sqrt()).abs() < 1e-12);
    }
}
