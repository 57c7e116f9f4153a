//! Plane geometry helpers shared by hit testing, edit rules and derived
//! constructions.

use kurbo::Vec2;

use crate::config::{PICK_RADIUS_SQ, SEGMENT_DET_TOLERANCE};

/// Canvas position.
pub type Pos = kurbo::Point;

/// Lengths below this are treated as zero when measuring angles.
const ANGLE_EPSILON: f64 = 1e-7;

/// Cross product of `(v - a)` and `(b - a)`.
///
/// Twice the signed area of triangle `(a, b, v)`; zero when `v` lies on the
/// line through `a` and `b`.
#[must_use]
pub fn det(a: Pos, b: Pos, v: Pos) -> f64 {
    (v.x - a.x) * (b.y - a.y) - (b.x - a.x) * (v.y - a.y)
}

/// Whether two positions fall within one pick radius of each other.
#[must_use]
pub fn coincident(a: Pos, b: Pos) -> bool {
    (a - b).hypot2() <= PICK_RADIUS_SQ
}

/// Whether `v` lies within `r` of `center` (boundary inclusive).
#[must_use]
pub fn is_in_circle(v: Pos, center: Pos, r: f64) -> bool {
    (v - center).hypot2() <= r * r
}

/// Segment hit test.
///
/// Requires a small cross product and that the two distances from `v` to the
/// endpoints add up to the segment length once floored. The floor comparison
/// rejects some points that sit right on the segment; that is accepted
/// behaviour.
#[must_use]
pub fn is_in_segment(a: Pos, b: Pos, v: Pos) -> bool {
    let a1 = (v - a).hypot();
    let a2 = (v - b).hypot();
    let len = (b - a).hypot();
    det(a, b, v).abs() < SEGMENT_DET_TOLERANCE && (a1 + a2).floor() == len.floor()
}

/// Inner angle at `b` of the polyline `a – b – c`, in radians.
///
/// Returns `0.0` when either arm is shorter than [`ANGLE_EPSILON`].
#[must_use]
pub fn angle(a: Pos, b: Pos, c: Pos) -> f64 {
    let u = a - b;
    let w = c - b;
    let (lu, lw) = (u.hypot(), w.hypot());
    if lu < ANGLE_EPSILON || lw < ANGLE_EPSILON {
        return 0.0;
    }
    (u.dot(w) / (lu * lw)).clamp(-1.0, 1.0).acos()
}

/// Counter-clockwise rotation of a vector (in canvas coordinates).
#[must_use]
pub fn rotate_vec(v: Vec2, phi: f64) -> Vec2 {
    let (sin, cos) = phi.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotate `p` about `center` by `phi` radians.
#[must_use]
pub fn rotate_about(p: Pos, center: Pos, phi: f64) -> Pos {
    center + rotate_vec(p - center, phi)
}

/// Far points of an infinite line through `anchor` and `through`.
///
/// Returns `(through - λ·d, through + λ·d)` with `d = through - anchor`.
#[must_use]
pub fn extend_through(anchor: Pos, through: Pos, lambda: f64) -> (Pos, Pos) {
    let d = through - anchor;
    (through - d * lambda, through + d * lambda)
}

/// Midpoint of two positions.
#[must_use]
pub fn mid(a: Pos, b: Pos) -> Pos {
    a.midpoint(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn det_sign_and_zero() {
        let a = Pos::new(0.0, 0.0);
        let b = Pos::new(10.0, 0.0);
        assert_eq!(det(a, b, Pos::new(5.0, 0.0)), 0.0);
        assert!(det(a, b, Pos::new(5.0, 5.0)) < 0.0);
        assert!(det(a, b, Pos::new(5.0, -5.0)) > 0.0);
    }

    #[test]
    fn coincidence_is_inclusive() {
        assert!(coincident(Pos::new(0.0, 0.0), Pos::new(6.0, 8.0)));
        assert!(!coincident(Pos::new(0.0, 0.0), Pos::new(6.0, 8.1)));
    }

    #[test]
    fn segment_hit_on_and_off() {
        let a = Pos::new(0.0, 0.0);
        let b = Pos::new(100.0, 0.0);
        assert!(is_in_segment(a, b, Pos::new(50.0, 0.0)));
        assert!(!is_in_segment(a, b, Pos::new(150.0, 0.0)));
        assert!(!is_in_segment(a, b, Pos::new(50.0, 30.0)));
    }

    #[test]
    fn angle_right_and_degenerate() {
        let b = Pos::new(0.0, 0.0);
        assert_relative_eq!(angle(Pos::new(1.0, 0.0), b, Pos::new(0.0, 1.0)), FRAC_PI_2);
        assert_eq!(angle(b, b, Pos::new(0.0, 1.0)), 0.0);
    }

    #[test]
    fn rotation_about_center() {
        let p = rotate_about(Pos::new(2.0, 1.0), Pos::new(1.0, 1.0), FRAC_PI_2);
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);

        let v = rotate_vec(Vec2::new(1.0, 0.0), FRAC_PI_4);
        assert_relative_eq!(v.x, v.y, epsilon = 1e-12);
    }

    #[test]
    fn extension_is_collinear() {
        let (f1, f2) = extend_through(Pos::new(0.0, 0.0), Pos::new(1.0, 1.0), 100.0);
        assert_relative_eq!(f1.x, f1.y);
        assert_relative_eq!(f2.x, 101.0);
        assert_relative_eq!(f1.x, -99.0);
    }
}
