//! Auxiliary line geometry: angle bisectors, parallels and perpendiculars.
//!
//! Each line is a pure function of its basis points. Recomputing twice
//! without an intervening edit yields identical positions.

use dg_core::math::{angle, det, rotate_about};
use dg_core::{AuxBasis, AuxLine, Pos, ShapeRegistry};
use std::f64::consts::FRAC_PI_2;

/// Line points `[p1, p2, far1, far2]` of the bisector of angle `a – b – c`.
#[must_use]
pub fn bisector_points(a: Pos, b: Pos, c: Pos, lambda: f64) -> [Pos; 4] {
    let d = c - b;
    let raw = [b, c, c - d * lambda, c + d * lambda];
    let full = angle(a, b, c);
    let alpha = if det(a, b, c) >= 0.0 { -full } else { full };
    raw.map(|p| rotate_about(p, b, alpha / 2.0))
}

/// Line points of the parallel through `anchor` to edge `e1 → e2`,
/// turned a quarter about the anchor when `perpendicular`.
#[must_use]
pub fn parallel_points(anchor: Pos, e1: Pos, e2: Pos, lambda: f64, perpendicular: bool) -> [Pos; 4] {
    let d = e2 - e1;
    let raw = [anchor, anchor + d, anchor + d * lambda, anchor - d * lambda];
    if perpendicular {
        raw.map(|p| rotate_about(p, anchor, FRAC_PI_2))
    } else {
        raw
    }
}

/// Rewrite the points of `aux.line` from its current basis.
pub fn recompute_aux_line(reg: &mut ShapeRegistry, aux: &AuxLine) {
    let lambda = reg.lambda();
    let Some(line) = reg.get(aux.line) else {
        return;
    };
    if line.points.len() < 4 {
        return;
    }
    let targets = [line.points[0], line.points[1], line.points[2], line.points[3]];
    let positions = match aux.basis {
        AuxBasis::Bisector { basis: [a, b, c] } => {
            bisector_points(reg.pos(a), reg.pos(b), reg.pos(c), lambda)
        }
        AuxBasis::Parallel {
            anchor,
            edge: [e1, e2],
            perpendicular,
        } => {
            // The line's first point is the anchor once welded; follow it.
            let at = reg.pos(targets[0]);
            reg.points_mut().set(anchor, at);
            parallel_points(at, reg.pos(e1), reg.pos(e2), lambda, perpendicular)
        }
    };
    log::trace!("recompute {}", aux.line);
    let arena = reg.points_mut();
    for (id, pos) in targets.into_iter().zip(positions) {
        arena.set(id, pos);
    }
}
