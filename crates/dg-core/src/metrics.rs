//! Measurements of polygons and circles.

use std::f64::consts::PI;

use crate::math::Pos;
use crate::model::{PointArena, PolygonVariant, Shape, ShapeKind};

/// Circle given by center and radius, as returned by the in/out circle helpers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleGeom {
    pub center: Pos,
    pub radius: f64,
}

/// Side lengths `(a, b, c)` of a triangle: `a = |v2 − v1|`, `b = |v3 − v2|`,
/// `c = |v3 − v1|`.
fn sides(v: [Pos; 3]) -> (f64, f64, f64) {
    ((v[1] - v[0]).hypot(), (v[2] - v[1]).hypot(), (v[2] - v[0]).hypot())
}

fn triangle_vertices(shape: &Shape, arena: &PointArena) -> Option<[Pos; 3]> {
    match shape.kind {
        ShapeKind::Polygon {
            variant: PolygonVariant::Triangle,
        } if shape.points.len() == 3 => Some([
            arena.pos(shape.points[0]),
            arena.pos(shape.points[1]),
            arena.pos(shape.points[2]),
        ]),
        _ => None,
    }
}

#[must_use]
pub fn triangle_perimeter(shape: &Shape, arena: &PointArena) -> Option<f64> {
    let (a, b, c) = sides(triangle_vertices(shape, arena)?);
    Some(a + b + c)
}

/// Heron's formula.
#[must_use]
pub fn triangle_area(shape: &Shape, arena: &PointArena) -> Option<f64> {
    let (a, b, c) = sides(triangle_vertices(shape, arena)?);
    let p = (a + b + c) * 0.5;
    Some((p * (p - a) * (p - b) * (p - c)).sqrt())
}

#[must_use]
pub fn triangle_in_circle(shape: &Shape, arena: &PointArena) -> Option<CircleGeom> {
    let v = triangle_vertices(shape, arena)?;
    let (a, b, c) = sides(v);
    let sum = a + b + c;
    if sum == 0.0 {
        return None;
    }
    let p = sum * 0.5;
    let radius = ((p - a) * (p - b) * (p - c) / p).sqrt();
    // Each vertex weighted by the length of the side facing it.
    let center = Pos::new(
        (b * v[0].x + c * v[1].x + a * v[2].x) / sum,
        (b * v[0].y + c * v[1].y + a * v[2].y) / sum,
    );
    Some(CircleGeom { center, radius })
}

#[must_use]
pub fn triangle_out_circle(shape: &Shape, arena: &PointArena) -> Option<CircleGeom> {
    let [v1, v2, v3] = triangle_vertices(shape, arena)?;
    let (a, b, c) = sides([v1, v2, v3]);
    let z1 = v1.to_vec2().hypot2();
    let z2 = v2.to_vec2().hypot2();
    let z3 = v3.to_vec2().hypot2();
    let zx = (v1.y - v2.y) * z3 + (v2.y - v3.y) * z1 + (v3.y - v1.y) * z2;
    let zy = (v1.x - v2.x) * z3 + (v2.x - v3.x) * z1 + (v3.x - v1.x) * z2;
    let z = (v1.x - v2.x) * (v3.y - v1.y) - (v1.y - v2.y) * (v3.x - v1.x);
    let s = triangle_area(shape, arena)?;
    if z == 0.0 || s == 0.0 {
        return None;
    }
    Some(CircleGeom {
        center: Pos::new(-zx / (2.0 * z), zy / (2.0 * z)),
        radius: a * b * c / (4.0 * s),
    })
}

fn regular(shape: &Shape) -> Option<(usize, Pos, f64)> {
    match shape.kind {
        ShapeKind::Polygon {
            variant: PolygonVariant::Regular { n, center, radius },
        } if n >= 3 => Some((n, center, radius)),
        _ => None,
    }
}

#[must_use]
pub fn regular_in_circle(shape: &Shape, arena: &PointArena) -> Option<CircleGeom> {
    let (n, center, _) = regular(shape)?;
    let side = (arena.pos(shape.points[1]) - arena.pos(shape.points[0])).hypot();
    Some(CircleGeom {
        center,
        radius: side / (2.0 * (PI / n as f64).tan()),
    })
}

#[must_use]
pub fn regular_out_circle(shape: &Shape) -> Option<CircleGeom> {
    let (_, center, radius) = regular(shape)?;
    Some(CircleGeom { center, radius })
}

#[must_use]
pub fn circle_area(shape: &Shape) -> Option<f64> {
    match shape.kind {
        ShapeKind::Circle { radius, .. } => Some(PI * radius * radius),
        _ => None,
    }
}

#[must_use]
pub fn circle_circumference(shape: &Shape) -> Option<f64> {
    match shape.kind {
        ShapeKind::Circle { radius, .. } => Some(2.0 * PI * radius),
        _ => None,
    }
}
