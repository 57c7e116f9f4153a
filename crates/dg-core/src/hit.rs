//! Hit testing: position → shape part lookup.
//!
//! Three questions are asked of every shape when the pointer lands:
//! does the position grab one of its defining points, does it lie on an
//! outline edge, and does it fall inside the body.

use smallvec::{SmallVec, smallvec};

use crate::config::{
    CIRCLE_CURVE_EPS, GLYPH_ADVANCE, LINE_LONG_THRESHOLD, LINE_LONG_TOLERANCE,
    POLYGON_PICK_RADIUS, SEGMENT_DET_TOLERANCE,
};
use crate::math::{Pos, det, is_in_circle, is_in_segment};
use crate::model::{EditIntent, PointArena, Shape, ShapeKind};

/// Indices of the defining points bounding the hit edge.
pub type EdgeIndices = SmallVec<[usize; 2]>;

/// Hit predicates answered against the registry's point arena.
pub trait HitTest {
    /// Edit intent when `p` grabs a defining point, `None` otherwise.
    fn points_have(&self, points: &PointArena, p: Pos) -> Option<EditIntent>;

    /// Edge under `p`, as indices into the shape's defining points.
    fn boundary_contains(&self, points: &PointArena, p: Pos) -> Option<EdgeIndices>;

    /// Whether `p` lies on or inside the shape body.
    fn contains(&self, points: &PointArena, p: Pos) -> bool;
}

impl HitTest for Shape {
    fn points_have(&self, arena: &PointArena, p: Pos) -> Option<EditIntent> {
        let pt = |i: usize| &arena[self.points[i]];
        match &self.kind {
            ShapeKind::Point => pt(0).contains(p).then_some(EditIntent::Translate),
            ShapeKind::Line { .. } => {
                if pt(0).contains(p) {
                    Some(EditIntent::Vertex {
                        index: 0,
                        pivot: Some(pt(1).pos),
                    })
                } else if pt(1).contains(p) {
                    Some(EditIntent::Vertex {
                        index: 1,
                        pivot: Some(pt(0).pos),
                    })
                } else {
                    None
                }
            }
            ShapeKind::Ray => {
                if pt(0).contains(p) {
                    Some(EditIntent::Vertex {
                        index: 0,
                        pivot: Some(pt(2).pos),
                    })
                } else if pt(2).contains(p) {
                    Some(EditIntent::Vertex {
                        index: 2,
                        pivot: Some(pt(0).pos),
                    })
                } else {
                    None
                }
            }
            ShapeKind::Segment { .. } | ShapeKind::Vector { .. } => (0..2)
                .find(|&i| pt(i).contains(p))
                .map(EditIntent::vertex),
            ShapeKind::Polygon { .. } => (0..self.points.len())
                .find(|&i| is_in_circle(p, pt(i).pos, POLYGON_PICK_RADIUS))
                .map(EditIntent::vertex),
            ShapeKind::Circle { .. } => (2..self.points.len())
                .find(|&i| pt(i).contains(p))
                .or_else(|| pt(0).contains(p).then_some(0))
                .or_else(|| pt(1).contains(p).then_some(1))
                .map(EditIntent::vertex),
            ShapeKind::Text { .. } => self.contains(arena, p).then_some(EditIntent::Hold),
        }
    }

    fn boundary_contains(&self, arena: &PointArena, p: Pos) -> Option<EdgeIndices> {
        let pos = |i: usize| arena.pos(self.points[i]);
        match &self.kind {
            ShapeKind::Point | ShapeKind::Text { .. } => {
                self.contains(arena, p).then(|| smallvec![0])
            }
            ShapeKind::Line { .. } | ShapeKind::Segment { .. } | ShapeKind::Vector { .. } => {
                self.contains(arena, p).then(|| smallvec![0, 1])
            }
            ShapeKind::Ray => self.contains(arena, p).then(|| smallvec![0, 2]),
            ShapeKind::Polygon { .. } => {
                let n = self.points.len();
                (0..n)
                    .map(|i| (i, if i == 0 { n - 1 } else { i - 1 }))
                    .find(|&(i, j)| is_in_segment(pos(i), pos(j), p))
                    .map(|(i, j)| smallvec![i, j])
            }
            ShapeKind::Circle { show_radius, .. } => (*show_radius
                && is_in_segment(pos(0), pos(1), p))
            .then(|| smallvec![0, 1]),
        }
    }

    fn contains(&self, arena: &PointArena, p: Pos) -> bool {
        let pt = |i: usize| &arena[self.points[i]];
        match &self.kind {
            ShapeKind::Point => pt(0).contains(p),
            ShapeKind::Line { .. } => {
                let (p0, p1) = (pt(0), pt(1));
                if p0.contains(p1.pos) {
                    return false;
                }
                let l = (p1.pos - p0.pos).hypot();
                let eps = if l > LINE_LONG_THRESHOLD {
                    LINE_LONG_TOLERANCE
                } else {
                    l * 4.0
                };
                det(p0.pos, p1.pos, p).abs() < l + eps
            }
            ShapeKind::Ray => {
                let (origin, far, through) = (pt(0), pt(1).pos, pt(2).pos);
                if origin.contains(through) {
                    return false;
                }
                let a1 = (p - origin.pos).hypot();
                let a2 = (p - far).hypot();
                let len = (far - origin.pos).hypot();
                det(origin.pos, through, p).abs() < SEGMENT_DET_TOLERANCE
                    && (a1 + a2).floor() == len.floor()
            }
            ShapeKind::Segment { .. } | ShapeKind::Vector { .. } => {
                is_in_segment(pt(0).pos, pt(1).pos, p)
            }
            ShapeKind::Polygon { .. } => {
                let vs: SmallVec<[Pos; 8]> = self.positions(arena).collect();
                polygon_contains(&vs, p)
            }
            ShapeKind::Circle { radius, filled, .. } => {
                let d2 = (p - pt(0).pos).hypot2();
                let r2 = radius * radius;
                if *filled {
                    d2 <= r2
                } else {
                    (d2.floor() - r2.floor()).abs() < CIRCLE_CURVE_EPS
                }
            }
            ShapeKind::Text { font_px, width, .. } => {
                let anchor = pt(0).pos;
                !(p.x < anchor.x
                    || p.x > anchor.x + 1.7 * width
                    || p.y < anchor.y - font_px.trunc()
                    || p.y > anchor.y)
            }
        }
    }
}

/// Even-odd ray casting.
#[must_use]
pub fn polygon_contains(vertices: &[Pos], v: Pos) -> bool {
    let n = vertices.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (pi, pj) = (vertices[i], vertices[j]);
        if (pi.y > v.y) != (pj.y > v.y) && v.x < (pj.x - pi.x) * (v.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Width estimate for a label of `content` at `font_px`.
#[must_use]
pub fn text_width(content: &str, font_px: f64) -> f64 {
    content.chars().count() as f64 * font_px * GLYPH_ADVANCE
}
