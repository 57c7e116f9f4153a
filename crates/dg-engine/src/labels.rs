//! Distance and angle labels that track the points they measure.

use dg_core::config::{ANGLE_LABEL_SCALE, LABEL_OFFSET_Y};
use dg_core::hit::text_width;
use dg_core::math::{angle, mid};
use dg_core::{Pos, ShapeId, ShapeKind, ShapeRegistry, Vec2};
use std::collections::HashSet;

/// Label text for a distance.
#[must_use]
pub fn distance_text(a: Pos, b: Pos) -> String {
    format!("{:.2}", (b - a).hypot())
}

/// Label text for the angle `a – vertex – c`, in degrees.
#[must_use]
pub fn angle_text(a: Pos, vertex: Pos, c: Pos) -> String {
    format!("{:.2}", angle(a, vertex, c).to_degrees())
}

#[must_use]
pub fn distance_anchor(a: Pos, b: Pos) -> Pos {
    mid(a, b) + Vec2::new(0.0, LABEL_OFFSET_Y)
}

#[must_use]
pub fn angle_anchor(vertex: Pos) -> Pos {
    (vertex.to_vec2() * ANGLE_LABEL_SCALE).to_point()
}

/// Refresh every label registered on `id`, then on its midpoint shapes.
pub fn update_measure_texts(reg: &mut ShapeRegistry, id: ShapeId) {
    let mut visited = HashSet::new();
    update_labels(reg, id, &mut visited);
}

fn update_labels(reg: &mut ShapeRegistry, id: ShapeId, visited: &mut HashSet<ShapeId>) {
    if !visited.insert(id) {
        return;
    }
    let Some(shape) = reg.get(id) else {
        return;
    };
    let mut updates: Vec<(ShapeId, String, Pos)> = Vec::new();
    for (&label, &[a, b]) in &shape.derived.distance_labels {
        let (pa, pb) = (reg.pos(a), reg.pos(b));
        updates.push((label, distance_text(pa, pb), distance_anchor(pa, pb)));
    }
    for (&label, &[a, v, c]) in &shape.derived.angle_labels {
        let (pa, pv, pc) = (reg.pos(a), reg.pos(v), reg.pos(c));
        updates.push((label, angle_text(pa, pv, pc), angle_anchor(pv)));
    }
    let midpoints: Vec<ShapeId> = shape.derived.midpoints.keys().copied().collect();

    for (label, text, anchor) in updates {
        set_label(reg, label, text, anchor);
    }
    for m in midpoints {
        update_labels(reg, m, visited);
    }
}

/// Overwrite a label's content and move its anchor.
pub fn set_label(reg: &mut ShapeRegistry, label: ShapeId, text: String, anchor: Pos) {
    let Some((shape, arena)) = reg.shape_and_points_mut(label) else {
        return;
    };
    if let ShapeKind::Text {
        content,
        font_px,
        width,
    } = &mut shape.kind
    {
        *width = text_width(&text, *font_px);
        *content = text;
    }
    if let Some(&a) = shape.points.first() {
        arena.set(a, anchor);
    }
}
