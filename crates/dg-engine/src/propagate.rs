//! Transform propagation.
//!
//! An edit starts at the picked shapes and spreads outward: to every shape
//! linked into the same group, to auxiliary lines built on the edited
//! geometry, and to midpoints. Every recursive walk carries a visited set,
//! so cyclic groups and mutually dependent constructions terminate.

use dg_core::edit::Drag;
use dg_core::math::{coincident, mid};
use dg_core::{EditIntent, Pos, ShapeId, ShapeRegistry};
use std::collections::HashSet;

use crate::derived::recompute_aux_line;
use crate::labels::update_measure_texts;
use crate::pick::{TransformProps, group_transform_props};

/// Apply a pick to the registry and propagate it.
///
/// `mdown` is the pointer position of the previous step; it is advanced to
/// `mmove` once every picked shape has been handled. Labels are refreshed
/// last, from final positions.
pub fn transform_shapes(reg: &mut ShapeRegistry, props: &TransformProps, mdown: &mut Pos, mmove: Pos) {
    for (&id, intent) in props {
        if !reg.contains(id) {
            continue;
        }
        edit_shape(reg, id, intent, *mdown, mmove);
        transform_connected_shapes(reg, id, *mdown);
        advanced_transform(reg, id);
        update_mid_points(reg, id);
    }
    for &id in props.keys() {
        update_measure_texts(reg, id);
    }
    *mdown = mmove;
}

/// Run one shape's edit rule.
pub fn edit_shape(reg: &mut ShapeRegistry, id: ShapeId, intent: &EditIntent, mdown: Pos, mmove: Pos) {
    let lambda = reg.lambda();
    let Some((shape, arena)) = reg.shape_and_points_mut(id) else {
        return;
    };
    shape.apply_edit(arena, intent, Drag { mdown, mmove, lambda });
}

/// Re-apply the edit at each point of `id` to the rest of its group.
///
/// A point is skipped when a group member has a different point within pick
/// radius of it; resolving there would grab the wrong vertex.
pub fn transform_connected_shapes(reg: &mut ShapeRegistry, id: ShapeId, mdown: Pos) {
    let group = reg.connected(id);
    if group.len() <= 1 {
        return;
    }
    let Some(shape) = reg.get(id) else {
        return;
    };
    let own_points = shape.points.clone();
    let mut edited = vec![id];

    for pid in own_points {
        let p = reg.pos(pid);
        let ambiguous = group.iter().filter_map(|g| reg.get(*g)).any(|member| {
            member
                .points
                .iter()
                .any(|&q| q != pid && coincident(p, reg.pos(q)))
        });
        if ambiguous {
            continue;
        }
        let props = group_transform_props(reg, p, false, &group);
        for (other, intent) in &props {
            if *other == id {
                continue;
            }
            edit_shape(reg, *other, intent, mdown, p);
            advanced_transform(reg, *other);
            update_mid_points(reg, *other);
            if !edited.contains(other) {
                edited.push(*other);
            }
        }
    }
    for member in edited {
        update_measure_texts(reg, member);
    }
}

/// Recompute auxiliary lines hanging off `id` and off each shape in its group.
pub fn advanced_transform(reg: &mut ShapeRegistry, id: ShapeId) {
    let mut visited = HashSet::new();
    recompute_aux_lines(reg, id, &mut visited);
    for other in reg.connected(id) {
        recompute_aux_lines(reg, other, &mut visited);
    }
}

fn recompute_aux_lines(reg: &mut ShapeRegistry, id: ShapeId, visited: &mut HashSet<ShapeId>) {
    if !visited.insert(id) {
        return;
    }
    let Some(shape) = reg.get(id) else {
        return;
    };
    let aux_lines = shape.derived.aux_lines.clone();
    for aux in &aux_lines {
        recompute_aux_line(reg, aux);
        update_measure_texts(reg, aux.line);
        recompute_aux_lines(reg, aux.line, visited);
        update_mid_points(reg, aux.line);
    }
}

/// Put every midpoint owned by `id` back at the middle of its basis, and
/// carry the move to shapes attached to the midpoint.
pub fn update_mid_points(reg: &mut ShapeRegistry, id: ShapeId) {
    let mut visited = HashSet::new();
    update_mid_points_inner(reg, id, &mut visited);
}

fn update_mid_points_inner(reg: &mut ShapeRegistry, id: ShapeId, visited: &mut HashSet<ShapeId>) {
    if !visited.insert(id) {
        return;
    }
    let Some(shape) = reg.get(id) else {
        return;
    };
    if shape.kind.is_text() {
        return;
    }
    let midpoints: Vec<(ShapeId, [dg_core::PointId; 3])> = shape
        .derived
        .midpoints
        .iter()
        .map(|(k, v)| (*k, *v))
        .collect();

    for (mid_shape, [a, b, m]) in midpoints {
        let at = mid(reg.pos(a), reg.pos(b));
        reg.points_mut().set(m, at);

        let group = reg.connected(mid_shape);
        let props = group_transform_props(reg, at, false, &group);
        for (other, intent) in &props {
            if *other == id || !group.contains(other) {
                continue;
            }
            edit_shape(reg, *other, intent, at, at);
            update_measure_texts(reg, *other);
        }
        update_mid_points_inner(reg, mid_shape, visited);
    }
}
