//! Pick resolution: what does a pointer position grab?
//!
//! All scans walk the registry in registration order, so ties resolve the
//! same way every time.

use dg_core::{EditIntent, HitTest, PointId, Pos, ShapeId, ShapeRegistry};
use indexmap::IndexMap;

/// Per-shape edit intents produced by a pick.
pub type TransformProps = IndexMap<ShapeId, EditIntent>;

/// Resolve the edit intent of every shape in `group` at `p`.
///
/// An empty `group` means the whole registry. Every shape that has a
/// defining point at `p` gets a vertex intent. With `check_translation`, a
/// shape whose body contains `p` is additionally marked for translation,
/// unless some other shape of the group has a defining point at `p`.
pub fn group_transform_props(
    reg: &ShapeRegistry,
    p: Pos,
    check_translation: bool,
    group: &[ShapeId],
) -> TransformProps {
    let members: Vec<ShapeId> = if group.is_empty() {
        reg.ids()
    } else {
        group.to_vec()
    };
    let arena = reg.points();
    let mut props = TransformProps::new();

    for &id in &members {
        let Some(shape) = reg.get(id) else {
            continue;
        };
        if let Some(intent) = shape.points_have(arena, p) {
            props.insert(id, intent);
        }
        if !check_translation || props.contains_key(&id) {
            continue;
        }
        let prevented = members.iter().any(|&other| {
            other != id
                && reg
                    .get(other)
                    .is_some_and(|s| s.points_have(arena, p).is_some())
        });
        if !prevented && shape.contains(arena, p) {
            props.insert(id, EditIntent::Translate);
        }
    }
    log::trace!("props at ({:.1}, {:.1}): {} shapes", p.x, p.y, props.len());
    props
}

/// The shape under `p`.
///
/// A defining-point hit wins immediately; otherwise the last shape whose
/// body or outline contains `p`.
pub fn get_shape_id_by_point(reg: &ShapeRegistry, p: Pos) -> Option<ShapeId> {
    let arena = reg.points();
    let mut picked = None;
    for shape in reg.iter() {
        if shape.points_have(arena, p).is_some() {
            return Some(shape.id);
        }
        if shape.contains(arena, p) || shape.boundary_contains(arena, p).is_some() {
            picked = Some(shape.id);
        }
    }
    picked
}

/// Group of the shape under `p`, empty on a miss.
pub fn get_connected_group_by_point(reg: &ShapeRegistry, p: Pos) -> Vec<ShapeId> {
    get_shape_id_by_point(reg, p)
        .map(|id| reg.connected(id))
        .unwrap_or_default()
}

/// First visible defining point within pick radius of `p`.
///
/// Callers snap their own coordinate to the returned point's position.
pub fn stick_point_to_found(reg: &ShapeRegistry, p: Pos) -> Option<PointId> {
    let arena = reg.points();
    reg.iter()
        .flat_map(|shape| shape.points.iter().copied())
        .find(|&id| {
            let point = &arena[id];
            point.visible && point.contains(p)
        })
}

/// `p` after snapping to the nearest visible defining point, if any.
pub fn snap(reg: &ShapeRegistry, p: Pos) -> Pos {
    stick_point_to_found(reg, p).map_or(p, |id| reg.pos(id))
}

/// Whether any shape is hit at `p` in any way.
pub fn any_shape_contains(reg: &ShapeRegistry, p: Pos) -> bool {
    let arena = reg.points();
    reg.iter().any(|s| {
        s.points_have(arena, p).is_some()
            || s.contains(arena, p)
            || s.boundary_contains(arena, p).is_some()
    })
}

/// Whether `p` is strictly inside some shape body, away from its points and outline.
pub fn inside_any_shape(reg: &ShapeRegistry, p: Pos) -> bool {
    let arena = reg.points();
    reg.iter().any(|s| {
        s.points_have(arena, p).is_none()
            && s.boundary_contains(arena, p).is_none()
            && s.contains(arena, p)
    })
}

/// Whether `p` grabs a defining point of any shape.
pub fn on_any_point_of_any_shape(reg: &ShapeRegistry, p: Pos) -> bool {
    let arena = reg.points();
    reg.iter().any(|s| s.points_have(arena, p).is_some())
}
