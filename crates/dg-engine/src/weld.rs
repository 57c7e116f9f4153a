//! Point welding and group materialization.
//!
//! Attaching shape `b` to shape `a` links the two and replaces every point
//! of `a` that sits within pick radius of a point of `b` with `b`'s point.
//! From then on both shapes hold the same [`PointId`](dg_core::PointId) and
//! move together. Welds are never undone; detaching only drops the link.
//! Only visible points take part in welding.

use dg_core::math::coincident;
use dg_core::{GeometryError, Result, ShapeId, ShapeRegistry};
use indexmap::IndexSet;

use crate::pick::group_transform_props;

/// Link `b` to `a` and weld `a`'s coincident points onto `b`'s.
///
/// Text labels are linked but keep their own anchor.
pub fn attach(reg: &mut ShapeRegistry, a: ShapeId, b: ShapeId) {
    reg.link(a, b);
    if a == b {
        return;
    }
    let (Some(sa), Some(sb)) = (reg.get(a), reg.get(b)) else {
        return;
    };
    if sa.kind.is_text() || sb.kind.is_text() {
        return;
    }
    let donors = sb.points.clone();
    let mut points = sa.points.clone();
    let mut welded = 0usize;
    for donor in donors {
        // Hidden points (far ends, helper points) are never welded.
        if !reg.points()[donor].visible {
            continue;
        }
        let at = reg.pos(donor);
        for slot in points.iter_mut() {
            if *slot != donor && reg.points()[*slot].visible && coincident(at, reg.pos(*slot)) {
                *slot = donor;
                welded += 1;
            }
        }
    }
    if welded > 0 {
        log::trace!("weld {a} onto {b}: {welded} points");
        if let Some(shape) = reg.get_mut(a) {
            shape.points = points;
        }
    }
}

/// Drop the link between `a` and `id`. Shared points stay shared.
pub fn detach(reg: &mut ShapeRegistry, a: ShapeId, id: ShapeId) {
    reg.unlink(a, id);
}

/// Every shape reachable from `id` through coincident defining points.
///
/// The result includes `id` itself when one of its own points resolves to
/// it, which is always the case for non-label shapes.
pub fn find_connected_group(reg: &ShapeRegistry, id: ShapeId) -> Result<Vec<ShapeId>> {
    let shape = reg.shape(id)?;
    let mut found = IndexSet::new();
    if shape.kind.is_text() {
        return Ok(Vec::new());
    }
    let mut visited = IndexSet::new();
    visit(reg, id, &mut visited, &mut found);
    Ok(found.into_iter().collect())
}

fn visit(
    reg: &ShapeRegistry,
    id: ShapeId,
    visited: &mut IndexSet<ShapeId>,
    found: &mut IndexSet<ShapeId>,
) {
    let Some(shape) = reg.get(id) else {
        return;
    };
    for &pid in &shape.points {
        let props = group_transform_props(reg, reg.pos(pid), false, &[]);
        for &other in props.keys() {
            if reg.get(other).is_some_and(|s| s.kind.is_text()) {
                continue;
            }
            found.insert(other);
            if visited.insert(other) {
                visit(reg, other, visited, found);
            }
        }
    }
}

/// Attach `id` to everything it touches and make the result a clique.
///
/// Fails before touching anything when `id` is not registered.
pub fn create_connected_group(reg: &mut ShapeRegistry, id: ShapeId) -> Result<()> {
    if !reg.contains(id) {
        return Err(GeometryError::UnknownShape(id));
    }
    let found = find_connected_group(reg, id)?;
    attach(reg, id, id);
    for &other in &found {
        attach(reg, id, other);
    }
    let members = reg.connected(id);
    for &member in &members {
        attach(reg, member, id);
        for &peer in &members {
            attach(reg, member, peer);
        }
    }
    log::debug!("group of {id}: {} shapes", members.len());
    Ok(())
}
