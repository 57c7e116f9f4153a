//! Construction tools and deletion.
//!
//! Every tool takes the clicked canvas positions, snaps them to existing
//! visible points, registers the new shape and materializes its group.
//! Tools that build on existing points (midpoints, bisectors, labels)
//! create free `Point` shapes for clicks that hit nothing.

use dg_core::config::PICK_RADIUS_SQ;
use dg_core::math::{coincident, extend_through, mid};
use dg_core::{
    AuxBasis, AuxLine, GeometryError, HitTest, LineRole, PointId, PolygonVariant, Pos, Result,
    ShapeId, ShapeKind, ShapeRegistry, Vec2,
};

use crate::derived::{bisector_points, parallel_points};
use crate::labels::{angle_anchor, angle_text, distance_anchor, distance_text};
use crate::pick::{any_shape_contains, on_any_point_of_any_shape, snap, stick_point_to_found};
use crate::weld::{create_connected_group, detach};

const MIDPOINT_RADIUS: f64 = 5.0;
const VECTOR_HEAD_LENGTH: f64 = 25.0;
const MIN_FIXED_LENGTH: f64 = 10.0;
const MIN_RADIUS: f64 = 3.0;
const DISTANCE_FONT_PX: f64 = 10.0;
const ANGLE_FONT_PX: f64 = 13.0;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn alloc_all(reg: &mut ShapeRegistry, positions: &[Pos]) -> Vec<PointId> {
    positions.iter().map(|p| reg.alloc_point(*p)).collect()
}

fn hide(reg: &mut ShapeRegistry, id: PointId) {
    if let Some(p) = reg.points_mut().get_mut(id) {
        p.visible = false;
        p.radius = 0.0;
    }
}

/// Shapes holding `point` among their defining points, `except` excluded.
fn owners_of(reg: &ShapeRegistry, point: PointId, except: ShapeId) -> Vec<ShapeId> {
    reg.iter()
        .filter(|s| s.id != except && s.owns(point))
        .map(|s| s.id)
        .collect()
}

/// Existing visible point at `at`, or a new free point shape there.
fn point_at(reg: &mut ShapeRegistry, at: Pos) -> Result<PointId> {
    if let Some(id) = stick_point_to_found(reg, at) {
        return Ok(id);
    }
    let id = add_point_unchecked(reg, at)?;
    Ok(reg.shape(id)?.points[0])
}

/// Group the new shape, lock shapes resting on midpoints, name its points
/// and drop points lost to welding.
fn finish(reg: &mut ShapeRegistry, id: ShapeId) -> Result<ShapeId> {
    create_connected_group(reg, id)?;
    let on_midpoint = {
        let shape = reg.shape(id)?;
        !shape.kind.is_point()
            && shape
                .points
                .iter()
                .any(|&p| reg.points().get(p).is_some_and(|p| p.mid_point))
    };
    if on_midpoint {
        reg.shape_mut(id)?.flags.translatable = false;
    }
    reg.assign_letters(id);
    reg.collect_orphan_points();
    log::debug!("constructed {id}");
    Ok(id)
}

fn distinct(a: Pos, b: Pos, what: &str) -> Result<()> {
    if coincident(a, b) {
        log::warn!("rejected {what}: endpoints coincide");
        return Err(GeometryError::DegenerateConstruction(format!(
            "{what} endpoints coincide"
        )));
    }
    Ok(())
}

// ─── Points ──────────────────────────────────────────────────────────────

fn add_point_unchecked(reg: &mut ShapeRegistry, at: Pos) -> Result<ShapeId> {
    let pid = reg.alloc_point(at);
    let id = reg.insert(ShapeKind::Point, [pid]);

    // A point dropped on an open circle's curve rides on it.
    let arena = reg.points();
    let circle = reg
        .iter()
        .find(|s| {
            matches!(s.kind, ShapeKind::Circle { filled: false, .. })
                && s.points_have(arena, at).is_none()
                && s.contains(arena, at)
        })
        .map(|s| s.id);
    if let Some(cid) = circle
        && let Some((shape, arena)) = reg.shape_and_points_mut(cid)
    {
        shape.points.push(pid);
        if let Some(p) = arena.get_mut(pid) {
            p.on_boundary = true;
        }
        if let ShapeKind::Circle { radius, .. } = shape.kind {
            dg_core::edit::project_boundary(&shape.points, arena, radius);
        }
    }
    finish(reg, id)
}

/// Free point. Refused on top of an existing defining point.
pub fn add_point(reg: &mut ShapeRegistry, at: Pos) -> Result<ShapeId> {
    if on_any_point_of_any_shape(reg, at) {
        return Err(GeometryError::DegenerateConstruction(
            "a point already exists there".into(),
        ));
    }
    add_point_unchecked(reg, at)
}

/// Point kept at the middle of `a` and `b`.
pub fn add_midpoint(reg: &mut ShapeRegistry, a: Pos, b: Pos) -> Result<ShapeId> {
    let a = Pos::new(a.x.round(), a.y.round());
    distinct(snap(reg, a), snap(reg, b), "midpoint")?;
    let pa = point_at(reg, a)?;
    let pb = point_at(reg, b)?;

    let m = reg.alloc_point(mid(reg.pos(pa), reg.pos(pb)));
    if let Some(p) = reg.points_mut().get_mut(m) {
        p.radius = MIDPOINT_RADIUS;
        p.mid_point = true;
        p.transformable = false;
    }
    let id = reg.insert(ShapeKind::Point, [m]);
    reg.shape_mut(id)?.flags.transformable = false;

    let mut owners = owners_of(reg, pa, id);
    for owner in owners_of(reg, pb, id) {
        if !owners.contains(&owner) {
            owners.push(owner);
        }
    }
    for owner in owners {
        reg.shape_mut(owner)?.derived.midpoints.insert(id, [pa, pb, m]);
    }
    finish(reg, id)
}

// ─── Straight shapes ─────────────────────────────────────────────────────

pub fn add_segment(reg: &mut ShapeRegistry, a: Pos, b: Pos) -> Result<ShapeId> {
    let (a, b) = (snap(reg, a), snap(reg, b));
    distinct(a, b, "segment")?;
    let pts = alloc_all(reg, &[a, b]);
    let id = reg.insert(ShapeKind::Segment { fixed_length: None }, pts);
    finish(reg, id)
}

/// Horizontal segment of `length` starting at `a`; its vertices cannot be
/// dragged apart.
pub fn add_fixed_segment(reg: &mut ShapeRegistry, a: Pos, length: f64) -> Result<ShapeId> {
    if !(length >= MIN_FIXED_LENGTH) {
        return Err(GeometryError::DegenerateConstruction(format!(
            "fixed segment length {length} is below {MIN_FIXED_LENGTH}"
        )));
    }
    let a = snap(reg, a);
    let pts = alloc_all(reg, &[a, a + Vec2::new(length, 0.0)]);
    let id = reg.insert(
        ShapeKind::Segment {
            fixed_length: Some(length),
        },
        pts,
    );
    reg.shape_mut(id)?.flags.custom_transformable = true;
    finish(reg, id)
}

pub fn add_vector(reg: &mut ShapeRegistry, tail: Pos, head: Pos) -> Result<ShapeId> {
    let (tail, head) = (snap(reg, tail), snap(reg, head));
    distinct(tail, head, "vector")?;
    let pts = alloc_all(reg, &[tail, head]);
    let id = reg.insert(
        ShapeKind::Vector {
            head_length: VECTOR_HEAD_LENGTH,
        },
        pts,
    );
    finish(reg, id)
}

/// Infinite line through `a` and `b`.
pub fn add_line(reg: &mut ShapeRegistry, a: Pos, b: Pos) -> Result<ShapeId> {
    let (a, b) = (snap(reg, a), snap(reg, b));
    distinct(a, b, "line")?;
    let (far1, far2) = extend_through(a, b, reg.lambda());
    let pts = alloc_all(reg, &[a, b, far1, far2]);
    hide(reg, pts[2]);
    hide(reg, pts[3]);
    let id = reg.insert(
        ShapeKind::Line {
            role: LineRole::Free,
        },
        pts,
    );
    finish(reg, id)
}

/// Ray from `origin` through `through`.
pub fn add_ray(reg: &mut ShapeRegistry, origin: Pos, through: Pos) -> Result<ShapeId> {
    let (origin, through) = (snap(reg, origin), snap(reg, through));
    distinct(origin, through, "ray")?;
    let far = through + (through - origin) * reg.lambda();
    let pts = alloc_all(reg, &[origin, far, through]);
    hide(reg, pts[1]);
    let id = reg.insert(ShapeKind::Ray, pts);
    finish(reg, id)
}

// ─── Polygons & circles ──────────────────────────────────────────────────

/// Polygon through `vertices`; three vertices make a triangle.
pub fn add_polygon(reg: &mut ShapeRegistry, vertices: &[Pos]) -> Result<ShapeId> {
    if vertices.len() < 3 {
        return Err(GeometryError::DegenerateConstruction(format!(
            "polygon needs 3 vertices, got {}",
            vertices.len()
        )));
    }
    let snapped: Vec<Pos> = vertices.iter().map(|v| snap(reg, *v)).collect();
    let variant = if snapped.len() == 3 {
        PolygonVariant::Triangle
    } else {
        PolygonVariant::Free
    };
    let pts = alloc_all(reg, &snapped);
    let id = reg.insert(ShapeKind::Polygon { variant }, pts);
    finish(reg, id)
}

/// Regular `n`-gon about `center` with circumradius `|through − center|`.
/// The first vertex sits on the +x axis.
pub fn add_regular_polygon(reg: &mut ShapeRegistry, center: Pos, n: usize, through: Pos) -> Result<ShapeId> {
    let center = snap(reg, center);
    let radius = (snap(reg, through) - center).hypot();
    if n < 3 || radius * radius <= PICK_RADIUS_SQ {
        return Err(GeometryError::DegenerateConstruction(format!(
            "regular polygon with {n} sides and radius {radius:.1}"
        )));
    }
    let pts = alloc_all(reg, &vec![center; n]);
    dg_core::edit::layout_regular(&pts, reg.points_mut(), n, center, radius);
    let id = reg.insert(
        ShapeKind::Polygon {
            variant: PolygonVariant::Regular { n, center, radius },
        },
        pts,
    );
    finish(reg, id)
}

/// Circle about `center` through `rim`.
pub fn add_circle(reg: &mut ShapeRegistry, center: Pos, rim: Pos) -> Result<ShapeId> {
    let (center, rim) = (snap(reg, center), snap(reg, rim));
    distinct(center, rim, "circle")?;
    let pts = alloc_all(reg, &[center, rim]);
    let id = reg.insert(
        ShapeKind::Circle {
            radius: (rim - center).hypot(),
            filled: false,
            show_radius: false,
        },
        pts,
    );
    finish(reg, id)
}

/// Circle of a given radius; the radius segment is shown and pickable.
pub fn add_circle_with_radius(reg: &mut ShapeRegistry, center: Pos, radius: f64) -> Result<ShapeId> {
    if !(radius >= MIN_RADIUS) {
        return Err(GeometryError::DegenerateConstruction(format!(
            "circle radius {radius} is below {MIN_RADIUS}"
        )));
    }
    let center = snap(reg, center);
    let pts = alloc_all(reg, &[center, center + Vec2::new(radius, 0.0)]);
    let id = reg.insert(
        ShapeKind::Circle {
            radius,
            filled: false,
            show_radius: true,
        },
        pts,
    );
    finish(reg, id)
}

// ─── Auxiliary lines ─────────────────────────────────────────────────────

/// Bisector of the angle `a – vertex – c`.
pub fn add_angle_bisector(reg: &mut ShapeRegistry, a: Pos, vertex: Pos, c: Pos) -> Result<ShapeId> {
    let pa = point_at(reg, a)?;
    let pb = point_at(reg, vertex)?;
    let pc = point_at(reg, c)?;
    let (va, vb, vc) = (reg.pos(pa), reg.pos(pb), reg.pos(pc));
    distinct(va, vb, "bisector")?;
    distinct(vc, vb, "bisector")?;

    let pts = alloc_all(reg, &bisector_points(va, vb, vc, reg.lambda()));
    hide(reg, pts[1]);
    if let Some(p) = reg.points_mut().get_mut(pts[1]) {
        p.translatable = false;
    }
    hide(reg, pts[2]);
    hide(reg, pts[3]);
    let id = reg.insert(
        ShapeKind::Line {
            role: LineRole::Bisector,
        },
        pts,
    );
    let aux = AuxLine {
        line: id,
        basis: AuxBasis::Bisector {
            basis: [pa, pb, pc],
        },
    };
    register_aux(reg, &[pa, pb, pc], id, aux)?;
    finish(reg, id)
}

/// Line through the point at `anchor`, parallel to the edge under `reference`.
pub fn add_parallel_line(reg: &mut ShapeRegistry, anchor: Pos, reference: Pos) -> Result<ShapeId> {
    add_parallel(reg, anchor, reference, false)
}

/// Line through the point at `anchor`, perpendicular to the edge under `reference`.
pub fn add_perpendicular_line(reg: &mut ShapeRegistry, anchor: Pos, reference: Pos) -> Result<ShapeId> {
    add_parallel(reg, anchor, reference, true)
}

fn add_parallel(reg: &mut ShapeRegistry, anchor: Pos, reference: Pos, perpendicular: bool) -> Result<ShapeId> {
    if !any_shape_contains(reg, anchor) {
        log::warn!("parallel line anchor is not on any shape");
        return Err(GeometryError::DegenerateConstruction(
            "anchor must lie on a shape".into(),
        ));
    }
    let arena = reg.points();
    let edge = reg
        .iter()
        .filter(|s| !s.kind.is_point() && !s.kind.is_text())
        .find_map(|s| {
            let idx = s.boundary_contains(arena, reference)?;
            Some([s.points[idx[0]], s.points[idx[1]]])
        })
        .ok_or(GeometryError::NoReferenceEdge)?;

    let pa = point_at(reg, anchor)?;
    if let Some(p) = reg.points_mut().get_mut(pa) {
        p.translatable = false;
    }
    let positions = parallel_points(
        reg.pos(pa),
        reg.pos(edge[0]),
        reg.pos(edge[1]),
        reg.lambda(),
        perpendicular,
    );
    let rest = alloc_all(reg, &positions[1..]);
    for &p in &rest {
        hide(reg, p);
    }
    let role = if perpendicular {
        LineRole::Perpendicular
    } else {
        LineRole::Parallel
    };
    let id = reg.insert(ShapeKind::Line { role }, std::iter::once(pa).chain(rest));
    reg.shape_mut(id)?.flags.rotatable = false;
    let aux = AuxLine {
        line: id,
        basis: AuxBasis::Parallel {
            anchor: pa,
            edge,
            perpendicular,
        },
    };
    // Moving the anchor's own shape must recompute the line too.
    register_aux(reg, &[edge[0], edge[1], pa], id, aux)?;
    finish(reg, id)
}

fn register_aux(reg: &mut ShapeRegistry, basis: &[PointId], line: ShapeId, aux: AuxLine) -> Result<()> {
    let mut owners: Vec<ShapeId> = Vec::new();
    for &p in basis {
        for owner in owners_of(reg, p, line) {
            if !owners.contains(&owner) {
                owners.push(owner);
            }
        }
    }
    for owner in owners {
        reg.shape_mut(owner)?.derived.aux_lines.push(aux);
    }
    Ok(())
}

// ─── Measure labels ──────────────────────────────────────────────────────

fn add_label(reg: &mut ShapeRegistry, content: String, font_px: f64, anchor: Pos) -> ShapeId {
    let pid = reg.alloc_point(anchor);
    let width = dg_core::hit::text_width(&content, font_px);
    reg.insert(
        ShapeKind::Text {
            content,
            font_px,
            width,
        },
        [pid],
    )
}

/// Label showing the distance between the points at `a` and `b`.
pub fn add_distance_label(reg: &mut ShapeRegistry, a: Pos, b: Pos) -> Result<ShapeId> {
    let pa = point_at(reg, a)?;
    let pb = point_at(reg, b)?;
    let (va, vb) = (reg.pos(pa), reg.pos(pb));
    let id = add_label(reg, distance_text(va, vb), DISTANCE_FONT_PX, distance_anchor(va, vb));
    for p in [pa, pb] {
        for owner in owners_of(reg, p, id) {
            reg.shape_mut(owner)?.derived.distance_labels.insert(id, [pa, pb]);
        }
    }
    finish(reg, id)
}

/// Label showing the angle `a – vertex – c` in degrees.
pub fn add_angle_label(reg: &mut ShapeRegistry, a: Pos, vertex: Pos, c: Pos) -> Result<ShapeId> {
    let pa = point_at(reg, a)?;
    let pv = point_at(reg, vertex)?;
    let pc = point_at(reg, c)?;
    let (va, vv, vc) = (reg.pos(pa), reg.pos(pv), reg.pos(pc));
    let id = add_label(reg, angle_text(va, vv, vc), ANGLE_FONT_PX, angle_anchor(vv));
    for p in [pa, pv, pc] {
        for owner in owners_of(reg, p, id) {
            reg.shape_mut(owner)?.derived.angle_labels.insert(id, [pa, pv, pc]);
        }
    }
    finish(reg, id)
}

// ─── Deletion ────────────────────────────────────────────────────────────

/// Remove a shape and rebuild the groups of everything left.
pub fn delete_shape(reg: &mut ShapeRegistry, id: ShapeId) -> Result<()> {
    reg.shape(id)?;
    for other in reg.connected(id) {
        detach(reg, other, id);
    }
    reg.remove(id);

    let remaining = reg.ids();
    for &other in &remaining {
        reg.clear_links(other);
    }
    for &other in &remaining {
        create_connected_group(reg, other)?;
    }
    reg.collect_orphan_points();
    log::debug!("deleted {id}, {} shapes remain", remaining.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn degenerate_constructions_are_rejected() {
        init();
        let mut reg = ShapeRegistry::new();
        let o = Pos::new(0.0, 0.0);
        assert!(add_segment(&mut reg, o, Pos::new(3.0, 4.0)).is_err());
        assert!(add_fixed_segment(&mut reg, o, 5.0).is_err());
        assert!(add_circle_with_radius(&mut reg, o, 1.0).is_err());
        assert!(add_polygon(&mut reg, &[o, Pos::new(50.0, 0.0)]).is_err());
        assert!(add_regular_polygon(&mut reg, o, 2, Pos::new(50.0, 0.0)).is_err());
        assert!(reg.is_empty());
        assert!(reg.points().is_empty());
    }

    #[test]
    fn point_refused_on_existing_point() {
        init();
        let mut reg = ShapeRegistry::new();
        add_segment(&mut reg, Pos::new(0.0, 0.0), Pos::new(100.0, 0.0)).unwrap();
        let err = add_point(&mut reg, Pos::new(4.0, 3.0)).unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateConstruction(_)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn endpoints_snap_and_get_letters() {
        init();
        let mut reg = ShapeRegistry::new();
        let s1 = add_segment(&mut reg, Pos::new(0.0, 0.0), Pos::new(100.0, 0.0)).unwrap();
        let s2 = add_segment(&mut reg, Pos::new(103.0, 4.0), Pos::new(100.0, 100.0)).unwrap();

        let shared = reg.shape(s1).unwrap().points[1];
        assert_eq!(reg.shape(s2).unwrap().points[0], shared);
        assert_eq!(reg.pos(shared), Pos::new(100.0, 0.0));
        // The welded-away duplicate is gone from the arena.
        assert_eq!(reg.points().len(), 3);

        let letters: Vec<_> = reg
            .points()
            .iter()
            .map(|p| p.letter.clone().unwrap_or_default())
            .collect();
        assert_eq!(letters, ["A", "B", "C"]);
    }

    #[test]
    fn triangle_variant_for_three_vertices() {
        init();
        let mut reg = ShapeRegistry::new();
        let id = add_polygon(
            &mut reg,
            &[Pos::new(0.0, 0.0), Pos::new(100.0, 0.0), Pos::new(0.0, 100.0)],
        )
        .unwrap();
        assert!(matches!(
            reg.shape(id).unwrap().kind,
            ShapeKind::Polygon {
                variant: PolygonVariant::Triangle
            }
        ));
    }

    #[test]
    fn regular_polygon_vertices_on_circumcircle() {
        init();
        let mut reg = ShapeRegistry::new();
        let center = Pos::new(200.0, 200.0);
        let id = add_regular_polygon(&mut reg, center, 6, Pos::new(300.0, 200.0)).unwrap();
        let shape = reg.shape(id).unwrap();
        assert_eq!(shape.points.len(), 6);
        for p in shape.positions(reg.points()) {
            assert!(((p - center).hypot() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn line_and_ray_hide_far_points() {
        init();
        let mut reg = ShapeRegistry::new();
        let line = add_line(&mut reg, Pos::new(0.0, 0.0), Pos::new(100.0, 0.0)).unwrap();
        let ray = add_ray(&mut reg, Pos::new(0.0, 200.0), Pos::new(100.0, 200.0)).unwrap();

        let visible = |id: ShapeId| -> Vec<bool> {
            reg.shape(id)
                .unwrap()
                .points
                .iter()
                .map(|&p| reg.points()[p].visible)
                .collect()
        };
        assert_eq!(visible(line), [true, true, false, false]);
        assert_eq!(visible(ray), [true, false, true]);
    }

    #[test]
    fn parallel_needs_a_reference_edge() {
        init();
        let mut reg = ShapeRegistry::new();
        add_point(&mut reg, Pos::new(50.0, 50.0)).unwrap();
        let err = add_parallel_line(&mut reg, Pos::new(50.0, 50.0), Pos::new(300.0, 300.0))
            .unwrap_err();
        assert_eq!(err, GeometryError::NoReferenceEdge);

        let err = add_parallel_line(&mut reg, Pos::new(400.0, 400.0), Pos::new(50.0, 50.0))
            .unwrap_err();
        assert!(matches!(err, GeometryError::DegenerateConstruction(_)));
    }

    #[test]
    fn point_on_open_circle_joins_its_boundary() {
        init();
        let mut reg = ShapeRegistry::new();
        let circle = add_circle(&mut reg, Pos::new(0.0, 0.0), Pos::new(50.0, 0.0)).unwrap();
        let point = add_point(&mut reg, Pos::new(0.0, 51.0)).unwrap();

        let pid = reg.shape(point).unwrap().points[0];
        assert_eq!(reg.shape(circle).unwrap().index_of(pid), Some(2));
        assert!(reg.points()[pid].on_boundary);
        assert!((reg.pos(pid) - Pos::new(0.0, 50.0)).hypot() < 1e-9);
    }

    #[test]
    fn delete_unknown_shape_fails() {
        init();
        let mut reg = ShapeRegistry::new();
        let ghost = ShapeId::intern("segment99");
        assert_eq!(
            delete_shape(&mut reg, ghost),
            Err(GeometryError::UnknownShape(ghost))
        );
    }

    #[test]
    fn deleting_a_shape_collects_its_points() {
        init();
        let mut reg = ShapeRegistry::new();
        let s1 = add_segment(&mut reg, Pos::new(0.0, 0.0), Pos::new(100.0, 0.0)).unwrap();
        let s2 = add_segment(&mut reg, Pos::new(100.0, 0.0), Pos::new(200.0, 0.0)).unwrap();
        assert_eq!(reg.points().len(), 3);

        delete_shape(&mut reg, s2).unwrap();
        assert_eq!(reg.points().len(), 2);
        assert_eq!(reg.ids(), vec![s1]);
    }
}
