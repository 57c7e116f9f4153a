//! Per-kind edit rules.
//!
//! An edit rule turns an [`EditIntent`] plus the pointer positions into
//! point moves in the arena. Rules never look at other shapes: propagation
//! to dependents is the engine's job.

use kurbo::Vec2;
use std::f64::consts::TAU;

use crate::id::PointId;
use crate::math::{Pos, extend_through};
use crate::model::{EditIntent, PointArena, PolygonVariant, Shape, ShapeKind};

/// Pointer state handed to an edit rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Position at the previous step of the gesture.
    pub mdown: Pos,
    /// Current pointer position.
    pub mmove: Pos,
    /// Infinite-extension multiplier.
    pub lambda: f64,
}

impl Drag {
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.mmove - self.mdown
    }
}

impl Shape {
    /// Apply `intent` to this shape's points.
    ///
    /// Silently does nothing when the shape's flags forbid the edit.
    pub fn apply_edit(&mut self, arena: &mut PointArena, intent: &EditIntent, drag: Drag) {
        if self.kind.is_text() {
            // Labels only follow the pointer.
            if self.flags.translatable
                && let Some(&anchor) = self.points.first()
            {
                arena.set(anchor, drag.mmove);
            }
            return;
        }
        if !self.flags.transformable {
            return;
        }
        log::trace!("edit {} {:?}", self.id, intent);

        match (&mut self.kind, *intent) {
            (ShapeKind::Point, EditIntent::Translate | EditIntent::Vertex { .. }) => {
                let id = self.points[0];
                if self.flags.translatable && arena[id].translatable {
                    arena.set(id, drag.mmove);
                }
            }
            (ShapeKind::Line { .. }, EditIntent::Vertex { index, pivot }) if index < 2 => {
                if self.flags.rotatable {
                    edit_line_vertex(&self.points, arena, index, pivot, drag);
                }
            }
            (ShapeKind::Ray, EditIntent::Vertex { index, pivot }) if index == 0 || index == 2 => {
                edit_ray_vertex(&self.points, arena, index, pivot, drag);
            }
            (ShapeKind::Segment { .. } | ShapeKind::Vector { .. }, EditIntent::Vertex { index, .. }) => {
                if !self.flags.custom_transformable {
                    move_vertex(&self.points, arena, index, drag.mmove);
                }
            }
            (
                ShapeKind::Polygon {
                    variant: PolygonVariant::Regular { n, center, radius },
                },
                EditIntent::Vertex { .. },
            ) => {
                if self.flags.scalable {
                    *radius = (*center - drag.mmove).hypot();
                    layout_regular(&self.points, arena, *n, *center, *radius);
                }
            }
            (ShapeKind::Polygon { .. }, EditIntent::Vertex { index, .. }) => {
                move_vertex(&self.points, arena, index, drag.mmove);
            }
            (ShapeKind::Circle { radius, .. }, EditIntent::Vertex { index, .. }) => {
                let (center, rim) = (self.points[0], self.points[1]);
                if self.flags.scalable {
                    match index {
                        0 if !arena[center].mid_point => arena.set(center, drag.mmove),
                        1 if !arena[rim].mid_point => arena.set(rim, drag.mmove),
                        _ => {}
                    }
                    // Radius follows the current ends, midpoint ends included.
                    *radius = (arena.pos(rim) - arena.pos(center)).hypot();
                } else {
                    // Radius is locked: the rim is pulled back onto it.
                    let c = arena.pos(center);
                    let out = arena.pos(rim) - c;
                    if out.hypot() > 0.0 {
                        arena.set(rim, c + out.normalize() * *radius);
                    }
                }
                let r = *radius;
                project_boundary(&self.points, arena, r);
            }
            (kind, EditIntent::Translate) => {
                if !self.flags.translatable {
                    return;
                }
                let allowed = match &*kind {
                    ShapeKind::Polygon { .. } => self.opacity > 0.0,
                    ShapeKind::Circle { filled, .. } => *filled && self.opacity > 0.0,
                    _ => true,
                };
                if !allowed {
                    return;
                }
                let delta = drag.delta();
                for &id in &self.points {
                    arena.set(id, arena.pos(id) + delta);
                }
                if let ShapeKind::Polygon {
                    variant: PolygonVariant::Regular { center, .. },
                } = kind
                {
                    *center += delta;
                }
            }
            _ => {}
        }
    }
}

/// Move a single vertex. Midpoints are positioned by their basis only.
fn move_vertex(points: &[PointId], arena: &mut PointArena, index: usize, to: Pos) {
    if let Some(&id) = points.get(index)
        && !arena[id].mid_point
    {
        arena.set(id, to);
    }
}

fn edit_line_vertex(
    points: &[PointId],
    arena: &mut PointArena,
    index: usize,
    pivot: Option<Pos>,
    drag: Drag,
) {
    let moving = points[index];
    let other = points[1 - index];
    let (far_a, far_b) = (points[2], points[3]);
    let lambda = drag.lambda;

    if arena[moving].on_boundary || arena[moving].mid_point {
        let (p0, p1) = (arena.pos(points[0]), arena.pos(points[1]));
        let (a, b) = extend_through(p0, p1, lambda);
        arena.set(far_a, a);
        arena.set(far_b, b);
        return;
    }
    let m = drag.mmove;
    let pivot = pivot.unwrap_or_else(|| arena.pos(other));
    arena.set(moving, m);
    let d = m - pivot;
    // Keep far_a on the p1 side of the line.
    let (a, b) = if index == 0 {
        (m - d * lambda, m + d * lambda)
    } else {
        (m + d * lambda, m - d * lambda)
    };
    arena.set(far_a, a);
    arena.set(far_b, b);
}

fn edit_ray_vertex(
    points: &[PointId],
    arena: &mut PointArena,
    index: usize,
    pivot: Option<Pos>,
    drag: Drag,
) {
    let (origin, far, through) = (points[0], points[1], points[2]);
    let lambda = drag.lambda;
    let moving = points[index];
    let locked = arena[moving].on_boundary || arena[moving].mid_point;

    if index == 0 {
        let pivot = pivot.unwrap_or_else(|| arena.pos(through));
        let o = if locked {
            arena.pos(origin)
        } else {
            arena.set(origin, drag.mmove);
            drag.mmove
        };
        arena.set(far, o - (o - pivot) * lambda);
    } else if locked {
        let (o, t) = (arena.pos(origin), arena.pos(through));
        arena.set(far, t + (t - o) * lambda);
    } else {
        let pivot = pivot.unwrap_or_else(|| arena.pos(origin));
        let m = drag.mmove;
        arena.set(through, m);
        arena.set(far, m + (m - pivot) * lambda);
    }
}

/// Place `n` vertices evenly on the circle of `radius` about `center`.
pub fn layout_regular(
    points: &[PointId],
    arena: &mut PointArena,
    n: usize,
    center: Pos,
    radius: f64,
) {
    let alpha = TAU / n as f64;
    for (i, &id) in points.iter().take(n).enumerate() {
        let (sin, cos) = (i as f64 * alpha).sin_cos();
        arena.set(id, center + Vec2::new(cos, sin) * radius);
    }
}

/// Re-project circle boundary points (index ≥ 2) onto the circle, keeping
/// their angles.
pub fn project_boundary(points: &[PointId], arena: &mut PointArena, radius: f64) {
    let center = arena.pos(points[0]);
    for &id in points.iter().skip(2) {
        let v = arena.pos(id) - center;
        let alpha = v.y.atan2(v.x);
        let (sin, cos) = alpha.sin_cos();
        arena.set(id, center + Vec2::new(cos, sin) * radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ShapeId;
    use crate::model::LineRole;
    use approx::assert_relative_eq;

    fn build(arena: &mut PointArena, kind: ShapeKind, pts: &[(f64, f64)]) -> Shape {
        let ids: Vec<_> = pts
            .iter()
            .map(|&(x, y)| arena.alloc(Pos::new(x, y)))
            .collect();
        Shape::new(ShapeId::intern("edit_test_shape"), kind, ids)
    }

    fn drag(from: (f64, f64), to: (f64, f64)) -> Drag {
        Drag {
            mdown: Pos::new(from.0, from.1),
            mmove: Pos::new(to.0, to.1),
            lambda: 1400.0,
        }
    }

    #[test]
    fn segment_vertex_follows_pointer() {
        let mut arena = PointArena::new();
        let mut seg = build(
            &mut arena,
            ShapeKind::Segment { fixed_length: None },
            &[(0.0, 0.0), (10.0, 0.0)],
        );
        seg.apply_edit(&mut arena, &EditIntent::vertex(1), drag((10.0, 0.0), (20.0, 5.0)));
        assert_eq!(arena.pos(seg.points[1]), Pos::new(20.0, 5.0));
    }

    #[test]
    fn fixed_length_segment_ignores_vertex_edits() {
        let mut arena = PointArena::new();
        let mut seg = build(
            &mut arena,
            ShapeKind::Segment {
                fixed_length: Some(10.0),
            },
            &[(0.0, 0.0), (10.0, 0.0)],
        );
        seg.flags.custom_transformable = true;
        seg.apply_edit(&mut arena, &EditIntent::vertex(1), drag((10.0, 0.0), (20.0, 5.0)));
        assert_eq!(arena.pos(seg.points[1]), Pos::new(10.0, 0.0));

        seg.apply_edit(&mut arena, &EditIntent::Translate, drag((5.0, 0.0), (5.0, 5.0)));
        assert_eq!(arena.pos(seg.points[0]), Pos::new(0.0, 5.0));
    }

    #[test]
    fn non_transformable_shape_is_frozen() {
        let mut arena = PointArena::new();
        let mut seg = build(
            &mut arena,
            ShapeKind::Segment { fixed_length: None },
            &[(0.0, 0.0), (10.0, 0.0)],
        );
        seg.flags.transformable = false;
        seg.apply_edit(&mut arena, &EditIntent::Translate, drag((5.0, 0.0), (50.0, 50.0)));
        seg.apply_edit(&mut arena, &EditIntent::vertex(0), drag((0.0, 0.0), (50.0, 50.0)));
        assert_eq!(arena.pos(seg.points[0]), Pos::new(0.0, 0.0));
        assert_eq!(arena.pos(seg.points[1]), Pos::new(10.0, 0.0));
    }

    #[test]
    fn line_vertex_reextends_far_points() {
        let mut arena = PointArena::new();
        let mut line = build(
            &mut arena,
            ShapeKind::Line {
                role: LineRole::Free,
            },
            &[(0.0, 0.0), (10.0, 0.0), (-1.0, 0.0), (1.0, 0.0)],
        );
        let intent = EditIntent::Vertex {
            index: 1,
            pivot: Some(Pos::new(0.0, 0.0)),
        };
        line.apply_edit(&mut arena, &intent, drag((10.0, 0.0), (0.0, 10.0)));
        assert_eq!(arena.pos(line.points[1]), Pos::new(0.0, 10.0));
        let far_a = arena.pos(line.points[2]);
        let far_b = arena.pos(line.points[3]);
        assert_relative_eq!(far_a.x, 0.0);
        assert_relative_eq!(far_a.y, 14010.0);
        assert_relative_eq!(far_b.y, -13990.0);
    }

    #[test]
    fn line_without_rotation_ignores_vertex_grab() {
        let mut arena = PointArena::new();
        let mut line = build(
            &mut arena,
            ShapeKind::Line {
                role: LineRole::Parallel,
            },
            &[(0.0, 0.0), (10.0, 0.0), (-1.0, 0.0), (1.0, 0.0)],
        );
        line.flags.rotatable = false;
        line.apply_edit(&mut arena, &EditIntent::vertex(1), drag((10.0, 0.0), (0.0, 10.0)));
        assert_eq!(arena.pos(line.points[1]), Pos::new(10.0, 0.0));
    }

    #[test]
    fn ray_through_point_drags_far_point() {
        let mut arena = PointArena::new();
        let mut ray = build(
            &mut arena,
            ShapeKind::Ray,
            &[(0.0, 0.0), (1400.0, 0.0), (1.0, 0.0)],
        );
        let intent = EditIntent::Vertex {
            index: 2,
            pivot: Some(Pos::new(0.0, 0.0)),
        };
        ray.apply_edit(&mut arena, &intent, drag((1.0, 0.0), (0.0, 1.0)));
        assert_eq!(arena.pos(ray.points[2]), Pos::new(0.0, 1.0));
        assert_relative_eq!(arena.pos(ray.points[1]).y, 1401.0);
    }

    #[test]
    fn circle_rim_sets_radius_and_projects_boundary() {
        let mut arena = PointArena::new();
        let mut circle = build(
            &mut arena,
            ShapeKind::Circle {
                radius: 10.0,
                filled: false,
                show_radius: false,
            },
            &[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)],
        );
        circle.apply_edit(&mut arena, &EditIntent::vertex(1), drag((10.0, 0.0), (20.0, 0.0)));
        let ShapeKind::Circle { radius, .. } = circle.kind else {
            unreachable!()
        };
        assert_relative_eq!(radius, 20.0);
        let boundary = arena.pos(circle.points[2]);
        assert_relative_eq!(boundary.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(boundary.y, 20.0);
    }

    #[test]
    fn unfilled_circle_does_not_translate() {
        let mut arena = PointArena::new();
        let mut circle = build(
            &mut arena,
            ShapeKind::Circle {
                radius: 10.0,
                filled: false,
                show_radius: false,
            },
            &[(0.0, 0.0), (10.0, 0.0)],
        );
        circle.apply_edit(&mut arena, &EditIntent::Translate, drag((0.0, 0.0), (5.0, 5.0)));
        assert_eq!(arena.pos(circle.points[0]), Pos::new(0.0, 0.0));
    }

    #[test]
    fn regular_polygon_relays_every_vertex() {
        let mut arena = PointArena::new();
        let center = Pos::new(0.0, 0.0);
        let mut square = build(
            &mut arena,
            ShapeKind::Polygon {
                variant: PolygonVariant::Regular {
                    n: 4,
                    center,
                    radius: 10.0,
                },
            },
            &[(10.0, 0.0), (0.0, 10.0), (-10.0, 0.0), (0.0, -10.0)],
        );
        square.apply_edit(&mut arena, &EditIntent::vertex(0), drag((10.0, 0.0), (0.0, 20.0)));
        let p2 = arena.pos(square.points[2]);
        assert_relative_eq!(p2.x, -20.0);
        assert_relative_eq!(p2.y, 0.0, epsilon = 1e-9);

        square.apply_edit(&mut arena, &EditIntent::Translate, drag((0.0, 0.0), (1.0, 1.0)));
        let ShapeKind::Polygon {
            variant: PolygonVariant::Regular { center, .. },
        } = square.kind
        else {
            unreachable!()
        };
        assert_eq!(center, Pos::new(1.0, 1.0));
    }

    #[test]
    fn point_respects_point_level_lock() {
        let mut arena = PointArena::new();
        let mut point = build(&mut arena, ShapeKind::Point, &[(0.0, 0.0)]);
        point.apply_edit(&mut arena, &EditIntent::Translate, drag((0.0, 0.0), (3.0, 4.0)));
        assert_eq!(arena.pos(point.points[0]), Pos::new(3.0, 4.0));

        if let Some(p) = arena.get_mut(point.points[0]) {
            p.translatable = false;
        }
        point.apply_edit(&mut arena, &EditIntent::Translate, drag((3.0, 4.0), (9.0, 9.0)));
        assert_eq!(arena.pos(point.points[0]), Pos::new(3.0, 4.0));
    }

    #[test]
    fn circle_radius_tracks_moved_midpoint_center() {
        let mut arena = PointArena::new();
        let mut circle = build(
            &mut arena,
            ShapeKind::Circle {
                radius: 80.0,
                filled: false,
                show_radius: false,
            },
            &[(50.0, 0.0), (50.0, 80.0)],
        );
        let center = circle.points[0];
        if let Some(p) = arena.get_mut(center) {
            p.mid_point = true;
        }
        arena.set(center, Pos::new(50.0, 50.0));
        circle.apply_edit(&mut arena, &EditIntent::vertex(0), drag((50.0, 50.0), (50.0, 50.0)));
        let ShapeKind::Circle { radius, .. } = circle.kind else {
            unreachable!()
        };
        assert_relative_eq!(radius, 30.0);
        assert_eq!(arena.pos(center), Pos::new(50.0, 50.0));
    }

    #[test]
    fn unscalable_circle_keeps_its_radius() {
        let mut arena = PointArena::new();
        let mut circle = build(
            &mut arena,
            ShapeKind::Circle {
                radius: 10.0,
                filled: false,
                show_radius: false,
            },
            &[(0.0, 0.0), (10.0, 0.0), (0.0, 10.0)],
        );
        circle.flags.scalable = false;
        circle.apply_edit(&mut arena, &EditIntent::vertex(1), drag((10.0, 0.0), (25.0, 0.0)));
        circle.apply_edit(&mut arena, &EditIntent::vertex(0), drag((0.0, 0.0), (-5.0, 0.0)));
        let ShapeKind::Circle { radius, .. } = circle.kind else {
            unreachable!()
        };
        assert_relative_eq!(radius, 10.0);
        assert_eq!(arena.pos(circle.points[0]), Pos::new(0.0, 0.0));
        assert_eq!(arena.pos(circle.points[1]), Pos::new(10.0, 0.0));
        assert_relative_eq!(arena.pos(circle.points[2]).y, 10.0);
    }

    #[test]
    fn unscalable_regular_polygon_keeps_its_layout() {
        let mut arena = PointArena::new();
        let mut square = build(
            &mut arena,
            ShapeKind::Polygon {
                variant: PolygonVariant::Regular {
                    n: 4,
                    center: Pos::new(0.0, 0.0),
                    radius: 10.0,
                },
            },
            &[(10.0, 0.0), (0.0, 10.0), (-10.0, 0.0), (0.0, -10.0)],
        );
        square.flags.scalable = false;
        square.apply_edit(&mut arena, &EditIntent::vertex(0), drag((10.0, 0.0), (0.0, 20.0)));
        assert_eq!(arena.pos(square.points[0]), Pos::new(10.0, 0.0));
        assert_eq!(arena.pos(square.points[2]), Pos::new(-10.0, 0.0));
        let ShapeKind::Polygon {
            variant: PolygonVariant::Regular { radius, .. },
        } = square.kind
        else {
            unreachable!()
        };
        assert_relative_eq!(radius, 10.0);
    }

    #[test]
    fn untranslatable_polygon_ignores_body_drag() {
        let mut arena = PointArena::new();
        let mut triangle = build(
            &mut arena,
            ShapeKind::Polygon {
                variant: PolygonVariant::Free,
            },
            &[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0)],
        );
        triangle.flags.translatable = false;
        triangle.apply_edit(&mut arena, &EditIntent::Translate, drag((20.0, 20.0), (70.0, 45.0)));
        assert_eq!(arena.pos(triangle.points[0]), Pos::new(0.0, 0.0));
        assert_eq!(arena.pos(triangle.points[1]), Pos::new(100.0, 0.0));
        assert_eq!(arena.pos(triangle.points[2]), Pos::new(0.0, 100.0));

        triangle.flags.translatable = true;
        triangle.apply_edit(&mut arena, &EditIntent::Translate, drag((20.0, 20.0), (70.0, 45.0)));
        assert_eq!(arena.pos(triangle.points[0]), Pos::new(50.0, 25.0));
    }
}
