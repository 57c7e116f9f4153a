//! Hover feedback: outline widths of shapes and points near the pointer.

use dg_core::{HitTest, Pos, ShapeId, ShapeKind, ShapeRegistry};

const SHAPE_WIDTH: f64 = 1.0;
const SHAPE_HOVER_WIDTH: f64 = 2.0;
const POINT_WIDTH: f64 = 2.0;
const POINT_HOVER_WIDTH: f64 = 4.0;

/// Widen the outline of shapes under `p` and of points near `p`.
///
/// Labels and the `selected` shape keep their widths. A hovered point takes
/// precedence over its shape's body.
pub fn emphasize_shapes(reg: &mut ShapeRegistry, p: Pos, selected: Option<ShapeId>) {
    for id in reg.ids() {
        if Some(id) == selected {
            continue;
        }
        let Some((shape, arena)) = reg.shape_and_points_mut(id) else {
            continue;
        };
        match shape.kind {
            ShapeKind::Text { .. } => continue,
            ShapeKind::Point => {}
            _ => {
                shape.boundary_width = if shape.contains(arena, p) {
                    SHAPE_HOVER_WIDTH
                } else {
                    SHAPE_WIDTH
                };
            }
        }
        let is_point = shape.kind.is_point();
        for &pid in &shape.points {
            let Some(point) = arena.get_mut(pid) else {
                continue;
            };
            if point.contains(p) {
                point.boundary_width = POINT_HOVER_WIDTH;
                if !is_point {
                    shape.boundary_width = SHAPE_WIDTH;
                }
            } else {
                point.boundary_width = POINT_WIDTH;
            }
        }
        if is_point && let Some(&pid) = shape.points.first() {
            shape.boundary_width = arena[pid].boundary_width;
        }
    }
}

/// Reset every shape outline to its resting width.
pub fn un_emphasize_shapes(reg: &mut ShapeRegistry) {
    for shape in reg.iter_mut() {
        match shape.kind {
            ShapeKind::Text { .. } => {}
            ShapeKind::Point => shape.boundary_width = POINT_WIDTH,
            _ => shape.boundary_width = SHAPE_WIDTH,
        }
    }
}

/// Widen only the points near `p`.
pub fn emphasize_shapes_points(reg: &mut ShapeRegistry, p: Pos) {
    set_point_widths(reg, |point| {
        if point.contains(p) {
            POINT_HOVER_WIDTH
        } else {
            POINT_WIDTH
        }
    });
}

/// Reset every point to its resting width.
pub fn un_emphasize_shapes_points(reg: &mut ShapeRegistry) {
    set_point_widths(reg, |_| POINT_WIDTH);
    for shape in reg.iter_mut() {
        if shape.kind.is_point() {
            shape.boundary_width = POINT_WIDTH;
        }
    }
}

fn set_point_widths(reg: &mut ShapeRegistry, width: impl Fn(&dg_core::Point) -> f64) {
    for id in reg.ids() {
        let Some((shape, arena)) = reg.shape_and_points_mut(id) else {
            continue;
        };
        if shape.kind.is_text() {
            continue;
        }
        for &pid in &shape.points {
            if let Some(point) = arena.get_mut(pid) {
                point.boundary_width = width(point);
            }
        }
    }
}
