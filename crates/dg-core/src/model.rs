//! Shape model: the point arena, shape kinds, edit flags and derived slots.
//!
//! Shapes never own coordinates directly. Every defining point lives in the
//! [`PointArena`] and shapes hold [`PointId`]s into it, so two shapes that
//! share a vertex see each other's edits without any copying.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Index;

use crate::id::{PointId, ShapeId};
use crate::math::Pos;

// ─── Points ──────────────────────────────────────────────────────────────

/// A defining point of one or more shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub pos: Pos,
    /// Rendered radius in pixels.
    pub radius: f64,
    /// Outline width; raised while hovered.
    pub boundary_width: f64,
    pub visible: bool,
    /// Pinned to another shape's boundary: line edits re-extend around it
    /// instead of moving it.
    pub on_boundary: bool,
    /// Owned by a midpoint construction.
    pub mid_point: bool,
    pub translatable: bool,
    pub rotatable: bool,
    pub transformable: bool,
    /// Designation shown next to the point (`A`, `B`, … `A1`).
    pub letter: Option<String>,
}

impl Point {
    fn new(id: PointId, pos: Pos) -> Self {
        Self {
            id,
            pos,
            radius: 2.0,
            boundary_width: 2.0,
            visible: true,
            on_boundary: false,
            mid_point: false,
            translatable: true,
            rotatable: true,
            transformable: true,
            letter: None,
        }
    }

    /// Whether `p` is within pick radius of this point.
    #[must_use]
    pub fn contains(&self, p: Pos) -> bool {
        crate::math::coincident(self.pos, p)
    }
}

/// Storage for every point in a registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointArena {
    points: IndexMap<PointId, Point>,
    next: u32,
}

impl PointArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh point at `pos`.
    pub fn alloc(&mut self, pos: Pos) -> PointId {
        let id = PointId(self.next);
        self.next += 1;
        self.points.insert(id, Point::new(id, pos));
        id
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(&id)
    }

    pub fn get_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points.get_mut(&id)
    }

    /// Position of a point. Panics on a dangling id, like slice indexing.
    #[must_use]
    pub fn pos(&self, id: PointId) -> Pos {
        self[id].pos
    }

    /// Move a point. Unknown ids are ignored.
    pub fn set(&mut self, id: PointId, pos: Pos) {
        if let Some(point) = self.points.get_mut(&id) {
            point.pos = pos;
        }
    }

    pub fn remove(&mut self, id: PointId) -> Option<Point> {
        self.points.shift_remove(&id)
    }

    pub fn contains_id(&self, id: PointId) -> bool {
        self.points.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.values()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Index<PointId> for PointArena {
    type Output = Point;

    fn index(&self, id: PointId) -> &Point {
        &self.points[&id]
    }
}

// ─── Edit flags ──────────────────────────────────────────────────────────

/// Per-shape permissions consulted by the edit rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditFlags {
    /// Master switch: when false every edit rule is a no-op.
    pub transformable: bool,
    pub translatable: bool,
    pub rotatable: bool,
    /// Circle radius and regular-polygon size may change.
    pub scalable: bool,
    /// The shape handles vertex edits itself (fixed-length segments ignore them).
    pub custom_transformable: bool,
}

impl Default for EditFlags {
    fn default() -> Self {
        Self {
            transformable: true,
            translatable: true,
            rotatable: true,
            scalable: true,
            custom_transformable: false,
        }
    }
}

// ─── Kinds ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    #[default]
    Free,
    Bisector,
    Parallel,
    Perpendicular,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonVariant {
    #[default]
    Free,
    Triangle,
    /// Regular n-gon laid out on a circle of `radius` about `center`.
    Regular { n: usize, center: Pos, radius: f64 },
}

/// Closed set of shape kinds. Point layout per kind:
///
/// | kind | points |
/// |------|--------|
/// | `Point` | `[self]` |
/// | `Line` | `[p1, p2, far1, far2]` |
/// | `Ray` | `[origin, far, through]` |
/// | `Segment`, `Vector` | `[a, b]` |
/// | `Polygon` | vertices in order |
/// | `Circle` | `[center, rim, boundary…]` |
/// | `Text` | `[anchor]` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    Point,
    Line { role: LineRole },
    Ray,
    Segment { fixed_length: Option<f64> },
    Vector { head_length: f64 },
    Polygon { variant: PolygonVariant },
    Circle { radius: f64, filled: bool, show_radius: bool },
    Text { content: String, font_px: f64, width: f64 },
}

impl ShapeKind {
    /// Prefix used by the registry when allocating ids.
    #[must_use]
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ShapeKind::Point => "point",
            ShapeKind::Line { .. } => "line",
            ShapeKind::Ray => "ray",
            ShapeKind::Segment { .. } => "segment",
            ShapeKind::Vector { .. } => "vector",
            ShapeKind::Polygon {
                variant: PolygonVariant::Triangle,
            } => "triangle",
            ShapeKind::Polygon {
                variant: PolygonVariant::Regular { .. },
            } => "regularpolygon",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Circle { .. } => "circle",
            ShapeKind::Text { .. } => "text",
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, ShapeKind::Text { .. })
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self, ShapeKind::Point)
    }
}

// ─── Derived slots ───────────────────────────────────────────────────────

/// Basis of an auxiliary line, recomputed from current geometry on every edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuxBasis {
    /// Bisects the angle `a – b – c` at `b`.
    Bisector { basis: [PointId; 3] },
    /// Through `anchor`, parallel (or perpendicular) to `edge`.
    Parallel {
        anchor: PointId,
        edge: [PointId; 2],
        perpendicular: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuxLine {
    pub line: ShapeId,
    pub basis: AuxBasis,
}

/// Constructions that depend on a shape's points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    /// Midpoint shape → `[a, b, m]`.
    pub midpoints: IndexMap<ShapeId, [PointId; 3]>,
    pub aux_lines: Vec<AuxLine>,
    /// Label shape → measured endpoints.
    pub distance_labels: IndexMap<ShapeId, [PointId; 2]>,
    /// Label shape → `[a, vertex, c]`.
    pub angle_labels: IndexMap<ShapeId, [PointId; 3]>,
}

impl Derived {
    /// Drop every slot that refers to `id`, either as owner or as basis line.
    pub fn forget(&mut self, id: ShapeId) {
        self.midpoints.shift_remove(&id);
        self.aux_lines.retain(|aux| aux.line != id);
        self.distance_labels.shift_remove(&id);
        self.angle_labels.shift_remove(&id);
    }

    /// Every point id the slots reference.
    pub fn point_ids(&self) -> impl Iterator<Item = PointId> + '_ {
        let mids = self.midpoints.values().flat_map(|m| m.iter().copied());
        let aux = self.aux_lines.iter().flat_map(|aux| {
            let ids: SmallVec<[PointId; 3]> = match aux.basis {
                AuxBasis::Bisector { basis } => SmallVec::from_slice(&basis),
                AuxBasis::Parallel { anchor, edge, .. } => {
                    SmallVec::from_slice(&[anchor, edge[0], edge[1]])
                }
            };
            ids.into_iter()
        });
        let dist = self.distance_labels.values().flat_map(|d| d.iter().copied());
        let ang = self.angle_labels.values().flat_map(|a| a.iter().copied());
        mids.chain(aux).chain(dist).chain(ang)
    }
}

// ─── Shape ───────────────────────────────────────────────────────────────

/// A registered shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub points: SmallVec<[PointId; 4]>,
    pub flags: EditFlags,
    pub opacity: f64,
    pub boundary_width: f64,
    pub derived: Derived,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind, points: impl IntoIterator<Item = PointId>) -> Self {
        let boundary_width = if kind.is_point() { 2.0 } else { 1.0 };
        Self {
            id,
            kind,
            points: points.into_iter().collect(),
            flags: EditFlags::default(),
            opacity: 1.0,
            boundary_width,
            derived: Derived::default(),
        }
    }

    /// Index of `point` within this shape's defining points.
    #[must_use]
    pub fn index_of(&self, point: PointId) -> Option<usize> {
        self.points.iter().position(|p| *p == point)
    }

    #[must_use]
    pub fn owns(&self, point: PointId) -> bool {
        self.points.contains(&point)
    }

    /// Positions of the defining points, in order.
    pub fn positions<'a>(&'a self, arena: &'a PointArena) -> impl Iterator<Item = Pos> + 'a {
        self.points.iter().map(|id| arena.pos(*id))
    }
}

/// What a pick decided to do with a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum EditIntent {
    /// Move the defining point at `index`, optionally about a pivot.
    Vertex { index: usize, pivot: Option<Pos> },
    /// Move the whole shape by the pointer delta.
    Translate,
    /// Grabbed but without a geometric edit (text labels).
    Hold,
}

impl EditIntent {
    #[must_use]
    pub fn vertex(index: usize) -> Self {
        EditIntent::Vertex { index, pivot: None }
    }
}
