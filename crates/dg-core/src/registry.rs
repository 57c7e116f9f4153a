//! The shape registry: every shape, the point arena they share, and the
//! undirected link graph recording which shapes belong to the same group.

use indexmap::IndexMap;
use petgraph::graphmap::UnGraphMap;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{GeometryError, Result};
use crate::id::{IdGenerator, LetterAllocator, PointId, ShapeId};
use crate::math::Pos;
use crate::model::{Point, PointArena, Shape, ShapeKind};

/// Owner of all geometry in a drawing.
///
/// Iteration order is registration order; pick resolution relies on it for
/// tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: IndexMap<ShapeId, Shape>,
    points: PointArena,
    /// Group membership. A grouped shape carries a self-loop.
    links: UnGraphMap<ShapeId, ()>,
    ids: IdGenerator,
    letters: LetterAllocator,
    config: EngineConfig,
}

impl ShapeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Infinite-extension multiplier for the current canvas.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.config.canvas.lambda()
    }

    // ─── Points ──────────────────────────────────────────────────────────

    pub fn points(&self) -> &PointArena {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointArena {
        &mut self.points
    }

    pub fn alloc_point(&mut self, pos: Pos) -> PointId {
        self.points.alloc(pos)
    }

    pub fn point(&self, id: PointId) -> Result<&Point> {
        self.points.get(id).ok_or(GeometryError::UnknownPoint(id))
    }

    pub fn point_mut(&mut self, id: PointId) -> Result<&mut Point> {
        self.points.get_mut(id).ok_or(GeometryError::UnknownPoint(id))
    }

    /// Shorthand for `points().pos(id)`.
    #[must_use]
    pub fn pos(&self, id: PointId) -> Pos {
        self.points.pos(id)
    }

    // ─── Shapes ──────────────────────────────────────────────────────────

    /// Register a new shape over existing points. The id comes from the
    /// registry's own per-kind counter.
    pub fn insert(&mut self, kind: ShapeKind, points: impl IntoIterator<Item = PointId>) -> ShapeId {
        let id = self.ids.next(kind.id_prefix());
        let shape = Shape::new(id, kind, points);
        log::debug!("register {id} ({} points)", shape.points.len());
        self.shapes.insert(id, shape);
        self.links.add_node(id);
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn shape(&self, id: ShapeId) -> Result<&Shape> {
        self.shapes.get(&id).ok_or(GeometryError::UnknownShape(id))
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Result<&mut Shape> {
        self.shapes.get_mut(&id).ok_or(GeometryError::UnknownShape(id))
    }

    /// A shape together with the arena, for edit rules that mutate both.
    pub fn shape_and_points_mut(&mut self, id: ShapeId) -> Option<(&mut Shape, &mut PointArena)> {
        let shape = self.shapes.get_mut(&id)?;
        Some((shape, &mut self.points))
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.values_mut()
    }

    /// Snapshot of the ids in registration order, for loops that mutate.
    #[must_use]
    pub fn ids(&self) -> Vec<ShapeId> {
        self.shapes.keys().copied().collect()
    }

    /// Remove a shape and every link and derived slot that mentions it.
    /// Points are left in the arena; see [`collect_orphan_points`](Self::collect_orphan_points).
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let shape = self.shapes.shift_remove(&id)?;
        self.links.remove_node(id);
        for other in self.shapes.values_mut() {
            other.derived.forget(id);
        }
        log::debug!("removed {id}");
        Some(shape)
    }

    // ─── Links ───────────────────────────────────────────────────────────

    pub fn link(&mut self, a: ShapeId, b: ShapeId) {
        self.links.add_edge(a, b, ());
    }

    pub fn unlink(&mut self, a: ShapeId, b: ShapeId) {
        self.links.remove_edge(a, b);
    }

    #[must_use]
    pub fn is_linked(&self, a: ShapeId, b: ShapeId) -> bool {
        self.links.contains_edge(a, b)
    }

    /// Shapes linked to `id` (itself included when self-linked), in
    /// registration order.
    #[must_use]
    pub fn connected(&self, id: ShapeId) -> Vec<ShapeId> {
        if !self.links.contains_node(id) {
            return Vec::new();
        }
        self.shapes
            .keys()
            .copied()
            .filter(|other| self.links.contains_edge(id, *other))
            .collect()
    }

    /// Drop every link touching `id`.
    pub fn clear_links(&mut self, id: ShapeId) {
        let neighbors: Vec<ShapeId> = self.links.neighbors(id).collect();
        for n in neighbors {
            self.links.remove_edge(id, n);
        }
    }

    /// Every link as an `(a, b)` pair, self-loops included.
    pub fn links(&self) -> impl Iterator<Item = (ShapeId, ShapeId)> + '_ {
        self.links.all_edges().map(|(a, b, _)| (a, b))
    }

    // ─── Housekeeping ────────────────────────────────────────────────────

    /// Give every visible, unnamed point of `id` the next letter.
    pub fn assign_letters(&mut self, id: ShapeId) {
        let Some(shape) = self.shapes.get(&id) else {
            return;
        };
        if shape.kind.is_text() {
            return;
        }
        for &pid in &shape.points {
            if let Some(point) = self.points.get_mut(pid)
                && point.visible
                && point.letter.is_none()
            {
                point.letter = Some(self.letters.next_letter());
            }
        }
    }

    /// Drop arena points no shape or derived slot refers to.
    /// Returns how many were removed.
    pub fn collect_orphan_points(&mut self) -> usize {
        let mut live: Vec<PointId> = Vec::new();
        for shape in self.shapes.values() {
            live.extend(shape.points.iter().copied());
            live.extend(shape.derived.point_ids());
        }
        live.sort_unstable();
        live.dedup();

        let orphans: Vec<PointId> = self
            .points
            .iter()
            .map(|p| p.id)
            .filter(|id| live.binary_search(id).is_err())
            .collect();
        for id in &orphans {
            self.points.remove(*id);
        }
        if !orphans.is_empty() {
            log::debug!("collected {} orphan points", orphans.len());
        }
        orphans.len()
    }

    /// Read-only JSON dump for renderers and debugging.
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            config: &'a EngineConfig,
            shapes: Vec<&'a Shape>,
            points: Vec<&'a Point>,
            links: Vec<(ShapeId, ShapeId)>,
        }
        serde_json::to_string_pretty(&Snapshot {
            config: &self.config,
            shapes: self.shapes.values().collect(),
            points: self.points.iter().collect(),
            links: self.links().collect(),
        })
    }
}
