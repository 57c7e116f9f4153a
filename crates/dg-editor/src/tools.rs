//! Tool system for canvas interactions.
//!
//! A tool decides what a click does. Construction tools collect clicks until
//! they have enough, then hand them to the matching constructor in
//! [`dg_engine::construct`].
//!
//! | Tool | Clicks |
//! |------|--------|
//! | Point, Delete | 1 |
//! | Segment, Vector, Line, Ray, Circle, Midpoint, Parallel, Perpendicular, DistanceLabel | 2 |
//! | Bisector, AngleLabel | 3 |
//! | Polygon | until the first vertex is clicked again |
//! | RegularPolygon | 2 (center, then a vertex) |

use dg_core::math::coincident;
use dg_core::{GeometryError, Pos, Result, ShapeId, ShapeRegistry};
use dg_engine::construct;

/// The active tool determines how pointer input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag picked shapes; hover emphasizes.
    #[default]
    Move,
    Point,
    Segment,
    Vector,
    Line,
    Ray,
    Circle,
    Polygon,
    RegularPolygon { sides: usize },
    Midpoint,
    Bisector,
    Parallel,
    Perpendicular,
    DistanceLabel,
    AngleLabel,
    Delete,
}

/// Outcome of feeding one click to a tool.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Keep collecting.
    Pending,
    /// Enough clicks; build from these positions.
    Ready(Vec<Pos>),
}

impl Tool {
    /// Whether the tool builds shapes (as opposed to moving or deleting them).
    pub fn constructs(&self) -> bool {
        !matches!(self, Tool::Move | Tool::Delete)
    }

    fn clicks(&self) -> Option<usize> {
        match self {
            Tool::Move | Tool::Polygon => None,
            Tool::Point | Tool::Delete => Some(1),
            Tool::Bisector | Tool::AngleLabel => Some(3),
            _ => Some(2),
        }
    }

    /// Fewest clicks [`Tool::build`] accepts.
    fn min_clicks(&self) -> usize {
        match self {
            Tool::Polygon => 3,
            tool => tool.clicks().unwrap_or(0),
        }
    }

    /// Record `click` in `pending` and report whether the tool is complete.
    pub fn push_click(&self, pending: &mut Vec<Pos>, click: Pos) -> Step {
        if *self == Tool::Polygon {
            // Closing click on the first vertex finishes the polygon.
            if pending.len() >= 3 && coincident(pending[0], click) {
                return Step::Ready(std::mem::take(pending));
            }
            pending.push(click);
            return Step::Pending;
        }
        pending.push(click);
        match self.clicks() {
            Some(n) if pending.len() >= n => Step::Ready(std::mem::take(pending)),
            _ => Step::Pending,
        }
    }

    /// Run the constructor for this tool on a complete click list.
    ///
    /// A short click list is rejected without touching the registry.
    pub fn build(&self, reg: &mut ShapeRegistry, clicks: &[Pos]) -> Result<Option<ShapeId>> {
        let needed = self.min_clicks();
        if clicks.len() < needed {
            return Err(GeometryError::DegenerateConstruction(format!(
                "{self:?} needs {needed} clicks, got {}",
                clicks.len()
            )));
        }
        let at = |i: usize| clicks[i];
        let id = match self {
            Tool::Move | Tool::Delete => return Ok(None),
            Tool::Point => construct::add_point(reg, at(0))?,
            Tool::Segment => construct::add_segment(reg, at(0), at(1))?,
            Tool::Vector => construct::add_vector(reg, at(0), at(1))?,
            Tool::Line => construct::add_line(reg, at(0), at(1))?,
            Tool::Ray => construct::add_ray(reg, at(0), at(1))?,
            Tool::Circle => construct::add_circle(reg, at(0), at(1))?,
            Tool::Polygon => construct::add_polygon(reg, clicks)?,
            Tool::RegularPolygon { sides } => {
                construct::add_regular_polygon(reg, at(0), *sides, at(1))?
            }
            Tool::Midpoint => construct::add_midpoint(reg, at(0), at(1))?,
            Tool::Bisector => construct::add_angle_bisector(reg, at(0), at(1), at(2))?,
            Tool::Parallel => construct::add_parallel_line(reg, at(0), at(1))?,
            Tool::Perpendicular => construct::add_perpendicular_line(reg, at(0), at(1))?,
            Tool::DistanceLabel => construct::add_distance_label(reg, at(0), at(1))?,
            Tool::AngleLabel => construct::add_angle_label(reg, at(0), at(1), at(2))?,
        };
        Ok(Some(id))
    }
}
