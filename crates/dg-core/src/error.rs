use thiserror::Error;

use crate::id::{PointId, ShapeId};

/// Errors raised by registry lookups and construction tools.
///
/// Edit-flag refusals are not errors: a locked shape silently ignores edits.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("unknown shape: {0}")]
    UnknownShape(ShapeId),

    #[error("unknown point: {0}")]
    UnknownPoint(PointId),

    #[error("degenerate construction: {0}")]
    DegenerateConstruction(String),

    #[error("no reference edge under the cursor")]
    NoReferenceEdge,
}

pub type Result<T> = std::result::Result<T, GeometryError>;
