pub mod config;
pub mod edit;
pub mod error;
pub mod hit;
pub mod id;
pub mod math;
pub mod metrics;
pub mod model;
pub mod registry;

pub use config::{Canvas, EngineConfig};
pub use edit::Drag;
pub use error::{GeometryError, Result};
pub use hit::HitTest;
pub use id::{PointId, ShapeId};
pub use math::Pos;
pub use model::*;
pub use registry::ShapeRegistry;

// Re-export kurbo so downstream crates share one vector type.
pub use kurbo::Vec2;
