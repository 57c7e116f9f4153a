//! Geometry engine: welding, pick resolution and edit propagation over a
//! [`ShapeRegistry`](dg_core::ShapeRegistry).

pub mod construct;
pub mod derived;
pub mod emphasis;
pub mod labels;
pub mod pick;
pub mod propagate;
pub mod weld;

pub use emphasis::{
    emphasize_shapes, emphasize_shapes_points, un_emphasize_shapes, un_emphasize_shapes_points,
};
pub use labels::update_measure_texts;
pub use pick::{
    TransformProps, any_shape_contains, get_connected_group_by_point, get_shape_id_by_point,
    group_transform_props, inside_any_shape, on_any_point_of_any_shape, stick_point_to_found,
};
pub use propagate::{
    advanced_transform, transform_connected_shapes, transform_shapes, update_mid_points,
};
pub use weld::{attach, create_connected_group, detach, find_connected_group};
