//! Host-side editing session for the dynamic geometry engine.
//!
//! Hosts feed normalized [`InputEvent`]s into a [`Session`] and render from
//! the registry it hands to their [`Redraw`] implementation.

pub mod input;
pub mod session;
pub mod tools;

pub use input::InputEvent;
pub use session::{Redraw, Session};
pub use tools::{Step, Tool};
