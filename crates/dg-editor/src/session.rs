//! Editing session: the registry plus everything a pointer gesture needs.
//!
//! The session is the host's single entry point. It turns [`InputEvent`]s
//! into construction calls or drag propagation and asks the renderer to
//! redraw after every change:
//!
//! - **Move tool**: pointer down resolves a pick over the whole registry,
//!   each move runs [`transform_shapes`], pointer up ends the gesture.
//!   Without a gesture, moves emphasize whatever is under the pointer.
//! - **Construction tools**: clicks are collected until the tool is
//!   complete, then the shape is built and grouped.
//! - **Delete tool / Delete key**: removes the shape and regroups the rest.

use dg_core::{EngineConfig, Pos, Result, ShapeId, ShapeRegistry};
use dg_engine::construct::delete_shape;
use dg_engine::{
    TransformProps, emphasize_shapes, emphasize_shapes_points, get_shape_id_by_point,
    group_transform_props, transform_shapes, un_emphasize_shapes, un_emphasize_shapes_points,
};

use crate::input::InputEvent;
use crate::tools::{Step, Tool};

/// Renderer hook, called whenever the drawing may have changed.
pub trait Redraw {
    fn redraw(&mut self, shapes: &ShapeRegistry);
}

impl<F: FnMut(&ShapeRegistry)> Redraw for F {
    fn redraw(&mut self, shapes: &ShapeRegistry) {
        self(shapes)
    }
}

/// In-flight drag.
#[derive(Debug, Clone)]
struct Gesture {
    mdown: Pos,
    props: TransformProps,
}

pub struct Session<R: Redraw> {
    registry: ShapeRegistry,
    tool: Tool,
    pending: Vec<Pos>,
    gesture: Option<Gesture>,
    selected: Option<ShapeId>,
    cursor: Option<Pos>,
    renderer: R,
}

impl<R: Redraw> Session<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_config(EngineConfig::default(), renderer)
    }

    pub fn with_config(config: EngineConfig, renderer: R) -> Self {
        Self {
            registry: ShapeRegistry::with_config(config),
            tool: Tool::default(),
            pending: Vec::new(),
            gesture: None,
            selected: None,
            cursor: None,
            renderer,
        }
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools, dropping half-finished constructions. Construction
    /// tools also drop the selection.
    pub fn set_tool(&mut self, tool: Tool) {
        log::debug!("tool {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
        self.pending.clear();
        self.gesture = None;
        if tool.constructs() && self.selected.take().is_some() {
            un_emphasize_shapes(&mut self.registry);
        }
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    /// Clicks collected so far by the active construction tool.
    pub fn pending(&self) -> &[Pos] {
        &self.pending
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// Last pointer position seen, for previewing the pending construction.
    pub fn cursor(&self) -> Option<Pos> {
        self.cursor
    }

    /// Feed one input event. Returns the shape a construction produced, if any.
    ///
    /// A rejected construction returns its error; the session stays usable
    /// and its pending clicks are dropped.
    pub fn handle(&mut self, event: &InputEvent) -> Result<Option<ShapeId>> {
        let at = event.position();
        if at.is_some() {
            self.cursor = at;
        }
        let created = match (event, at) {
            (InputEvent::Key { key }, _) => self.key(key).map(|()| None),
            (InputEvent::PointerDown { .. }, Some(p)) => self.pointer_down(p),
            (InputEvent::PointerMove { .. }, Some(p)) => {
                self.pointer_move(p);
                Ok(None)
            }
            (InputEvent::PointerUp { .. }, _) => {
                self.pointer_up();
                Ok(None)
            }
            (_, None) => Ok(None),
        };
        self.renderer.redraw(&self.registry);
        created
    }

    fn pointer_down(&mut self, p: Pos) -> Result<Option<ShapeId>> {
        match self.tool {
            Tool::Move => {
                self.selected = get_shape_id_by_point(&self.registry, p);
                let props = group_transform_props(&self.registry, p, true, &[]);
                if !props.is_empty() {
                    log::trace!("drag start over {} shapes", props.len());
                    self.gesture = Some(Gesture { mdown: p, props });
                }
                un_emphasize_shapes(&mut self.registry);
                emphasize_shapes(&mut self.registry, p, self.selected);
                Ok(None)
            }
            Tool::Delete => {
                if let Some(id) = get_shape_id_by_point(&self.registry, p) {
                    self.delete(id)?;
                }
                Ok(None)
            }
            tool => match tool.push_click(&mut self.pending, p) {
                Step::Pending => Ok(None),
                Step::Ready(clicks) => {
                    let built = tool.build(&mut self.registry, &clicks);
                    if let Err(err) = &built {
                        log::warn!("{tool:?} rejected: {err}");
                    }
                    built
                }
            },
        }
    }

    fn pointer_move(&mut self, p: Pos) {
        if let Some(gesture) = self.gesture.as_mut() {
            transform_shapes(&mut self.registry, &gesture.props, &mut gesture.mdown, p);
            return;
        }
        un_emphasize_shapes_points(&mut self.registry);
        emphasize_shapes_points(&mut self.registry, p);
    }

    fn pointer_up(&mut self) {
        self.gesture = None;
        un_emphasize_shapes(&mut self.registry);
    }

    fn key(&mut self, key: &str) -> Result<()> {
        match key {
            "Delete" | "Backspace" => {
                if let Some(id) = self.selected.take() {
                    self.delete(id)?;
                }
            }
            "Escape" => {
                self.pending.clear();
                self.gesture = None;
                self.selected = None;
                un_emphasize_shapes(&mut self.registry);
                un_emphasize_shapes_points(&mut self.registry);
            }
            _ => {}
        }
        Ok(())
    }

    fn delete(&mut self, id: ShapeId) -> Result<()> {
        delete_shape(&mut self.registry, id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }
}
