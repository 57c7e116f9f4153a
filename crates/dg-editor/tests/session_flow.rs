//! Integration tests: input events → session → engine → redraw.
//!
//! Drives a `Session` the way a canvas host would and checks the resulting
//! registry and renderer callbacks.

use approx::assert_relative_eq;
use dg_core::{Pos, ShapeKind, ShapeRegistry};
use dg_editor::{InputEvent, Redraw, Session, Tool};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct Recorder {
    frames: usize,
    shapes: usize,
}

impl Redraw for Recorder {
    fn redraw(&mut self, shapes: &ShapeRegistry) {
        self.frames += 1;
        self.shapes = shapes.len();
    }
}

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn click(session: &mut Session<Recorder>, x: f64, y: f64) -> Option<dg_core::ShapeId> {
    let created = session.handle(&InputEvent::pointer_down(x, y)).unwrap();
    session.handle(&InputEvent::pointer_up(x, y)).unwrap();
    created
}

fn drag(session: &mut Session<Recorder>, from: (f64, f64), to: (f64, f64)) {
    session.handle(&InputEvent::pointer_down(from.0, from.1)).unwrap();
    session.handle(&InputEvent::pointer_move(to.0, to.1)).unwrap();
    session.handle(&InputEvent::pointer_up(to.0, to.1)).unwrap();
}

// ─── Construction ────────────────────────────────────────────────────────

#[test]
fn segment_tool_builds_and_welds() {
    init();
    let mut session = Session::new(Recorder::default());
    session.set_tool(Tool::Segment);

    assert_eq!(click(&mut session, 0.0, 0.0), None);
    let s1 = click(&mut session, 100.0, 0.0).unwrap();
    click(&mut session, 100.0, 0.0);
    let s2 = click(&mut session, 200.0, 0.0).unwrap();

    let reg = session.registry();
    assert!(reg.is_linked(s1, s2));
    assert_eq!(reg.shape(s1).unwrap().points[1], reg.shape(s2).unwrap().points[0]);
    assert_eq!(session.renderer().shapes, 2);
    assert_eq!(session.renderer().frames, 8);
}

#[test]
fn rejected_construction_keeps_session_usable() {
    init();
    let mut session = Session::new(Recorder::default());
    session.set_tool(Tool::Segment);

    session.handle(&InputEvent::pointer_down(0.0, 0.0)).unwrap();
    assert!(session.handle(&InputEvent::pointer_down(3.0, 4.0)).is_err());
    assert!(session.pending().is_empty());
    assert!(session.registry().is_empty());
    // The failed click still produced a frame.
    assert_eq!(session.renderer().frames, 2);

    click(&mut session, 0.0, 0.0);
    assert!(click(&mut session, 50.0, 0.0).is_some());
}

// ─── Dragging ────────────────────────────────────────────────────────────

#[test]
fn move_tool_drags_welded_vertex() {
    init();
    let mut session = Session::new(Recorder::default());
    session.set_tool(Tool::Segment);
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 0.0), (200.0, 0.0)] {
        click(&mut session, x, y);
    }

    session.set_tool(Tool::Move);
    session.handle(&InputEvent::pointer_down(100.0, 0.0)).unwrap();
    assert!(session.is_dragging());
    session.handle(&InputEvent::pointer_move(75.0, 25.0)).unwrap();
    session.handle(&InputEvent::pointer_move(50.0, 50.0)).unwrap();
    session.handle(&InputEvent::pointer_up(50.0, 50.0)).unwrap();
    assert!(!session.is_dragging());

    let reg = session.registry();
    for shape in reg.iter() {
        assert!(
            shape.positions(reg.points()).any(|p| p == Pos::new(50.0, 50.0)),
            "{} lost the shared vertex",
            shape.id
        );
    }
}

#[test]
fn dragging_circle_rim_changes_radius() {
    init();
    let mut session = Session::new(Recorder::default());
    session.set_tool(Tool::Circle);
    click(&mut session, 300.0, 300.0);
    let circle = click(&mut session, 350.0, 300.0).unwrap();

    session.set_tool(Tool::Move);
    drag(&mut session, (350.0, 300.0), (300.0, 400.0));

    match session.registry().shape(circle).unwrap().kind {
        ShapeKind::Circle { radius, .. } => assert_relative_eq!(radius, 100.0, epsilon = 1e-9),
        ref other => panic!("expected a circle, got {other:?}"),
    }
}

#[test]
fn pressing_empty_canvas_starts_no_drag() {
    init();
    let mut session = Session::new(Recorder::default());
    session.handle(&InputEvent::pointer_down(10.0, 10.0)).unwrap();
    assert!(!session.is_dragging());
    assert_eq!(session.selected(), None);
}

// ─── Deletion ────────────────────────────────────────────────────────────

#[test]
fn delete_key_removes_selection() {
    init();
    let mut session = Session::new(Recorder::default());
    session.set_tool(Tool::Segment);
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 0.0), (200.0, 0.0)] {
        click(&mut session, x, y);
    }

    session.set_tool(Tool::Move);
    click(&mut session, 50.0, 0.0);
    let selected = session.selected().unwrap();

    session.handle(&InputEvent::key("Delete")).unwrap();
    let reg = session.registry();
    assert!(!reg.contains(selected));
    assert_eq!(reg.len(), 1);
    assert_eq!(session.selected(), None);
    assert_eq!(session.renderer().shapes, 1);
}

#[test]
fn delete_tool_removes_clicked_shape() {
    init();
    let mut session = Session::new(Recorder::default());
    session.set_tool(Tool::Point);
    click(&mut session, 40.0, 40.0);
    assert_eq!(session.registry().len(), 1);

    session.set_tool(Tool::Delete);
    click(&mut session, 42.0, 41.0);
    assert!(session.registry().is_empty());
    assert!(session.registry().points().is_empty());
}
