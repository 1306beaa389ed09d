//! Cart/port diagram editor.
//!
//! The editor is a plain value owned by the caller. Each canvas event is
//! applied through [`DiagramEditor::handle`], which reports what happened;
//! nothing here can fail.

use super::events::CanvasEvent;
use super::types::{CANVAS, CART, DEFAULT_PORTS, Mode, PORT_HIT_RADIUS, PlacedPoint, Point, Port};

const MAX_POINT_NUMBER: u8 = 3;

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Placed(PlacedPoint),
    /// Click outside the cart; nothing was drawn.
    Rejected(Point),
    Moved { port: &'static str, to: Point },
    ModeChanged(Mode),
    Reset { generation: u32 },
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEditor {
    mode: Mode,
    point_counter: u8,
    canvas_generation: u32,
    ports: [Port; 3],
    points: Vec<PlacedPoint>,
}

impl Default for DiagramEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramEditor {
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            point_counter: 1,
            canvas_generation: 0,
            ports: DEFAULT_PORTS,
            points: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number the next accepted point will carry.
    pub fn point_counter(&self) -> u8 {
        self.point_counter
    }

    /// Bumped by every reset; a new generation means a fresh canvas.
    pub fn canvas_generation(&self) -> u32 {
        self.canvas_generation
    }

    pub fn ports(&self) -> &[Port; 3] {
        &self.ports
    }

    pub fn points(&self) -> &[PlacedPoint] {
        &self.points
    }

    pub fn handle(&mut self, event: &CanvasEvent) -> Outcome {
        let outcome = match *event {
            CanvasEvent::Click { x, y } => self.click(Point::new(x, y)),
            CanvasEvent::Drag { from, to } => self.drag(from, to),
            CanvasEvent::SetMode { mode } => self.set_mode(mode),
            CanvasEvent::ToggleMode => self.set_mode(self.mode.toggled()),
            CanvasEvent::Reset => self.reset(),
        };
        crate::log::debug!(?event, ?outcome, "canvas event");
        outcome
    }

    /// Switching modes keeps every port position and placed point.
    pub fn set_mode(&mut self, mode: Mode) -> Outcome {
        self.mode = mode;
        Outcome::ModeChanged(mode)
    }

    /// Places the next numbered point if `at` lies inside the cart.
    pub fn click(&mut self, at: Point) -> Outcome {
        if self.mode != Mode::PlacePoints || !at.is_finite() {
            return Outcome::Ignored;
        }
        if !CART.contains(&at) {
            return Outcome::Rejected(at);
        }

        let point = PlacedPoint {
            number: self.point_counter,
            position: at,
        };
        self.points.push(point);
        self.point_counter = self.point_counter % MAX_POINT_NUMBER + 1;
        Outcome::Placed(point)
    }

    /// Moves the port grabbed at `from` to `to`, kept on the canvas. The cart
    /// itself cannot be grabbed.
    pub fn drag(&mut self, from: Point, to: Point) -> Outcome {
        if self.mode != Mode::MovePorts || !from.is_finite() || !to.is_finite() {
            return Outcome::Ignored;
        }

        let grabbed = self
            .ports
            .iter_mut()
            .map(|port| (port.position.distance_to(&from), port))
            .filter(|(distance, _)| *distance <= PORT_HIT_RADIUS)
            .min_by(|(a, _), (b, _)| a.total_cmp(b));

        match grabbed {
            Some((_, port)) => {
                port.position = CANVAS.clamp(to);
                Outcome::Moved {
                    port: port.label,
                    to: port.position,
                }
            }
            None => Outcome::Ignored,
        }
    }

    /// Back to the initial canvas: default ports, no points, counter at 1.
    /// The current mode is kept.
    pub fn reset(&mut self) -> Outcome {
        self.point_counter = 1;
        self.canvas_generation = self.canvas_generation.wrapping_add(1);
        self.ports = DEFAULT_PORTS;
        self.points.clear();
        Outcome::Reset {
            generation: self.canvas_generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn placing() -> DiagramEditor {
        let mut editor = DiagramEditor::new();
        editor.set_mode(Mode::PlacePoints);
        editor
    }

    fn numbers(editor: &DiagramEditor) -> Vec<u8> {
        editor.points().iter().map(|p| p.number).collect()
    }

    #[test]
    fn counter_cycles_through_three() {
        let mut editor = placing();
        for i in 0..4 {
            let outcome = editor.click(Point::new(230.0 + 10.0 * i as f32, 200.0));
            assert!(matches!(outcome, Outcome::Placed(_)), "{outcome:?}");
        }
        assert_eq!(numbers(&editor), [1, 2, 3, 1]);
        assert_eq!(editor.point_counter(), 2);
    }

    #[test]
    fn clicks_outside_the_cart_are_rejected() {
        let mut editor = placing();
        let outside = Point::new(10.0, 10.0);
        assert_eq!(editor.click(outside), Outcome::Rejected(outside));
        assert!(editor.points().is_empty());
        assert_eq!(editor.point_counter(), 1);

        editor.click(Point::new(300.0, 200.0));
        assert_eq!(numbers(&editor), [1]);
    }

    #[test]
    fn clicks_on_cart_edges_are_accepted() {
        let mut editor = placing();
        assert!(matches!(editor.click(Point::new(220.0, 140.0)), Outcome::Placed(_)));
        assert!(matches!(editor.click(Point::new(380.0, 260.0)), Outcome::Placed(_)));
    }

    #[test]
    fn clicks_while_moving_ports_do_nothing() {
        let mut editor = DiagramEditor::new();
        assert_eq!(editor.click(Point::new(300.0, 200.0)), Outcome::Ignored);
        assert!(editor.points().is_empty());
    }

    #[test]
    fn non_finite_click_is_ignored() {
        let mut editor = placing();
        assert_eq!(editor.click(Point::new(f32::NAN, 200.0)), Outcome::Ignored);
        assert_eq!(editor.point_counter(), 1);
    }

    #[test]
    fn drag_moves_the_grabbed_port_only() {
        let mut editor = DiagramEditor::new();
        let outcome = editor.drag(Point::new(125.0, 85.0), Point::new(100.0, 300.0));
        assert_eq!(
            outcome,
            Outcome::Moved {
                port: "P1",
                to: Point::new(100.0, 300.0)
            }
        );
        assert_eq!(editor.ports()[0].position, Point::new(100.0, 300.0));
        assert_eq!(editor.ports()[1], DEFAULT_PORTS[1]);
    }

    #[test]
    fn drag_clamps_to_canvas() {
        let mut editor = DiagramEditor::new();
        editor.drag(Point::new(480.0, 80.0), Point::new(700.0, -20.0));
        assert_eq!(editor.ports()[2].position, Point::new(600.0, 0.0));
    }

    #[test]
    fn cart_cannot_be_dragged() {
        let mut editor = DiagramEditor::new();
        assert_eq!(
            editor.drag(Point::new(300.0, 200.0), Point::new(50.0, 50.0)),
            Outcome::Ignored
        );
        assert_eq!(editor.ports(), &DEFAULT_PORTS);
    }

    #[test]
    fn drag_while_placing_points_is_ignored() {
        let mut editor = placing();
        assert_eq!(
            editor.drag(Point::new(120.0, 80.0), Point::new(10.0, 10.0)),
            Outcome::Ignored
        );
    }

    #[test]
    fn mode_switch_keeps_annotations() {
        let mut editor = placing();
        editor.click(Point::new(300.0, 200.0));
        editor.handle(&CanvasEvent::ToggleMode);
        assert_eq!(editor.mode(), Mode::MovePorts);
        editor.drag(Point::new(300.0, 60.0), Point::new(300.0, 100.0));
        editor.handle(&CanvasEvent::ToggleMode);
        assert_eq!(numbers(&editor), [1]);
        assert_eq!(editor.ports()[1].position, Point::new(300.0, 100.0));
    }

    #[test]
    fn reset_restores_initial_canvas() {
        let mut editor = placing();
        editor.click(Point::new(300.0, 200.0));
        editor.click(Point::new(310.0, 200.0));
        editor.set_mode(Mode::MovePorts);
        editor.drag(Point::new(120.0, 80.0), Point::new(40.0, 40.0));
        editor.set_mode(Mode::PlacePoints);

        assert_eq!(editor.reset(), Outcome::Reset { generation: 1 });
        assert_eq!(editor.point_counter(), 1);
        assert_eq!(editor.canvas_generation(), 1);
        assert!(editor.points().is_empty());
        assert_eq!(editor.ports(), &DEFAULT_PORTS);
        assert_eq!(editor.mode(), Mode::PlacePoints);

        editor.reset();
        assert_eq!(editor.canvas_generation(), 2);
    }

    #[test]
    fn reset_wraps_generation_instead_of_overflowing() {
        let mut editor = DiagramEditor {
            canvas_generation: u32::MAX,
            ..DiagramEditor::new()
        };
        assert_eq!(editor.reset(), Outcome::Reset { generation: 0 });
        assert_eq!(editor.point_counter(), 1);
    }

    proptest! {
        #[test]
        fn accepted_points_are_numbered_cyclically(
            clicks in prop::collection::vec((0.0f32..600.0, 0.0f32..400.0), 0..30)
        ) {
            let mut editor = placing();
            for (x, y) in clicks {
                editor.click(Point::new(x, y));
            }
            for (i, point) in editor.points().iter().enumerate() {
                prop_assert_eq!(point.number as usize, i % 3 + 1);
                prop_assert!(CART.contains(&point.position));
            }
            prop_assert_eq!(editor.point_counter() as usize, editor.points().len() % 3 + 1);
        }
    }
}
