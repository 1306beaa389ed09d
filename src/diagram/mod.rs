mod editor;
mod events;
mod render;
mod types;

pub use editor::{DiagramEditor, Outcome};
pub use events::{CanvasEvent, parse_event_line, parse_event_script, replay};
pub use render::render_canvas;
pub use types::{
    CANVAS, CANVAS_HEIGHT, CANVAS_WIDTH, CART, DEFAULT_PORTS, GRID_SPACING, Mode, PORT_HIT_RADIUS,
    PlacedPoint, Point, Port, Rect,
};
