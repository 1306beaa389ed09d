use serde::{Deserialize, Serialize};

pub const CANVAS_WIDTH: f32 = 600.0;
pub const CANVAS_HEIGHT: f32 = 400.0;
pub const GRID_SPACING: f32 = 20.0;

/// Fixed cart boundary. Points may only be placed inside it.
pub const CART: Rect = Rect {
    x: 220.0,
    y: 140.0,
    width: 160.0,
    height: 120.0,
};

/// Ports in their initial positions, restored on every reset.
pub const DEFAULT_PORTS: [Port; 3] = [
    Port {
        label: "P1",
        position: Point { x: 120.0, y: 80.0 },
    },
    Port {
        label: "P2",
        position: Point { x: 300.0, y: 60.0 },
    },
    Port {
        label: "P3",
        position: Point { x: 480.0, y: 80.0 },
    },
];

/// Distance from a port's anchor within which a drag grabs it
pub const PORT_HIT_RADIUS: f32 = 16.0;

/// A position in canvas pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Edges count as inside.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(self.x, self.right()),
            y: point.y.clamp(self.y, self.bottom()),
        }
    }
}

/// Whole drawing surface.
pub const CANVAS: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: CANVAS_WIDTH,
    height: CANVAS_HEIGHT,
};

/// Editor interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    MovePorts,
    PlacePoints,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::MovePorts => Mode::PlacePoints,
            Mode::PlacePoints => Mode::MovePorts,
        }
    }
}

/// A draggable instrument port marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Port {
    pub label: &'static str,
    pub position: Point,
}

/// A numbered point placed inside the cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPoint {
    pub number: u8,
    pub position: Point,
}
