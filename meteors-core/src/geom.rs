//! Minimal 2D primitives: positions, axis-aligned boxes, toroidal wrap.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box with its origin at the entity position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn at(origin: Vec2, width: f32, height: f32) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
        }
    }

    pub fn move_to(&mut self, origin: Vec2) {
        self.x = origin.x;
        self.y = origin.y;
    }

    /// Rectangle intersection with exclusive edges on both axes.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// Wraps one coordinate into `[0, extent)`, assuming the per-step
/// displacement never exceeds the extent.
#[inline]
pub(crate) fn wrap_axis(value: f32, extent: f32) -> f32 {
    let mut value = value;
    if value < 0.0 {
        value += extent;
    }
    if value >= extent {
        value -= extent;
    }
    value
}
