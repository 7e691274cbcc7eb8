use crate::tunables::Tunables;

pub const FULL_TURN: f64 = 360.0;
/// Past this many slots the ring grows instead of packing items tighter.
pub const SPACING_THRESHOLD: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn distance_from_origin(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Clockwise from 12 o'clock, screen coordinates (y grows downward).
    pub fn angle(&self) -> f64 {
        normalize_degrees(self.x.atan2(-self.y).to_degrees())
    }
}

pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negatives up to a full turn
    if d >= FULL_TURN { 0.0 } else { d }
}

pub fn angular_distance(a: f64, b: f64) -> f64 {
    let delta = (a - b).abs().rem_euclid(FULL_TURN);
    delta.min(FULL_TURN - delta)
}

/// Offset from the anchor of a point `radius` away at `angle` degrees.
pub fn polar_offset(angle: f64, radius: f64) -> Point {
    let rad = angle.to_radians();
    Point::new(radius * rad.sin(), -radius * rad.cos())
}

pub fn ring_radius(n: usize, base_radius: f64) -> f64 {
    if n <= SPACING_THRESHOLD {
        base_radius
    } else {
        base_radius * n as f64 / SPACING_THRESHOLD as f64
    }
}

/// Axis-aligned box relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn centered(half_extent: f64) -> Self {
        Self {
            x: -half_extent,
            y: -half_extent,
            width: half_extent * 2.0,
            height: half_extent * 2.0,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    pub n: usize,
    pub radius: f64,
    /// Angular distance between neighbouring slots, degrees. Zero when empty.
    pub step: f64,
    pub outer_limit: f64,
    pub bounds: Bounds,
}

impl RingLayout {
    pub fn new(n: usize, tunables: &Tunables) -> Self {
        let radius = ring_radius(n, tunables.base_radius);
        let step = if n == 0 { 0.0 } else { FULL_TURN / n as f64 };
        let outer_limit = radius + tunables.item_size + tunables.margin;

        Self {
            n,
            radius,
            step,
            outer_limit,
            bounds: Bounds::centered(outer_limit),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn slot_angle(&self, index: usize) -> f64 {
        index as f64 * self.step
    }

    pub fn slot_offset(&self, index: usize) -> Point {
        polar_offset(self.slot_angle(index), self.radius)
    }

    pub fn positions(&self) -> Vec<Point> {
        (0..self.n).map(|i| self.slot_offset(i)).collect()
    }

    /// Inverse of `slot_angle`: 2.5 means halfway between slots 2 and 3.
    pub fn fractional_slot(&self, angle: f64) -> Option<f64> {
        (!self.is_empty()).then(|| normalize_degrees(angle) / self.step)
    }

    pub fn nearest_slot(&self, angle: f64) -> Option<usize> {
        self.fractional_slot(angle)
            .map(|f| (f.round() as usize) % self.n)
    }
}
