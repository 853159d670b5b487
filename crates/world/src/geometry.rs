//! Planar geometry helpers shared by the entity models.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Rectangle of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Centre point.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict point containment.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px > self.x && px < self.x + self.width && py > self.y && py < self.y + self.height
    }

    /// Strict overlap test.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Anything with a world position and a drawable footprint.
pub trait Spatial {
    /// Centre position.
    fn position(&self) -> (f32, f32);

    /// Footprint used for drawing and coarse collision.
    fn bounds(&self) -> Rect;

    /// Distance from the centre to a point.
    fn distance_to(&self, x: f32, y: f32) -> f32 {
        let (px, py) = self.position();
        distance(px, py, x, y)
    }
}

/// Euclidean distance.
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_contains_its_center() {
        let r = Rect::centered(10.0, -5.0, 30.0, 30.0);
        assert_eq!(r.center(), (10.0, -5.0));
        assert!(r.contains(10.0, -5.0));
        assert!(!r.contains(25.0, -5.0));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::centered(0.0, 0.0, 10.0, 10.0);
        let b = Rect::centered(10.0, 0.0, 10.0, 10.0);
        let c = Rect::centered(9.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
    }
}
