//! Axis-aligned bounds accumulation.

use crate::vector::{vec2, Vector2};

/// An axis-aligned bounding box accumulator. The empty bounds have inverted
/// infinities so that the first `add_point` establishes both corners.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub min: Vector2,
    pub max: Vector2,
}

impl Bounds {
    pub fn empty() -> Bounds {
        Bounds {
            min: vec2(f32::MAX, f32::MAX),
            max: vec2(f32::MIN, f32::MIN),
        }
    }

    pub fn from_points(min: Vector2, max: Vector2) -> Bounds {
        Bounds { min, max }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    #[inline]
    pub fn add_point(&mut self, point: Vector2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Bounds grown by `amount` on every side. Empty bounds stay empty.
    pub fn expanded(&self, amount: f32) -> Bounds {
        if self.is_empty() {
            return *self;
        }
        Bounds {
            min: self.min - vec2(amount, amount),
            max: self.max + vec2(amount, amount),
        }
    }

    #[inline]
    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::empty()
    }
}
