//! Half-plane representation used for miter joins and edge membership tests.

use crate::vector::{vec2, Vector2};

/// The set of points `p` where `dot(normal, p) + constant == 0`, with
/// `normal` unit length. Points with a positive signed distance lie on the
/// side the normal points toward.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Plane {
    pub normal: Vector2,
    pub constant: f32,
}

impl Plane {
    #[inline]
    pub fn new(normal: Vector2, constant: f32) -> Plane {
        Plane { normal, constant }
    }

    /// Plane through `a` and `b` with the normal pointing to the left of the
    /// `a -> b` direction. Coincident points produce a zero normal, never an
    /// error.
    pub fn from_points(a: Vector2, b: Vector2) -> Plane {
        let normal = (b - a).perp().normalize();
        Plane {
            normal,
            constant: -normal.dot(a),
        }
    }

    /// Plane through `point` with the given unit `normal`.
    #[inline]
    pub fn from_point_normal(point: Vector2, normal: Vector2) -> Plane {
        Plane {
            normal,
            constant: -normal.dot(point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, point: Vector2) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Parallel plane shifted by `distance` along the normal.
    #[inline]
    pub fn offset(&self, distance: f32) -> Plane {
        Plane {
            normal: self.normal,
            constant: self.constant - distance,
        }
    }

    #[inline]
    pub fn flipped(&self) -> Plane {
        Plane {
            normal: -self.normal,
            constant: -self.constant,
        }
    }

    /// The point where the two planes intersect. Parallel planes divide by a
    /// zero determinant and produce non-finite coordinates; callers
    /// constructing geometry must check [`Vector2::is_finite`] before
    /// trusting the result.
    pub fn intersection(&self, other: &Plane) -> Vector2 {
        let det = self.normal.cross(other.normal);
        vec2(
            (other.normal.y * -self.constant - self.normal.y * -other.constant) / det,
            (self.normal.x * -other.constant - other.normal.x * -self.constant) / det,
        )
    }
}
