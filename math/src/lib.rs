//! 2D math kernel for the scrawl editor core: vectors, planes, affine
//! transforms and axis-aligned bounds.
//!
//! Every operation is deterministic and side-effect free. Degenerate inputs
//! never panic: a zero-length vector normalizes to zero, a singular matrix
//! inverts to `None`, and intersecting parallel planes yields non-finite
//! coordinates that callers are expected to reject with
//! [`Vector2::is_finite`].

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

mod bounds;
mod matrix;
mod plane;
mod transform;
mod vector;

pub use crate::bounds::Bounds;
pub use crate::matrix::Matrix3;
pub use crate::plane::Plane;
pub use crate::transform::{Decomposition, Transform};
pub use crate::vector::{vec2, Vector2};

/// Tolerance used by the `approx_eq` helpers.
pub const EPSILON: f32 = 1e-5;

/// Approximate scalar equality, within [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}
