//! Affine transforms with an explicit authoritative representation.
//!
//! A transform is stored either as translation/rotation/scale fields or as a
//! matrix; the other form is derived lazily and memoized. Exactly one
//! representation is authoritative at all times, so there is never any
//! ambiguity about which fields to trust.

use std::cell::OnceCell;

use crate::matrix::Matrix3;
use crate::vector::{vec2, Vector2};

/// Translation / rotation / scale fields of a transform.
#[derive(Copy, Clone, Debug)]
pub struct Decomposition {
    pub translation: Vector2,
    /// Radians, counterclockwise.
    pub rotation: f32,
    pub scale: Vector2,
}

impl Decomposition {
    pub const IDENTITY: Decomposition = Decomposition {
        translation: Vector2::ZERO,
        rotation: 0.0,
        scale: Vector2 { x: 1.0, y: 1.0 },
    };

    fn to_matrix(&self) -> Matrix3 {
        Matrix3::from_translation(self.translation)
            .mul(&Matrix3::from_rotation(self.rotation))
            .mul(&Matrix3::from_scale(self.scale))
    }
}

#[derive(Clone, Debug)]
enum Repr {
    Decomposed(Decomposition),
    Matrix(Matrix3),
}

/// A 2D affine transform, composed as translation * rotation * scale when
/// built from fields.
#[derive(Clone, Debug)]
pub struct Transform {
    repr: Repr,
    cached_matrix: OnceCell<Matrix3>,
    cached_decomposition: OnceCell<Decomposition>,
}

impl Transform {
    pub fn identity() -> Transform {
        Transform::from_decomposition(Decomposition::IDENTITY)
    }

    pub fn from_decomposition(decomposition: Decomposition) -> Transform {
        Transform {
            repr: Repr::Decomposed(decomposition),
            cached_matrix: OnceCell::new(),
            cached_decomposition: OnceCell::new(),
        }
    }

    pub fn new(translation: Vector2, rotation: f32, scale: Vector2) -> Transform {
        Transform::from_decomposition(Decomposition {
            translation,
            rotation,
            scale,
        })
    }

    pub fn from_translation(translation: Vector2) -> Transform {
        Transform::new(translation, 0.0, vec2(1.0, 1.0))
    }

    pub fn from_rotation(rotation: f32) -> Transform {
        Transform::new(Vector2::ZERO, rotation, vec2(1.0, 1.0))
    }

    pub fn from_scale(scale: Vector2) -> Transform {
        Transform::new(Vector2::ZERO, 0.0, scale)
    }

    pub fn from_matrix(matrix: Matrix3) -> Transform {
        Transform {
            repr: Repr::Matrix(matrix),
            cached_matrix: OnceCell::new(),
            cached_decomposition: OnceCell::new(),
        }
    }

    /// The matrix form, derived and memoized when the transform was built
    /// from fields.
    pub fn matrix(&self) -> Matrix3 {
        match &self.repr {
            Repr::Matrix(m) => *m,
            Repr::Decomposed(d) => *self.cached_matrix.get_or_init(|| d.to_matrix()),
        }
    }

    /// The field form, derived and memoized when the transform was built
    /// from a matrix. Decomposition assumes no skew (the only matrices this
    /// crate produces); rotation and scale can be read in any order.
    pub fn decomposition(&self) -> Decomposition {
        match &self.repr {
            Repr::Decomposed(d) => *d,
            Repr::Matrix(m) => *self
                .cached_decomposition
                .get_or_init(|| decompose_matrix(m)),
        }
    }

    #[inline]
    pub fn translation(&self) -> Vector2 {
        self.decomposition().translation
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.decomposition().rotation
    }

    #[inline]
    pub fn scale(&self) -> Vector2 {
        self.decomposition().scale
    }

    /// Composition applying `first`, then `second` (matrix convention
    /// `M2 * M1`).
    pub fn compose(second: &Transform, first: &Transform) -> Transform {
        Transform::from_matrix(second.matrix().mul(&first.matrix()))
    }

    /// The inverse transform, or `None` when singular (e.g. a zero scale).
    pub fn inverse(&self) -> Option<Transform> {
        self.matrix().invert().map(Transform::from_matrix)
    }

    #[inline]
    pub fn transform_point(&self, point: Vector2) -> Vector2 {
        self.matrix().transform_point(point)
    }

    #[inline]
    pub fn transform_vector(&self, vector: Vector2) -> Vector2 {
        self.matrix().transform_vector(vector)
    }

    pub fn approx_eq(&self, other: &Transform, tolerance: f32) -> bool {
        self.matrix().approx_eq(&other.matrix(), tolerance)
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::identity()
    }
}

fn decompose_matrix(m: &Matrix3) -> Decomposition {
    let col_x = vec2(m.0[0], m.0[1]);
    let sx = col_x.length();
    let rotation = m.0[1].atan2(m.0[0]);
    // Signed y scale, so mirrored transforms decompose consistently.
    let sy = if sx == 0.0 { 0.0 } else { m.determinant() / sx };
    Decomposition {
        translation: m.translation(),
        rotation,
        scale: vec2(sx, sy),
    }
}
