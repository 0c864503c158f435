//! Column-major homogeneous 2D affine matrices.

use crate::vector::{vec2, Vector2};

/// A 3x3 affine matrix stored column-major: element `(row, col)` lives at
/// `[col * 3 + row]`. The bottom row is always `(0, 0, 1)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Matrix3(pub [f32; 9]);

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3([
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ]);

    pub fn from_translation(translation: Vector2) -> Matrix3 {
        Matrix3([
            1.0,
            0.0,
            0.0,
            0.0,
            1.0,
            0.0,
            translation.x,
            translation.y,
            1.0,
        ])
    }

    pub fn from_rotation(radians: f32) -> Matrix3 {
        let (sin, cos) = radians.sin_cos();
        Matrix3([cos, sin, 0.0, -sin, cos, 0.0, 0.0, 0.0, 1.0])
    }

    pub fn from_scale(scale: Vector2) -> Matrix3 {
        Matrix3([scale.x, 0.0, 0.0, 0.0, scale.y, 0.0, 0.0, 0.0, 1.0])
    }

    /// Matrix product `self * other`: applying the result applies `other`
    /// first, then `self`.
    pub fn mul(&self, other: &Matrix3) -> Matrix3 {
        let a = &self.0;
        let b = &other.0;
        let mut out = [0.0; 9];
        for col in 0..3 {
            for row in 0..3 {
                out[col * 3 + row] = a[row] * b[col * 3]
                    + a[3 + row] * b[col * 3 + 1]
                    + a[6 + row] * b[col * 3 + 2];
            }
        }
        Matrix3(out)
    }

    #[inline]
    pub fn transform_point(&self, p: Vector2) -> Vector2 {
        let m = &self.0;
        vec2(
            m[0] * p.x + m[3] * p.y + m[6],
            m[1] * p.x + m[4] * p.y + m[7],
        )
    }

    /// Applies only the linear part, ignoring translation.
    #[inline]
    pub fn transform_vector(&self, v: Vector2) -> Vector2 {
        let m = &self.0;
        vec2(m[0] * v.x + m[3] * v.y, m[1] * v.x + m[4] * v.y)
    }

    /// Determinant of the linear part.
    #[inline]
    pub fn determinant(&self) -> f32 {
        let m = &self.0;
        m[0] * m[4] - m[1] * m[3]
    }

    /// Inverse of the affine matrix, or `None` when singular.
    pub fn invert(&self) -> Option<Matrix3> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let m = &self.0;
        let inv_det = 1.0 / det;
        let a = m[4] * inv_det;
        let b = -m[1] * inv_det;
        let c = -m[3] * inv_det;
        let d = m[0] * inv_det;
        let tx = -(a * m[6] + c * m[7]);
        let ty = -(b * m[6] + d * m[7]);
        Some(Matrix3([a, b, 0.0, c, d, 0.0, tx, ty, 1.0]))
    }

    #[inline]
    pub fn translation(&self) -> Vector2 {
        vec2(self.0[6], self.0[7])
    }

    pub fn approx_eq(&self, other: &Matrix3, tolerance: f32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Default for Matrix3 {
    fn default() -> Matrix3 {
        Matrix3::IDENTITY
    }
}
