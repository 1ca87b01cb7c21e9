//! 3x3 matrix type
use std::ops::{Index, IndexMut, Mul};

use super::Vector3D;

/// A 3x3 square matrix type, stored in row-major order.
///
/// `Matrix3` implements multiplication with vectors and other matrices:
///
/// ```
/// # use fcclusters::{Matrix3, Vector3D};
/// let unit = Matrix3::one();
/// let m = Matrix3::new([
///     [1.0, 2.0, 0.0],
///     [0.0, 1.0, 0.0],
///     [0.0, 0.0, 3.0],
/// ]);
///
/// assert_eq!(m * unit, m);
/// assert_eq!(m * Vector3D::new(1.0, 1.0, 1.0), Vector3D::new(3.0, 1.0, 3.0));
/// assert_eq!(m.determinant(), 3.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3([[f64; 3]; 3]);

impl Matrix3 {
    /// Create a new `Matrix3` from the given rows
    pub fn new(rows: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(rows)
    }

    /// Create a new `Matrix3` with all components set to 0
    pub fn zero() -> Matrix3 {
        Matrix3([[0.0; 3]; 3])
    }

    /// Create the identity matrix
    pub fn one() -> Matrix3 {
        Matrix3([
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Get the transpose of this matrix
    #[must_use]
    pub fn transposed(&self) -> Matrix3 {
        let m = &self.0;
        Matrix3([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Compute the determinant of this matrix
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2]) -
        m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
        m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Compute the inverse of this matrix. The matrix must not be singular,
    /// callers are expected to check the determinant first.
    #[must_use]
    pub fn inverse(&self) -> Matrix3 {
        let determinant = self.determinant();
        debug_assert!(determinant != 0.0, "this matrix is not invertible");

        let m = &self.0;
        let factor = 1.0 / determinant;
        Matrix3([
            [
                (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * factor,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * factor,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * factor,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * factor,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * factor,
                (m[1][0] * m[0][2] - m[0][0] * m[1][2]) * factor,
            ],
            [
                (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * factor,
                (m[2][0] * m[0][1] - m[0][0] * m[2][1]) * factor,
                (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * factor,
            ],
        ])
    }
}

impl From<[[f64; 3]; 3]> for Matrix3 {
    fn from(rows: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(rows)
    }
}

impl Index<usize> for Matrix3 {
    type Output = [f64; 3];
    #[inline]
    fn index(&self, index: usize) -> &[f64; 3] {
        &self.0[index]
    }
}

impl IndexMut<usize> for Matrix3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut [f64; 3] {
        &mut self.0[index]
    }
}

impl_arithmetic!(
    Matrix3, Vector3D, Mul, mul, Vector3D,
    self, other,
    {
        let x = self[0][0] * other[0] + self[0][1] * other[1] + self[0][2] * other[2];
        let y = self[1][0] * other[0] + self[1][1] * other[1] + self[1][2] * other[2];
        let z = self[2][0] * other[0] + self[2][1] * other[1] + self[2][2] * other[2];
        Vector3D::new(x, y, z)
    }
);

impl_arithmetic!(
    Matrix3, Matrix3, Mul, mul, Matrix3,
    self, other,
    {
        let mut result = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                result[i][j] = self[i][0] * other[0][j] + self[i][1] * other[1][j] + self[i][2] * other[2][j];
            }
        }
        result
    }
);

lsh_scal_arithmetic!(
    Matrix3, Mul, mul, Matrix3,
    self, other,
    {
        let mut result = Matrix3::from(self.0);
        for row in &mut result.0 {
            for value in row {
                *value *= other;
            }
        }
        result
    }
);

impl approx::AbsDiffEq for Matrix3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Matrix3, epsilon: f64) -> bool {
        self.0.iter().flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| f64::abs_diff_eq(a, b, epsilon))
    }
}

impl approx::RelativeEq for Matrix3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Matrix3, epsilon: f64, max_relative: f64) -> bool {
        self.0.iter().flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| f64::relative_eq(a, b, epsilon, max_relative))
    }
}
