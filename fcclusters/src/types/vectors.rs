//! 3-dimensional vector type
use std::ops::{Add, Sub, Neg, Mul, Div, BitXor, Index, IndexMut};
use std::ops::{AddAssign, SubAssign, MulAssign, DivAssign};

/// A 3-dimensional vector type
///
/// A `Vector3D` implements all the arithmetic operations:
///
/// ```
/// # use fcclusters::Vector3D;
/// let u = Vector3D::new(1.0, 2.0, 3.0);
/// let v = Vector3D::new(4.0, -2.0, 1.0);
///
/// // Indexing
/// assert_eq!(u[0], 1.0);
/// assert_eq!(u[1], 2.0);
/// assert_eq!(u[2], 3.0);
///
/// // Addition
/// let w = u + v;
/// assert_eq!(w, Vector3D::new(5.0, 0.0, 4.0));
///
/// // Subtraction
/// let w = u - v;
/// assert_eq!(w, Vector3D::new(-3.0, 4.0, 2.0));
///
/// // Dot product
/// assert_eq!(u * v, 3.0);
///
/// // Cross product
/// let w = u ^ v;
/// assert_eq!(w, Vector3D::new(8.0, 11.0, -10.0));
///
/// // Multiplication and division by a scalar
/// assert_eq!(2.0 * u, Vector3D::new(2.0, 4.0, 6.0));
/// assert_eq!(u / 2.0, Vector3D::new(0.5, 1.0, 1.5));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[repr(transparent)]
pub struct Vector3D([f64; 3]);

impl Vector3D {
    /// Create a new `Vector3D` with components `x`, `y`, `z`
    pub fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D([x, y, z])
    }

    /// Create a new `Vector3D` with all components set to 0
    pub fn zero() -> Vector3D {
        Vector3D([0.0; 3])
    }

    /// Return the squared euclidean norm of a `Vector3D`
    #[inline]
    pub fn norm2(&self) -> f64 {
        self * self
    }

    /// Return the euclidean norm of a `Vector3D`
    #[inline]
    pub fn norm(&self) -> f64 {
        f64::sqrt(self.norm2())
    }

    /// Normalize a `Vector3D`
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Vector3D {
        self / self.norm()
    }

    /// Euclidean distance between the point at `self` and the point at `other`
    #[inline]
    pub fn distance(&self, other: Vector3D) -> f64 {
        (other - self).norm()
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(array: [f64; 3]) -> Vector3D {
        Vector3D(array)
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(vector: Vector3D) -> [f64; 3] {
        vector.0
    }
}

impl_arithmetic!(
    Vector3D, Vector3D, Add, add, Vector3D,
    self, other,
    Vector3D::new(self[0] + other[0], self[1] + other[1], self[2] + other[2])
);

impl_inplace_arithmetic!(
    Vector3D, Vector3D, AddAssign, add_assign,
    self, other,
    {
        self[0] += other[0];
        self[1] += other[1];
        self[2] += other[2];
    }
);

impl_arithmetic!(
    Vector3D, Vector3D, Sub, sub, Vector3D,
    self, other,
    Vector3D::new(self[0] - other[0], self[1] - other[1], self[2] - other[2])
);

impl_inplace_arithmetic!(
    Vector3D, Vector3D, SubAssign, sub_assign,
    self, other,
    {
        self[0] -= other[0];
        self[1] -= other[1];
        self[2] -= other[2];
    }
);

// Dot product
impl_arithmetic!(
    Vector3D, Vector3D, Mul, mul, f64,
    self, other,
    self[0] * other[0] + self[1] * other[1] + self[2] * other[2]
);

// Cross product
impl_arithmetic!(
    Vector3D, Vector3D, BitXor, bitxor, Vector3D,
    self, other,
    {
        let x = self[1] * other[2] - self[2] * other[1];
        let y = self[2] * other[0] - self[0] * other[2];
        let z = self[0] * other[1] - self[1] * other[0];
        Vector3D::new(x, y, z)
    }
);

lsh_scal_arithmetic!(
    Vector3D, Mul, mul, Vector3D,
    self, other,
    Vector3D::new(self[0] * other, self[1] * other, self[2] * other)
);

rhs_scal_arithmetic!(
    Vector3D, Mul, mul, Vector3D,
    self, other,
    Vector3D::new(self * other[0], self * other[1], self * other[2])
);

impl MulAssign<f64> for Vector3D {
    #[inline]
    fn mul_assign(&mut self, other: f64) {
        self[0] *= other;
        self[1] *= other;
        self[2] *= other;
    }
}

lsh_scal_arithmetic!(
    Vector3D, Div, div, Vector3D,
    self, other,
    Vector3D::new(self[0] / other, self[1] / other, self[2] / other)
);

impl DivAssign<f64> for Vector3D {
    #[inline]
    fn div_assign(&mut self, other: f64) {
        self[0] /= other;
        self[1] /= other;
        self[2] /= other;
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;
    #[inline]
    fn neg(self) -> Vector3D {
        Vector3D::new(-self[0], -self[1], -self[2])
    }
}

impl Index<usize> for Vector3D {
    type Output = f64;
    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Vector3D {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl approx::AbsDiffEq for Vector3D {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Vector3D, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self[0], &other[0], epsilon) &&
        f64::abs_diff_eq(&self[1], &other[1], epsilon) &&
        f64::abs_diff_eq(&self[2], &other[2], epsilon)
    }
}

impl approx::RelativeEq for Vector3D {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Vector3D, epsilon: f64, max_relative: f64) -> bool {
        f64::relative_eq(&self[0], &other[0], epsilon, max_relative) &&
        f64::relative_eq(&self[1], &other[1], epsilon, max_relative) &&
        f64::relative_eq(&self[2], &other[2], epsilon, max_relative)
    }
}

impl approx::UlpsEq for Vector3D {
    fn default_max_ulps() -> u32 {
        f64::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Vector3D, epsilon: f64, max_ulps: u32) -> bool {
        f64::ulps_eq(&self[0], &other[0], epsilon, max_ulps) &&
        f64::ulps_eq(&self[1], &other[1], epsilon, max_ulps) &&
        f64::ulps_eq(&self[2], &other[2], epsilon, max_ulps)
    }
}
