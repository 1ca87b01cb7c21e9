//! The `UnitCell` type represents the lattice of a crystal, together with the
//! periodic boundary conditions along each of the lattice vectors.
use std::f64::consts::PI;

use crate::{Error, Matrix3, Vector3D};

/// Lattices with a determinant below this value are considered singular
pub const SINGULAR_LATTICE_TOLERANCE: f64 = 1e-12;

/// Periodic boundary conditions along the three lattice vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct Periodicity(pub [bool; 3]);

impl Periodicity {
    /// Periodic along all three lattice vectors
    pub fn full() -> Periodicity {
        Periodicity([true, true, true])
    }

    /// Not periodic at all, i.e. an isolated cluster of atoms
    pub fn none() -> Periodicity {
        Periodicity([false, false, false])
    }

    /// Check if this periodicity includes the lattice vector `axis`
    pub fn is_periodic(&self, axis: usize) -> bool {
        self.0[axis]
    }
}

impl Default for Periodicity {
    fn default() -> Periodicity {
        Periodicity::full()
    }
}

impl std::fmt::Display for Periodicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flag = |p: bool| if p { "periodic" } else { "non-periodic" };
        write!(f, "a: {}, b: {}, c: {}", flag(self.0[0]), flag(self.0[1]), flag(self.0[2]))
    }
}

/// The shape of a cell determine how we compute the lengths of the lattice
/// vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellShape {
    /// Orthorhombic unit cell, with cuboid shape
    Orthorhombic,
    /// Triclinic unit cell, with arbitrary parallelepiped shape
    Triclinic,
}

/// An `UnitCell` defines the lattice of the crystal.
///
/// The three lattice vectors are stored as the rows of the cell matrix.
/// Even along non-periodic directions, the lattice vector is used to convert
/// between fractional and Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    /// Unit cell matrix
    matrix: Matrix3,
    /// Transpose of the unit cell matrix, cached from matrix
    transpose: Matrix3,
    /// Inverse of the transpose of the unit cell matrix, cached from matrix
    inverse: Matrix3,
    /// Unit cell shape
    shape: CellShape,
    /// Periodic boundary conditions along each lattice vector
    periodicity: Periodicity,
}

impl UnitCell {
    /// Create a new unit cell from the lattice vectors in the rows of
    /// `matrix`, with the given `periodicity`.
    ///
    /// This fails if the lattice vectors are (close to) linearly dependent.
    pub fn new(matrix: Matrix3, periodicity: Periodicity) -> Result<UnitCell, Error> {
        let determinant = matrix.determinant();
        if !determinant.is_finite() || f64::abs(determinant) < SINGULAR_LATTICE_TOLERANCE {
            return Err(Error::InvalidParameter(format!(
                "the lattice vectors are singular (determinant = {})", determinant
            )));
        }

        let is_close_0 = |value| f64::abs(value) < 1e-6;
        let is_diagonal = |matrix: Matrix3| {
            is_close_0(matrix[0][1]) && is_close_0(matrix[0][2]) &&
            is_close_0(matrix[1][0]) && is_close_0(matrix[1][2]) &&
            is_close_0(matrix[2][0]) && is_close_0(matrix[2][1])
        };

        let shape = if is_diagonal(matrix) {
            CellShape::Orthorhombic
        } else {
            CellShape::Triclinic
        };

        return Ok(UnitCell {
            matrix: matrix,
            transpose: matrix.transposed(),
            inverse: matrix.transposed().inverse(),
            shape: shape,
            periodicity: periodicity,
        });
    }

    /// Create a fully periodic orthorhombic unit cell, with side lengths
    /// `a, b, c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> UnitCell {
        assert!(a > 0.0 && b > 0.0 && c > 0.0, "Cell lengths must be positive");
        let matrix = Matrix3::new([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c]
        ]);
        UnitCell {
            matrix: matrix,
            transpose: matrix,
            inverse: Matrix3::new([
                [1.0 / a, 0.0, 0.0],
                [0.0, 1.0 / b, 0.0],
                [0.0, 0.0, 1.0 / c]
            ]),
            shape: CellShape::Orthorhombic,
            periodicity: Periodicity::full(),
        }
    }

    /// Create a fully periodic cubic unit cell, with side lengths
    /// `length, length, length`.
    pub fn cubic(length: f64) -> UnitCell {
        UnitCell::orthorhombic(length, length, length)
    }

    /// Create a fully periodic triclinic unit cell, with side lengths
    /// `a, b, c` and angles `alpha, beta, gamma` in degrees.
    pub fn triclinic(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<UnitCell, Error> {
        if !(a > 0.0 && b > 0.0 && c > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "cell lengths must be positive, got {}, {} and {}", a, b, c
            )));
        }

        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let b_x = b * cos_gamma;
        let b_y = b * sin_gamma;

        let c_x = c * cos_beta;
        let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c_z = f64::sqrt(c * c - c_y * c_y - c_x * c_x);

        return UnitCell::new(Matrix3::new([
            [a,   0.0, 0.0],
            [b_x, b_y, 0.0],
            [c_x, c_y, c_z],
        ]), Periodicity::full());
    }

    /// Get a copy of this cell with different periodic boundary conditions
    #[must_use]
    pub fn with_periodicity(mut self, periodicity: Periodicity) -> UnitCell {
        self.periodicity = periodicity;
        self
    }

    /// Get the cell shape
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Get the periodic boundary conditions of this cell
    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Get the matricial representation of the unit cell
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the lengths of the three lattice vectors
    pub fn lengths(&self) -> [f64; 3] {
        match self.shape {
            CellShape::Orthorhombic => [self.matrix[0][0], self.matrix[1][1], self.matrix[2][2]],
            CellShape::Triclinic => [
                Vector3D::from(self.matrix[0]).norm(),
                Vector3D::from(self.matrix[1]).norm(),
                Vector3D::from(self.matrix[2]).norm(),
            ],
        }
    }

    /// Get the volume of the cell
    pub fn volume(&self) -> f64 {
        f64::abs(self.matrix.determinant())
    }

    /// Get the reciprocal lattice vectors, as the rows of the returned
    /// matrix. They are normalized such that `a_i * b_j = 2π δ_ij`.
    pub fn reciprocal(&self) -> Matrix3 {
        return self.inverse * (2.0 * PI);
    }

    /// Get the distances between opposite faces of the unit cell
    pub fn distances_between_faces(&self) -> Vector3D {
        let reciprocal = self.reciprocal();
        Vector3D::new(
            2.0 * PI / Vector3D::from(reciprocal[0]).norm(),
            2.0 * PI / Vector3D::from(reciprocal[1]).norm(),
            2.0 * PI / Vector3D::from(reciprocal[2]).norm(),
        )
    }

    /// Get the lattice of a supercell containing `size[0] x size[1] x
    /// size[2]` copies of this cell. The periodicity is unchanged.
    #[must_use]
    pub fn scaled(&self, size: [usize; 3]) -> UnitCell {
        let mut matrix = self.matrix;
        for (axis, &n) in size.iter().enumerate() {
            for value in &mut matrix[axis] {
                *value *= n as f64;
            }
        }

        UnitCell {
            matrix: matrix,
            transpose: matrix.transposed(),
            inverse: matrix.transposed().inverse(),
            shape: self.shape,
            periodicity: self.periodicity,
        }
    }
}

/// Coordinates transformations
impl UnitCell {
    /// Get the fractional representation of the `vector` in this cell
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        // this needs to use the inverse of the transpose of the matrix, since
        // we only have code to multiply a vector by a matrix on the left
        return self.inverse * vector;
    }

    /// Get the Cartesian representation of the `fractional` vector in this
    /// cell
    pub fn cartesian(&self, fractional: Vector3D) -> Vector3D {
        return self.transpose * fractional;
    }
}
