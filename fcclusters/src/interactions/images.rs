use log::warn;
use ndarray::{Array2, ArrayView2};

use crate::{UnitCell, Vector3D};

/// Default number of periodic images on each side of the cell, along each
/// lattice vector
pub const DEFAULT_REPLICATION: [usize; 3] = [1, 1, 1];

/// Distances below this value between two different atoms mean the
/// structure contains overlapping atoms
const OVERLAPPING_ATOMS_DISTANCE: f64 = 1e-3;

/// Cartesian positions of all atoms in a set of periodic images of the unit
/// cell.
///
/// Image 0 is always the original cell. The other images correspond to all
/// the non-zero integer shifts `(i, j, k)` with `-n_a <= i <= n_a`,
/// `-n_b <= j <= n_b` and `-n_c <= k <= n_c`, in this order with the last
/// lattice vector running fastest. Along non-periodic lattice vectors the
/// replication is always 0.
#[derive(Debug, Clone)]
pub struct PeriodicImages {
    /// integer shift along the lattice vectors for each image
    shifts: Vec<[i32; 3]>,
    /// `positions[[image, atom]]` is the Cartesian position of `atom` in the
    /// periodic `image`
    positions: Array2<Vector3D>,
}

impl PeriodicImages {
    /// Replicate the atoms at the given `fractional` positions in the
    /// periodic images of `cell`, using `replication[a]` images on each
    /// side of the cell along the lattice vector `a`.
    #[time_graph::instrument(name = "PeriodicImages")]
    pub fn new(cell: &UnitCell, fractional: &[Vector3D], replication: [usize; 3]) -> PeriodicImages {
        let periodicity = cell.periodicity();
        let mut n_search = [0; 3];
        for axis in 0..3 {
            if periodicity.is_periodic(axis) {
                n_search[axis] = replication[axis] as i32;
            }
        }

        let mut shifts = vec![[0, 0, 0]];
        for shift_a in -n_search[0]..=n_search[0] {
            for shift_b in -n_search[1]..=n_search[1] {
                for shift_c in -n_search[2]..=n_search[2] {
                    if shift_a == 0 && shift_b == 0 && shift_c == 0 {
                        continue;
                    }
                    shifts.push([shift_a, shift_b, shift_c]);
                }
            }
        }

        let positions = Array2::from_shape_fn((shifts.len(), fractional.len()), |(image, atom)| {
            let shift = shifts[image];
            let mut position = fractional[atom];
            position[0] += shift[0] as f64;
            position[1] += shift[1] as f64;
            position[2] += shift[2] as f64;
            cell.cartesian(position)
        });

        return PeriodicImages {
            shifts: shifts,
            positions: positions,
        };
    }

    /// Get the number of images, including the original cell
    pub fn count(&self) -> usize {
        self.shifts.len()
    }

    /// Get the number of atoms in each image
    pub fn n_atoms(&self) -> usize {
        self.positions.ncols()
    }

    /// Get the integer shift along the lattice vectors of the given `image`
    pub fn shift(&self, image: usize) -> [i32; 3] {
        self.shifts[image]
    }

    /// Get the Cartesian position of `atom` in the given `image`
    #[inline]
    pub fn position(&self, image: usize, atom: usize) -> Vector3D {
        self.positions[[image, atom]]
    }

    /// Get the Cartesian positions of all atoms in all images, as an array
    /// with shape `(images, atoms)`
    pub fn positions(&self) -> ArrayView2<'_, Vector3D> {
        self.positions.view()
    }

    /// Get the distance between `first` in the original cell and `second` in
    /// the given `image`
    #[inline]
    pub fn distance(&self, first: usize, image: usize, second: usize) -> f64 {
        self.position(0, first).distance(self.position(image, second))
    }

    /// Find the image of `atom` closest to `reference` in the original cell.
    /// If multiple images are at the same distance, the first one is used.
    pub fn nearest_image(&self, reference: usize, atom: usize) -> usize {
        let mut nearest = 0;
        let mut minimal_distance = self.distance(reference, 0, atom);
        for image in 1..self.count() {
            let distance = self.distance(reference, image, atom);
            if distance < minimal_distance {
                minimal_distance = distance;
                nearest = image;
            }
        }
        return nearest;
    }
}

/// Minimal distance between all pairs of atoms, accounting for all the
/// periodic images.
///
/// The diagonal contains the distance between an atom and its closest
/// periodic image (or 0 if there are no periodic images).
#[derive(Debug, Clone)]
pub struct DistanceTable {
    distances: Array2<f64>,
}

impl DistanceTable {
    /// Compute the distance table for the atoms in `images`
    #[time_graph::instrument(name = "DistanceTable")]
    pub fn new(images: &PeriodicImages) -> DistanceTable {
        let n_atoms = images.n_atoms();
        let mut distances = Array2::zeros((n_atoms, n_atoms));

        for i in 0..n_atoms {
            // the distance of an atom to itself in the original cell is
            // not included
            if images.count() > 1 {
                distances[[i, i]] = f64::INFINITY;
            }

            for j in (i + 1)..n_atoms {
                let distance = images.distance(i, 0, j);
                distances[[i, j]] = distance;
                distances[[j, i]] = distance;
            }
        }

        for image in 1..images.count() {
            for i in 0..n_atoms {
                for j in i..n_atoms {
                    let distance = images.distance(i, image, j);
                    distances[[i, j]] = f64::min(distance, distances[[i, j]]);
                    distances[[j, i]] = f64::min(distance, distances[[j, i]]);
                }
            }
        }

        for i in 0..n_atoms {
            for j in (i + 1)..n_atoms {
                if distances[[i, j]] < OVERLAPPING_ATOMS_DISTANCE {
                    warn!(
                        "atoms {} and {} are very close to one another ({} A)",
                        i, j, distances[[i, j]]
                    );
                }
            }
        }

        return DistanceTable { distances };
    }

    /// Get the number of atoms in this table
    pub fn size(&self) -> usize {
        self.distances.nrows()
    }

    /// Get the minimal distance between atoms `i` and `j`
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[[i, j]]
    }

    /// Get the full distance table as an array
    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.distances.view()
    }
}
