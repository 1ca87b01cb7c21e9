use log::debug;
use ndarray::Array2;

use crate::{Error, Structure, Vector3D};
use super::PeriodicImages;

/// Distances within this tolerance of the minimal distance are considered
/// degenerate with it
pub const MINIMUM_DISTANCE_TOLERANCE: f64 = 1e-6;

/// The minimal distances are searched in the 27 cells around the supercell
const MINIMUM_DISTANCE_REPLICATION: [usize; 3] = [1, 1, 1];

/// A single periodic image realizing the distance between two atoms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistInfo {
    /// index of the periodic image of the second atom
    pub image: usize,
    /// distance between the atoms
    pub distance: f64,
    /// vector from the first atom to the image of the second atom
    pub vector: Vector3D,
}

/// All the periodic images realizing the minimal distance between the
/// representative atoms and every atom in a supercell.
///
/// When multiple images are at the same distance (for example when an atom
/// sits exactly half-way through the supercell), all of them are kept, and
/// harmonic force constants can be split between them with
/// [`MinimumDistances::partition`].
///
/// For the distance between an atom and itself, the zero-offset image is
/// excluded: the minimal distance is the distance to the closest periodic
/// image, unless the cell has no periodic direction. The on-site force
/// constant still belongs to the zero-offset image, see
/// [`MinimumDistances::partition`].
#[derive(Debug, Clone)]
pub struct MinimumDistances {
    images: PeriodicImages,
    representatives: Vec<usize>,
    /// `distances[[representative, atom]]`, sorted by distance and then by
    /// image
    distances: Array2<Vec<DistInfo>>,
}

impl MinimumDistances {
    /// Find the minimal distance images between the `representatives` atoms
    /// and all atoms in the `supercell`.
    #[time_graph::instrument(name = "MinimumDistances")]
    pub fn new(supercell: &Structure, representatives: &[usize]) -> Result<MinimumDistances, Error> {
        let n_atoms = supercell.size();
        for &representative in representatives {
            if representative >= n_atoms {
                return Err(Error::InvalidParameter(format!(
                    "representative atom {} is out of bounds for a structure with {} atoms",
                    representative, n_atoms
                )));
            }
        }

        let cell = supercell.cell();
        let images = PeriodicImages::new(&cell, supercell.fractional_positions(), MINIMUM_DISTANCE_REPLICATION);

        let mut distances = Array2::from_elem((representatives.len(), n_atoms), Vec::new());
        for (rep_index, &representative) in representatives.iter().enumerate() {
            let center = images.position(0, representative);
            for atom in 0..n_atoms {
                let skip_self = atom == representative && images.count() > 1;

                let mut all = Vec::with_capacity(images.count());
                for image in 0..images.count() {
                    if skip_self && image == 0 {
                        continue;
                    }
                    let vector = images.position(image, atom) - center;
                    all.push(DistInfo {
                        image: image,
                        distance: vector.norm(),
                        vector: vector,
                    });
                }

                // stable sort, images at the same distance stay in order
                all.sort_by(|a, b| a.distance.total_cmp(&b.distance));

                let minimal = match all.first() {
                    Some(info) => info.distance,
                    None => {
                        return Err(Error::Internal(format!(
                            "no periodic image for the pair ({}, {})", representative, atom
                        )));
                    }
                };

                all.retain(|info| f64::abs(info.distance - minimal) < MINIMUM_DISTANCE_TOLERANCE);
                if all.len() > 1 {
                    debug!(
                        "{} periodic images at the minimal distance {} between atoms {} and {}",
                        all.len(), minimal, representative, atom
                    );
                }

                distances[[rep_index, atom]] = all;
            }
        }

        return Ok(MinimumDistances {
            images: images,
            representatives: representatives.to_vec(),
            distances: distances,
        });
    }

    /// Get the indexes in the supercell of all representative atoms
    pub fn representatives(&self) -> &[usize] {
        &self.representatives
    }

    /// Get all the periodic images realizing the minimal distance between
    /// the representative atom at index `rep_index` and `atom`. This always
    /// contains at least one entry.
    pub fn get(&self, rep_index: usize, atom: usize) -> &[DistInfo] {
        &self.distances[[rep_index, atom]]
    }

    /// Get the minimal distance between the representative atom at index
    /// `rep_index` and `atom`
    pub fn minimum(&self, rep_index: usize, atom: usize) -> f64 {
        self.get(rep_index, atom)[0].distance
    }

    /// Get the number of periodic images realizing the minimal distance
    /// between the representative atom at index `rep_index` and `atom`
    pub fn multiplicity(&self, rep_index: usize, atom: usize) -> usize {
        self.get(rep_index, atom).len()
    }

    /// Get the integer shift along the lattice vectors of the given `image`
    pub fn shift(&self, image: usize) -> [i32; 3] {
        self.images.shift(image)
    }

    /// Split a harmonic force constant `value` between the representative
    /// atom at index `rep_index` and `atom` equally across all the periodic
    /// images realizing the minimal distance. This returns pairs of
    /// `(image, value / multiplicity)`.
    ///
    /// The on-site term, between a representative atom and itself, is not
    /// split and stays entirely in the zero-offset image.
    pub fn partition(&self, rep_index: usize, atom: usize, value: f64) -> Vec<(usize, f64)> {
        if atom == self.representatives[rep_index] {
            return vec![(0, value)];
        }

        let images = self.get(rep_index, atom);
        let share = value / images.len() as f64;
        return images.iter().map(|info| (info.image, share)).collect();
    }
}
