use std::collections::BTreeSet;

use log::{debug, info, warn};
use ndarray::{Array3, ArrayView3};

use crate::Error;
use super::{CutoffTable, Order, PeriodicImages};

/// Atoms within the pair cutoff of each representative atom, for each
/// interaction order.
///
/// An atom is a neighbor of a representative atom at a given order if any of
/// its periodic images is strictly closer than the cutoff for the species of
/// both atoms at this order. The representative atom is part of its own
/// neighbor list, since the zero-offset image is always within the cutoff.
#[derive(Debug, Clone)]
pub struct NeighborList {
    /// index of the representative atoms in the full structure
    representatives: Vec<usize>,
    /// `neighbors[representative][order]`, sorted and without duplicates
    neighbors: Vec<Vec<Vec<usize>>>,
    /// `occurrences[[representative, atom, order]]` is the number of periodic
    /// images of `atom` within the cutoff of `representative`
    occurrences: Array3<usize>,
}

impl NeighborList {
    /// Search the neighbors of all `representatives` atoms, using the atoms
    /// positions in `images`, the `species` of all atoms and the given
    /// `cutoffs`.
    #[time_graph::instrument(name = "NeighborList")]
    pub fn new(
        images: &PeriodicImages,
        representatives: &[usize],
        species: &[usize],
        cutoffs: &CutoffTable,
    ) -> Result<NeighborList, Error> {
        let n_atoms = images.n_atoms();
        if species.len() != n_atoms {
            return Err(Error::InvalidParameter(format!(
                "expected species for {} atoms, got {}", n_atoms, species.len()
            )));
        }

        for &representative in representatives {
            if representative >= n_atoms {
                return Err(Error::InvalidParameter(format!(
                    "representative atom {} is out of bounds for a structure with {} atoms",
                    representative, n_atoms
                )));
            }
        }

        cutoffs.validate(species)?;

        let max_order = cutoffs.max_order();
        let mut members = vec![vec![BTreeSet::new(); max_order]; representatives.len()];
        let mut occurrences = Array3::zeros((representatives.len(), n_atoms, max_order));

        for image in 0..images.count() {
            for (rep_index, &first) in representatives.iter().enumerate() {
                for second in 0..n_atoms {
                    let distance = images.distance(first, image, second);
                    for order in 0..max_order {
                        let cutoff = cutoffs.get(species[first], species[second], Order(order));
                        if distance < cutoff {
                            members[rep_index][order].insert(second);
                            occurrences[[rep_index, second, order]] += 1;
                        }
                    }
                }
            }
        }

        let neighbors = members.into_iter()
            .map(|by_order| {
                by_order.into_iter()
                    .map(|set| set.into_iter().collect::<Vec<_>>())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let list = NeighborList {
            representatives: representatives.to_vec(),
            neighbors: neighbors,
            occurrences: occurrences,
        };

        if list.has_duplicates() {
            warn!(
                "duplicate interaction exists, the same pair of atoms is within \
                the cutoff through {} periodic images. This can be avoided by \
                using a larger supercell or smaller cutoffs",
                list.max_occurrences()
            );
        }

        for (rep_index, &representative) in list.representatives.iter().enumerate() {
            for order in 0..max_order {
                let neighbors = &list.neighbors[rep_index][order];
                info!(
                    "{} neighbors for atom {} at order {}",
                    neighbors.len(), representative, Order(order)
                );
                debug!("neighbors of atom {} at order {}: {:?}", representative, Order(order), neighbors);

                let counts = neighbors.iter()
                    .map(|&atom| list.occurrences[[rep_index, atom, order]])
                    .collect::<Vec<_>>();
                debug!("periodic images of these neighbors within the cutoff: {:?}", counts);
            }
        }

        return Ok(list);
    }

    /// Get the neighbors of the representative atom at index `rep_index` in
    /// [`NeighborList::representatives`], at the given `order`.
    pub fn get(&self, rep_index: usize, order: Order) -> &[usize] {
        &self.neighbors[rep_index][order.0]
    }

    /// Get the indexes in the full structure of all representative atoms
    pub fn representatives(&self) -> &[usize] {
        &self.representatives
    }

    /// Number of interaction orders in this neighbor list
    pub fn max_order(&self) -> usize {
        self.occurrences.dim().2
    }

    /// Get the number of periodic images within the cutoff for all
    /// `(representative, atom, order)`
    pub fn occurrences(&self) -> ArrayView3<'_, usize> {
        self.occurrences.view()
    }

    /// Get the largest number of periodic images of a single atom within the
    /// cutoff of a representative atom
    pub fn max_occurrences(&self) -> usize {
        self.occurrences.iter().copied().max().unwrap_or(0)
    }

    /// Is any pair of atoms within the cutoff through more than one periodic
    /// image?
    pub fn has_duplicates(&self) -> bool {
        self.max_occurrences() > 1
    }
}

#[cfg(test)]
mod tests {
    use crate::systems::test_utils::test_structure;
    use crate::{Structure, CutoffTable, Order, PeriodicImages};
    use super::*;

    fn neighbors(structure: &Structure, cutoffs: &CutoffTable) -> NeighborList {
        let images = PeriodicImages::new(&structure.cell(), structure.fractional_positions(), [1, 1, 1]);
        let representatives = (0..structure.size()).collect::<Vec<_>>();
        NeighborList::new(&images, &representatives, structure.species(), cutoffs).unwrap()
    }

    #[test]
    fn cscl() {
        let structure = test_structure("CsCl");
        let mut cutoffs = CutoffTable::new(2, 2);
        cutoffs.set(0, 0, Order(0), 1.1).unwrap();
        cutoffs.set(0, 1, Order(0), 0.9).unwrap();
        cutoffs.set(1, 1, Order(0), 1.1).unwrap();
        // disable the cubic interactions between Cs atoms
        cutoffs.set(0, 0, Order(1), 0.0).unwrap();
        cutoffs.set(0, 1, Order(1), 0.9).unwrap();
        cutoffs.set(1, 1, Order(1), 0.5).unwrap();

        let list = neighbors(&structure, &cutoffs);
        assert_eq!(list.representatives(), [0, 1]);
        assert_eq!(list.max_order(), 2);

        assert_eq!(list.get(0, Order(0)), [0, 1]);
        assert_eq!(list.get(1, Order(0)), [0, 1]);
        assert_eq!(list.get(0, Order(1)), [1]);
        assert_eq!(list.get(1, Order(1)), [0, 1]);

        // 8 Cl atoms around each Cs and 6 images of each atom
        let occurrences = list.occurrences();
        assert_eq!(occurrences[[0, 1, 0]], 8);
        assert_eq!(occurrences[[0, 0, 0]], 7);
        assert_eq!(occurrences[[1, 1, 1]], 1);
        assert_eq!(occurrences[[0, 0, 1]], 0);
        assert_eq!(list.max_occurrences(), 8);
        assert!(list.has_duplicates());
    }

    #[test]
    fn no_duplicates() {
        let structure = test_structure("chain");
        let (supercell, translations) = structure.supercell([2, 1, 1]).unwrap();

        let mut cutoffs = CutoffTable::new(1, 1);
        cutoffs.set(0, 0, Order(0), 1.5).unwrap();

        let images = PeriodicImages::new(&supercell.cell(), supercell.fractional_positions(), [1, 1, 1]);
        let list = NeighborList::new(
            &images, &translations.representatives(), supercell.species(), &cutoffs
        ).unwrap();

        assert_eq!(list.get(0, Order(0)), [0, 1, 7]);
        assert_eq!(list.get(2, Order(0)), [1, 2, 3]);
        assert!(!list.has_duplicates());
    }

    #[test]
    fn invalid_inputs() {
        let structure = test_structure("CsCl");
        let images = PeriodicImages::new(&structure.cell(), structure.fractional_positions(), [1, 1, 1]);

        let mut cutoffs = CutoffTable::new(2, 1);
        cutoffs.set(0, 0, Order(0), 1.0).unwrap();
        cutoffs.set(0, 1, Order(0), 1.0).unwrap();
        cutoffs.set(1, 1, Order(0), 1.0).unwrap();

        let error = NeighborList::new(&images, &[2], structure.species(), &cutoffs).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid parameter: representative atom 2 is out of bounds for a structure with 2 atoms"
        );

        let error = NeighborList::new(&images, &[0], &[0], &cutoffs).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: expected species for 2 atoms, got 1");

        let mut cutoffs = CutoffTable::new(2, 1);
        cutoffs.set(0, 0, Order(0), 1.0).unwrap();
        let error = NeighborList::new(&images, &[0], structure.species(), &cutoffs).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid parameter: missing cutoff radius for species (0, 1) at order HARMONIC"
        );
    }
}
