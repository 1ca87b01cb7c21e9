use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::Error;

/// Order of an interaction in the Taylor expansion of the forces. Order 0
/// corresponds to harmonic pairs, order 1 to cubic triplets, order 2 to
/// quartic quadruplets, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct Order(pub usize);

impl Order {
    /// Number of atoms in the clusters of this order
    pub fn cluster_size(self) -> usize {
        self.0 + 2
    }

    /// Is this the order of harmonic pairs?
    pub fn is_harmonic(self) -> bool {
        self.0 == 0
    }

    /// Get the order corresponding to clusters containing `size` atoms
    pub fn from_cluster_size(size: usize) -> Order {
        assert!(size >= 2, "clusters must contain at least two atoms");
        Order(size - 2)
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_harmonic() {
            write!(f, "HARMONIC")
        } else {
            write!(f, "ANHARM{}", self.cluster_size())
        }
    }
}

/// Unordered pair of species, used as key in the cutoff table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct SpeciesPair(usize, usize);

impl SpeciesPair {
    fn new(first: usize, second: usize) -> SpeciesPair {
        if first <= second {
            SpeciesPair(first, second)
        } else {
            SpeciesPair(second, first)
        }
    }
}

/// Cutoff radii for all pairs of species and all interaction orders.
///
/// Two atoms interact at a given order if the distance between them is below
/// the cutoff for their pair of species. A cutoff of 0 disables the
/// interaction, while a missing cutoff is a configuration error caught by
/// [`CutoffTable::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CutoffTable {
    n_species: usize,
    max_order: usize,
    radii: BTreeMap<(SpeciesPair, Order), f64>,
}

impl CutoffTable {
    /// Create an empty table for `n_species` species and `max_order`
    /// interaction orders
    pub fn new(n_species: usize, max_order: usize) -> CutoffTable {
        CutoffTable {
            n_species: n_species,
            max_order: max_order,
            radii: BTreeMap::new(),
        }
    }

    /// Create a cutoff table from a radius for each species and order, given
    /// as `radii[species][order]`. The cutoff of a pair of species is the sum
    /// of the radii of both species.
    pub fn from_species_radii(radii: &[Vec<f64>]) -> Result<CutoffTable, Error> {
        let max_order = radii.first().map_or(0, |r| r.len());
        for (species, species_radii) in radii.iter().enumerate() {
            if species_radii.len() != max_order {
                return Err(Error::InvalidParameter(format!(
                    "expected {} cutoff radii for species {}, got {}",
                    max_order, species, species_radii.len()
                )));
            }
        }

        let mut table = CutoffTable::new(radii.len(), max_order);
        for (first, first_radii) in radii.iter().enumerate() {
            for (second, second_radii) in radii.iter().enumerate().skip(first) {
                for order in 0..max_order {
                    let cutoff = first_radii[order] + second_radii[order];
                    table.set(first, second, Order(order), cutoff)?;
                }
            }
        }

        return Ok(table);
    }

    /// Number of species in this table
    pub fn n_species(&self) -> usize {
        self.n_species
    }

    /// Number of interaction orders in this table
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Set the cutoff between atoms of species `first` and `second` at the
    /// given `order`
    pub fn set(&mut self, first: usize, second: usize, order: Order, cutoff: f64) -> Result<(), Error> {
        if first >= self.n_species || second >= self.n_species {
            return Err(Error::InvalidParameter(format!(
                "species ({}, {}) are out of range for a cutoff table with {} species",
                first, second, self.n_species
            )));
        }

        if order.0 >= self.max_order {
            return Err(Error::InvalidParameter(format!(
                "order {} is out of range for a cutoff table with {} orders",
                order.0, self.max_order
            )));
        }

        if !cutoff.is_finite() || cutoff < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "cutoff radius must be positive or zero, got {} for species ({}, {}) at order {}",
                cutoff, first, second, order
            )));
        }

        self.radii.insert((SpeciesPair::new(first, second), order), cutoff);
        return Ok(());
    }

    /// Get the cutoff between atoms of species `first` and `second` at the
    /// given `order`. Missing entries are treated as disabled interactions.
    #[inline]
    pub fn get(&self, first: usize, second: usize, order: Order) -> f64 {
        self.radii.get(&(SpeciesPair::new(first, second), order)).copied().unwrap_or(0.0)
    }

    /// Get the largest cutoff in this table
    pub fn max_cutoff(&self) -> f64 {
        self.radii.values().copied().fold(0.0, f64::max)
    }

    /// Check that this table contains a cutoff for all the pairs of species
    /// in `species` and all interaction orders.
    pub fn validate(&self, species: &[usize]) -> Result<(), Error> {
        if self.max_order == 0 {
            return Err(Error::InvalidParameter(
                "cutoff table must contain at least one interaction order".into()
            ));
        }

        let species = species.iter().copied().collect::<BTreeSet<_>>();
        for &first in &species {
            if first >= self.n_species {
                return Err(Error::InvalidParameter(format!(
                    "species {} is out of range for a cutoff table with {} species",
                    first, self.n_species
                )));
            }

            for &second in species.range(first..) {
                for order in 0..self.max_order {
                    let key = (SpeciesPair::new(first, second), Order(order));
                    if !self.radii.contains_key(&key) {
                        return Err(Error::InvalidParameter(format!(
                            "missing cutoff radius for species ({}, {}) at order {}",
                            first, second, Order(order)
                        )));
                    }
                }
            }
        }

        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_names() {
        assert_eq!(Order(0).to_string(), "HARMONIC");
        assert_eq!(Order(1).to_string(), "ANHARM3");
        assert_eq!(Order(2).to_string(), "ANHARM4");
        assert_eq!(Order(1).cluster_size(), 3);
        assert_eq!(Order::from_cluster_size(4), Order(2));
    }

    #[test]
    fn species_radii() {
        let table = CutoffTable::from_species_radii(&[
            vec![1.0, 0.5, 0.25],
            vec![2.0, 1.5, 0.0],
        ]).unwrap();

        assert_eq!(table.n_species(), 2);
        assert_eq!(table.max_order(), 3);

        assert_eq!(table.get(0, 0, Order(0)), 2.0);
        assert_eq!(table.get(0, 1, Order(0)), 3.0);
        assert_eq!(table.get(1, 0, Order(0)), 3.0);
        assert_eq!(table.get(1, 1, Order(1)), 3.0);
        assert_eq!(table.get(0, 1, Order(2)), 0.25);
        assert_eq!(table.get(1, 1, Order(2)), 0.0);
        assert_eq!(table.max_cutoff(), 4.0);

        table.validate(&[0, 1, 1, 0]).unwrap();
    }

    #[test]
    fn mismatched_species_radii() {
        let error = CutoffTable::from_species_radii(&[
            vec![1.0, 0.5],
            vec![2.0],
        ]).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: expected 2 cutoff radii for species 1, got 1");
    }

    #[test]
    fn explicit_pairs() {
        let mut table = CutoffTable::new(2, 1);
        table.set(1, 0, Order(0), 2.5).unwrap();
        assert_eq!(table.get(0, 1, Order(0)), 2.5);
        assert_eq!(table.get(1, 0, Order(0)), 2.5);

        // missing entries are disabled
        assert_eq!(table.get(0, 0, Order(0)), 0.0);

        // but are an error when the species are in use
        table.validate(&[0, 1]).unwrap_err();
        table.set(0, 0, Order(0), 0.0).unwrap();
        table.set(1, 1, Order(0), 0.0).unwrap();
        table.validate(&[0, 1]).unwrap();
    }

    #[test]
    fn invalid_entries() {
        let mut table = CutoffTable::new(2, 2);

        let error = table.set(0, 2, Order(0), 1.0).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: species (0, 2) are out of range for a cutoff table with 2 species");

        let error = table.set(0, 1, Order(2), 1.0).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: order 2 is out of range for a cutoff table with 2 orders");

        let error = table.set(0, 1, Order(1), -1.0).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: cutoff radius must be positive or zero, got -1 for species (0, 1) at order ANHARM3");

        let error = table.validate(&[0, 3]).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: missing cutoff radius for species (0, 0) at order HARMONIC");
    }
}
