use crate::Vector3D;

mod cell;
pub use self::cell::{UnitCell, CellShape, Periodicity};
pub use self::cell::SINGULAR_LATTICE_TOLERANCE;

mod supercell;
pub use self::supercell::Translations;

#[cfg(test)]
pub(crate) mod test_utils;

/// A crystal structure: a lattice and a set of atoms with their species and
/// fractional coordinates.
///
/// Atoms are identified by their index in the structure, species are
/// identified by a small integer starting at 0.
#[derive(Clone, Debug)]
pub struct Structure {
    cell: UnitCell,
    species: Vec<usize>,
    positions: Vec<Vector3D>,
}

impl Structure {
    /// Create a new structure without atoms, using the given unit cell
    pub fn new(cell: UnitCell) -> Structure {
        Structure {
            cell: cell,
            species: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Add an atom with the given species and `fractional` coordinates to
    /// this structure
    pub fn add_atom(&mut self, species: usize, fractional: Vector3D) {
        self.species.push(species);
        self.positions.push(fractional);
    }

    /// Add an atom with the given species and Cartesian `position` to this
    /// structure
    pub fn add_atom_cartesian(&mut self, species: usize, position: Vector3D) {
        let fractional = self.cell.fractional(position);
        self.add_atom(species, fractional);
    }

    /// Get the number of atoms in this structure
    pub fn size(&self) -> usize {
        self.species.len()
    }

    /// Get the unit cell of this structure
    pub fn cell(&self) -> UnitCell {
        self.cell
    }

    /// Get the species of all atoms in this structure
    pub fn species(&self) -> &[usize] {
        &self.species
    }

    /// Get the number of distinct species, assuming species are numbered from
    /// 0 without gaps.
    pub fn n_species(&self) -> usize {
        self.species.iter().max().map_or(0, |&max| max + 1)
    }

    /// Get the fractional coordinates of all atoms in this structure
    pub fn fractional_positions(&self) -> &[Vector3D] {
        &self.positions
    }

    /// Get the Cartesian coordinates of all atoms in this structure
    pub fn cartesian_positions(&self) -> Vec<Vector3D> {
        self.positions.iter()
            .map(|&fractional| self.cell.cartesian(fractional))
            .collect()
    }
}
