use ndarray::Array2;

use crate::{Error, Vector3D};
use super::Structure;

/// Mapping between the atoms of a primitive cell and the atoms of a supercell
/// built from it by pure translations.
///
/// Translation cells are numbered with the first lattice vector running
/// fastest, and inside each translation cell atoms follow the order of the
/// primitive cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Translations {
    /// number of repetitions of the primitive cell along each lattice vector
    size: [usize; 3],
    /// `map[[cell, atom]]` is the index in the supercell of the primitive
    /// `atom` translated into `cell`
    map: Array2<usize>,
}

impl Translations {
    fn new(size: [usize; 3], primitive_size: usize) -> Translations {
        let n_cells = size[0] * size[1] * size[2];
        let map = Array2::from_shape_fn((n_cells, primitive_size), |(cell, atom)| {
            cell * primitive_size + atom
        });

        Translations { size, map }
    }

    /// Number of repetitions of the primitive cell along each lattice vector
    pub fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Number of translation cells in the supercell
    pub fn count(&self) -> usize {
        self.map.nrows()
    }

    /// Number of atoms in the primitive cell
    pub fn primitive_size(&self) -> usize {
        self.map.ncols()
    }

    /// Get the index in the supercell of the primitive `atom` translated
    /// into `cell`
    pub fn get(&self, cell: usize, atom: usize) -> usize {
        self.map[[cell, atom]]
    }

    /// Get the supercell index of every primitive atom in the first
    /// translation cell. These are the representative atoms used to search
    /// for interactions.
    pub fn representatives(&self) -> Vec<usize> {
        self.map.row(0).to_vec()
    }

    /// Get the translation cell and the primitive atom corresponding to the
    /// supercell atom at index `atom`
    pub fn primitive(&self, atom: usize) -> (usize, usize) {
        let primitive_size = self.primitive_size();
        (atom / primitive_size, atom % primitive_size)
    }

    /// Get the integer shift along the lattice vectors of translation `cell`
    pub fn shift(&self, cell: usize) -> [usize; 3] {
        let m1 = cell % self.size[0];
        let m2 = (cell / self.size[0]) % self.size[1];
        let m3 = cell / (self.size[0] * self.size[1]);
        [m1, m2, m3]
    }
}

impl Structure {
    /// Build a supercell containing `size[0] x size[1] x size[2]` copies of
    /// this structure. The supercell atoms keep the species of the primitive
    /// atoms, and the returned [`Translations`] maps between both.
    pub fn supercell(&self, size: [usize; 3]) -> Result<(Structure, Translations), Error> {
        if size.iter().any(|&n| n == 0) {
            return Err(Error::InvalidParameter(format!(
                "supercell size must be at least 1 along each lattice vector, got {:?}", size
            )));
        }

        let translations = Translations::new(size, self.size());
        let mut supercell = Structure::new(self.cell().scaled(size));

        for cell in 0..translations.count() {
            let [m1, m2, m3] = translations.shift(cell);
            let shift = Vector3D::new(m1 as f64, m2 as f64, m3 as f64);
            for (&species, position) in self.species().iter().zip(self.fractional_positions()) {
                let fractional = Vector3D::new(
                    (position[0] + shift[0]) / size[0] as f64,
                    (position[1] + shift[1]) / size[1] as f64,
                    (position[2] + shift[2]) / size[2] as f64,
                );
                supercell.add_atom(species, fractional);
            }
        }

        return Ok((supercell, translations));
    }
}
