use crate::{Matrix3, Vector3D};
use super::{Structure, UnitCell, Periodicity};

pub fn test_structure(name: &str) -> Structure {
    match name {
        "simple-cubic" => get_simple_cubic(),
        "CsCl" => get_cscl(),
        "NaCl" => get_nacl(),
        "ZnS" => get_zns(),
        "chain" => get_chain(),
        "molecule" => get_molecule(),
        _ => panic!("unknown test structure {}", name)
    }
}

/// A single atom in a cubic cell with side length 1
fn get_simple_cubic() -> Structure {
    let mut structure = Structure::new(UnitCell::cubic(1.0));
    structure.add_atom(0, Vector3D::new(0.0, 0.0, 0.0));
    return structure;
}

/// CsCl structure
/// This structure is simple since the primitive unit cell
/// is just the usual cubic cell with side length set to one.
fn get_cscl() -> Structure {
    let mut structure = Structure::new(UnitCell::cubic(1.0));
    structure.add_atom(0, Vector3D::new(0.0, 0.0, 0.0));
    structure.add_atom(1, Vector3D::new(0.5, 0.5, 0.5));
    return structure;
}

/// NaCl structure
/// Using a primitive unit cell, the distance between the
/// closest Na-Cl pair is exactly 1. The cubic unit cell
/// in these units would have a length of 2.
fn get_nacl() -> Structure {
    let cell = Matrix3::new([[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
    let cell = UnitCell::new(cell, Periodicity::full()).expect("invalid cell");
    let mut structure = Structure::new(cell);
    structure.add_atom(0, Vector3D::new(0.0, 0.0, 0.0));
    structure.add_atom(1, Vector3D::new(-0.5, 0.5, 0.5));
    return structure;
}

/// ZnS (zincblende) structure
/// As for NaCl, a primitive unit cell is used which makes
/// the lattice parameter of the cubic cell equal to 2.
/// In these units, the closest Zn-S distance is sqrt(3)/2.
fn get_zns() -> Structure {
    let cell = Matrix3::new([[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
    let cell = UnitCell::new(cell, Periodicity::full()).expect("invalid cell");
    let mut structure = Structure::new(cell);
    structure.add_atom(0, Vector3D::new(0.0, 0.0, 0.0));
    structure.add_atom(1, Vector3D::new(0.25, 0.25, 0.25));
    return structure;
}

/// Linear chain of atoms along x with spacing 1, only periodic along the
/// first lattice vector
fn get_chain() -> Structure {
    let cell = UnitCell::orthorhombic(4.0, 10.0, 10.0)
        .with_periodicity(Periodicity([true, false, false]));
    let mut structure = Structure::new(cell);
    structure.add_atom(0, Vector3D::new(0.0, 0.0, 0.0));
    structure.add_atom(0, Vector3D::new(0.25, 0.0, 0.0));
    structure.add_atom(0, Vector3D::new(0.5, 0.0, 0.0));
    structure.add_atom(0, Vector3D::new(0.75, 0.0, 0.0));
    return structure;
}

/// Isolated water-like molecule, without periodic boundary conditions
fn get_molecule() -> Structure {
    let cell = UnitCell::cubic(10.0).with_periodicity(Periodicity::none());
    let mut structure = Structure::new(cell);
    structure.add_atom_cartesian(0, Vector3D::new(0.0, 0.0, 0.0));
    structure.add_atom_cartesian(1, Vector3D::new(0.0, 0.75545, -0.58895));
    structure.add_atom_cartesian(1, Vector3D::new(0.0, -0.75545, -0.58895));
    return structure;
}
