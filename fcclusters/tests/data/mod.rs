#![allow(dead_code)]

use serde_json::Value;

use fcclusters::{Matrix3, Vector3D, Structure, UnitCell, Periodicity};

type Parameters = String;

/// Load a structure, the indexes of its representative atoms and the
/// interaction parameters from a JSON file in `tests/data`
pub fn load_input(path: &str) -> (Structure, Vec<usize>, Parameters) {
    let json = std::fs::read_to_string(format!("tests/data/{}", path))
        .expect("failed to read input file");

    let data: Value = serde_json::from_str(&json).expect("failed to parse JSON");
    let parameters = data["parameters"].to_string();

    let cell = read_cell(&data["cell"], &data["periodicity"]);
    let mut structure = Structure::new(cell);

    let species = data["species"].as_array().expect("species must be an array");
    let positions = data["positions"].as_array().expect("positions must be an array");
    for (species, position) in species.iter().zip(positions) {
        let species = species.as_u64().expect("species must be an integer") as usize;
        let position = position.as_array().expect("position must be an array");
        let position = Vector3D::new(
            position[0].as_f64().unwrap(),
            position[1].as_f64().unwrap(),
            position[2].as_f64().unwrap(),
        );

        structure.add_atom_cartesian(species, position);
    }

    let representatives = data["representatives"].as_array()
        .expect("representatives must be an array")
        .iter()
        .map(|i| i.as_u64().expect("representatives must be integers") as usize)
        .collect();

    (structure, representatives, parameters)
}

fn read_cell(cell: &Value, periodicity: &Value) -> UnitCell {
    let cell = cell.as_array().expect("cell must be an array");
    let matrix = Matrix3::new([
        [cell[0].as_f64().unwrap(), cell[1].as_f64().unwrap(), cell[2].as_f64().unwrap()],
        [cell[3].as_f64().unwrap(), cell[4].as_f64().unwrap(), cell[5].as_f64().unwrap()],
        [cell[6].as_f64().unwrap(), cell[7].as_f64().unwrap(), cell[8].as_f64().unwrap()],
    ]);

    let periodicity = if periodicity.is_null() {
        Periodicity::full()
    } else {
        serde_json::from_value(periodicity.clone()).expect("invalid periodicity")
    };

    UnitCell::new(matrix, periodicity).expect("invalid cell")
}
