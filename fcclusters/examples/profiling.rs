use fcclusters::{Structure, UnitCell, Vector3D};
use fcclusters::{Interactions, InteractionParameters, MinimumDistances};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let size = match std::env::args().nth(1) {
        Some(size) => size.parse()?,
        None => 2,
    };

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    // run the calculation
    let _interactions = search_interactions(size)?;

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Search for harmonic, cubic and quartic interactions in a rocksalt
/// supercell with `size x size x size` conventional cells
fn search_interactions(size: usize) -> Result<Interactions, Box<dyn std::error::Error>> {
    let mut primitive = Structure::new(UnitCell::cubic(5.64));
    let sodium = [[0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]];
    for position in sodium {
        primitive.add_atom(0, Vector3D::from(position));
        let mut chlorine = Vector3D::from(position);
        chlorine[0] += 0.5;
        primitive.add_atom(1, chlorine);
    }

    let (supercell, translations) = primitive.supercell([size, size, size])?;
    let representatives = translations.representatives();

    let parameters = InteractionParameters::from_json(r#"{
        "max_order": 3,
        "cutoffs": {
            "PerSpecies": {"radii": [[4.0, 1.6, 1.5], [4.0, 1.6, 1.5]]}
        }
    }"#)?;

    let interactions = time_graph::spanned!("Full calculation", {
        let _distances = MinimumDistances::new(&supercell, &representatives)?;
        Interactions::new(&supercell, &representatives, &parameters)?
    });

    Ok(interactions)
}
