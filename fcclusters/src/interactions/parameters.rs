use crate::Error;
use super::{CutoffTable, Order};
use super::images::DEFAULT_REPLICATION;

/// Cutoff radius for a single pair of species at a single order
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PairCutoff {
    /// species of both atoms in the pair
    pub species: [usize; 2],
    /// interaction order, starting at 0 for harmonic pairs
    pub order: Order,
    /// cutoff radius for this pair
    pub cutoff: f64,
}

/// Possible ways to specify the cutoff radii for all interactions
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum Cutoffs {
    /// One radius for each species and each order, given as
    /// `radii[species][order]`. Two atoms interact if their distance is below
    /// the sum of their radii.
    PerSpecies {
        radii: Vec<Vec<f64>>,
    },
    /// Explicit cutoff for pairs of species. All pairs of species present in
    /// the structure must be given for all orders, using a cutoff of 0 to
    /// disable some interactions.
    PerPair {
        pairs: Vec<PairCutoff>,
    },
}

/// Parameters controlling the search for interaction clusters.
///
/// These can be loaded from JSON:
///
/// ```
/// # use fcclusters::InteractionParameters;
/// let parameters = InteractionParameters::from_json(r#"{
///     "max_order": 2,
///     "cutoffs": {
///         "PerSpecies": {"radii": [[3.0, 2.0], [2.5, 1.5]]}
///     }
/// }"#).unwrap();
///
/// assert_eq!(parameters.max_order, 2);
/// assert_eq!(parameters.replication, [1, 1, 1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InteractionParameters {
    /// Number of interaction orders to consider: 1 for harmonic pairs only,
    /// 2 to include cubic triplets, 3 to include quartic quadruplets, etc.
    pub max_order: usize,
    /// Cutoff radii for all interactions
    pub cutoffs: Cutoffs,
    /// Number of periodic images to include on each side of the cell along
    /// each lattice vector. This is reduced to 0 along non-periodic lattice
    /// vectors.
    #[serde(default = "default_replication")]
    pub replication: [usize; 3],
}

fn default_replication() -> [usize; 3] {
    DEFAULT_REPLICATION
}

impl InteractionParameters {
    /// Create parameters with the default replication
    pub fn new(max_order: usize, cutoffs: Cutoffs) -> InteractionParameters {
        InteractionParameters {
            max_order: max_order,
            cutoffs: cutoffs,
            replication: DEFAULT_REPLICATION,
        }
    }

    /// Load parameters from a JSON string
    pub fn from_json(json: &str) -> Result<InteractionParameters, Error> {
        let parameters: InteractionParameters = serde_json::from_str(json)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    /// Serialize these parameters to a JSON string
    pub fn to_json(&self) -> Result<String, Error> {
        return Ok(serde_json::to_string(self)?);
    }

    /// Get the JSON schema describing these parameters
    pub fn schema() -> Result<String, Error> {
        let schema = schemars::schema_for!(InteractionParameters);
        return Ok(serde_json::to_string_pretty(&schema)?);
    }

    /// Check that these parameters make sense
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_order == 0 {
            return Err(Error::InvalidParameter(
                "max_order must be at least 1".into()
            ));
        }

        if let Cutoffs::PerSpecies { radii } = &self.cutoffs {
            for (species, species_radii) in radii.iter().enumerate() {
                if species_radii.len() < self.max_order {
                    return Err(Error::InvalidParameter(format!(
                        "expected {} cutoff radii for species {}, got {}",
                        self.max_order, species, species_radii.len()
                    )));
                }
            }
        }

        return Ok(());
    }

    /// Build the table of cutoffs for a structure containing `n_species`
    /// species, and check that all the required cutoffs are present.
    pub fn cutoff_table(&self, n_species: usize) -> Result<CutoffTable, Error> {
        self.validate()?;

        let table = match &self.cutoffs {
            Cutoffs::PerSpecies { radii } => {
                if radii.len() < n_species {
                    return Err(Error::InvalidParameter(format!(
                        "got cutoff radii for {} species, but the structure contains {} species",
                        radii.len(), n_species
                    )));
                }

                let radii = radii.iter()
                    .map(|r| r[..self.max_order].to_vec())
                    .collect::<Vec<_>>();
                CutoffTable::from_species_radii(&radii)?
            }
            Cutoffs::PerPair { pairs } => {
                let n_species = pairs.iter()
                    .map(|pair| usize::max(pair.species[0], pair.species[1]) + 1)
                    .fold(n_species, usize::max);

                let mut table = CutoffTable::new(n_species, self.max_order);
                for pair in pairs {
                    if pair.order.0 >= self.max_order {
                        // cutoffs for orders we are not looking at
                        continue;
                    }
                    table.set(pair.species[0], pair.species[1], pair.order, pair.cutoff)?;
                }
                table
            }
        };

        let all_species = (0..n_species).collect::<Vec<_>>();
        table.validate(&all_species)?;

        return Ok(table);
    }
}
