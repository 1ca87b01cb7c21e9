//! Search for the clusters of interacting atoms in a periodic structure.
//!
//! The search goes through the following steps:
//!
//! 1. the atoms are replicated in the periodic images of the cell
//!    ([`PeriodicImages`]), and the minimal distance between all pairs of
//!    atoms is computed ([`DistanceTable`]);
//! 2. the neighbors of each representative atom are found for each
//!    interaction order ([`NeighborList`]);
//! 3. clusters of atoms are built from these neighbors and deduplicated
//!    ([`ClusterEnumerator`] and [`ClusterSet`]).
//!
//! [`Interactions`] runs all these steps from a [`Structure`] and
//! [`InteractionParameters`]. [`MinimumDistances`] is used separately to map
//! harmonic force constants onto the periodic images of a supercell.

use log::{info, warn};

use crate::{Error, Structure};

mod cutoffs;
pub use self::cutoffs::{CutoffTable, Order};

mod parameters;
pub use self::parameters::{InteractionParameters, Cutoffs, PairCutoff};

mod images;
pub use self::images::{PeriodicImages, DistanceTable, DEFAULT_REPLICATION};

mod search;
pub use self::search::NeighborList;

mod clusters;
pub use self::clusters::{Cluster, ClusterSet, ClusterEnumerator};

mod mindist;
pub use self::mindist::{DistInfo, MinimumDistances, MINIMUM_DISTANCE_TOLERANCE};

/// All the interactions between atoms in a periodic structure, up to a
/// maximal order.
#[derive(Debug, Clone)]
pub struct Interactions {
    cutoffs: CutoffTable,
    images: PeriodicImages,
    distances: DistanceTable,
    neighbors: NeighborList,
    /// clusters for each order
    clusters: Vec<ClusterSet>,
}

impl Interactions {
    /// Search for the interactions of the `representatives` atoms in
    /// `structure`, using the given `parameters`.
    pub fn new(
        structure: &Structure,
        representatives: &[usize],
        parameters: &InteractionParameters,
    ) -> Result<Interactions, Error> {
        let cutoffs = parameters.cutoff_table(structure.n_species())?;
        return Interactions::with_cutoffs(structure, representatives, cutoffs, parameters.replication);
    }

    /// Search for the interactions of the `representatives` atoms in
    /// `structure`, using an already built table of `cutoffs` and
    /// `replication` periodic images on each side of the cell.
    #[time_graph::instrument(name = "Interactions")]
    pub fn with_cutoffs(
        structure: &Structure,
        representatives: &[usize],
        cutoffs: CutoffTable,
        replication: [usize; 3],
    ) -> Result<Interactions, Error> {
        cutoffs.validate(structure.species())?;

        let cell = structure.cell();
        info!("periodicity of the cell: {}", cell.periodicity());
        log_cutoffs(&cutoffs, structure.n_species());

        let max_cutoff = cutoffs.max_cutoff();
        let faces = cell.distances_between_faces();
        for axis in 0..3 {
            if !cell.periodicity().is_periodic(axis) {
                continue;
            }

            let covered = replication[axis] as f64 * faces[axis];
            if max_cutoff > covered {
                warn!(
                    "the largest cutoff ({}) is larger than the distance covered by \
                    {} periodic images along lattice vector {} ({}), some interactions \
                    will be missing",
                    max_cutoff, replication[axis], axis, covered
                );
            }
        }

        let images = PeriodicImages::new(&cell, structure.fractional_positions(), replication);
        info!("searching interactions in {} periodic images", images.count());

        let distances = DistanceTable::new(&images);
        let neighbors = NeighborList::new(&images, representatives, structure.species(), &cutoffs)?;

        let enumerator = ClusterEnumerator::new(&images, structure.species(), &cutoffs);
        let clusters = (0..cutoffs.max_order())
            .map(|order| enumerator.enumerate(&neighbors, Order(order)))
            .collect::<Result<Vec<_>, _>>()?;

        for set in &clusters {
            info!("{} clusters at order {}", set.len(), set.order());
        }

        return Ok(Interactions {
            cutoffs: cutoffs,
            images: images,
            distances: distances,
            neighbors: neighbors,
            clusters: clusters,
        });
    }

    /// Get the table of cutoffs used to search for interactions
    pub fn cutoffs(&self) -> &CutoffTable {
        &self.cutoffs
    }

    /// Get the number of interaction orders
    pub fn max_order(&self) -> usize {
        self.clusters.len()
    }

    /// Get the indexes of the representative atoms
    pub fn representatives(&self) -> &[usize] {
        self.neighbors.representatives()
    }

    /// Get the positions of the atoms in all periodic images
    pub fn images(&self) -> &PeriodicImages {
        &self.images
    }

    /// Get the minimal distances between all pairs of atoms
    pub fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    /// Get the neighbors of the representative atoms
    pub fn neighbors(&self) -> &NeighborList {
        &self.neighbors
    }

    /// Get the clusters at the given `order`, or `None` if this order is
    /// above the maximal order
    pub fn clusters(&self, order: Order) -> Option<&ClusterSet> {
        self.clusters.get(order.0)
    }

    /// Is any pair of atoms interacting through more than one periodic image?
    pub fn has_duplicate_interactions(&self) -> bool {
        self.neighbors.has_duplicates()
    }
}

fn log_cutoffs(cutoffs: &CutoffTable, n_species: usize) {
    for order in 0..cutoffs.max_order() {
        let order = Order(order);
        for first in 0..n_species {
            let radii = (0..n_species)
                .map(|second| format!("{:.4}", cutoffs.get(first, second, order)))
                .collect::<Vec<_>>();
            info!("cutoff radii at order {} for species {}: {}", order, first, radii.join(" "));
        }
    }
}
