use std::collections::BTreeSet;

use itertools::Itertools;
use log::info;

use crate::Error;
use super::{CutoffTable, NeighborList, Order, PeriodicImages};

/// A group of atoms interacting together. The atoms are always sorted, so two
/// clusters containing the same atoms in a different order compare equal.
///
/// The same atom can appear multiple times in a cluster, corresponding to
/// higher derivatives with respect to the displacement of this atom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cluster(Vec<usize>);

impl Cluster {
    /// Create a new cluster containing the given `atoms`
    pub fn new(mut atoms: Vec<usize>) -> Cluster {
        atoms.sort_unstable();
        Cluster(atoms)
    }

    /// Get the sorted list of atoms in this cluster
    pub fn atoms(&self) -> &[usize] {
        &self.0
    }

    /// Get the number of atoms in this cluster, counting repeated atoms
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the interaction order corresponding to this cluster
    pub fn order(&self) -> Order {
        Order::from_cluster_size(self.len())
    }
}

impl From<&[usize]> for Cluster {
    fn from(atoms: &[usize]) -> Cluster {
        Cluster::new(atoms.to_vec())
    }
}

/// Set of distinct clusters at a single interaction order
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSet {
    order: Order,
    clusters: BTreeSet<Cluster>,
}

impl ClusterSet {
    /// Create an empty set of clusters for the given `order`
    pub fn new(order: Order) -> ClusterSet {
        ClusterSet {
            order: order,
            clusters: BTreeSet::new(),
        }
    }

    /// Get the interaction order of the clusters in this set
    pub fn order(&self) -> Order {
        self.order
    }

    /// Add a cluster to this set, returning `Ok(false)` if the same cluster
    /// was already present, and an error if the cluster size does not match
    /// the order of this set.
    pub fn insert(&mut self, cluster: Cluster) -> Result<bool, Error> {
        if cluster.len() != self.order.cluster_size() {
            return Err(Error::InvalidParameter(format!(
                "expected a cluster with {} atoms at order {}, got {}",
                self.order.cluster_size(), self.order, cluster.len()
            )));
        }

        return Ok(self.clusters.insert(cluster));
    }

    /// Does this set contain a cluster with the given atoms, in any order?
    pub fn contains(&self, atoms: &[usize]) -> bool {
        self.clusters.contains(&Cluster::from(atoms))
    }

    /// Number of clusters in this set
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Iterate over the clusters in this set, in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.clusters.iter()
    }
}

impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = std::collections::btree_set::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

/// Build the clusters of interacting atoms from the neighbors of the
/// representative atoms.
pub struct ClusterEnumerator<'a> {
    images: &'a PeriodicImages,
    species: &'a [usize],
    cutoffs: &'a CutoffTable,
}

impl<'a> ClusterEnumerator<'a> {
    /// Create a new `ClusterEnumerator` using the positions in `images`, the
    /// `species` of all atoms and the given `cutoffs`.
    pub fn new(images: &'a PeriodicImages, species: &'a [usize], cutoffs: &'a CutoffTable) -> ClusterEnumerator<'a> {
        ClusterEnumerator { images, species, cutoffs }
    }

    /// Check if the atoms in a cluster are all within the cutoff of one
    /// another. The first atom in `atoms` is the reference atom.
    ///
    /// For each of the other atoms, the periodic image closest to the
    /// reference atom is selected, and all pairs of these images must be
    /// within the cutoff for the order of the cluster. The reference atom is
    /// not checked, since the other atoms come from its neighbor list.
    pub fn is_in_cutoff(&self, atoms: &[usize]) -> bool {
        let (&reference, others) = match atoms.split_first() {
            Some(split) => split,
            None => return true,
        };
        let order = Order(atoms.len().saturating_sub(2));

        let nearest = others.iter()
            .map(|&atom| self.images.nearest_image(reference, atom))
            .collect::<Vec<_>>();

        for (i, &first) in others.iter().enumerate() {
            let first_position = self.images.position(nearest[i], first);
            for (j, &second) in others.iter().enumerate().skip(i + 1) {
                let second_position = self.images.position(nearest[j], second);

                let distance = first_position.distance(second_position);
                let cutoff = self.cutoffs.get(self.species[first], self.species[second], order);
                if distance > cutoff {
                    return false;
                }
            }
        }

        return true;
    }

    /// Add all the clusters at `order` built from the `reference` atom and
    /// its `neighbors` to `clusters`, returning the number of candidate
    /// clusters that were considered.
    ///
    /// Beyond the harmonic order, the candidates are all the combinations
    /// with repetition of `order + 1` atoms among the neighbors.
    pub fn add_clusters(
        &self,
        reference: usize,
        neighbors: &[usize],
        order: Order,
        clusters: &mut ClusterSet,
    ) -> Result<usize, Error> {
        if order.is_harmonic() {
            for &neighbor in neighbors {
                clusters.insert(Cluster::new(vec![reference, neighbor]))?;
            }
            return Ok(neighbors.len());
        }

        let mut candidates = 0;
        let mut atoms = Vec::with_capacity(order.cluster_size());
        for combination in neighbors.iter().copied().combinations_with_replacement(order.0 + 1) {
            candidates += 1;

            atoms.clear();
            atoms.push(reference);
            atoms.extend_from_slice(&combination);

            if self.is_in_cutoff(&atoms) {
                clusters.insert(Cluster::new(atoms.clone()))?;
            }
        }

        return Ok(candidates);
    }

    /// Get all the distinct clusters at the given `order`, built from the
    /// representative atoms in `neighbors`.
    #[time_graph::instrument(name = "ClusterEnumerator::enumerate")]
    pub fn enumerate(&self, neighbors: &NeighborList, order: Order) -> Result<ClusterSet, Error> {
        let mut clusters = ClusterSet::new(order);

        let mut candidates = 0;
        for (rep_index, &representative) in neighbors.representatives().iter().enumerate() {
            candidates += self.add_clusters(representative, neighbors.get(rep_index, order), order, &mut clusters)?;
        }

        info!(
            "found {} distinct clusters at order {} from {} candidates",
            clusters.len(), order, candidates
        );

        return Ok(clusters);
    }
}

#[cfg(test)]
mod tests {
    use crate::systems::test_utils::test_structure;
    use crate::{CutoffTable, Order, PeriodicImages, Structure};
    use super::*;

    fn chain_images() -> (Structure, PeriodicImages) {
        let structure = test_structure("chain");
        let (supercell, _) = structure.supercell([3, 1, 1]).unwrap();
        let images = PeriodicImages::new(&supercell.cell(), supercell.fractional_positions(), [1, 1, 1]);
        return (supercell, images);
    }

    fn chain_cutoffs(pairs: f64, triplets: f64) -> CutoffTable {
        let mut cutoffs = CutoffTable::new(1, 2);
        cutoffs.set(0, 0, Order(0), pairs).unwrap();
        cutoffs.set(0, 0, Order(1), triplets).unwrap();
        return cutoffs;
    }

    #[test]
    fn canonical_clusters() {
        let cluster = Cluster::new(vec![5, 2, 9]);
        assert_eq!(cluster.atoms(), [2, 5, 9]);
        assert_eq!(cluster.order(), Order(1));
        assert_eq!(Cluster::new(cluster.atoms().to_vec()), cluster);
        assert_eq!(Cluster::from(&[9, 5, 2][..]), cluster);

        let mut set = ClusterSet::new(Order(1));
        assert!(set.insert(Cluster::new(vec![0, 2, 5])).unwrap());
        assert!(!set.insert(Cluster::new(vec![5, 0, 2])).unwrap());
        assert!(set.insert(Cluster::new(vec![0, 0, 5])).unwrap());
        assert_eq!(set.len(), 2);
        assert!(set.contains(&[2, 5, 0]));
        assert!(!set.contains(&[0, 5, 5]));

        let atoms = set.iter().map(|c| c.atoms().to_vec()).collect::<Vec<_>>();
        assert_eq!(atoms, [vec![0, 0, 5], vec![0, 2, 5]]);
    }

    #[test]
    fn wrong_cluster_size() {
        let mut set = ClusterSet::new(Order(0));
        let error = set.insert(Cluster::new(vec![0, 1, 2])).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid parameter: expected a cluster with 2 atoms at order HARMONIC, got 3"
        );
        assert!(set.is_empty());

        // the set passed to add_clusters must match the requested order
        let (supercell, images) = chain_images();
        let cutoffs = chain_cutoffs(1.5, 1.5);
        let enumerator = ClusterEnumerator::new(&images, supercell.species(), &cutoffs);
        let error = enumerator.add_clusters(0, &[0, 1], Order(1), &mut set).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid parameter: expected a cluster with 2 atoms at order HARMONIC, got 3"
        );
    }

    #[test]
    fn pairs() {
        let (supercell, images) = chain_images();
        let cutoffs = chain_cutoffs(1.5, 1.5);
        let enumerator = ClusterEnumerator::new(&images, supercell.species(), &cutoffs);

        let mut clusters = ClusterSet::new(Order(0));
        let candidates = enumerator.add_clusters(0, &[0, 1, 11], Order(0), &mut clusters).unwrap();
        assert_eq!(candidates, 3);
        assert_eq!(clusters.len(), 3);
        assert!(clusters.contains(&[0, 0]));
        assert!(clusters.contains(&[1, 0]));
        assert!(clusters.contains(&[0, 11]));
    }

    #[test]
    fn multi_body_cutoff() {
        // 12 atoms with spacing 1 along a periodic chain of length 12
        let (supercell, images) = chain_images();
        let cutoffs = chain_cutoffs(3.0, 1.5);
        let enumerator = ClusterEnumerator::new(&images, supercell.species(), &cutoffs);

        assert!(enumerator.is_in_cutoff(&[0, 1, 2]));
        assert!(enumerator.is_in_cutoff(&[0, 10, 10]));
        // the images of 10 and 11 closest to 0 are at -2 and -1
        assert!(enumerator.is_in_cutoff(&[0, 11, 10]));
        assert!(!enumerator.is_in_cutoff(&[0, 1, 11]));
        assert!(!enumerator.is_in_cutoff(&[0, 2, 10]));
        assert!(!enumerator.is_in_cutoff(&[3, 1, 5]));

        // 0 and 11 are neighbors, but not through their images closest to 6
        assert!(!enumerator.is_in_cutoff(&[6, 0, 11]));
        assert!(enumerator.is_in_cutoff(&[0, 0, 11]));
    }

    #[test]
    fn triplets_from_neighbors() {
        let (supercell, images) = chain_images();
        let cutoffs = chain_cutoffs(3.0, 1.5);
        let enumerator = ClusterEnumerator::new(&images, supercell.species(), &cutoffs);

        let mut clusters = ClusterSet::new(Order(1));
        let candidates = enumerator.add_clusters(0, &[2, 5, 9], Order(1), &mut clusters).unwrap();
        assert_eq!(candidates, 6);

        // only the repeated atoms are within the cutoff of one another
        let atoms = clusters.iter().map(|c| c.atoms().to_vec()).collect::<Vec<_>>();
        assert_eq!(atoms, [vec![0, 2, 2], vec![0, 5, 5], vec![0, 9, 9]]);
        assert!(!clusters.contains(&[0, 2, 5]));
        assert!(!clusters.contains(&[0, 5, 9]));
    }

    #[test]
    fn empty_neighbors() {
        let (supercell, images) = chain_images();
        let cutoffs = chain_cutoffs(3.0, 1.5);
        let enumerator = ClusterEnumerator::new(&images, supercell.species(), &cutoffs);

        let mut clusters = ClusterSet::new(Order(1));
        assert_eq!(enumerator.add_clusters(0, &[], Order(1), &mut clusters).unwrap(), 0);
        assert!(clusters.is_empty());
    }

    fn binomial(n: usize, k: usize) -> usize {
        let mut result = 1;
        for i in 0..k {
            result = result * (n - i) / (i + 1);
        }
        return result;
    }

    #[test]
    fn candidates_count() {
        let (supercell, images) = chain_images();
        let mut cutoffs = CutoffTable::new(1, 5);
        for order in 0..5 {
            cutoffs.set(0, 0, Order(order), 1.5).unwrap();
        }
        let enumerator = ClusterEnumerator::new(&images, supercell.species(), &cutoffs);

        let neighbors = [0, 1, 2, 10, 11];
        for order in 1..5 {
            let mut clusters = ClusterSet::new(Order(order));
            let candidates = enumerator.add_clusters(0, &neighbors, Order(order), &mut clusters).unwrap();
            assert_eq!(candidates, binomial(neighbors.len() + order, order + 1));
            assert!(clusters.iter().all(|cluster| cluster.len() == order + 2));
        }
    }

    #[test]
    fn combinations_with_repetition() {
        let combinations = [2, 5, 9].iter().copied().combinations_with_replacement(2).collect::<Vec<_>>();
        assert_eq!(combinations, [
            [2, 2], [2, 5], [2, 9], [5, 5], [5, 9], [9, 9]
        ]);

        let combinations = ['a', 'b'].iter().copied().combinations_with_replacement(3).collect::<Vec<_>>();
        assert_eq!(combinations, [
            vec!['a', 'a', 'a'],
            vec!['a', 'a', 'b'],
            vec!['a', 'b', 'b'],
            vec!['b', 'b', 'b'],
        ]);

        for combination in [1, 4, 6, 7].iter().copied().combinations_with_replacement(3) {
            assert!(combination.windows(2).all(|w| w[0] <= w[1]));
        }

        let empty: [usize; 0] = [];
        assert_eq!(empty.iter().copied().combinations_with_replacement(2).count(), 0);

        let combinations = [3].iter().copied().combinations_with_replacement(2).collect::<Vec<_>>();
        assert_eq!(combinations, [[3, 3]]);
    }

    #[test]
    fn enumerate() {
        let (supercell, images) = chain_images();
        let cutoffs = chain_cutoffs(1.5, 1.5);
        let neighbors = NeighborList::new(&images, &[0, 1, 2, 3], supercell.species(), &cutoffs).unwrap();
        let enumerator = ClusterEnumerator::new(&images, supercell.species(), &cutoffs);

        let pairs = enumerator.enumerate(&neighbors, Order(0)).unwrap();
        assert_eq!(pairs.order(), Order(0));
        // self pairs 0-0 to 3-3, nearest neighbors pairs 0-1, 1-2, 2-3, 3-4
        // and 0-11
        assert_eq!(pairs.len(), 9);
        assert!(pairs.contains(&[11, 0]));
        assert!(pairs.contains(&[3, 4]));

        let triplets = enumerator.enumerate(&neighbors, Order(1)).unwrap();
        assert_eq!(triplets.order(), Order(1));
        assert_eq!(triplets.len(), 14);
        assert!(triplets.iter().all(|cluster| cluster.len() == 3));

        assert!(triplets.contains(&[0, 1, 1]));
        assert!(triplets.contains(&[11, 0, 0]));
        assert!(triplets.contains(&[3, 4, 4]));
        assert!(!triplets.contains(&[0, 1, 11]));
        assert!(!triplets.contains(&[1, 2, 3]));
    }
}
