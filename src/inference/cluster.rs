//! Grouping of observations by cluster label.

use std::collections::HashMap;
use std::hash::Hash;

/// Observation indices grouped by cluster label.
///
/// Clusters are numbered in order of first appearance, so iteration order
/// (and any floating-point accumulation over clusters) depends only on the
/// order of the labels, never on hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIndex {
    members: Vec<Vec<usize>>,
    assignment: Vec<usize>,
}

impl ClusterIndex {
    /// Group observations `0..labels.len()` by label.
    pub fn new<L: Eq + Hash>(labels: &[L]) -> Self {
        let mut lookup: HashMap<&L, usize> = HashMap::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut assignment = Vec::with_capacity(labels.len());

        for (i, label) in labels.iter().enumerate() {
            let next = members.len();
            let g = *lookup.entry(label).or_insert(next);
            if g == next {
                members.push(Vec::new());
            }
            members[g].push(i);
            assignment.push(g);
        }

        Self {
            members,
            assignment,
        }
    }

    /// Number of distinct clusters `G`.
    pub fn n_clusters(&self) -> usize {
        self.members.len()
    }

    /// Number of observations.
    pub fn n_observations(&self) -> usize {
        self.assignment.len()
    }

    /// Size of each cluster, in first-appearance order.
    pub fn sizes(&self) -> Vec<usize> {
        self.members.iter().map(Vec::len).collect()
    }

    /// Observation indices of cluster `g`.
    pub fn members(&self, g: usize) -> &[usize] {
        &self.members[g]
    }

    /// Cluster number of each observation.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Whether every cluster has exactly one observation.
    pub fn all_singletons(&self) -> bool {
        self.members.iter().all(|m| m.len() == 1)
    }

    /// Iterate over the member lists in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.members.iter().map(Vec::as_slice)
    }
}
