//! Social Network
//!
//! Sparse symmetric adjacency over the population. Backed by an
//! array-of-lists, which fits the small, moderately dense populations this
//! engine targets; callers only see `neighbors`, `degree`, and `add_edge`.

use serde::{Deserialize, Serialize};

use super::agent::AgentId;

/// Undirected social network over agents `0..n`.
///
/// No self-loops, no duplicate edges. Symmetry is an invariant once
/// construction completes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialNetwork {
    adjacency: Vec<Vec<AgentId>>,
}

impl SocialNetwork {
    /// An edgeless network over `n` agents.
    pub fn with_nodes(n: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); n],
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbor ids of an agent, in insertion order.
    pub fn neighbors(&self, id: AgentId) -> &[AgentId] {
        &self.adjacency[id]
    }

    pub fn degree(&self, id: AgentId) -> usize {
        self.adjacency[id].len()
    }

    pub fn has_edge(&self, a: AgentId, b: AgentId) -> bool {
        self.adjacency[a].contains(&b)
    }

    /// Insert the undirected edge `a-b`. Returns false for self-loops and
    /// duplicates, which are silently skipped.
    pub fn add_edge(&mut self, a: AgentId, b: AgentId) -> bool {
        if a == b || self.has_edge(a, b) {
            return false;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        true
    }

    /// Total number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Check that every edge is present in both directions.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(i, neighbors)| {
            neighbors.iter().all(|&j| self.adjacency[j].contains(&i))
        })
    }

    /// Ids sorted by degree, highest first (used by hub interventions).
    pub fn ids_by_degree_desc(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = (0..self.len()).collect();
        ids.sort_by(|&a, &b| self.degree(b).cmp(&self.degree(a)).then(a.cmp(&b)));
        ids
    }
}
