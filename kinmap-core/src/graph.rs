// Marker/edge connectivity

use crate::cluster::Marker;
use crate::edges::Edge;
use crate::record::Coordinate;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Dfs;
use std::collections::HashMap;
use tracing::warn;

/// Undirected graph with one node per marker (weight = marker index) and one
/// edge per inferred edge (weight = edge index).
pub struct MarkerGraph {
    graph: UnGraph<usize, usize>,
}

impl MarkerGraph {
    pub fn build(markers: &[Marker], edges: &[Edge]) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut by_coordinate: HashMap<Coordinate, NodeIndex> = HashMap::new();

        for (idx, marker) in markers.iter().enumerate() {
            let node = graph.add_node(idx);
            by_coordinate.insert(marker.coordinate, node);
        }

        for (idx, edge) in edges.iter().enumerate() {
            let source = by_coordinate.get(&edge.source.coordinate);
            let target = by_coordinate.get(&edge.target.coordinate);
            match (source, target) {
                (Some(&a), Some(&b)) => {
                    graph.add_edge(a, b, idx);
                }
                _ => warn!("Edge {} has an endpoint without a marker, skipping", idx),
            }
        }

        Self { graph }
    }

    pub fn group_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Connected groups of marker indices, largest first. Groups of equal
    /// size keep marker order.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.graph.node_count()];
        let mut groups = Vec::new();

        for start in self.graph.node_indices() {
            if seen[start.index()] {
                continue;
            }
            let mut group = Vec::new();
            let mut dfs = Dfs::new(&self.graph, start);
            while let Some(node) = dfs.next(&self.graph) {
                seen[node.index()] = true;
                group.push(self.graph[node]);
            }
            group.sort_unstable();
            groups.push(group);
        }

        groups.sort_by(|a, b| b.len().cmp(&a.len()));
        groups
    }

    /// Number of edges touching the marker at `marker_index`.
    pub fn degree(&self, marker_index: usize) -> usize {
        if marker_index >= self.graph.node_count() {
            return 0;
        }
        self.graph.edges(NodeIndex::new(marker_index)).count()
    }
}
