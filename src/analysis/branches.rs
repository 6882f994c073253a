use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::graph::{EdgeId, LineGraph, VertexId};

use super::edge_pairs::EdgePairs;

/// Dead-end chains found by leaf peeling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branches {
    is_branch: Vec<bool>,
    visited: Vec<bool>,
}

impl Branches {
    /// Returns `true` if `edge` lies on a dead-end chain.
    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.is_branch.get(edge.0).copied().unwrap_or(false)
    }

    /// Branch edges in ascending order, both directions included.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        flagged(&self.is_branch).map(EdgeId)
    }

    /// Vertices popped while peeling, in ascending order.
    pub fn visited_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        flagged(&self.visited).map(VertexId)
    }

    /// Returns the number of branch edges, both directions counted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.is_branch.iter().filter(|&&b| b).count()
    }

    /// Returns `true` if no edge is a branch edge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_branch.contains(&true)
    }
}

fn flagged(flags: &[bool]) -> impl Iterator<Item = usize> + '_ {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
}

/// Peels pendant chains off the simple graph.
///
/// Every vertex with a single paired edge starts a chain. The chain eats
/// its edge, moves to the other end, and keeps going while the vertex it
/// reaches has exactly one edge left; it stops at a real junction.
///
/// A component without any junction (a bare path) has nothing to hang
/// from, so its edges are never reported as branches.
///
/// # Errors
///
/// Returns `AnalysisError::Inconsistent` if a paired edge has lost its twin.
pub fn find_branches(graph: &LineGraph, pairs: &EdgePairs) -> Result<Branches> {
    let mut is_branch = vec![false; graph.edge_count()];
    let mut visited = vec![false; graph.vertex_count()];

    let mut leaves: Vec<VertexId> = graph
        .vertices()
        .filter(|(_, v)| pairs.outgoing(v).count() == 1)
        .map(|(id, _)| id)
        .collect();

    while let Some(v) = leaves.pop() {
        visited[v.0] = true;
        let vertex = graph.vertex(v)?;
        let Some(e) = pairs.outgoing(vertex).find(|e| !is_branch[e.0]) else {
            continue;
        };
        let twin = pairs
            .get(e)
            .ok_or_else(|| AnalysisError::Inconsistent(format!("edge {e} has no twin")))?;
        is_branch[e.0] = true;
        is_branch[twin.0] = true;

        let w = graph.edge(e)?.to;
        if !visited[w.0] {
            let left = pairs
                .outgoing(graph.vertex(w)?)
                .filter(|e| !is_branch[e.0])
                .count();
            if left == 1 {
                leaves.push(w);
            }
        }
    }

    let released = release_bare_paths(graph, pairs, &mut is_branch)?;
    let branches = Branches { is_branch, visited };
    debug!(
        branch_edges = branches.len(),
        released, "dead-end branches peeled"
    );
    Ok(branches)
}

/// Clears the branch flag in components that have no junction vertex.
///
/// Returns the number of directed edges released.
fn release_bare_paths(
    graph: &LineGraph,
    pairs: &EdgePairs,
    is_branch: &mut [bool],
) -> Result<usize> {
    let mut component = vec![false; graph.vertex_count()];
    let mut released = 0;

    for (root, _) in graph.vertices() {
        if component[root.0] {
            continue;
        }
        component[root.0] = true;
        let mut stack = vec![root];
        let mut edges = Vec::new();
        let mut has_junction = false;

        while let Some(v) = stack.pop() {
            let vertex = graph.vertex(v)?;
            let mut degree = 0;
            for e in pairs.outgoing(vertex) {
                degree += 1;
                edges.push(e);
                let w = graph.edge(e)?.to;
                if !component[w.0] {
                    component[w.0] = true;
                    stack.push(w);
                }
            }
            has_junction |= degree >= 3;
        }

        if !has_junction {
            for e in edges {
                if is_branch[e.0] {
                    is_branch[e.0] = false;
                    released += 1;
                }
            }
        }
    }
    Ok(released)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::analysis::edge_pairs::resolve_edge_pairs;
    use crate::analysis::fixtures;
    use crate::feedback::{Checkpoint, NoFeedback};
    use crate::graph::GraphBuilder;
    use crate::math::Point2;

    fn branches(graph: &LineGraph) -> Branches {
        let pairs = resolve_edge_pairs(graph, &mut Checkpoint::new(&NoFeedback, 1)).unwrap();
        find_branches(graph, &pairs).unwrap()
    }

    #[test]
    fn lollipop_tail_is_a_branch() {
        let b = branches(&fixtures::lollipop());
        assert_eq!(b.edges().collect::<Vec<_>>(), vec![EdgeId(6), EdgeId(7)]);
        assert_eq!(b.visited_vertices().collect::<Vec<_>>(), vec![VertexId(3)]);
    }

    #[test]
    fn chain_stops_at_the_junction() {
        let mut builder = GraphBuilder::new(0.0).unwrap();
        builder
            .add_polyline(&[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(0.5, 1.0),
                Point2::new(0.0, 0.0),
            ])
            .unwrap();
        builder
            .add_polyline(&[
                Point2::new(0.0, 0.0),
                Point2::new(-1.0, 0.0),
                Point2::new(-2.0, 0.0),
            ])
            .unwrap();
        let b = branches(&builder.build());
        assert_eq!(b.len(), 4);
        assert!((0..6).all(|i| !b.contains(EdgeId(i))));
    }

    #[test]
    fn star_is_peeled_completely() {
        let b = branches(&fixtures::star());
        assert_eq!(b.len(), 6);
        assert_eq!(b.visited_vertices().count(), 4);
    }

    #[test]
    fn cycles_have_no_branches() {
        assert!(branches(&fixtures::triangle()).is_empty());
        assert!(branches(&fixtures::grid_2x2()).is_empty());
        assert!(branches(&fixtures::dumbbell()).is_empty());
    }

    #[test]
    fn isolated_segment_is_not_a_branch() {
        let b = branches(&fixtures::single_segment());
        assert!(b.is_empty());
        assert!(!b.contains(EdgeId(0)));
    }

    #[test]
    fn bare_path_is_not_a_branch() {
        let b = branches(&fixtures::path());
        assert!(b.is_empty());
        assert_eq!(b.visited_vertices().count(), 4);
    }
}
