use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::feedback::Checkpoint;
use crate::graph::{EdgeId, LineGraph, Vertex};

/// Maps each directed edge to its anti-parallel twin.
///
/// Only edges with a twin take part in the analysis. The map is
/// symmetric: `get(get(e)) == Some(e)` for every paired `e`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgePairs {
    pairs: Vec<Option<EdgeId>>,
    count: usize,
}

impl EdgePairs {
    /// Returns the twin of `edge`, if it has one.
    #[must_use]
    pub fn get(&self, edge: EdgeId) -> Option<EdgeId> {
        self.pairs.get(edge.0).copied().flatten()
    }

    /// Returns `true` if `edge` has a twin.
    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.get(edge).is_some()
    }

    /// Returns the number of paired directed edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no edge is paired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterates over `(edge, twin)` in ascending edge order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, EdgeId)> + '_ {
        self.pairs
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|twin| (EdgeId(i), twin)))
    }

    /// Paired edges leaving `vertex`.
    pub fn outgoing<'a>(&'a self, vertex: &'a Vertex) -> impl Iterator<Item = EdgeId> + 'a {
        vertex.outgoing.iter().copied().filter(|&e| self.contains(e))
    }

    /// Paired edges arriving at `vertex`.
    pub fn incoming<'a>(&'a self, vertex: &'a Vertex) -> impl Iterator<Item = EdgeId> + 'a {
        vertex.incoming.iter().copied().filter(|&e| self.contains(e))
    }
}

/// Finds the anti-parallel twin of every directed edge.
///
/// Incoming edges of each vertex are first reduced to one edge per source
/// vertex (the lowest id), which drops literal duplicates. Self-loops never
/// pair. An edge whose reverse is missing stays unpaired, which excludes
/// it from the rest of the analysis.
///
/// # Errors
///
/// Returns `AnalysisError::Canceled` if the checkpoint reports cancellation.
pub fn resolve_edge_pairs(graph: &LineGraph, checkpoint: &mut Checkpoint<'_>) -> Result<EdgePairs> {
    let mut unique_incoming: Vec<Vec<EdgeId>> = Vec::with_capacity(graph.vertex_count());
    for (_, vertex) in graph.vertices() {
        let mut sources = HashSet::new();
        let mut kept = Vec::with_capacity(vertex.incoming.len());
        for &e in &vertex.incoming {
            let edge = graph.edge(e)?;
            if !edge.is_loop() && sources.insert(edge.from) {
                kept.push(e);
            }
        }
        unique_incoming.push(kept);
        checkpoint.tick()?;
    }

    let mut pairs = vec![None; graph.edge_count()];
    let mut count = 0;
    for (v, kept) in unique_incoming.iter().enumerate() {
        for &e in kept {
            let from = graph.edge(e)?.from;
            let mut twin = None;
            for &candidate in &unique_incoming[from.0] {
                if graph.edge(candidate)?.from.0 == v {
                    twin = Some(candidate);
                    break;
                }
            }
            if let Some(twin) = twin {
                pairs[e.0] = Some(twin);
                count += 1;
            }
        }
        checkpoint.tick()?;
    }

    debug!(
        paired = count,
        unpaired = graph.edge_count() - count,
        "edge pairs resolved"
    );
    Ok(EdgePairs { pairs, count })
}
