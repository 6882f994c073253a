use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::graph::{EdgeId, LineGraph};
use crate::output::Segment2;

use super::branches::Branches;
use super::circuits::CircuitGroup;
use super::edge_pairs::EdgePairs;

/// Bridge edges, one directed edge per line section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BottleneckSet {
    edges: Vec<EdgeId>,
}

impl BottleneckSet {
    /// Representative edges in ascending order. Each is the lower id of its pair.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Returns `true` if `edge` is a representative in the set.
    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.binary_search(&edge).is_ok()
    }

    /// Returns the number of bottleneck sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no bottleneck was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Collects the edges whose twin lies on the same circuit.
///
/// Both directions of a bridge bound the same walk, since no cycle passes
/// around it. Each section is reported once, through the lower of its two
/// edge ids. Edges in `exclude` (the dead-end branches, unless those are
/// wanted) are dropped.
///
/// # Errors
///
/// Returns `AnalysisError::Inconsistent` if a circuit edge has no twin.
pub fn find_bottlenecks(
    groups: &[CircuitGroup],
    pairs: &EdgePairs,
    exclude: Option<&Branches>,
) -> Result<BottleneckSet> {
    let mut found = BTreeSet::new();
    for circuit in groups.iter().flat_map(CircuitGroup::circuits) {
        let on_circuit: HashSet<EdgeId> = circuit.edges().iter().copied().collect();
        for &e in circuit.edges() {
            let twin = pairs
                .get(e)
                .ok_or_else(|| AnalysisError::Inconsistent(format!("edge {e} has no twin")))?;
            if on_circuit.contains(&twin) {
                found.insert(e.min(twin));
            }
        }
    }

    let bridges = found.len();
    if let Some(branches) = exclude {
        found.retain(|&e| !branches.contains(e));
    }
    debug!(
        bridges,
        kept = found.len(),
        "bottleneck edges extracted"
    );
    Ok(BottleneckSet {
        edges: found.into_iter().collect(),
    })
}

/// Returns the `(from, to)` points of every bottleneck edge.
///
/// # Errors
///
/// Returns `GraphError` if an edge or vertex is missing from `graph`.
pub fn bottleneck_segments(graph: &LineGraph, set: &BottleneckSet) -> Result<Vec<Segment2>> {
    set.edges()
        .iter()
        .map(|&e| {
            let edge = graph.edge(e)?;
            Ok(Segment2::new(graph.point(edge.from)?, graph.point(edge.to)?))
        })
        .collect()
}
