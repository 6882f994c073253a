use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::feedback::Checkpoint;
use crate::graph::{EdgeId, LineGraph};
use crate::math::azimuth;

use super::edge_pairs::EdgePairs;

/// Clockwise rotation system over the paired edges.
///
/// For an edge arriving at a vertex, the entry lists the edges that leave
/// that vertex, in clockwise order starting right after the arrival
/// direction. The first entry is the walk's successor; the rest are the
/// alternatives tried when exploring the junction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationModel {
    entries: Vec<Vec<EdgeId>>,
    count: usize,
}

impl RotationModel {
    /// Returns the departure candidates after arriving through `edge`.
    #[must_use]
    pub fn successors(&self, edge: EdgeId) -> Option<&[EdgeId]> {
        self.entries
            .get(edge.0)
            .filter(|s| !s.is_empty())
            .map(Vec::as_slice)
    }

    /// Returns the first departure candidate after arriving through `edge`.
    #[must_use]
    pub fn next(&self, edge: EdgeId) -> Option<EdgeId> {
        self.successors(edge).and_then(|s| s.first().copied())
    }

    /// Returns the number of edges with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no edge has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<Vec<EdgeId>>) -> Self {
        let count = entries.iter().filter(|e| !e.is_empty()).count();
        Self { entries, count }
    }
}

/// Orders the paired edges around every vertex clockwise.
///
/// Incoming edges of a vertex are sorted by the bearing from the vertex
/// toward their source, ties broken by ascending edge id. An edge at
/// sorted position `i` maps to the twins of the edges at positions
/// `i + 1, i + 2, …` (wrapping), itself excluded. A lone incoming edge
/// maps to its own twin, which turns the walk around at dead ends.
///
/// # Errors
///
/// Returns `AnalysisError::Canceled` if the checkpoint reports cancellation.
pub fn build_rotation_model(
    graph: &LineGraph,
    pairs: &EdgePairs,
    checkpoint: &mut Checkpoint<'_>,
) -> Result<RotationModel> {
    let mut entries = vec![Vec::new(); graph.edge_count()];
    let mut count = 0;

    for (_, vertex) in graph.vertices() {
        let incoming: Vec<EdgeId> = pairs.incoming(vertex).collect();
        match incoming.as_slice() {
            [] => {}
            [only] => {
                entries[only.0] = vec![twin(pairs, *only)?];
                count += 1;
            }
            _ => {
                let mut around = Vec::with_capacity(incoming.len());
                for &e in &incoming {
                    let source = graph.point(graph.edge(e)?.from)?;
                    around.push((azimuth(&vertex.point, &source), e));
                }
                around.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

                let n = around.len();
                for (i, &(_, e)) in around.iter().enumerate() {
                    let mut entry = Vec::with_capacity(n - 1);
                    for k in 1..n {
                        entry.push(twin(pairs, around[(i + k) % n].1)?);
                    }
                    entries[e.0] = entry;
                    count += 1;
                }
            }
        }
        checkpoint.tick()?;
    }

    debug!(entries = count, "rotation model built");
    Ok(RotationModel { entries, count })
}

fn twin(pairs: &EdgePairs, edge: EdgeId) -> Result<EdgeId> {
    pairs
        .get(edge)
        .ok_or_else(|| AnalysisError::Inconsistent(format!("edge {edge} has no twin")).into())
}
