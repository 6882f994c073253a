use std::collections::VecDeque;

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::feedback::Checkpoint;
use crate::graph::{EdgeId, LineGraph};

use super::edge_pairs::EdgePairs;
use super::rotation::RotationModel;

/// A closed walk over paired edges under the rotation model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    edges: Vec<EdgeId>,
}

impl Circuit {
    /// Edges in walk order, starting with the edge that opened the circuit.
    #[must_use]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Returns the number of edges in the walk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Always `false`: a circuit holds at least its opening edge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns `true` if the walk passes through `edge`.
    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }
}

/// The circuits of one connected component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitGroup {
    circuits: Vec<Circuit>,
}

impl CircuitGroup {
    /// Circuits in discovery order.
    #[must_use]
    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    /// Total number of edges over all circuits of the group.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.circuits.iter().map(Circuit::len).sum()
    }
}

/// Splits the paired edges into closed walks, one group per component.
///
/// A walk always leaves through the first rotation candidate of the edge
/// it arrived on, until it gets back to its opening edge. The remaining
/// candidates of every edge walked so far stay on a stack of queues and
/// seed the next walks, which spreads the search over the whole
/// connected component. When the stack runs dry the component is done,
/// and the next group starts at the destination of the lowest unassigned
/// paired edge.
///
/// A bridge shows up as a walk that passes through both of its edges.
///
/// # Errors
///
/// Returns `AnalysisError::Inconsistent` if a walk meets an edge twice or
/// finds no rotation entry, and `AnalysisError::Canceled` if the
/// checkpoint reports cancellation.
pub fn decompose_circuits(
    graph: &LineGraph,
    rotation: &RotationModel,
    pairs: &EdgePairs,
    checkpoint: &mut Checkpoint<'_>,
) -> Result<Vec<CircuitGroup>> {
    let total = pairs.len();
    let mut groups = Vec::new();
    if total == 0 {
        return Ok(groups);
    }

    let mut assigned = vec![false; graph.edge_count()];
    let mut remaining = total;
    let mut cursor = 0;

    while remaining > 0 {
        let Some(seed) = next_unassigned(pairs, &assigned, &mut cursor) else {
            return Err(AnalysisError::Inconsistent(format!(
                "{remaining} paired edges left but none unassigned"
            ))
            .into());
        };
        let origin = graph.vertex(graph.edge(seed)?.to)?;
        let mut frontier: Vec<VecDeque<EdgeId>> = vec![pairs.outgoing(origin).collect()];
        let mut group = CircuitGroup::default();

        while let Some(queue) = frontier.last_mut() {
            let Some(start) = queue.pop_front() else {
                frontier.pop();
                continue;
            };
            if assigned[start.0] {
                continue;
            }
            let circuit =
                trace_circuit(start, rotation, &mut assigned, &mut frontier, total, checkpoint)?;
            remaining = remaining.saturating_sub(circuit.len());
            group.circuits.push(circuit);
        }

        if group.circuits.is_empty() {
            return Err(AnalysisError::Inconsistent(format!(
                "component seeded by edge {seed} produced no circuit"
            ))
            .into());
        }
        debug!(
            group = groups.len(),
            circuits = group.circuits.len(),
            edges = group.edge_count(),
            "component decomposed"
        );
        groups.push(group);
    }

    Ok(groups)
}

/// Walks from `start` until the rotation model leads back to it.
fn trace_circuit(
    start: EdgeId,
    rotation: &RotationModel,
    assigned: &mut [bool],
    frontier: &mut Vec<VecDeque<EdgeId>>,
    limit: usize,
    checkpoint: &mut Checkpoint<'_>,
) -> Result<Circuit> {
    let mut edges = vec![start];
    assigned[start.0] = true;
    frontier.push(candidates(rotation, start)?);
    checkpoint.tick()?;

    loop {
        let next = frontier
            .last_mut()
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                AnalysisError::Inconsistent(format!("walk from edge {start} stalled"))
            })?;
        if next == start {
            return Ok(Circuit { edges });
        }
        if assigned[next.0] {
            return Err(AnalysisError::Inconsistent(format!(
                "edge {next} reached twice while walking from edge {start}"
            ))
            .into());
        }
        if edges.len() >= limit {
            return Err(AnalysisError::Inconsistent(format!(
                "walk from edge {start} exceeds {limit} edges"
            ))
            .into());
        }
        assigned[next.0] = true;
        edges.push(next);
        frontier.push(candidates(rotation, next)?);
        checkpoint.tick()?;
    }
}

fn candidates(rotation: &RotationModel, edge: EdgeId) -> Result<VecDeque<EdgeId>> {
    rotation
        .successors(edge)
        .map(|s| s.iter().copied().collect())
        .ok_or_else(|| {
            AnalysisError::Inconsistent(format!("edge {edge} has no rotation entry")).into()
        })
}

/// Advances `cursor` to the lowest paired edge not yet assigned.
fn next_unassigned(pairs: &EdgePairs, assigned: &[bool], cursor: &mut usize) -> Option<EdgeId> {
    while *cursor < assigned.len() {
        let e = EdgeId(*cursor);
        if pairs.contains(e) && !assigned[e.0] {
            return Some(e);
        }
        *cursor += 1;
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::analysis::edge_pairs::resolve_edge_pairs;
    use crate::analysis::fixtures;
    use crate::analysis::rotation::build_rotation_model;
    use crate::feedback::{NoFeedback, ProgressFeedback};

    fn decompose(graph: &LineGraph) -> (EdgePairs, RotationModel, Vec<CircuitGroup>) {
        let mut cp = Checkpoint::new(&NoFeedback, 1);
        let pairs = resolve_edge_pairs(graph, &mut cp).unwrap();
        let rotation = build_rotation_model(graph, &pairs, &mut cp).unwrap();
        let groups = decompose_circuits(graph, &rotation, &pairs, &mut cp).unwrap();
        (pairs, rotation, groups)
    }

    fn assert_partition(pairs: &EdgePairs, groups: &[CircuitGroup]) {
        let mut seen = HashSet::new();
        for c in groups.iter().flat_map(CircuitGroup::circuits) {
            for &e in c.edges() {
                assert!(pairs.contains(e));
                assert!(seen.insert(e), "edge {e} assigned twice");
            }
        }
        assert_eq!(seen.len(), pairs.len());
    }

    #[test]
    fn single_segment_is_one_out_and_back_walk() {
        let g = fixtures::single_segment();
        let (_, _, groups) = decompose(&g);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].circuits().len(), 1);
        assert_eq!(groups[0].circuits()[0].edges(), &[EdgeId(1), EdgeId(0)]);
    }

    #[test]
    fn triangle_has_inner_and_outer_walk() {
        let g = fixtures::triangle();
        let (pairs, _, groups) = decompose(&g);
        assert_eq!(groups.len(), 1);
        let lens: Vec<usize> = groups[0].circuits().iter().map(Circuit::len).collect();
        assert_eq!(lens, vec![3, 3]);
        assert_partition(&pairs, &groups);
    }

    #[test]
    fn lollipop_tail_shares_the_outer_walk() {
        let g = fixtures::lollipop();
        let (pairs, _, groups) = decompose(&g);
        assert_eq!(groups.len(), 1);
        assert_partition(&pairs, &groups);
        let outer = groups[0]
            .circuits()
            .iter()
            .find(|c| c.contains(EdgeId(6)))
            .unwrap();
        assert!(outer.contains(EdgeId(7)));
        assert_eq!(outer.len(), 5);
    }

    #[test]
    fn disconnected_parts_form_separate_groups() {
        let g = fixtures::two_triangles();
        let (pairs, _, groups) = decompose(&g);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|grp| grp.edge_count() == 6));
        assert_partition(&pairs, &groups);
    }

    #[test]
    fn every_walk_follows_the_first_candidate() {
        for g in [fixtures::grid_2x2(), fixtures::dumbbell(), fixtures::star()] {
            let (pairs, rotation, groups) = decompose(&g);
            assert_partition(&pairs, &groups);
            for c in groups.iter().flat_map(CircuitGroup::circuits) {
                let edges = c.edges();
                let mut e = edges[0];
                for i in 0..edges.len() {
                    assert_eq!(e, edges[i]);
                    e = rotation.next(e).unwrap();
                }
                assert_eq!(e, edges[0], "walk must close on its opening edge");
            }
        }
    }

    #[test]
    fn empty_pairs_give_no_groups() {
        let g = LineGraph::new();
        let (_, _, groups) = decompose(&g);
        assert!(groups.is_empty());
    }

    #[test]
    fn revisited_edge_is_inconsistent() {
        let g = fixtures::single_segment();
        let mut cp = Checkpoint::new(&NoFeedback, 1);
        let pairs = resolve_edge_pairs(&g, &mut cp).unwrap();
        let rotation = RotationModel::from_entries(vec![vec![EdgeId(0)], vec![EdgeId(0)]]);
        let err = decompose_circuits(&g, &rotation, &pairs, &mut cp).unwrap_err();
        assert!(matches!(
            err,
            crate::error::BottleneckError::Analysis(AnalysisError::Inconsistent(_))
        ));
    }

    #[test]
    fn missing_rotation_entry_is_inconsistent() {
        let g = fixtures::single_segment();
        let mut cp = Checkpoint::new(&NoFeedback, 1);
        let pairs = resolve_edge_pairs(&g, &mut cp).unwrap();
        let rotation = RotationModel::from_entries(vec![vec![EdgeId(1)], Vec::new()]);
        let err = decompose_circuits(&g, &rotation, &pairs, &mut cp).unwrap_err();
        assert!(!err.is_canceled());
    }

    #[test]
    fn cancellation_stops_the_walk() {
        let g = fixtures::grid_2x2();
        let mut cp = Checkpoint::new(&NoFeedback, 1);
        let pairs = resolve_edge_pairs(&g, &mut cp).unwrap();
        let rotation = build_rotation_model(&g, &pairs, &mut cp).unwrap();

        let fb = ProgressFeedback::new();
        fb.cancel();
        let mut cp = Checkpoint::new(&fb, 5);
        let err = decompose_circuits(&g, &rotation, &pairs, &mut cp).unwrap_err();
        assert!(err.is_canceled());
        assert_eq!(cp.polls(), 1);
    }
}
