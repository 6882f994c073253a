use tracing::{debug, info};

use crate::error::Result;
use crate::feedback::{Checkpoint, Feedback};
use crate::graph::{GraphBuilder, LineGraph};
use crate::math::Point2;
use crate::output::{BottleneckLayer, SegmentSink};
use crate::params::BottleneckParams;

use super::bottlenecks::{bottleneck_segments, find_bottlenecks};
use super::branches::find_branches;
use super::circuits::decompose_circuits;
use super::edge_pairs::resolve_edge_pairs;
use super::rotation::build_rotation_model;

// Progress budget per stage, in percent. They add up to 100.
const INTAKE_PROGRESS: f64 = 10.0;
const PAIRING_PROGRESS: f64 = 10.0;
const ROTATION_PROGRESS: f64 = 10.0;
const CIRCUIT_PROGRESS: f64 = 40.0;
const EXTRACTION_PROGRESS: f64 = 20.0;
const OUTPUT_PROGRESS: f64 = 10.0;

/// How a bottleneck search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestOutcome<T = BottleneckLayer> {
    /// Bottlenecks were found and written.
    Found(T),
    /// The network has no bottleneck; nothing was written.
    NoBottlenecks,
    /// The graph has no edge; nothing was written.
    EmptyGraph,
    /// The caller canceled the search; nothing was written.
    Canceled,
}

impl<T> QuestOutcome<T> {
    /// Returns the found value, if any.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            _ => None,
        }
    }
}

/// Searches a line network for bottleneck sections.
///
/// A bottleneck is a line section whose two ends have no other route
/// between them. Sections on dead-end branches are left out unless
/// [`BottleneckParams::include_branches`] is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BottleneckQuest {
    params: BottleneckParams,
}

impl BottleneckQuest {
    /// Creates a search with the given parameters.
    #[must_use]
    pub fn new(params: BottleneckParams) -> Self {
        Self { params }
    }

    /// Returns the search parameters.
    #[must_use]
    pub fn params(&self) -> &BottleneckParams {
        &self.params
    }

    /// Builds the graph from line geometries, then searches it.
    ///
    /// Lines are merged with the configured tolerance; see [`GraphBuilder`].
    ///
    /// # Errors
    ///
    /// Returns `ParamError` for invalid parameters, `GraphError` if a line
    /// is not a valid polyline, and `AnalysisError::Inconsistent` if a
    /// stage fails.
    pub fn run_lines<P: AsRef<[Point2]>>(
        &self,
        lines: &[P],
        crs: Option<&str>,
        feedback: &dyn Feedback,
    ) -> Result<QuestOutcome> {
        self.params.validate()?;
        if feedback.is_canceled() {
            info!("bottleneck search canceled");
            return Ok(QuestOutcome::Canceled);
        }

        info!(lines = lines.len(), tolerance = self.params.tolerance, "building the graph model");
        let mut builder = GraphBuilder::new(self.params.tolerance)?;
        if let Some(crs) = crs {
            builder = builder.with_crs(crs);
        }
        builder.add_multi_polyline(lines)?;
        let graph = builder.build();

        self.execute(&graph, feedback)
    }

    /// Searches `graph` and collects the result into a [`BottleneckLayer`].
    ///
    /// # Errors
    ///
    /// Returns `ParamError` for invalid parameters and
    /// `AnalysisError::Inconsistent` if a stage fails.
    pub fn execute(&self, graph: &LineGraph, feedback: &dyn Feedback) -> Result<QuestOutcome> {
        let mut layer = BottleneckLayer::new(graph.crs().map(str::to_owned));
        Ok(match self.execute_into(graph, feedback, &mut layer)? {
            QuestOutcome::Found(_) => QuestOutcome::Found(layer),
            QuestOutcome::NoBottlenecks => QuestOutcome::NoBottlenecks,
            QuestOutcome::EmptyGraph => QuestOutcome::EmptyGraph,
            QuestOutcome::Canceled => QuestOutcome::Canceled,
        })
    }

    /// Searches `graph` and writes every bottleneck segment to `sink`.
    ///
    /// Nothing reaches the sink unless the search completes: cancellation
    /// is polled for the last time right before the first write.
    /// `Found` carries the number of segments written.
    ///
    /// # Errors
    ///
    /// Returns `ParamError` for invalid parameters and
    /// `AnalysisError::Inconsistent` if a stage fails.
    pub fn execute_into<S: SegmentSink>(
        &self,
        graph: &LineGraph,
        feedback: &dyn Feedback,
        sink: &mut S,
    ) -> Result<QuestOutcome<usize>> {
        self.params.validate()?;
        let mut checkpoint = Checkpoint::new(feedback, self.params.checkpoint_interval);
        match self.search(graph, &mut checkpoint, sink) {
            Err(e) if e.is_canceled() => {
                info!(polls = checkpoint.polls(), "bottleneck search canceled");
                Ok(QuestOutcome::Canceled)
            }
            other => other,
        }
    }

    fn search<S: SegmentSink>(
        &self,
        graph: &LineGraph,
        checkpoint: &mut Checkpoint<'_>,
        sink: &mut S,
    ) -> Result<QuestOutcome<usize>> {
        checkpoint.check()?;
        checkpoint.advance(INTAKE_PROGRESS);

        if graph.edge_count() == 0 {
            info!("the graph model has no edges, the result layer was not built");
            checkpoint.advance(100.0 - INTAKE_PROGRESS);
            return Ok(QuestOutcome::EmptyGraph);
        }
        info!(
            edges = graph.edge_count(),
            vertices = graph.vertex_count(),
            "the graph model is ready"
        );

        checkpoint.begin_stage(PAIRING_PROGRESS, graph.vertex_count() * 2);
        let pairs = resolve_edge_pairs(graph, checkpoint)?;
        checkpoint.finish_stage();
        checkpoint.check()?;
        info!(paired = pairs.len(), "the edge pair map was built");

        checkpoint.begin_stage(ROTATION_PROGRESS, graph.vertex_count());
        let rotation = build_rotation_model(graph, &pairs, checkpoint)?;
        checkpoint.finish_stage();
        checkpoint.check()?;
        info!(entries = rotation.len(), "the rotation model was built");

        checkpoint.begin_stage(CIRCUIT_PROGRESS, pairs.len());
        let groups = decompose_circuits(graph, &rotation, &pairs, checkpoint)?;
        checkpoint.finish_stage();
        checkpoint.check()?;
        info!(components = groups.len(), "the circuit model was built");

        checkpoint.begin_stage(EXTRACTION_PROGRESS, 0);
        let branches = if self.params.include_branches {
            None
        } else {
            Some(find_branches(graph, &pairs)?)
        };
        let set = find_bottlenecks(&groups, &pairs, branches.as_ref())?;
        let segments = bottleneck_segments(graph, &set)?;
        checkpoint.finish_stage();
        checkpoint.check()?;

        if segments.is_empty() {
            info!("there are no bottlenecks in the network, the result layer was not built");
            checkpoint.advance(OUTPUT_PROGRESS);
            return Ok(QuestOutcome::NoBottlenecks);
        }

        debug!(segments = segments.len(), "writing bottleneck segments");
        let written = segments.len();
        for segment in segments {
            sink.add_segment(segment);
        }
        checkpoint.advance(OUTPUT_PROGRESS);
        info!(bottlenecks = written, "the output layer was created");
        Ok(QuestOutcome::Found(written))
    }
}
