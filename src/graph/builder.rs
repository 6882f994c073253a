use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::debug;

use crate::error::{GraphError, ParamError};
use crate::math::Point2;

use super::{LineGraph, VertexId};

/// Builds a bidirectional [`LineGraph`] from line geometries.
///
/// Every pair of consecutive polyline points becomes one line section,
/// stored as a forward and a reverse edge. Points closer than the merge
/// tolerance to an existing vertex snap onto it, so lines that touch at
/// their ends share a vertex. Lines are not split where they cross.
#[derive(Debug)]
pub struct GraphBuilder {
    tolerance: f64,
    graph: LineGraph,
    index: SnapIndex,
    skipped: usize,
}

impl GraphBuilder {
    /// Creates a builder with the given merge tolerance.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Invalid` if `tolerance` is negative or not finite.
    pub fn new(tolerance: f64) -> Result<Self, ParamError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ParamError::Invalid(format!(
                "merge tolerance must be a finite non-negative number, got {tolerance}"
            )));
        }
        Ok(Self {
            tolerance,
            graph: LineGraph::new(),
            index: SnapIndex::new(tolerance),
            skipped: 0,
        })
    }

    /// Sets the coordinate reference system label of the built graph.
    #[must_use]
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.graph = self.graph.with_crs(crs);
        self
    }

    /// Returns the merge tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Adds one polyline.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidGeometry` if the polyline has fewer than
    /// two points or a non-finite coordinate. The graph is left untouched
    /// in that case.
    pub fn add_polyline(&mut self, points: &[Point2]) -> Result<(), GraphError> {
        if points.len() < 2 {
            return Err(GraphError::InvalidGeometry(format!(
                "a line needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GraphError::InvalidGeometry(format!(
                "non-finite coordinate ({}, {})",
                p.x, p.y
            )));
        }

        let ids: Vec<VertexId> = points.iter().map(|p| self.snap(*p)).collect();
        for pair in ids.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a == b {
                self.skipped += 1;
                continue;
            }
            self.graph.push_edge(a, b);
            self.graph.push_edge(b, a);
        }
        Ok(())
    }

    /// Adds every part of a multi-polyline.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidGeometry` for the first invalid part.
    /// Parts before it stay in the graph.
    pub fn add_multi_polyline<P: AsRef<[Point2]>>(&mut self, parts: &[P]) -> Result<(), GraphError> {
        for part in parts {
            self.add_polyline(part.as_ref())?;
        }
        Ok(())
    }

    /// Finishes construction.
    #[must_use]
    pub fn build(self) -> LineGraph {
        debug!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            skipped = self.skipped,
            "line graph built"
        );
        self.graph
    }

    /// Finds the vertex within tolerance of `p`, or creates one.
    fn snap(&mut self, p: Point2) -> VertexId {
        if let Some(id) = self.index.find(p) {
            return id;
        }
        let id = self.graph.push_vertex(p);
        self.index.insert(p, id);
        id
    }
}

/// Vertex position stored in the snapping tree.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint {
    coords: [f64; 2],
    id: VertexId,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.coords[0] - point[0];
        let dy = self.coords[1] - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.coords == *point
    }
}

/// R-tree over the vertex positions inserted so far.
struct SnapIndex {
    tolerance: f64,
    tree: RTree<IndexedPoint>,
}

impl fmt::Debug for SnapIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapIndex")
            .field("tolerance", &self.tolerance)
            .field("points", &self.tree.size())
            .finish()
    }
}

impl SnapIndex {
    fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            tree: RTree::new(),
        }
    }

    /// Lowest vertex id within tolerance of `p`.
    fn find(&self, p: Point2) -> Option<VertexId> {
        self.tree
            .locate_within_distance([p.x, p.y], self.tolerance * self.tolerance)
            .map(|point| point.id)
            .min()
    }

    fn insert(&mut self, p: Point2, id: VertexId) {
        self.tree.insert(IndexedPoint {
            coords: [p.x, p.y],
            id,
        });
    }
}
