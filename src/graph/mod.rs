pub mod builder;
pub mod edge;
pub mod vertex;

pub use builder::GraphBuilder;
pub use edge::{Edge, EdgeId};
pub use vertex::{Vertex, VertexId};

use crate::error::GraphError;
use crate::math::Point2;

/// Read-only directed line graph.
///
/// Vertices and edges live in flat arrays addressed by dense ids, so
/// stages can keep per-edge and per-vertex side tables as plain vectors.
#[derive(Debug, Clone, Default)]
pub struct LineGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    crs: Option<String>,
}

impl LineGraph {
    /// Creates a new, empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from vertex points and directed `(from, to)` index pairs.
    ///
    /// Edge ids follow the order of `edges`. No reverse edges are added.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::VertexNotFound` if an edge refers to a vertex
    /// index outside `points`.
    pub fn from_parts(points: Vec<Point2>, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut graph = Self {
            vertices: points.into_iter().map(Vertex::new).collect(),
            edges: Vec::with_capacity(edges.len()),
            crs: None,
        };
        for &(from, to) in edges {
            for v in [from, to] {
                if v >= graph.vertices.len() {
                    return Err(GraphError::VertexNotFound(v));
                }
            }
            graph.push_edge(VertexId(from), VertexId(to));
        }
        Ok(graph)
    }

    /// Attaches a coordinate reference system label, carried through to the output.
    #[must_use]
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    /// Returns the coordinate reference system label, if any.
    #[must_use]
    pub fn crs(&self) -> Option<&str> {
        self.crs.as_deref()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::VertexNotFound` if `id` is out of range.
    pub fn vertex(&self, id: VertexId) -> Result<&Vertex, GraphError> {
        self.vertices
            .get(id.0)
            .ok_or(GraphError::VertexNotFound(id.0))
    }

    /// Returns the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::EdgeNotFound` if `id` is out of range.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.edges.get(id.0).ok_or(GraphError::EdgeNotFound(id.0))
    }

    /// Returns the point of a vertex.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::VertexNotFound` if `id` is out of range.
    pub fn point(&self, id: VertexId) -> Result<Point2, GraphError> {
        self.vertex(id).map(|v| v.point)
    }

    /// Iterates over all vertices with their ids.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i), v))
    }

    /// Iterates over all edges with their ids.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    pub(crate) fn push_vertex(&mut self, point: Point2) -> VertexId {
        self.vertices.push(Vertex::new(point));
        VertexId(self.vertices.len() - 1)
    }

    /// Appends a directed edge. Both endpoints must already exist.
    pub(crate) fn push_edge(&mut self, from: VertexId, to: VertexId) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge { from, to });
        self.vertices[from.0].outgoing.push(id);
        self.vertices[to.0].incoming.push(id);
        id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_wires_incidence_lists() {
        let g = LineGraph::from_parts(
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)],
            &[(0, 1), (1, 0)],
        )
        .unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.edge_count(), 2);
        let v0 = g.vertex(VertexId(0)).unwrap();
        assert_eq!(v0.outgoing, vec![EdgeId(0)]);
        assert_eq!(v0.incoming, vec![EdgeId(1)]);
        assert_eq!(g.edge(EdgeId(1)).unwrap().to, VertexId(0));
    }

    #[test]
    fn from_parts_rejects_dangling_vertex_index() {
        let err = LineGraph::from_parts(vec![Point2::new(0.0, 0.0)], &[(0, 3)]).unwrap_err();
        assert!(matches!(err, GraphError::VertexNotFound(3)));
    }

    #[test]
    fn missing_entities_are_errors() {
        let g = LineGraph::new();
        assert!(matches!(g.vertex(VertexId(0)), Err(GraphError::VertexNotFound(0))));
        assert!(matches!(g.edge(EdgeId(7)), Err(GraphError::EdgeNotFound(7))));
    }

    #[test]
    fn crs_is_carried() {
        let g = LineGraph::new().with_crs("EPSG:3857");
        assert_eq!(g.crs(), Some("EPSG:3857"));
    }
}
