use std::fmt;

use crate::math::Point2;

use super::edge::EdgeId;

/// Dense index of a vertex in a [`LineGraph`](super::LineGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A graph vertex: a 2D point plus its incident directed edges.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The position of the vertex.
    pub point: Point2,
    /// Edges ending at this vertex, in ascending id order.
    pub incoming: Vec<EdgeId>,
    /// Edges starting at this vertex, in ascending id order.
    pub outgoing: Vec<EdgeId>,
}

impl Vertex {
    /// Creates a vertex with no incident edges.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}
