use std::fmt;

use super::vertex::VertexId;

/// Dense index of a directed edge in a [`LineGraph`](super::LineGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A directed edge between two vertices.
///
/// Every undirected line section is stored twice, once per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Source vertex.
    pub from: VertexId,
    /// Destination vertex.
    pub to: VertexId,
}

impl Edge {
    /// Returns `true` if the edge starts and ends at the same vertex.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}
