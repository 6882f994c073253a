//! Bottleneck detection for line networks.
//!
//! A bottleneck is a line section that lies on no cycle of the network:
//! removing it leaves its two ends with no other route between them. The
//! search runs on a [`LineGraph`] and walks the faces of its clockwise
//! rotation system; a section whose two directions bound the same face is
//! a bridge.

pub mod analysis;
pub mod error;
pub mod feedback;
pub mod graph;
pub mod math;
pub mod output;
pub mod params;

pub use analysis::{BottleneckQuest, QuestOutcome};
pub use error::{AnalysisError, BottleneckError, GraphError, ParamError, Result};
pub use feedback::{Checkpoint, Feedback, NoFeedback, ProgressFeedback};
pub use graph::{Edge, EdgeId, GraphBuilder, LineGraph, Vertex, VertexId};
pub use output::{BottleneckLayer, Segment2, SegmentSink};
pub use params::BottleneckParams;
