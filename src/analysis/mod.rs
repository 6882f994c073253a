//! The bottleneck search pipeline, one stage per module.
//!
//! ```text
//! LineGraph ─ edge_pairs ─ rotation ─ circuits ─ bottlenecks ─ segments
//!                 └──────────── branches ───────────┘
//! ```

pub mod bottlenecks;
pub mod branches;
pub mod circuits;
pub mod edge_pairs;
pub mod quest;
pub mod rotation;

pub use bottlenecks::{bottleneck_segments, find_bottlenecks, BottleneckSet};
pub use branches::{find_branches, Branches};
pub use circuits::{decompose_circuits, Circuit, CircuitGroup};
pub use edge_pairs::{resolve_edge_pairs, EdgePairs};
pub use quest::{BottleneckQuest, QuestOutcome};
pub use rotation::{build_rotation_model, RotationModel};

/// Small networks shared by the stage tests.
#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use crate::graph::{GraphBuilder, LineGraph};
    use crate::math::Point2;

    fn build(lines: &[&[(f64, f64)]]) -> LineGraph {
        let mut b = GraphBuilder::new(0.0).unwrap();
        for line in lines {
            let pts: Vec<Point2> = line.iter().map(|&(x, y)| Point2::new(x, y)).collect();
            b.add_polyline(&pts).unwrap();
        }
        b.build()
    }

    /// One line section between two vertices.
    pub fn single_segment() -> LineGraph {
        build(&[&[(0.0, 0.0), (1.0, 0.0)]])
    }

    /// Three sections forming one cycle.
    pub fn triangle() -> LineGraph {
        build(&[&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.0, 0.0)]])
    }

    /// A triangle with a one-section tail hanging off `(0, 0)`.
    ///
    /// The tail is the last section, edges 6 and 7.
    pub fn lollipop() -> LineGraph {
        build(&[
            &[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.0, 0.0)],
            &[(0.0, 0.0), (-1.0, 0.0)],
        ])
    }

    /// Two triangles sharing no vertex.
    pub fn two_triangles() -> LineGraph {
        build(&[
            &[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.0, 0.0)],
            &[(10.0, 0.0), (11.0, 0.0), (10.5, 1.0), (10.0, 0.0)],
        ])
    }

    /// Two triangles joined by one section, edges 12 and 13.
    pub fn dumbbell() -> LineGraph {
        build(&[
            &[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0), (0.0, 0.0)],
            &[(3.0, 0.0), (4.0, 0.0), (3.5, 1.0), (3.0, 0.0)],
            &[(1.0, 0.0), (3.0, 0.0)],
        ])
    }

    /// Three collinear sections with no junction.
    pub fn path() -> LineGraph {
        build(&[&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]])
    }

    /// Three sections meeting at the origin.
    pub fn star() -> LineGraph {
        build(&[
            &[(0.0, 0.0), (0.0, 1.0)],
            &[(0.0, 0.0), (1.0, -1.0)],
            &[(0.0, 0.0), (-1.0, -1.0)],
        ])
    }

    /// A 3 x 3 lattice of unit squares' corners: four cells, no bridge.
    pub fn grid_2x2() -> LineGraph {
        build(&[
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            &[(0.0, 1.0), (1.0, 1.0), (2.0, 1.0)],
            &[(0.0, 2.0), (1.0, 2.0), (2.0, 2.0)],
            &[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)],
            &[(1.0, 0.0), (1.0, 1.0), (1.0, 2.0)],
            &[(2.0, 0.0), (2.0, 1.0), (2.0, 2.0)],
        ])
    }
}
