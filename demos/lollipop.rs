//! Runs a bottleneck search on a small network and prints the result.
//!
//! ```text
//! cargo run --example lollipop
//! cargo run --example lollipop -- --branches
//! ```
//!
//! The network is a triangle with a two-section tail, joined to a second
//! triangle by a single road.

use bottleneck::math::Point2;
use bottleneck::{
    BottleneckError, BottleneckParams, BottleneckQuest, ProgressFeedback, QuestOutcome,
};

fn main() -> Result<(), BottleneckError> {
    // Default: WARN for everything, INFO for bottleneck.
    // Override with RUST_LOG env var (e.g. RUST_LOG=bottleneck=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("bottleneck=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let include_branches = std::env::args().any(|a| a == "--branches");

    let lines: Vec<Vec<Point2>> = vec![
        // West triangle
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.0, 0.0),
        ],
        // Tail
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(-1.0, 0.0),
            Point2::new(-2.0, 0.5),
        ],
        // East triangle
        vec![
            Point2::new(3.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(3.5, 1.0),
            Point2::new(3.0, 0.0),
        ],
        // Road between the triangles
        vec![Point2::new(1.0, 0.0), Point2::new(3.0, 0.0)],
    ];

    let params = BottleneckParams::default().with_branches(include_branches);
    let feedback = ProgressFeedback::new();
    let quest = BottleneckQuest::new(params);

    match quest.run_lines(&lines, Some("EPSG:3857"), &feedback)? {
        QuestOutcome::Found(layer) => {
            println!(
                "{} bottleneck(s), crs {}",
                layer.len(),
                layer.crs.as_deref().unwrap_or("none")
            );
            for s in &layer.segments {
                println!(
                    "  ({}, {}) -> ({}, {})",
                    s.start.x, s.start.y, s.end.x, s.end.y
                );
            }
        }
        QuestOutcome::NoBottlenecks => println!("no bottlenecks"),
        QuestOutcome::EmptyGraph => println!("empty network"),
        QuestOutcome::Canceled => println!("canceled"),
    }
    println!("progress {:.0}%", feedback.progress());
    Ok(())
}
