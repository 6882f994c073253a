use super::{Point2, Vector2, TOLERANCE};

/// Returns the clockwise bearing from north, in degrees within `[0, 360)`,
/// of the direction from `from` toward `to`.
///
/// North is the positive y axis and east the positive x axis. Coincident
/// points yield `0.0`.
#[must_use]
pub fn azimuth(from: &Point2, to: &Point2) -> f64 {
    let d: Vector2 = to - from;
    if d.x.abs() < TOLERANCE && d.y.abs() < TOLERANCE {
        return 0.0;
    }
    let deg = d.x.atan2(d.y).to_degrees();
    let normalized = if deg < 0.0 { deg + 360.0 } else { deg };
    // Tiny negative angles round up to a full turn.
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
