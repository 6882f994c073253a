use crate::math::Point2;

/// A straight line section given by its two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub start: Point2,
    pub end: Point2,
}

impl Segment2 {
    /// Creates a segment from two endpoints.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Returns the segment with its endpoints swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// Returns `true` if both segments join the same two points, in either direction.
    #[must_use]
    pub fn same_endpoints(&self, other: &Self) -> bool {
        self == other || *self == other.reversed()
    }
}

/// Receiver of bottleneck geometries.
pub trait SegmentSink {
    /// Accepts one bottleneck segment.
    fn add_segment(&mut self, segment: Segment2);
}

impl SegmentSink for Vec<Segment2> {
    fn add_segment(&mut self, segment: Segment2) {
        self.push(segment);
    }
}

/// Bottleneck segments together with the coordinate reference system of the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BottleneckLayer {
    pub crs: Option<String>,
    pub segments: Vec<Segment2>,
}

impl BottleneckLayer {
    /// Creates an empty layer in the given reference system.
    #[must_use]
    pub fn new(crs: Option<String>) -> Self {
        Self {
            crs,
            segments: Vec::new(),
        }
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the layer holds no segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl SegmentSink for BottleneckLayer {
    fn add_segment(&mut self, segment: Segment2) {
        self.segments.push(segment);
    }
}
