use crate::error::ParamError;

/// Smallest accepted topology tolerance.
pub const MIN_TOLERANCE: f64 = 0.0;

/// Largest accepted topology tolerance.
pub const MAX_TOLERANCE: f64 = 100.0;

/// Default topology tolerance, in the distance unit of the input lines.
pub const DEFAULT_TOLERANCE: f64 = 0.0001;

/// Default number of loop iterations between two cancellation polls.
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 1024;

/// Parameters of a bottleneck search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottleneckParams {
    /// Keep bridges that belong to dead-end branches.
    pub include_branches: bool,
    /// Distance within which line endpoints merge into one vertex.
    pub tolerance: f64,
    /// Loop iterations between cancellation polls inside long stages.
    pub checkpoint_interval: usize,
}

impl Default for BottleneckParams {
    fn default() -> Self {
        Self {
            include_branches: false,
            tolerance: DEFAULT_TOLERANCE,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

impl BottleneckParams {
    /// Creates parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether branch bridges are reported.
    #[must_use]
    pub fn with_branches(mut self, include_branches: bool) -> Self {
        self.include_branches = include_branches;
        self
    }

    /// Sets the topology tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the cancellation poll interval.
    #[must_use]
    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    /// Checks that every parameter is within its accepted range.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::OutOfRange` if the tolerance is outside
    /// `[MIN_TOLERANCE, MAX_TOLERANCE]` or not finite, and
    /// `ParamError::Invalid` if the checkpoint interval is zero.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !(MIN_TOLERANCE..=MAX_TOLERANCE).contains(&self.tolerance) {
            return Err(ParamError::OutOfRange {
                parameter: "tolerance",
                value: self.tolerance,
                min: MIN_TOLERANCE,
                max: MAX_TOLERANCE,
            });
        }
        if self.checkpoint_interval == 0 {
            return Err(ParamError::Invalid(
                "checkpoint interval must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
