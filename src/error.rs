use thiserror::Error;

/// Top-level error type for the bottleneck analysis.
#[derive(Debug, Error)]
pub enum BottleneckError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Param(#[from] ParamError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl BottleneckError {
    /// Returns `true` if the error is a cooperative cancellation rather than a failure.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Analysis(AnalysisError::Canceled))
    }
}

/// Errors raised while building or addressing the line graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {0} not found")]
    VertexNotFound(usize),

    #[error("edge {0} not found")]
    EdgeNotFound(usize),

    #[error("invalid line geometry: {0}")]
    InvalidGeometry(String),
}

/// Errors related to analysis parameters.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid parameter: {0}")]
    Invalid(String),
}

/// Errors raised by the analysis pipeline stages.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis was canceled")]
    Canceled,

    #[error("inconsistent circuit decomposition: {0}")]
    Inconsistent(String),
}

/// Convenience type alias for results using [`BottleneckError`].
pub type Result<T> = std::result::Result<T, BottleneckError>;
