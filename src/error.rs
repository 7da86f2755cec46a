use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),

    #[error("Fit error: {0}")]
    Fit(#[from] FitError),

    #[error("Invalid shape: {0}")]
    Shape(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Did not converge after {iterations} iterations (last step {residual:e})")]
    DidNotConverge { iterations: usize, residual: f64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Insufficient control points: need at least {needed}, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error("Mismatched control points: {source_count} source vs {target_count} target")]
    MismatchedCounts {
        source_count: usize,
        target_count: usize,
    },

    #[error("Degenerate control point configuration: {0}")]
    Degenerate(String),
}
