use thiserror::Error;

/// Errors surfaced by solver configuration and report output.
///
/// The numeric routines themselves are total; only the knobs handed to them
/// and the writer the report goes to can fail.
#[derive(Debug, Error)]
pub enum Error {
    #[error("discount factor must be finite and within [0, 1], got {0}")]
    InvalidDiscount(f64),

    #[error("tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),

    #[error("iteration budget must be at least 1")]
    ZeroIterationBudget,

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
