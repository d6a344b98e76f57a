use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("durability must be a positive integer")]
    ZeroDurability,

    #[error("confidence level must be in (0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("blocks must be a positive integer")]
    ZeroBlocks,

    #[error("number of experiments must be a positive integer")]
    ZeroExperiments,

    #[error("durability reduce probability must be in (0, 1], got {0}")]
    InvalidReduceProbability(f64),

    #[error("every trial reached the use cap; no completed trials to summarise")]
    NoCompletedTrials,

    #[error("distribution error: {0}")]
    Distribution(String),
}
