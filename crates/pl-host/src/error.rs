use pl_core::PlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("host configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

pub type HostResult<T> = Result<T, HostError>;
