use pl_core::PlanError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;
