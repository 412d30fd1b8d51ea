use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitterError {
    #[error("Listener limit reached. The current limit is {limit} listeners per event.")]
    CapacityExceeded { limit: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EmitterError>;
