use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueueError {
    #[error("Queue capacity must be positive")]
    InvalidCapacity,
    #[error("Queue is closed")]
    Closed,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PoolError {
    #[error("Worker pool needs at least one worker")]
    NoWorkers,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),
}

/// Errors that end the process at startup or while serving.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
