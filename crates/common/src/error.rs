use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    /// A required input was absent or not a number.
    #[error("invalid argument: {0} must be numeric")]
    InvalidArgument(&'static str),
}

/// Failures of the closed-loop drivers.
#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("control channel closed before the loop finished")]
    ChannelClosed,
    #[error("{0} worker panicked")]
    WorkerPanicked(&'static str),
    #[error("failed to join worker: {0}")]
    Join(String),
}
