use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Camera name cannot be empty")]
    EmptyCameraName,

    #[error("Invalid camera name: {0}. Only alphanumeric, '-' and '_' are allowed")]
    InvalidCameraName(String),

    #[error("Invalid port: port cannot be zero")]
    InvalidPort,

    #[error("Pipeline stage unavailable: {stage}")]
    StageUnavailable { stage: &'static str },

    #[error("Failed to link pipeline stages: {upstream} -> {downstream}")]
    LinkFailed {
        upstream: &'static str,
        downstream: &'static str,
    },

    #[error("Pipeline has no message bus")]
    BusUnavailable,

    #[error("Pipeline start failed: {0}")]
    StartFailed(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
