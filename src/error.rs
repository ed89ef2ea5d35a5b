//! Runtime error kinds (not kernel return codes — see `engine::run`).

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("platform primitive initialization failed: {0}")]
    PortInit(&'static str),

    #[error("descriptor inconsistency: {0}")]
    DescriptorInvalid(&'static str),
}
