//! Unified error types surfaced by the runtime API.
//!
//! Wraps worker coordination failures and the domain errors raised by the
//! pinpointer core so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use pinpointer_core::{ConfigError, EntityId, ErrorSeverity, RetargetError, TrackerError};

use crate::system::DeviceId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("tracking worker command channel closed")]
    CommandChannelClosed,

    #[error("tracking worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("tracking worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("device {0} is not attached")]
    DeviceNotFound(DeviceId),

    #[error("carrier {carrier} of device {device} no longer exists")]
    CarrierNotFound { device: DeviceId, carrier: EntityId },

    #[error("entity {0} does not exist")]
    EntityNotFound(EntityId),

    #[error(transparent)]
    Retarget(#[from] RetargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TrackerError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Internal,
            RuntimeError::DeviceNotFound(_)
            | RuntimeError::CarrierNotFound { .. }
            | RuntimeError::EntityNotFound(_) => ErrorSeverity::Validation,
            RuntimeError::Retarget(e) => e.severity(),
            RuntimeError::Config(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::DeviceNotFound(_) => "RUNTIME_DEVICE_NOT_FOUND",
            RuntimeError::CarrierNotFound { .. } => "RUNTIME_CARRIER_NOT_FOUND",
            RuntimeError::EntityNotFound(_) => "RUNTIME_ENTITY_NOT_FOUND",
            RuntimeError::Retarget(e) => e.error_code(),
            RuntimeError::Config(e) => e.error_code(),
        }
    }
}
