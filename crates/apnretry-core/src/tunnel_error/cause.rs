//! Coarse failure cause handed upstream for reporting.
//!
//! Mapping this onto a platform's own failure taxonomy is the caller's job.

use serde::Serialize;

use super::{GenericError, TunnelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "snake_case")]
pub enum FailureCause {
    None,
    /// Peer rejected the attempt with this protocol error code.
    Protocol(u32),
    IoFailure,
    Timeout,
    ServerSelection,
    TransformFailure,
    NetworkLost,
    SimNotReady,
    Other,
}

impl From<TunnelError> for FailureCause {
    fn from(err: TunnelError) -> Self {
        match err {
            TunnelError::NoError => FailureCause::None,
            TunnelError::Protocol(code) => FailureCause::Protocol(code),
            TunnelError::Generic(kind) => match kind {
                GenericError::IoFailure => FailureCause::IoFailure,
                GenericError::Timeout => FailureCause::Timeout,
                GenericError::ServerSelectionFailed => FailureCause::ServerSelection,
                GenericError::TransformFailed => FailureCause::TransformFailure,
                GenericError::NetworkLost => FailureCause::NetworkLost,
                GenericError::SimNotReady => FailureCause::SimNotReady,
                GenericError::Internal => FailureCause::Other,
            },
        }
    }
}
