//! Tunnel error descriptors.
//!
//! A [`TunnelError`] is the cause identity reported after a tunnel bring-up
//! attempt. Two reports are the same cause iff their descriptors are equal;
//! together with the APN this is the partition key of the retry ledger.

mod cause;
mod parse;

use std::fmt;

pub use cause::FailureCause;
pub use parse::ParseTunnelErrorError;

/// Generic (non-protocol) failure kinds.
///
/// Only the first four have a configuration token; the rest can only be
/// matched by a `"*"` detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericError {
    /// Local I/O failure while talking to the tunnel endpoint.
    IoFailure,
    /// Handshake or request timed out.
    Timeout,
    /// No usable tunnel endpoint could be selected.
    ServerSelectionFailed,
    /// Tunnel transform (child SA) could not be installed.
    TransformFailed,
    /// Underlying network went away mid-attempt.
    NetworkLost,
    /// Subscriber identity was not ready.
    SimNotReady,
    /// Any other local failure.
    Internal,
}

impl GenericError {
    pub const ALL: [GenericError; 7] = [
        GenericError::IoFailure,
        GenericError::Timeout,
        GenericError::ServerSelectionFailed,
        GenericError::TransformFailed,
        GenericError::NetworkLost,
        GenericError::SimNotReady,
        GenericError::Internal,
    ];

    /// Token used in carrier configuration `ErrorDetails`, if this kind has one.
    pub fn config_token(self) -> Option<&'static str> {
        match self {
            GenericError::IoFailure => Some("IO_EXCEPTION"),
            GenericError::Timeout => Some("TIMEOUT_EXCEPTION"),
            GenericError::ServerSelectionFailed => Some("SERVER_SELECTION_FAILED"),
            GenericError::TransformFailed => Some("TUNNEL_TRANSFORM_FAILED"),
            GenericError::NetworkLost
            | GenericError::SimNotReady
            | GenericError::Internal => None,
        }
    }

    /// Stable name used in descriptor identities and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            GenericError::NetworkLost => "NETWORK_LOST",
            GenericError::SimNotReady => "SIM_NOT_READY",
            GenericError::Internal => "INTERNAL",
            other => other.config_token().unwrap_or("INTERNAL"),
        }
    }

    /// Resolve a configuration token (`IO_EXCEPTION`, ...) to a kind.
    pub fn from_config_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.config_token() == Some(token))
    }
}

/// Error descriptor reported for an APN after a tunnel attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunnelError {
    /// The attempt succeeded; clears all retry state for the APN.
    NoError,
    /// The peer answered with a protocol (notify) error code.
    Protocol(u32),
    /// A local or transport level failure.
    Generic(GenericError),
}

impl TunnelError {
    pub fn is_no_error(&self) -> bool {
        matches!(self, TunnelError::NoError)
    }

    /// Coarse failure cause handed upstream for reporting.
    pub fn failure_cause(&self) -> FailureCause {
        FailureCause::from(*self)
    }
}

impl Default for TunnelError {
    fn default() -> Self {
        TunnelError::NoError
    }
}

impl fmt::Display for TunnelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TunnelError::NoError => write!(f, "NO_ERROR"),
            TunnelError::Protocol(code) => write!(f, "IKE_PROTOCOL_ERROR_TYPE:{}", code),
            TunnelError::Generic(kind) => write!(f, "GENERIC_ERROR_TYPE:{}", kind.name()),
        }
    }
}
