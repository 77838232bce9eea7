//! Parse descriptors from their textual form (CLI, test fixtures).
//!
//! Accepted forms: `none`, `protocol:<code>`, `generic:<token-or-name>`, and
//! the identity form produced by `Display`.

use std::str::FromStr;

use super::{GenericError, TunnelError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tunnel error descriptor: {0:?}")]
pub struct ParseTunnelErrorError(pub String);

impl FromStr for GenericError {
    type Err = ParseTunnelErrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        GenericError::ALL
            .into_iter()
            .find(|kind| kind.name() == upper || kind.config_token() == Some(upper.as_str()))
            .or(match upper.as_str() {
                "IO" => Some(GenericError::IoFailure),
                "TIMEOUT" => Some(GenericError::Timeout),
                "SERVER_SELECTION" => Some(GenericError::ServerSelectionFailed),
                "TRANSFORM" => Some(GenericError::TransformFailed),
                _ => None,
            })
            .ok_or_else(|| ParseTunnelErrorError(s.to_string()))
    }
}

impl FromStr for TunnelError {
    type Err = ParseTunnelErrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("none") || trimmed == "NO_ERROR" {
            return Ok(TunnelError::NoError);
        }
        let (kind, value) = trimmed
            .split_once(':')
            .ok_or_else(|| ParseTunnelErrorError(s.to_string()))?;
        match kind {
            "protocol" | "IKE_PROTOCOL_ERROR_TYPE" => value
                .trim()
                .parse::<u32>()
                .map(TunnelError::Protocol)
                .map_err(|_| ParseTunnelErrorError(s.to_string())),
            "generic" | "GENERIC_ERROR_TYPE" => value
                .parse::<GenericError>()
                .map(TunnelError::Generic)
                .map_err(|_| ParseTunnelErrorError(s.to_string())),
            _ => Err(ParseTunnelErrorError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_forms() {
        assert_eq!("none".parse::<TunnelError>(), Ok(TunnelError::NoError));
        assert_eq!("protocol:24".parse::<TunnelError>(), Ok(TunnelError::Protocol(24)));
        assert_eq!(
            "generic:io".parse::<TunnelError>(),
            Ok(TunnelError::Generic(GenericError::IoFailure))
        );
        assert_eq!(
            "generic:sim-not-ready".parse::<TunnelError>(),
            Ok(TunnelError::Generic(GenericError::SimNotReady))
        );
    }

    #[test]
    fn display_form_parses_back() {
        for err in [
            TunnelError::NoError,
            TunnelError::Protocol(9030),
            TunnelError::Generic(GenericError::ServerSelectionFailed),
            TunnelError::Generic(GenericError::NetworkLost),
        ] {
            assert_eq!(err.to_string().parse::<TunnelError>(), Ok(err));
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!("protocol:abc".parse::<TunnelError>().is_err());
        assert!("generic:nope".parse::<TunnelError>().is_err());
        assert!("24".parse::<TunnelError>().is_err());
    }
}
