//! Built-in default policies, used whenever no valid carrier table is loaded.
//!
//! Built in code rather than parsed, so there is nothing to fail at runtime.

use std::num::NonZeroU32;
use std::sync::Arc;

use super::table::PolicyTable;
use super::types::{ApnMatch, DetailMatch, ErrorTypeMatch, Policy, RetrySchedule, RetryStep};
use super::UnthrottleEvent;
use crate::tunnel_error::GenericError;

const NETWORK_EVENTS: [UnthrottleEvent; 4] = [
    UnthrottleEvent::ApmEnable,
    UnthrottleEvent::ApmDisable,
    UnthrottleEvent::WifiDisable,
    UnthrottleEvent::WifiApChanged,
];

const PROTOCOL_EVENTS: [UnthrottleEvent; 3] = [
    UnthrottleEvent::ApmEnable,
    UnthrottleEvent::WifiDisable,
    UnthrottleEvent::WifiCallingDisable,
];

/// IKEv2 AUTHENTICATION_FAILED notify code.
const AUTHENTICATION_FAILED: u32 = 24;

const HANDOVER_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(3) {
    Some(n) => n,
    None => panic!("handover attempt count must be non-zero"),
};

/// The `*`/`*`/`*` policy that ends every lookup.
pub(crate) fn universal_fallback() -> Policy {
    Policy {
        apn: ApnMatch::Any,
        error_type: ErrorTypeMatch::Any,
        details: vec![DetailMatch::Any],
        schedule: RetrySchedule::from_secs(
            &[1, 2, 2, 10, 20, 40, 80, 160, 320, 640, 1280, 1800, 3600],
            true,
        ),
        unthrottle_events: NETWORK_EVENTS.to_vec(),
        attempts_per_alternate: None,
        handover_attempt_threshold: None,
    }
}

pub(crate) fn builtin_table() -> (PolicyTable, Arc<Policy>) {
    let io_failure = Policy {
        apn: ApnMatch::Any,
        error_type: ErrorTypeMatch::Generic,
        details: vec![DetailMatch::Generic(GenericError::IoFailure)],
        schedule: RetrySchedule::new(
            vec![
                RetryStep::secs(0),
                RetryStep::secs(0),
                RetryStep::secs(0),
                RetryStep::secs(30),
                RetryStep::secs_with_jitter(60, 15),
                RetryStep::secs(120),
            ],
            true,
        ),
        unthrottle_events: NETWORK_EVENTS.to_vec(),
        attempts_per_alternate: None,
        handover_attempt_threshold: None,
    };
    let any_protocol = Policy {
        apn: ApnMatch::Any,
        error_type: ErrorTypeMatch::Protocol,
        details: vec![DetailMatch::Any],
        schedule: RetrySchedule::from_secs(&[5, 10], true),
        unthrottle_events: PROTOCOL_EVENTS.to_vec(),
        attempts_per_alternate: None,
        handover_attempt_threshold: None,
    };
    let auth_failed = Policy {
        apn: ApnMatch::Any,
        error_type: ErrorTypeMatch::Protocol,
        details: vec![DetailMatch::Code(AUTHENTICATION_FAILED)],
        schedule: RetrySchedule::from_secs(
            &[10, 20, 40, 80, 160, 320, 640, 1280, 1800, 3600],
            true,
        ),
        unthrottle_events: PROTOCOL_EVENTS.to_vec(),
        attempts_per_alternate: None,
        handover_attempt_threshold: Some(HANDOVER_ATTEMPTS),
    };

    let universal = universal_fallback();
    let table = PolicyTable::from_policies([universal.clone(), io_failure, any_protocol, auth_failed]);
    (table, Arc::new(universal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunnel_error::TunnelError;
    use std::time::Duration;

    #[test]
    fn every_error_resolves_in_builtin() {
        let (table, _) = builtin_table();
        let errors = [
            TunnelError::Protocol(1),
            TunnelError::Protocol(AUTHENTICATION_FAILED),
            TunnelError::Generic(GenericError::IoFailure),
            TunnelError::Generic(GenericError::SimNotReady),
        ];
        for err in errors {
            assert!(table.find("any.apn", &err).is_some(), "{err} must resolve");
        }
    }

    #[test]
    fn generic_unknown_kind_uses_universal() {
        let (table, universal) = builtin_table();
        let policy = table
            .find("ims", &TunnelError::Generic(GenericError::Timeout))
            .unwrap();
        assert_eq!(*policy, *universal);
    }

    #[test]
    fn handover_threshold_only_on_specific_protocol_entry() {
        let (table, _) = builtin_table();
        for policy in table.policies() {
            if policy.handover_attempt_threshold.is_some() {
                assert_eq!(policy.error_type, ErrorTypeMatch::Protocol);
                assert!(!policy.has_wildcard_detail());
            }
        }
        let auth = table
            .find("ims", &TunnelError::Protocol(AUTHENTICATION_FAILED))
            .unwrap();
        assert_eq!(auth.handover_attempt_threshold.map(NonZeroU32::get), Some(3));
        assert_eq!(auth.schedule.steps()[0].base, Duration::from_secs(10));
    }
}
