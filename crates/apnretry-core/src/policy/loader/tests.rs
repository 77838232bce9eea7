//! Loader tests: whole-config acceptance and rejection.

use std::num::NonZeroU32;
use std::time::Duration;

use super::*;
use crate::policy::UnthrottleEvent;
use crate::tunnel_error::{GenericError, TunnelError};

const IMS_CONFIG: &str = r#"[
  {
    "ApnName": "ims",
    "ErrorTypes": [
      {
        "ErrorType": "IKE_PROTOCOL_ERROR_TYPE",
        "ErrorDetails": ["24", "34"],
        "RetryArray": ["4", "8", "16"],
        "UnthrottlingEvents": ["APM_ENABLE_EVENT", "WIFI_AP_CHANGED_EVENT"],
        "HandoverAttemptCount": "3"
      },
      {
        "ErrorType": "IKE_PROTOCOL_ERROR_TYPE",
        "ErrorDetails": ["9000-9050"],
        "RetryArray": ["2", "-1"],
        "UnthrottlingEvents": []
      },
      {
        "ErrorType": "GENERIC_ERROR_TYPE",
        "ErrorDetails": ["IO_EXCEPTION", "SERVER_SELECTION_FAILED"],
        "RetryArray": ["0", "30+r5"],
        "UnthrottlingEvents": ["WIFI_DISABLE_EVENT"]
      }
    ]
  },
  {
    "ApnName": "*",
    "ErrorTypes": [
      {
        "ErrorType": "IKE_PROTOCOL_ERROR_TYPE",
        "ErrorDetails": ["15500"],
        "RetryArray": ["1"],
        "UnthrottlingEvents": [],
        "NumAttemptsPerFqdn": "6"
      }
    ]
  }
]"#;

fn single_policy(error_type: &str, details: &str, extra: &str) -> String {
    format!(
        r#"[{{"ApnName": "ims", "ErrorTypes": [{{
            "ErrorType": "{error_type}",
            "ErrorDetails": [{details}],
            "RetryArray": ["1", "2"],
            "UnthrottlingEvents": ["APM_ENABLE_EVENT"]{extra}
        }}]}}]"#
    )
}

fn violation_of(text: &str) -> PolicyViolation {
    match parse_policy_table(text) {
        Err(err) => err.violation().cloned().expect("expected a policy violation"),
        Ok(_) => panic!("configuration should have been rejected"),
    }
}

#[test]
fn accepts_full_config() {
    let table = parse_policy_table(IMS_CONFIG).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.group_count(), 2);

    let auth = table.find("ims", &TunnelError::Protocol(24)).unwrap();
    assert_eq!(auth.handover_attempt_threshold.map(NonZeroU32::get), Some(3));
    assert!(auth.unthrottles_on(UnthrottleEvent::WifiApChanged));
    assert!(!auth.unthrottles_on(UnthrottleEvent::WifiDisable));

    let io = table
        .find("ims", &TunnelError::Generic(GenericError::IoFailure))
        .unwrap();
    assert_eq!(io.schedule.steps()[1].jitter, Duration::from_secs(5));

    let congestion = table.find("internet", &TunnelError::Protocol(15500)).unwrap();
    assert_eq!(congestion.attempts_per_alternate.map(NonZeroU32::get), Some(6));
}

#[test]
fn absent_or_blank_config_is_not_an_error() {
    assert!(load(None).unwrap().is_none());
    assert!(load(Some("  \n")).unwrap().is_none());
    assert!(load(Some(IMS_CONFIG)).unwrap().is_some());
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        parse_policy_table("[{\"ApnName\": \"ims\""),
        Err(ConfigError::Malformed(_))
    ));
    // Missing required RetryArray.
    assert!(matches!(
        parse_policy_table(
            r#"[{"ApnName":"ims","ErrorTypes":[{"ErrorType":"*","ErrorDetails":["*"],"UnthrottlingEvents":[]}]}]"#
        ),
        Err(ConfigError::Malformed(_))
    ));
}

#[test]
fn handover_count_under_generic_type_rejects_config() {
    let text = single_policy("GENERIC_ERROR_TYPE", r#""IO_EXCEPTION""#, r#", "HandoverAttemptCount": "3""#);
    assert_eq!(violation_of(&text), PolicyViolation::HandoverCountNotAllowed);
}

#[test]
fn handover_count_under_protocol_wildcard_rejects_config() {
    let text = single_policy("IKE_PROTOCOL_ERROR_TYPE", r#""*""#, r#", "HandoverAttemptCount": "3""#);
    assert_eq!(violation_of(&text), PolicyViolation::HandoverCountNotAllowed);
    let text = single_policy("*", r#""*""#, r#", "HandoverAttemptCount": "3""#);
    assert_eq!(violation_of(&text), PolicyViolation::HandoverCountNotAllowed);
}

#[test]
fn one_bad_entry_rejects_everything() {
    let text = IMS_CONFIG.replace("\"9000-9050\"", "\"9050-9000\"");
    assert_eq!(
        violation_of(&text),
        PolicyViolation::InvalidRange("9050-9000".to_string())
    );
}

#[test]
fn rejection_reports_apn_and_index() {
    let text = IMS_CONFIG.replace("WIFI_DISABLE_EVENT", "WIFI_EXPLODED_EVENT");
    match parse_policy_table(&text) {
        Err(ConfigError::InvalidPolicy { apn, index, violation }) => {
            assert_eq!(apn, "ims");
            assert_eq!(index, 2);
            assert_eq!(
                violation,
                PolicyViolation::UnknownEvent("WIFI_EXPLODED_EVENT".to_string())
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn structural_violations() {
    assert_eq!(
        violation_of(&single_policy("IKE_ERROR", r#""24""#, "")),
        PolicyViolation::UnknownErrorType("IKE_ERROR".to_string())
    );
    assert_eq!(
        violation_of(&single_policy("IKE_PROTOCOL_ERROR_TYPE", "", "")),
        PolicyViolation::EmptyDetails
    );
    assert_eq!(
        violation_of(&single_policy("GENERIC_ERROR_TYPE", r#""DISK_FULL""#, "")),
        PolicyViolation::InvalidDetail("DISK_FULL".to_string())
    );
    assert!(matches!(
        violation_of(&single_policy(
            "IKE_PROTOCOL_ERROR_TYPE",
            r#""24""#,
            r#", "NumAttemptsPerFqdn": "0""#
        )),
        PolicyViolation::InvalidCount { field: "NumAttemptsPerFqdn", .. }
    ));
    assert_eq!(
        violation_of(r#"[{"ApnName": " ", "ErrorTypes": []}]"#),
        PolicyViolation::EmptyApnName
    );
}

#[test]
fn duplicate_apn_groups_are_concatenated() {
    let text = r#"[
      {"ApnName": "ims", "ErrorTypes": [
        {"ErrorType": "IKE_PROTOCOL_ERROR_TYPE", "ErrorDetails": ["24"], "RetryArray": ["4"], "UnthrottlingEvents": []}
      ]},
      {"ApnName": "ims", "ErrorTypes": [
        {"ErrorType": "IKE_PROTOCOL_ERROR_TYPE", "ErrorDetails": ["34"], "RetryArray": ["7"], "UnthrottlingEvents": []}
      ]}
    ]"#;
    let table = parse_policy_table(text).unwrap();
    assert_eq!(table.group_count(), 1);
    let policy = table.find("ims", &TunnelError::Protocol(34)).unwrap();
    assert_eq!(policy.schedule.steps()[0].base, Duration::from_secs(7));
}
