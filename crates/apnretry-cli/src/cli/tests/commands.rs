//! Tests for command handlers against policy files on disk.

use crate::cli::commands::{run_match, run_simulate, run_validate, SimulateArgs};
use apnretry_core::config::ApnRetryConfig;
use apnretry_core::{TunnelError, UnthrottleEvent};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const POLICY: &str = r#"[{"ApnName": "ims", "ErrorTypes": [{
    "ErrorType": "IKE_PROTOCOL_ERROR_TYPE",
    "ErrorDetails": ["24"],
    "RetryArray": ["4", "8"],
    "UnthrottlingEvents": ["APM_ENABLE_EVENT"]
}]}]"#;

fn write_temp(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn validate_accepts_and_rejects() {
    let dir = tempdir().unwrap();
    let good = write_temp(dir.path(), "good.json", POLICY);
    assert!(run_validate(&good).is_ok());

    let bad = write_temp(dir.path(), "bad.json", &POLICY.replace("\"8\"", "\"8+r\""));
    let err = run_validate(&bad).unwrap_err();
    assert!(err.to_string().contains("rejected"));

    assert!(run_validate(&PathBuf::from("/nonexistent/apnretry.json")).is_err());
}

#[test]
fn match_and_simulate_run_with_policy_file() {
    let dir = tempdir().unwrap();
    let path = write_temp(dir.path(), "sim.json", POLICY);
    let cfg = ApnRetryConfig::default();
    assert!(run_match(&cfg, Some(&path), "ims", TunnelError::Protocol(24)).is_ok());
    assert!(run_match(&cfg, Some(&path), "ims", TunnelError::NoError).is_ok());

    let args = SimulateArgs {
        apn: "ims".to_string(),
        error: TunnelError::Protocol(24),
        count: 3,
        explicit_delay_secs: None,
        alternates: 2,
        event: Some(UnthrottleEvent::ApmEnable),
    };
    assert!(run_simulate(&cfg, Some(&path), args).is_ok());
}
