//! Shared fixtures for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

pub const CARRIER_POLICY: &str = r#"[
  {
    "ApnName": "ims",
    "ErrorTypes": [
      {
        "ErrorType": "IKE_PROTOCOL_ERROR_TYPE",
        "ErrorDetails": ["24", "34"],
        "RetryArray": ["4", "8", "16"],
        "UnthrottlingEvents": ["APM_ENABLE_EVENT", "APM_DISABLE_EVENT"],
        "HandoverAttemptCount": "3"
      },
      {
        "ErrorType": "IKE_PROTOCOL_ERROR_TYPE",
        "ErrorDetails": ["9000-9050"],
        "RetryArray": ["2", "-1"],
        "UnthrottlingEvents": ["APM_ENABLE_EVENT"]
      }
    ]
  },
  {
    "ApnName": "*",
    "ErrorTypes": [
      {
        "ErrorType": "GENERIC_ERROR_TYPE",
        "ErrorDetails": ["SERVER_SELECTION_FAILED", "TIMEOUT_EXCEPTION"],
        "RetryArray": ["30", "60", "-1"],
        "UnthrottlingEvents": ["WIFI_DISABLE_EVENT", "WIFI_AP_CHANGED_EVENT"]
      }
    ]
  }
]"#;

pub fn write_policy(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("carrier_policy.json");
    fs::write(&path, text).unwrap();
    path
}
