//! Wire shape of the carrier policy configuration.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct RawApnGroup {
    pub apn_name: String,
    pub error_types: Vec<RawErrorPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct RawErrorPolicy {
    pub error_type: String,
    pub error_details: Vec<String>,
    pub retry_array: Vec<String>,
    pub unthrottling_events: Vec<String>,
    #[serde(default)]
    pub num_attempts_per_fqdn: Option<String>,
    #[serde(default)]
    pub handover_attempt_count: Option<String>,
}
