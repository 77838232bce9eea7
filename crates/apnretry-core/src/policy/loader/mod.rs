//! Carrier configuration loader and validator.
//!
//! Raw JSON text in, [`PolicyTable`] out. Any structural violation anywhere in
//! the input rejects the whole configuration; there is no partial acceptance.

mod error;
mod parse;
mod raw;

use super::table::PolicyTable;
use super::types::{ApnMatch, DetailMatch, ErrorTypeMatch, Policy};
use raw::{RawApnGroup, RawErrorPolicy};

pub use error::{ConfigError, PolicyViolation};

/// Load a carrier configuration.
///
/// `None` or blank text means "no carrier configuration" and yields `Ok(None)`.
pub fn load(raw: Option<&str>) -> Result<Option<PolicyTable>, ConfigError> {
    match raw {
        Some(text) if !text.trim().is_empty() => parse_policy_table(text).map(Some),
        _ => Ok(None),
    }
}

/// Parse and validate carrier configuration text into a table.
pub fn parse_policy_table(text: &str) -> Result<PolicyTable, ConfigError> {
    let groups: Vec<RawApnGroup> = serde_json::from_str(text)?;
    let mut policies = Vec::new();
    for group in &groups {
        let apn = parse_apn(&group.apn_name).map_err(|violation| ConfigError::InvalidPolicy {
            apn: group.apn_name.clone(),
            index: 0,
            violation,
        })?;
        for (index, raw) in group.error_types.iter().enumerate() {
            let policy = build_policy(apn.clone(), raw).map_err(|violation| ConfigError::InvalidPolicy {
                apn: group.apn_name.clone(),
                index,
                violation,
            })?;
            policies.push(policy);
        }
    }
    let table = PolicyTable::from_policies(policies);
    tracing::debug!(
        "parsed carrier policy table: {} policies in {} apn groups",
        table.len(),
        table.group_count()
    );
    Ok(table)
}

fn parse_apn(name: &str) -> Result<ApnMatch, PolicyViolation> {
    match name.trim() {
        "" => Err(PolicyViolation::EmptyApnName),
        "*" => Ok(ApnMatch::Any),
        named => Ok(ApnMatch::Named(named.to_string())),
    }
}

fn build_policy(apn: ApnMatch, raw: &RawErrorPolicy) -> Result<Policy, PolicyViolation> {
    let error_type = ErrorTypeMatch::from_config(raw.error_type.trim())
        .ok_or_else(|| PolicyViolation::UnknownErrorType(raw.error_type.clone()))?;

    if raw.error_details.is_empty() {
        return Err(PolicyViolation::EmptyDetails);
    }
    let details = raw
        .error_details
        .iter()
        .map(|d| parse::parse_detail(error_type, d))
        .collect::<Result<Vec<_>, _>>()?;

    let schedule = parse::parse_schedule(&raw.retry_array)?;
    let unthrottle_events = parse::parse_events(&raw.unthrottling_events)?;
    let attempts_per_alternate =
        parse::parse_count("NumAttemptsPerFqdn", raw.num_attempts_per_fqdn.as_deref())?;
    let handover_attempt_threshold =
        parse::parse_count("HandoverAttemptCount", raw.handover_attempt_count.as_deref())?;

    // Handover fallback is only meaningful for specific protocol errors.
    if handover_attempt_threshold.is_some()
        && (error_type != ErrorTypeMatch::Protocol || details.iter().any(DetailMatch::is_any))
    {
        return Err(PolicyViolation::HandoverCountNotAllowed);
    }

    Ok(Policy {
        apn,
        error_type,
        details,
        schedule,
        unthrottle_events,
        attempts_per_alternate,
        handover_attempt_threshold,
    })
}

#[cfg(test)]
mod tests;
