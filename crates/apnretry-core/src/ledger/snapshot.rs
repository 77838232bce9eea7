//! Serializable view of the ledger for diagnostics.

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

use super::state::RetryLedger;
use crate::tunnel_error::FailureCause;

#[derive(Debug, Clone, Serialize)]
pub struct CauseSnapshot {
    pub cause: String,
    pub retry_index: usize,
    pub attempt_count: u32,
    pub last_delay_ms: u64,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApnSnapshot {
    pub last_error: Option<String>,
    pub failure_cause: FailureCause,
    pub causes: Vec<CauseSnapshot>,
}

/// Snapshot keyed by APN, sorted for stable output.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LedgerSnapshot {
    pub apns: BTreeMap<String, ApnSnapshot>,
}

pub(super) fn to_snapshot(ledger: &RetryLedger, now: Instant) -> LedgerSnapshot {
    let apns = ledger
        .apns
        .iter()
        .map(|(apn, state)| {
            let mut causes: Vec<CauseSnapshot> = state
                .causes
                .values()
                .map(|entry| CauseSnapshot {
                    cause: entry.cause.to_string(),
                    retry_index: entry.retry_index,
                    attempt_count: entry.attempt_count,
                    last_delay_ms: entry.last_delay.as_millis() as u64,
                    remaining_ms: entry.remaining(now).as_millis() as u64,
                })
                .collect();
            causes.sort_by(|a, b| a.cause.cmp(&b.cause));
            let snapshot = ApnSnapshot {
                last_error: state.last_error.map(|err| err.to_string()),
                failure_cause: state.last_error.unwrap_or_default().failure_cause(),
                causes,
            };
            (apn.clone(), snapshot)
        })
        .collect();
    LedgerSnapshot { apns }
}
