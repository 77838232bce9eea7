//! Event-driven early unthrottling.
//!
//! An event clears an APN only if the policy matching that APN's last error
//! lists the event in its `UnthrottlingEvents`.

use crate::ledger::RetryLedger;
use crate::policy::{PolicySet, UnthrottleEvent};

/// Clear every APN whose last error's policy names `event`.
/// Returns the cleared APNs, sorted.
pub fn unthrottle(ledger: &mut RetryLedger, policies: &PolicySet, event: UnthrottleEvent) -> Vec<String> {
    let mut cleared: Vec<String> = ledger
        .last_errors()
        .filter(|(apn, err)| policies.resolve(apn, err).unthrottles_on(event))
        .map(|(apn, _)| apn.to_string())
        .collect();
    cleared.sort();

    for apn in &cleared {
        ledger.clear_apn(apn);
        tracing::info!(apn = apn.as_str(), event = %event, "unthrottled");
    }
    cleared
}
