//! The retry ledger: per-APN, per-cause state and the operations on it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;

use super::entry::{ApnLedger, LedgerEntry};
use super::snapshot::{self, LedgerSnapshot};
use crate::policy::Policy;
use crate::tunnel_error::TunnelError;

/// Mutable retry state for every APN on one line.
#[derive(Debug, Clone, Default)]
pub struct RetryLedger {
    pub(super) apns: HashMap<String, ApnLedger>,
}

impl RetryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a report for `apn` and return how long to wait before the next
    /// attempt, or `None` when the APN is not throttled (`NoError`).
    ///
    /// An explicit delay is used as-is and does not move the retry index;
    /// the attempt count moves on every report.
    pub fn record<R: Rng>(
        &mut self,
        apn: &str,
        cause: TunnelError,
        policy: Arc<Policy>,
        explicit_delay: Option<Duration>,
        now: Instant,
        rng: &mut R,
    ) -> Option<Duration> {
        if cause.is_no_error() {
            self.clear_apn(apn);
            return None;
        }

        let state = self.apns.entry(apn.to_string()).or_default();
        let entry = state
            .causes
            .entry(cause)
            .or_insert_with(|| LedgerEntry::new(cause, Arc::clone(&policy), now));
        entry.policy = policy;
        entry.attempt_count = entry.attempt_count.saturating_add(1);

        let delay = match explicit_delay {
            Some(delay) => delay,
            None => {
                let steps = entry.policy.schedule.steps().len();
                let delay = entry
                    .policy
                    .schedule
                    .step_at(entry.retry_index)
                    .map(|step| step.resolve(rng))
                    .unwrap_or(Duration::ZERO);
                entry.retry_index = (entry.retry_index + 1).min(steps);
                delay
            }
        };
        entry.throttle_for(delay, now);
        state.last_error = Some(cause);

        tracing::debug!(
            apn,
            cause = %cause,
            attempt = entry.attempt_count,
            retry_index = entry.retry_index,
            explicit = explicit_delay.is_some(),
            "throttling for {:?}",
            delay
        );
        Some(delay)
    }

    /// Drop every cause and the last error for `apn`. Returns whether anything was cleared.
    pub fn clear_apn(&mut self, apn: &str) -> bool {
        self.apns.remove(apn).is_some()
    }

    pub fn clear_all(&mut self) {
        self.apns.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.apns.is_empty()
    }

    pub fn last_error(&self, apn: &str) -> Option<TunnelError> {
        self.apns.get(apn).and_then(|state| state.last_error)
    }

    /// Entry for the most recently reported cause of `apn`.
    pub fn last_entry(&self, apn: &str) -> Option<&LedgerEntry> {
        self.apns.get(apn).and_then(ApnLedger::last_entry)
    }

    pub fn entry(&self, apn: &str, cause: &TunnelError) -> Option<&LedgerEntry> {
        self.apns.get(apn).and_then(|state| state.causes.get(cause))
    }

    /// APNs with a last error, and that error.
    pub fn last_errors(&self) -> impl Iterator<Item = (&str, TunnelError)> {
        self.apns
            .iter()
            .filter_map(|(apn, state)| state.last_error.map(|err| (apn.as_str(), err)))
    }

    pub fn can_attempt(&self, apn: &str, now: Instant) -> bool {
        self.last_entry(apn)
            .map_or(true, |entry| !entry.is_throttled(now))
    }

    pub fn remaining_delay(&self, apn: &str, now: Instant) -> Option<Duration> {
        self.last_entry(apn).map(|entry| entry.remaining(now))
    }

    pub fn attempt_count_of_last_cause(&self, apn: &str) -> u32 {
        self.last_entry(apn).map_or(0, |entry| entry.attempt_count)
    }

    pub fn should_use_fresh_attach(&self, apn: &str) -> bool {
        self.last_entry(apn)
            .is_some_and(LedgerEntry::handover_threshold_reached)
    }

    pub fn alternate_index(&self, apn: &str, total: usize) -> usize {
        self.last_entry(apn)
            .map_or(0, |entry| entry.alternate_index(total))
    }

    pub fn snapshot(&self, now: Instant) -> LedgerSnapshot {
        snapshot::to_snapshot(self, now)
    }
}
