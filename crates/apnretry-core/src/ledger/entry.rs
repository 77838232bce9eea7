//! Per-(APN, cause) retry bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::policy::{ErrorTypeMatch, Policy};
use crate::tunnel_error::TunnelError;

/// Upper bound used only when turning a delay into an `Instant`.
const MAX_WINDOW: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// State for one cause on one APN.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub cause: TunnelError,
    /// Policy that matched the most recent report of this cause.
    pub policy: Arc<Policy>,
    /// Next position in the policy's retry schedule. Only natural reports move it.
    pub retry_index: usize,
    /// Reports of this cause since the last reset, overrides included.
    pub attempt_count: u32,
    pub last_report_at: Instant,
    pub throttled_until: Instant,
    pub last_delay: Duration,
}

impl LedgerEntry {
    pub(super) fn new(cause: TunnelError, policy: Arc<Policy>, now: Instant) -> Self {
        Self {
            cause,
            policy,
            retry_index: 0,
            attempt_count: 0,
            last_report_at: now,
            throttled_until: now,
            last_delay: Duration::ZERO,
        }
    }

    pub(super) fn throttle_for(&mut self, delay: Duration, now: Instant) {
        self.last_delay = delay;
        self.last_report_at = now;
        self.throttled_until = now
            .checked_add(delay.min(MAX_WINDOW))
            .unwrap_or(now);
    }

    pub fn is_throttled(&self, now: Instant) -> bool {
        now < self.throttled_until
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.throttled_until.saturating_duration_since(now)
    }

    /// Index of the alternate identity to use among `total` candidates.
    pub fn alternate_index(&self, total: usize) -> usize {
        match self.policy.attempts_per_alternate {
            Some(per) if total > 0 => (self.attempt_count / per.get()) as usize % total,
            _ => 0,
        }
    }

    pub fn handover_threshold_reached(&self) -> bool {
        self.policy.error_type == ErrorTypeMatch::Protocol
            && self
                .policy
                .handover_attempt_threshold
                .is_some_and(|threshold| self.attempt_count >= threshold.get())
    }
}

/// Everything tracked for one APN: its causes and the last reported error.
#[derive(Debug, Clone, Default)]
pub(super) struct ApnLedger {
    pub causes: HashMap<TunnelError, LedgerEntry>,
    pub last_error: Option<TunnelError>,
}

impl ApnLedger {
    pub fn last_entry(&self) -> Option<&LedgerEntry> {
        self.last_error.as_ref().and_then(|err| self.causes.get(err))
    }
}
