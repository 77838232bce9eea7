//! Throttle engine facade.
//!
//! One [`ThrottleEngine`] per logical line. Mutating calls take `&mut self`,
//! so callers from different origins must funnel through whoever owns the
//! engine; queries never see a half-applied report.

mod registry;

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::ledger::{LedgerSnapshot, RetryLedger};
use crate::policy::{ConfigError, Policy, PolicySet, PolicySource, UnthrottleEvent};
use crate::tunnel_error::{FailureCause, TunnelError};
use crate::unthrottle;

pub use registry::EngineRegistry;

/// Identifier of a logical line (SIM slot).
pub type SlotId = u32;

/// Diagnostics view of one engine.
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub slot: SlotId,
    pub policy_source: PolicySource,
    pub ledger: LedgerSnapshot,
}

pub struct ThrottleEngine {
    slot: SlotId,
    policies: PolicySet,
    ledger: RetryLedger,
    clock: Arc<dyn Clock>,
    rng: StdRng,
}

impl ThrottleEngine {
    /// Engine on the built-in defaults, using the system clock.
    pub fn new(slot: SlotId) -> Self {
        Self::with_clock(slot, Arc::new(SystemClock))
    }

    pub fn with_clock(slot: SlotId, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot,
            policies: PolicySet::builtin(),
            ledger: RetryLedger::new(),
            clock,
            rng: StdRng::from_entropy(),
        }
    }

    /// Make jitter reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    pub fn policy_source(&self) -> PolicySource {
        self.policies.source()
    }

    /// Rebuild the policy table from carrier configuration text and discard
    /// all retry state on this line.
    ///
    /// On `Err` the carrier configuration was rejected and the built-in
    /// defaults are in effect.
    pub fn on_configuration_changed(&mut self, raw: Option<&str>) -> Result<PolicySource, ConfigError> {
        let outcome = PolicySet::load(raw);
        self.install_policies(outcome.policies);

        match outcome.rejection {
            Some(err) => {
                tracing::warn!(slot = self.slot, "carrier policy rejected, using built-in defaults: {}", err);
                Err(err)
            }
            None => {
                let source = self.policies.source();
                tracing::info!(slot = self.slot, ?source, "policy table reloaded");
                Ok(source)
            }
        }
    }

    /// Replace the policy set with an already built one. Retry state is
    /// discarded, as on any configuration change.
    pub fn install_policies(&mut self, policies: PolicySet) {
        self.policies = policies;
        self.ledger.clear_all();
    }

    /// Report the outcome of a tunnel attempt for `apn`.
    ///
    /// Returns how long to wait before the next attempt, or `None` after a
    /// `NoError` report. `explicit_delay` (e.g. a backoff timer sent by the
    /// network) replaces the policy delay for this report.
    pub fn report_error(
        &mut self,
        apn: &str,
        error: TunnelError,
        explicit_delay: Option<Duration>,
    ) -> Option<Duration> {
        let now = self.clock.now();
        if error.is_no_error() {
            if self.ledger.clear_apn(apn) {
                tracing::debug!(slot = self.slot, apn, "cleared retry state after success");
            }
            return None;
        }
        let policy = self.policies.resolve(apn, &error);
        self.ledger
            .record(apn, error, policy, explicit_delay, now, &mut self.rng)
    }

    pub fn can_attempt(&self, apn: &str) -> bool {
        self.ledger.can_attempt(apn, self.clock.now())
    }

    /// Time left in the throttle window of the most recent cause, `None` when
    /// the APN has no retry state.
    pub fn remaining_delay(&self, apn: &str) -> Option<Duration> {
        self.ledger.remaining_delay(apn, self.clock.now())
    }

    pub fn last_error(&self, apn: &str) -> TunnelError {
        self.ledger.last_error(apn).unwrap_or_default()
    }

    pub fn attempt_count_of_last_cause(&self, apn: &str) -> u32 {
        self.ledger.attempt_count_of_last_cause(apn)
    }

    /// Whether a stalled handover for `apn` should give up and attach fresh.
    pub fn should_use_fresh_attach(&self, apn: &str) -> bool {
        self.ledger.should_use_fresh_attach(apn)
    }

    /// Which of `total_alternates` server identities to try next.
    pub fn current_alternate_index(&self, apn: &str, total_alternates: usize) -> usize {
        self.ledger.alternate_index(apn, total_alternates)
    }

    pub fn failure_cause(&self, apn: &str) -> FailureCause {
        self.last_error(apn).failure_cause()
    }

    /// Policy that a report of `error` on `apn` would use.
    pub fn matched_policy(&self, apn: &str, error: &TunnelError) -> Arc<Policy> {
        self.policies.resolve(apn, error)
    }

    /// Handle an unthrottling event. Returns the APNs that are now unthrottled.
    pub fn on_event(&mut self, event: UnthrottleEvent) -> Vec<String> {
        let cleared = unthrottle::unthrottle(&mut self.ledger, &self.policies, event);
        tracing::debug!(slot = self.slot, %event, cleared = cleared.len(), "event handled");
        cleared
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            slot: self.slot,
            policy_source: self.policy_source(),
            ledger: self.ledger.snapshot(self.clock.now()),
        }
    }
}

impl std::fmt::Debug for ThrottleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottleEngine")
            .field("slot", &self.slot)
            .field("policy_source", &self.policy_source())
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
