//! Registry of engines, one per logical line.
//!
//! Owned by the composition root; engines are created and torn down
//! explicitly.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{SlotId, ThrottleEngine};
use crate::clock::{Clock, SystemClock};
use crate::policy::{ConfigError, PolicySource, UnthrottleEvent};

pub struct EngineRegistry {
    engines: HashMap<SlotId, ThrottleEngine>,
    clock: Arc<dyn Clock>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Engines created by this registry share `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            engines: HashMap::new(),
            clock,
        }
    }

    /// Engine for `slot`, created on the built-in defaults if missing.
    pub fn create(&mut self, slot: SlotId) -> &mut ThrottleEngine {
        let clock = Arc::clone(&self.clock);
        self.engines.entry(slot).or_insert_with(|| {
            tracing::debug!(slot, "creating throttle engine");
            ThrottleEngine::with_clock(slot, clock)
        })
    }

    pub fn get(&self, slot: SlotId) -> Option<&ThrottleEngine> {
        self.engines.get(&slot)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut ThrottleEngine> {
        self.engines.get_mut(&slot)
    }

    /// Tear down the engine for `slot`.
    pub fn remove(&mut self, slot: SlotId) -> Option<ThrottleEngine> {
        let removed = self.engines.remove(&slot);
        if removed.is_some() {
            tracing::debug!(slot, "removed throttle engine");
        }
        removed
    }

    pub fn slots(&self) -> Vec<SlotId> {
        let mut slots: Vec<SlotId> = self.engines.keys().copied().collect();
        slots.sort_unstable();
        slots
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Apply the same carrier configuration to every engine.
    pub fn on_configuration_changed_all(
        &mut self,
        raw: Option<&str>,
    ) -> BTreeMap<SlotId, Result<PolicySource, ConfigError>> {
        self.engines
            .iter_mut()
            .map(|(slot, engine)| (*slot, engine.on_configuration_changed(raw)))
            .collect()
    }

    /// Deliver a device-wide event to every engine. Returns, per slot, the
    /// APNs that were unthrottled (slots with none are omitted).
    pub fn on_event(&mut self, event: UnthrottleEvent) -> BTreeMap<SlotId, Vec<String>> {
        self.engines
            .iter_mut()
            .map(|(slot, engine)| (*slot, engine.on_event(event)))
            .filter(|(_, cleared)| !cleared.is_empty())
            .collect()
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
