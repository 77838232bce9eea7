//! Policy matcher: carrier table first, built-in defaults last.

use std::sync::Arc;

use serde::Serialize;

use super::builtin::builtin_table;
use super::loader::{self, ConfigError};
use super::table::PolicyTable;
use super::types::Policy;
use crate::tunnel_error::TunnelError;

/// Which table is answering lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    Carrier,
    BuiltIn,
}

/// The active carrier table (if any) plus the built-in defaults.
///
/// Immutable once built; a configuration change builds a new set.
#[derive(Debug, Clone)]
pub struct PolicySet {
    carrier: Option<Arc<PolicyTable>>,
    builtin: Arc<PolicyTable>,
    universal: Arc<Policy>,
}

/// Result of loading a configuration: the set to use, and why the carrier
/// configuration was discarded if it was.
#[derive(Debug)]
pub struct LoadOutcome {
    pub policies: PolicySet,
    pub rejection: Option<ConfigError>,
}

impl PolicySet {
    /// Built-in defaults only.
    pub fn builtin() -> Self {
        let (table, universal) = builtin_table();
        Self {
            carrier: None,
            builtin: Arc::new(table),
            universal,
        }
    }

    /// Carrier table layered over the built-in defaults.
    pub fn with_carrier(table: PolicyTable) -> Self {
        Self {
            carrier: Some(Arc::new(table)),
            ..Self::builtin()
        }
    }

    /// Build a set from raw carrier configuration text. A rejected
    /// configuration falls back to the built-in defaults.
    pub fn load(raw: Option<&str>) -> LoadOutcome {
        match loader::load(raw) {
            Ok(Some(table)) => LoadOutcome {
                policies: Self::with_carrier(table),
                rejection: None,
            },
            Ok(None) => LoadOutcome {
                policies: Self::builtin(),
                rejection: None,
            },
            Err(err) => LoadOutcome {
                policies: Self::builtin(),
                rejection: Some(err),
            },
        }
    }

    pub fn source(&self) -> PolicySource {
        if self.carrier.is_some() {
            PolicySource::Carrier
        } else {
            PolicySource::BuiltIn
        }
    }

    pub fn carrier(&self) -> Option<&PolicyTable> {
        self.carrier.as_deref()
    }

    /// Select the single most specific policy for `apn` and `err`.
    ///
    /// Order: carrier table (APN group, then `"*"` group), then the built-in
    /// table. The error type is never widened except through an explicit
    /// `"*"` type entry.
    pub fn resolve(&self, apn: &str, err: &TunnelError) -> Arc<Policy> {
        self.carrier
            .as_ref()
            .and_then(|table| table.find(apn, err))
            .or_else(|| self.builtin.find(apn, err))
            .unwrap_or_else(|| Arc::clone(&self.universal))
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        Self::builtin()
    }
}
