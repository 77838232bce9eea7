//! CLI command handlers. Each command is in its own file.

mod match_policy;
mod simulate;
mod status;
mod validate;

use anyhow::Result;
use apnretry_core::config::{read_policy_file, ApnRetryConfig};
use apnretry_core::PolicySet;
use std::path::Path;

pub use match_policy::run_match;
pub use simulate::{run_simulate, SimulateArgs};
pub use status::run_status;
pub use validate::run_validate;

/// Policy set from `--policy`, else the configured file, else built-in defaults.
/// A rejected file is reported on stderr and the defaults are used.
pub(super) fn load_policies(cfg: &ApnRetryConfig, path: Option<&Path>) -> Result<PolicySet> {
    let raw = match path {
        Some(path) => Some(read_policy_file(path)?),
        None => cfg.read_carrier_policy()?,
    };
    let outcome = PolicySet::load(raw.as_deref());
    if let Some(err) = &outcome.rejection {
        eprintln!("warning: carrier policy rejected, using built-in defaults: {}", err);
    }
    Ok(outcome.policies)
}
