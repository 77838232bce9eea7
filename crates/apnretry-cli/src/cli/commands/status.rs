//! `apnretry status` – show configured slots and their policy source.

use anyhow::Result;
use apnretry_core::config::{self, ApnRetryConfig};

pub fn run_status(cfg: &ApnRetryConfig) -> Result<()> {
    println!("config: {}", config::config_path()?.display());
    match &cfg.carrier_policy_path {
        Some(path) => println!("carrier policy: {}", path.display()),
        None => println!("carrier policy: none (built-in defaults)"),
    }
    let registry = cfg.build_registry()?;
    println!("{:<6} {}", "SLOT", "POLICY");
    for slot in registry.slots() {
        if let Some(engine) = registry.get(slot) {
            println!("{:<6} {:?}", slot, engine.policy_source());
        }
    }
    Ok(())
}
