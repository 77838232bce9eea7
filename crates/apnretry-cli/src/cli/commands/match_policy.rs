//! `apnretry match` – show the policy a report would use.

use anyhow::Result;
use apnretry_core::config::ApnRetryConfig;
use apnretry_core::TunnelError;
use std::path::Path;

use super::load_policies;

pub fn run_match(
    cfg: &ApnRetryConfig,
    policy_path: Option<&Path>,
    apn: &str,
    error: TunnelError,
) -> Result<()> {
    let policies = load_policies(cfg, policy_path)?;
    if error.is_no_error() {
        println!("{} on {}: no policy, success clears retry state", error, apn);
        return Ok(());
    }
    let policy = policies.resolve(apn, &error);
    println!("source: {:?}", policies.source());
    println!("{} on {}: {}", error, apn, policy);
    Ok(())
}
