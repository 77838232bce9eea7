//! `apnretry simulate` – run a report sequence through an engine.

use anyhow::Result;
use apnretry_core::config::ApnRetryConfig;
use apnretry_core::{ThrottleEngine, TunnelError, UnthrottleEvent};
use std::path::Path;
use std::time::Duration;

use super::load_policies;

#[derive(Debug)]
pub struct SimulateArgs {
    pub apn: String,
    pub error: TunnelError,
    pub count: usize,
    pub explicit_delay_secs: Option<u64>,
    pub alternates: usize,
    pub event: Option<UnthrottleEvent>,
}

pub fn run_simulate(cfg: &ApnRetryConfig, policy_path: Option<&Path>, args: SimulateArgs) -> Result<()> {
    let policies = load_policies(cfg, policy_path)?;
    let mut engine = ThrottleEngine::new(0);
    engine.install_policies(policies);

    let explicit = args.explicit_delay_secs.map(Duration::from_secs);
    println!("{:<8} {:<10} {:<10} {:<10} {}", "REPORT", "DELAY", "ATTEMPTS", "ALTERNATE", "FRESH_ATTACH");
    for n in 1..=args.count {
        let delay = engine.report_error(&args.apn, args.error, explicit);
        let delay_str = delay
            .map(|d| format!("{}s", d.as_secs()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<10} {:<10} {:<10} {}",
            n,
            delay_str,
            engine.attempt_count_of_last_cause(&args.apn),
            engine.current_alternate_index(&args.apn, args.alternates),
            engine.should_use_fresh_attach(&args.apn)
        );
    }

    if let Some(event) = args.event {
        let cleared = engine.on_event(event);
        println!("{}: unthrottled {:?}", event, cleared);
    }

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}
