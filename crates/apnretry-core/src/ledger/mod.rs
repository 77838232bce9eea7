//! Retry ledger.
//!
//! Tracks, per APN and per cause:
//! - the position in the matched policy's retry schedule
//! - how many times the cause was reported since the last reset
//! - the throttle window that the last report opened
//!
//! plus the last reported error per APN. A `NoError` report clears the APN.

mod entry;
mod snapshot;
mod state;

pub use entry::LedgerEntry;
pub use snapshot::{ApnSnapshot, CauseSnapshot, LedgerSnapshot};
pub use state::RetryLedger;
