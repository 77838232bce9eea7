pub mod clock;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod logging;
pub mod policy;
pub mod tunnel_error;
pub mod unthrottle;

pub use engine::{EngineRegistry, SlotId, ThrottleEngine};
pub use policy::{PolicySet, PolicySource, UnthrottleEvent};
pub use tunnel_error::{FailureCause, GenericError, TunnelError};
