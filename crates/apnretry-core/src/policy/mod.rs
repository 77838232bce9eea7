//! Retry policies: model, carrier configuration loader, built-in defaults and
//! the matcher that picks one policy per reported error.

mod builtin;
mod event;
pub mod loader;
mod set;
mod table;
mod types;

pub use event::{UnknownEvent, UnthrottleEvent};
pub use loader::{ConfigError, PolicyViolation};
pub use set::{LoadOutcome, PolicySet, PolicySource};
pub use table::PolicyTable;
pub use types::{ApnMatch, DetailMatch, ErrorTypeMatch, Policy, RetrySchedule, RetryStep};
