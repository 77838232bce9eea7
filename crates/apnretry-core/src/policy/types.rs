//! Typed policy model.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use rand::Rng;

use super::UnthrottleEvent;
use crate::tunnel_error::{GenericError, TunnelError};

/// Which APNs a policy group applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApnMatch {
    Named(String),
    Any,
}

impl fmt::Display for ApnMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApnMatch::Named(name) => write!(f, "{}", name),
            ApnMatch::Any => write!(f, "*"),
        }
    }
}

/// Error type a policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTypeMatch {
    Protocol,
    Generic,
    Any,
}

impl ErrorTypeMatch {
    pub fn from_config(s: &str) -> Option<Self> {
        match s {
            "IKE_PROTOCOL_ERROR_TYPE" => Some(ErrorTypeMatch::Protocol),
            "GENERIC_ERROR_TYPE" => Some(ErrorTypeMatch::Generic),
            "*" => Some(ErrorTypeMatch::Any),
            _ => None,
        }
    }

    pub fn config_name(self) -> &'static str {
        match self {
            ErrorTypeMatch::Protocol => "IKE_PROTOCOL_ERROR_TYPE",
            ErrorTypeMatch::Generic => "GENERIC_ERROR_TYPE",
            ErrorTypeMatch::Any => "*",
        }
    }

    /// True when this is the concrete type of `err` (never for `Any`).
    pub fn is_type_of(self, err: &TunnelError) -> bool {
        matches!(
            (self, err),
            (ErrorTypeMatch::Protocol, TunnelError::Protocol(_))
                | (ErrorTypeMatch::Generic, TunnelError::Generic(_))
        )
    }
}

/// One `ErrorDetails` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMatch {
    Code(u32),
    /// Inclusive range of protocol codes.
    Range { lo: u32, hi: u32 },
    Generic(GenericError),
    Any,
}

impl DetailMatch {
    /// Literal or range match. `Any` is handled separately by the matcher so
    /// that specific entries always win over wildcards.
    pub fn matches_value(&self, err: &TunnelError) -> bool {
        match (self, err) {
            (DetailMatch::Code(code), TunnelError::Protocol(value)) => code == value,
            (DetailMatch::Range { lo, hi }, TunnelError::Protocol(value)) => (*lo..=*hi).contains(value),
            (DetailMatch::Generic(kind), TunnelError::Generic(value)) => kind == value,
            _ => false,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, DetailMatch::Any)
    }
}

impl fmt::Display for DetailMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailMatch::Code(code) => write!(f, "{}", code),
            DetailMatch::Range { lo, hi } => write!(f, "{}-{}", lo, hi),
            DetailMatch::Generic(kind) => write!(f, "{}", kind.name()),
            DetailMatch::Any => write!(f, "*"),
        }
    }
}

/// One `RetryArray` entry: a base delay plus optional uniform jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryStep {
    pub base: Duration,
    pub jitter: Duration,
}

impl RetryStep {
    pub fn secs(base: u64) -> Self {
        Self {
            base: Duration::from_secs(base),
            jitter: Duration::ZERO,
        }
    }

    pub fn secs_with_jitter(base: u64, jitter: u64) -> Self {
        Self {
            base: Duration::from_secs(base),
            jitter: Duration::from_secs(jitter),
        }
    }

    /// Concrete delay for one report: base plus a whole number of seconds in `0..=jitter`.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Duration {
        let jitter_secs = self.jitter.as_secs();
        if jitter_secs == 0 {
            return self.base;
        }
        self.base + Duration::from_secs(rng.gen_range(0..=jitter_secs))
    }
}

impl fmt::Display for RetryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.jitter.is_zero() {
            write!(f, "{}", self.base.as_secs())
        } else {
            write!(f, "{}+r{}", self.base.as_secs(), self.jitter.as_secs())
        }
    }
}

/// Ordered retry delays. Past the end, the last step repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrySchedule {
    steps: Vec<RetryStep>,
    /// Set when the configuration ended with the `-1` sentinel.
    repeat_forever: bool,
}

impl RetrySchedule {
    /// Callers guarantee `steps` is non-empty.
    pub(crate) fn new(steps: Vec<RetryStep>, repeat_forever: bool) -> Self {
        Self {
            steps,
            repeat_forever,
        }
    }

    pub(crate) fn from_secs(secs: &[u64], repeat_forever: bool) -> Self {
        Self::new(secs.iter().copied().map(RetryStep::secs).collect(), repeat_forever)
    }

    pub fn steps(&self) -> &[RetryStep] {
        &self.steps
    }

    pub fn repeats_forever(&self) -> bool {
        self.repeat_forever
    }

    /// Step for the given retry index, clamped to the last step.
    pub fn step_at(&self, index: usize) -> Option<&RetryStep> {
        self.steps.get(index).or_else(|| self.steps.last())
    }
}

impl fmt::Display for RetrySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        if self.repeat_forever {
            write!(f, ", -1")?;
        }
        write!(f, "]")
    }
}

/// A single retry policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    pub apn: ApnMatch,
    pub error_type: ErrorTypeMatch,
    pub details: Vec<DetailMatch>,
    pub schedule: RetrySchedule,
    pub unthrottle_events: Vec<UnthrottleEvent>,
    /// Attempts against one alternate identity before rotating to the next.
    pub attempts_per_alternate: Option<NonZeroU32>,
    /// Attempt count at which a stalled handover falls back to a fresh attach.
    pub handover_attempt_threshold: Option<NonZeroU32>,
}

impl Policy {
    /// True when any literal or range detail matches `err`.
    pub fn matches_specifically(&self, err: &TunnelError) -> bool {
        self.details.iter().any(|d| d.matches_value(err))
    }

    pub fn has_wildcard_detail(&self) -> bool {
        self.details.iter().any(DetailMatch::is_any)
    }

    pub fn unthrottles_on(&self, event: UnthrottleEvent) -> bool {
        self.unthrottle_events.contains(&event)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "apn={} type={} details=[", self.apn, self.error_type.config_name())?;
        for (i, detail) in self.details.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", detail)?;
        }
        write!(f, "] retry={} events=[", self.schedule)?;
        for (i, event) in self.unthrottle_events.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", event)?;
        }
        write!(f, "]")?;
        if let Some(n) = self.attempts_per_alternate {
            write!(f, " attempts_per_alternate={}", n)?;
        }
        if let Some(n) = self.handover_attempt_threshold {
            write!(f, " handover_attempts={}", n)?;
        }
        Ok(())
    }
}
