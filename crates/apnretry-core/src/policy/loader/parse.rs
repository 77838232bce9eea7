//! Token parsers for `ErrorDetails`, `RetryArray` and count fields.

use std::num::NonZeroU32;

use super::error::PolicyViolation;
use crate::policy::types::{DetailMatch, ErrorTypeMatch, RetrySchedule, RetryStep};
use crate::policy::UnthrottleEvent;
use crate::tunnel_error::GenericError;

const REPEAT_SENTINEL: &str = "-1";

pub(super) fn parse_detail(error_type: ErrorTypeMatch, raw: &str) -> Result<DetailMatch, PolicyViolation> {
    let token = raw.trim();
    if token == "*" {
        return Ok(DetailMatch::Any);
    }
    match error_type {
        ErrorTypeMatch::Any => Err(PolicyViolation::WildcardTypeWithDetail(raw.to_string())),
        ErrorTypeMatch::Generic => GenericError::from_config_token(token)
            .map(DetailMatch::Generic)
            .ok_or_else(|| PolicyViolation::InvalidDetail(raw.to_string())),
        ErrorTypeMatch::Protocol => match token.split_once('-') {
            Some((lo, hi)) => {
                let lo = parse_code(lo).ok_or_else(|| PolicyViolation::InvalidRange(raw.to_string()))?;
                let hi = parse_code(hi).ok_or_else(|| PolicyViolation::InvalidRange(raw.to_string()))?;
                if lo > hi {
                    return Err(PolicyViolation::InvalidRange(raw.to_string()));
                }
                Ok(DetailMatch::Range { lo, hi })
            }
            None => parse_code(token)
                .map(DetailMatch::Code)
                .ok_or_else(|| PolicyViolation::InvalidDetail(raw.to_string())),
        },
    }
}

fn parse_code(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse `RetryArray`: `"N"`, `"N+rM"`, and a terminal `"-1"`.
pub(super) fn parse_schedule(raw: &[String]) -> Result<RetrySchedule, PolicyViolation> {
    if raw.is_empty() {
        return Err(PolicyViolation::EmptyRetryArray);
    }
    let mut steps = Vec::with_capacity(raw.len());
    let mut repeat_forever = false;
    for (i, entry) in raw.iter().enumerate() {
        let entry = entry.trim();
        if entry == REPEAT_SENTINEL {
            if i + 1 != raw.len() || steps.is_empty() {
                return Err(PolicyViolation::MisplacedRepeatSentinel);
            }
            repeat_forever = true;
            continue;
        }
        steps.push(parse_step(entry)?);
    }
    Ok(RetrySchedule::new(steps, repeat_forever))
}

fn parse_step(entry: &str) -> Result<RetryStep, PolicyViolation> {
    let invalid = || PolicyViolation::InvalidRetryEntry(entry.to_string());
    let secs = |s: &str| -> Result<u64, PolicyViolation> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse().map_err(|_| invalid())
    };
    match entry.split_once("+r") {
        Some((base, jitter)) => Ok(RetryStep::secs_with_jitter(secs(base)?, secs(jitter)?)),
        None => Ok(RetryStep::secs(secs(entry)?)),
    }
}

pub(super) fn parse_events(raw: &[String]) -> Result<Vec<UnthrottleEvent>, PolicyViolation> {
    let mut events = Vec::with_capacity(raw.len());
    for tag in raw {
        let event = tag
            .trim()
            .parse::<UnthrottleEvent>()
            .map_err(|_| PolicyViolation::UnknownEvent(tag.clone()))?;
        if !events.contains(&event) {
            events.push(event);
        }
    }
    Ok(events)
}

pub(super) fn parse_count(field: &'static str, raw: Option<&str>) -> Result<Option<NonZeroU32>, PolicyViolation> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(NonZeroU32::new)
        .map(Some)
        .ok_or_else(|| PolicyViolation::InvalidCount {
            field,
            value: raw.to_string(),
        })
}
