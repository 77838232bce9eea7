//! Events that may lift throttling early.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnthrottleEvent {
    ApmEnable,
    ApmDisable,
    WifiDisable,
    WifiApChanged,
    WifiCallingDisable,
}

impl UnthrottleEvent {
    pub const ALL: [UnthrottleEvent; 5] = [
        UnthrottleEvent::ApmEnable,
        UnthrottleEvent::ApmDisable,
        UnthrottleEvent::WifiDisable,
        UnthrottleEvent::WifiApChanged,
        UnthrottleEvent::WifiCallingDisable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnthrottleEvent::ApmEnable => "APM_ENABLE_EVENT",
            UnthrottleEvent::ApmDisable => "APM_DISABLE_EVENT",
            UnthrottleEvent::WifiDisable => "WIFI_DISABLE_EVENT",
            UnthrottleEvent::WifiApChanged => "WIFI_AP_CHANGED_EVENT",
            UnthrottleEvent::WifiCallingDisable => "WIFI_CALLING_DISABLE_EVENT",
        }
    }
}

impl fmt::Display for UnthrottleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unthrottle event: {0:?}")]
pub struct UnknownEvent(pub String);

impl FromStr for UnthrottleEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnthrottleEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}
