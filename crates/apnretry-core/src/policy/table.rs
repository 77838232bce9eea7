//! Immutable lookup table of policies, grouped by APN.

use std::collections::HashMap;
use std::sync::Arc;

use super::types::{ApnMatch, ErrorTypeMatch, Policy};
use crate::tunnel_error::TunnelError;

/// Parsed policies, partitioned by APN.
///
/// Within a group, file order is kept; precedence is decided at lookup time
/// (specific error type before `"*"`, literal or range detail before `"*"`).
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    named: HashMap<String, Vec<Arc<Policy>>>,
    any_apn: Vec<Arc<Policy>>,
}

impl PolicyTable {
    pub fn from_policies(policies: impl IntoIterator<Item = Policy>) -> Self {
        let mut table = PolicyTable::default();
        for policy in policies {
            table.push(policy);
        }
        table
    }

    fn push(&mut self, policy: Policy) {
        let policy = Arc::new(policy);
        match &policy.apn {
            ApnMatch::Named(name) => self
                .named
                .entry(name.clone())
                .or_default()
                .push(Arc::clone(&policy)),
            ApnMatch::Any => self.any_apn.push(policy),
        }
    }

    pub fn len(&self) -> usize {
        self.any_apn.len() + self.named.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct APN groups, counting `"*"` as one when present.
    pub fn group_count(&self) -> usize {
        self.named.len() + usize::from(!self.any_apn.is_empty())
    }

    /// Most specific policy for `apn`/`err` in this table: the APN's own group
    /// first, then the `"*"` group.
    pub fn find(&self, apn: &str, err: &TunnelError) -> Option<Arc<Policy>> {
        self.named
            .get(apn)
            .and_then(|group| find_in_group(group, err))
            .or_else(|| find_in_group(&self.any_apn, err))
            .cloned()
    }

    /// Every policy, named groups first.
    pub fn policies(&self) -> impl Iterator<Item = &Arc<Policy>> {
        self.named.values().flatten().chain(self.any_apn.iter())
    }
}

fn find_in_group<'a>(group: &'a [Arc<Policy>], err: &TunnelError) -> Option<&'a Arc<Policy>> {
    let exact_type = || group.iter().filter(move |p| p.error_type.is_type_of(err));
    let any_type = || group.iter().filter(|p| p.error_type == ErrorTypeMatch::Any);

    exact_type()
        .find(|p| p.matches_specifically(err))
        .or_else(|| exact_type().find(|p| p.has_wildcard_detail()))
        .or_else(|| any_type().find(|p| p.matches_specifically(err)))
        .or_else(|| any_type().find(|p| p.has_wildcard_detail()))
}
