//! Channel merge policies and the per-graph schema that assigns them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a node's update to a channel is combined with the channel's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    /// The new value replaces the old one.
    #[default]
    Overwrite,
    /// New values are concatenated after the existing sequence (e.g. a transcript).
    Append,
}

impl ChannelPolicy {
    /// Combines `current` (if any) with `incoming` under this policy.
    ///
    /// Append treats a missing or `null` current value as `[]` and a non-array current
    /// value as a one-element sequence. An incoming array contributes its elements in
    /// order; any other incoming value is pushed as a single element.
    pub fn merge(self, current: Option<Value>, incoming: Value) -> Value {
        match self {
            ChannelPolicy::Overwrite => incoming,
            ChannelPolicy::Append => {
                let mut items = match current {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(items)) => items,
                    Some(other) => vec![other],
                };
                match incoming {
                    Value::Array(more) => items.extend(more),
                    single => items.push(single),
                }
                Value::Array(items)
            }
        }
    }
}

/// Declared merge policy per channel. Undeclared channels use [`ChannelPolicy::Overwrite`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSchema {
    channels: BTreeMap<String, ChannelPolicy>,
}

impl StateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `name` with `policy` (builder style). Re-declaring replaces the policy.
    pub fn channel(mut self, name: impl Into<String>, policy: ChannelPolicy) -> Self {
        self.channels.insert(name.into(), policy);
        self
    }

    /// Declares `name` with `policy` in place.
    pub fn declare(&mut self, name: impl Into<String>, policy: ChannelPolicy) {
        self.channels.insert(name.into(), policy);
    }

    /// Policy for `name`; `Overwrite` when the channel was never declared.
    pub fn policy(&self, name: &str) -> ChannelPolicy {
        self.channels.get(name).copied().unwrap_or_default()
    }

    /// Declared channels in name order.
    pub fn channels(&self) -> impl Iterator<Item = (&str, ChannelPolicy)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
