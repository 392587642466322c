//! Graph state: channel name → JSON value, merged per channel policy.
//!
//! Nodes read a [`State`] by reference and return a [`StateUpdate`]; the engine folds the
//! update into a new `State` with [`State::merge`]. Nodes never mutate the state they are given.

mod schema;

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use schema::{ChannelPolicy, StateSchema};

/// A channel held a value that could not be decoded into (or encoded from) the expected type.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("channel '{channel}' has unexpected shape: {source}")]
    Decode {
        channel: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value for channel '{channel}' is not serializable: {source}")]
    Encode {
        channel: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Current value of every channel. Ordered by channel name so snapshots compare and
/// serialize deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: BTreeMap<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of `channel`, if set.
    pub fn get(&self, channel: &str) -> Option<&Value> {
        self.values.get(channel)
    }

    /// String value of `channel`, if set and a string.
    pub fn get_str(&self, channel: &str) -> Option<&str> {
        self.values.get(channel).and_then(Value::as_str)
    }

    /// Decodes `channel` into `T`. `Ok(None)` when the channel is unset or `null`.
    pub fn decode<T: DeserializeOwned>(&self, channel: &str) -> Result<Option<T>, StateError> {
        match self.values.get(channel) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => T::deserialize(v)
                .map(Some)
                .map_err(|source| StateError::Decode {
                    channel: channel.to_string(),
                    source,
                }),
        }
    }

    /// Like [`decode`](Self::decode) but yields `T::default()` for an unset channel.
    pub fn decode_or_default<T: DeserializeOwned + Default>(
        &self,
        channel: &str,
    ) -> Result<T, StateError> {
        Ok(self.decode(channel)?.unwrap_or_default())
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.values.contains_key(channel)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Channels in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns a new state with `update` folded in, channel by channel, using `schema`.
    ///
    /// Channels are applied in name order; channels absent from `update` are untouched.
    pub fn merge(&self, schema: &StateSchema, update: StateUpdate) -> State {
        let mut values = self.values.clone();
        for (channel, incoming) in update.values {
            let current = values.remove(&channel);
            let merged = schema.policy(&channel).merge(current, incoming);
            values.insert(channel, merged);
        }
        State { values }
    }

    /// Converts into the full JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.values.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for State {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Partial state returned by a node: only the channels it wants to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateUpdate {
    values: BTreeMap<String, Value>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `channel` to `value` in this update (builder style).
    pub fn set(mut self, channel: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(channel.into(), value.into());
        self
    }

    /// Serializes `value` into `channel`.
    pub fn set_serialized<T: Serialize>(
        self,
        channel: impl Into<String>,
        value: &T,
    ) -> Result<Self, StateError> {
        let channel = channel.into();
        let json = serde_json::to_value(value).map_err(|source| StateError::Encode {
            channel: channel.clone(),
            source,
        })?;
        Ok(self.set(channel, json))
    }

    pub fn get(&self, channel: &str) -> Option<&Value> {
        self.values.get(channel)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Channel names touched by this update, in name order.
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Value)> for StateUpdate {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
