//! Upstream endpoint descriptors and the payload shapes they return.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// How an endpoint wraps the entities it returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadShape {
    /// `{key: {country: [entity, ...], ...}}`. A flat list under `key` is
    /// accepted too.
    CountryMap { key: String },
    /// `{k: [entity, ...]}` for the first `k` in `keys` holding a list, or a
    /// bare list.
    WrappedList { keys: Vec<String> },
    /// `{k: {entity}}` for the first `k` in `keys` holding an object, or a
    /// bare object.
    WrappedObject { keys: Vec<String> },
}

impl PayloadShape {
    pub fn country_map(key: &str) -> Self {
        Self::CountryMap {
            key: key.to_string(),
        }
    }

    pub fn wrapped_list(keys: &[&str]) -> Self {
        Self::WrappedList {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn wrapped_object(keys: &[&str]) -> Self {
        Self::WrappedObject {
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// The payload substituted when a fetch fails or the body is not JSON.
    pub fn empty_payload(&self) -> Value {
        match self {
            Self::CountryMap { key } => json!({ key.as_str(): {} }),
            Self::WrappedList { keys } => match keys.first() {
                Some(key) => json!({ key.as_str(): [] }),
                None => json!([]),
            },
            Self::WrappedObject { keys } => match keys.first() {
                Some(key) => json!({ key.as_str(): null }),
                None => Value::Null,
            },
        }
    }
}

/// A single upstream resource, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    pub shape: PayloadShape,
}

impl Endpoint {
    pub fn new(path: &str, shape: PayloadShape) -> Self {
        Self {
            path: path.to_string(),
            shape,
        }
    }

    /// Absolute URL of this endpoint under `api_base`.
    pub fn url(&self, api_base: &str) -> String {
        format!(
            "{}/{}",
            api_base.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}
