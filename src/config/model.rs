//! Data structures produced by the configuration parser.
//!
//! A [`RoutingTable`] maps a path prefix to the ordered [`Step`]s that
//! process requests under it. The last step of each path names the
//! terminal handler; every step before it names a middleware.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Path every step belongs to until the first path declaration.
pub const ROOT_PATH: &str = "/";

pub type Settings = HashMap<String, String>;

pub type RoutingTable = BTreeMap<String, Vec<Step>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub name: String,

    /// `None` when no `{...}` block followed the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl Step {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: None,
        }
    }

    #[must_use]
    pub fn with_settings<K, V>(
        name: impl Into<String>,
        settings: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            settings: Some(
                settings
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[must_use]
pub fn total_steps(table: &RoutingTable) -> usize {
    table.values().map(Vec::len).sum()
}
