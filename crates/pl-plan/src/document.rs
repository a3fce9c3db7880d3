//! Serde model of a plan file.
//!
//! # Format
//!
//! ```toml
//! loaded_at = 0
//!
//! [planner]                    # optional, see PlannerConfig
//! deadline_policy = "fail"
//!
//! [facts]                      # optional initial fact values
//! rain = 0.0
//!
//! [[predicates]]
//! id   = "dry"
//! type = "fact_compare"
//! parameters = { fact = "rain", op = "<", value = 5 }
//!
//! [[rules]]
//! id         = "weather_ok"
//! predicates = ["dry"]         # or "dry, daylight"
//!
//! [[pools]]
//! name      = "Farmer"
//! instances = ["Bob", "Alice"]
//!
//! [[activities]]
//! id        = "harvest"
//! priority  = 2
//! rules     = ["weather_ok"]
//! resources = ["Farmer"]
//! minstart  = 3                # or `start = 3` for minstart = maxstart
//! maxfinish = 20
//!
//! [[precedences]]
//! source   = "plough"
//! dest     = "harvest"
//! relation = "fs"              # fs | ss | ff, or finish_start, ...
//! min_lag  = 2
//! max_lag  = 10                # omitted = unbounded
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use pl_core::{Parameters, PlannerConfig, Scalar};

/// A whole plan file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanDocument {
    #[serde(default)]
    pub loaded_at:   u64,
    #[serde(default)]
    pub planner:     PlannerConfig,
    #[serde(default)]
    pub facts:       BTreeMap<String, Scalar>,
    #[serde(default)]
    pub predicates:  Vec<PredicateEntry>,
    #[serde(default)]
    pub rules:       Vec<RuleEntry>,
    #[serde(default)]
    pub pools:       Vec<PoolEntry>,
    #[serde(default)]
    pub activities:  Vec<ActivityEntry>,
    #[serde(default)]
    pub precedences: Vec<PrecedenceEntry>,
}

/// A list of names, written either as an array or as one comma-separated
/// string.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum NameList {
    List(Vec<String>),
    Joined(String),
}

impl Default for NameList {
    fn default() -> Self {
        NameList::List(Vec::new())
    }
}

impl NameList {
    /// The names, trimmed, with empty entries dropped.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            NameList::List(v) => v.iter().map(String::as_str).collect(),
            NameList::Joined(s) => s.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateEntry {
    pub id:         String,
    #[serde(rename = "type")]
    pub kind:       String,
    #[serde(default)]
    pub parameters: Parameters,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    pub id:         String,
    #[serde(default)]
    pub predicates: NameList,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolEntry {
    pub name:      String,
    #[serde(default)]
    pub instances: NameList,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityEntry {
    pub id:        String,
    #[serde(default)]
    pub priority:  i32,
    #[serde(default)]
    pub rules:     NameList,
    #[serde(default)]
    pub resources: NameList,
    pub minstart:  Option<u64>,
    pub maxstart:  Option<u64>,
    pub start:     Option<u64>,
    pub minfinish: Option<u64>,
    pub maxfinish: Option<u64>,
    pub finish:    Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrecedenceEntry {
    pub source:   String,
    pub dest:     String,
    pub relation: String,
    #[serde(default)]
    pub min_lag:  u64,
    pub max_lag:  Option<u64>,
}
