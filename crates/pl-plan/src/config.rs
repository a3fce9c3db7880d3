//! Configuration files.
//!
//! Any deserializable configuration type can be loaded; callers typically
//! compose their own top-level struct from `PlannerConfig` and the host's
//! `HostConfig`:
//!
//! ```toml
//! [planner]
//! max_passes      = 32
//! deadline_policy = "fail"
//!
//! [host]
//! end_tick     = 48
//! event_driven = true
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::LoadResult;

/// Parse a configuration value from TOML text.
pub fn load_config_str<T: DeserializeOwned>(text: &str) -> LoadResult<T> {
    Ok(toml::from_str(text)?)
}

/// Read and parse a TOML configuration file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let text = std::fs::read_to_string(path)?;
    load_config_str(&text)
}
