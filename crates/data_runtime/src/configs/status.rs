//! Status-tracking policy loaded from data/config/status.toml with a
//! default of multi-instance tracking.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::loader;

/// How concurrent status conditions are tracked on one actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// One instance per kind; distinct kinds coexist.
    #[default]
    Multi,
    /// At most one condition total; a new application replaces it.
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct StatusConfig {
    #[serde(default)]
    pub policy: StatusPolicy,
}

/// Load the status config from the default location, falling back to
/// multi-instance tracking.
pub fn load_default() -> Result<StatusConfig> {
    let path = loader::data_root().join("config/status.toml");
    if !path.is_file() {
        return Ok(StatusConfig::default());
    }
    let txt = loader::read_toml("config/status.toml")?;
    let cfg: StatusConfig = toml::from_str(&txt).context("parse status TOML")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_multi() {
        let cfg = load_default().expect("load");
        // The shipped config (if any) keeps the default policy.
        assert_eq!(cfg.policy, StatusPolicy::Multi);
    }

    #[test]
    fn parses_single_policy() {
        let cfg: StatusConfig = toml::from_str("policy = \"single\"").expect("parse");
        assert_eq!(cfg.policy, StatusPolicy::Single);
    }
}
