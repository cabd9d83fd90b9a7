//! Optional TOML configuration.
//!
//! ```toml
//! [rules]
//! always = [".config/app/generated.ini"]
//! initially = ["Desktop/*.desktop"]
//! ```
//!
//! Rules from the config are added after the rules file's own rules.

use crate::error::{KeepError, Result};
use crate::rules::RuleCategory;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    rules: RulesConfig,
}

/// Extra rules layered onto every parsed rules file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    #[serde(default)]
    pub always: Vec<String>,
    #[serde(default)]
    pub initially: Vec<String>,
}

impl RulesConfig {
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| KeepError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.rules)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| KeepError::io(path, e))?;
        Self::from_toml_str(&contents, path)
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleCategory, &str)> + '_ {
        let always = self
            .always
            .iter()
            .map(|r| (RuleCategory::Always, r.trim()));
        let initially = self
            .initially
            .iter()
            .map(|r| (RuleCategory::Initially, r.trim()));
        always.chain(initially)
    }

    pub fn is_empty(&self) -> bool {
        self.always.is_empty() && self.initially.is_empty()
    }
}
