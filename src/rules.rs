//! Parsing of `.keep` rules files.
//!
//! The file is line oriented. Lines starting with `b ` are [`RuleCategory::Always`]
//! rules, lines starting with `bi ` are [`RuleCategory::Initially`] rules. Every
//! other line (comments, blanks, anything else) is ignored.

use crate::config::RulesConfig;
use crate::error::{KeepError, Result};
use crate::patterns::PatternSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Name of the rules file. It is always protected by an implicit Always rule.
pub const KEEP_FILE_NAME: &str = ".keep";

/// Category a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Protected in the base tree, regenerated in user trees
    Always,
    /// Protected in the base tree only
    Initially,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 2] = [RuleCategory::Always, RuleCategory::Initially];

    /// Line prefix that introduces a rule of this category
    pub fn prefix(self) -> &'static str {
        match self {
            RuleCategory::Always => "b ",
            RuleCategory::Initially => "bi ",
        }
    }

    /// Split a rules-file line into its category and trimmed rule string.
    pub fn classify(line: &str) -> Option<(RuleCategory, &str)> {
        Self::ALL.into_iter().find_map(|category| {
            line.strip_prefix(category.prefix())
                .map(|rest| (category, rest.trim()))
        })
    }
}

/// Parsed rules, one pattern set per category. Immutable once built.
#[derive(Debug, Clone)]
pub struct RuleSet {
    always: PatternSet,
    initially: PatternSet,
}

impl RuleSet {
    /// Parse the contents of a rules file.
    pub fn parse(contents: &str) -> Result<Self> {
        Self::parse_with(contents, &RulesConfig::default())
    }

    /// Parse the contents of a rules file and add the extra rules from `config`.
    pub fn parse_with(contents: &str, config: &RulesConfig) -> Result<Self> {
        let mut always = PatternSet::new();
        always
            .add_rule(KEEP_FILE_NAME)
            .map_err(KeepError::BuiltinRule)?;
        let mut rules = RuleSet {
            always,
            initially: PatternSet::new(),
        };

        for (idx, line) in contents.lines().enumerate() {
            let Some((category, rule)) = RuleCategory::classify(line) else {
                continue;
            };
            debug!("rule {:?}: {}", category, rule);
            rules
                .set_mut(category)
                .add_rule(rule)
                .map_err(|source| KeepError::InvalidRule {
                    line: idx + 1,
                    source,
                })?;
        }

        for (category, rule) in config.rules() {
            rules
                .set_mut(category)
                .add_rule(rule)
                .map_err(KeepError::InvalidConfigRule)?;
        }

        Ok(rules)
    }

    /// Read and parse a rules file from disk.
    pub fn from_path(path: &Path, config: &RulesConfig) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| KeepError::io(path, e))?;
        Self::parse_with(&contents, config)
    }

    pub fn always(&self) -> &PatternSet {
        &self.always
    }

    pub fn initially(&self) -> &PatternSet {
        &self.initially
    }

    pub fn get(&self, category: RuleCategory) -> &PatternSet {
        match category {
            RuleCategory::Always => &self.always,
            RuleCategory::Initially => &self.initially,
        }
    }

    fn set_mut(&mut self, category: RuleCategory) -> &mut PatternSet {
        match category {
            RuleCategory::Always => &mut self.always,
            RuleCategory::Initially => &mut self.initially,
        }
    }

    /// All loaded rule strings with their category
    pub fn rules(&self) -> impl Iterator<Item = (RuleCategory, &str)> + '_ {
        RuleCategory::ALL.into_iter().flat_map(move |category| {
            self.get(category)
                .rules()
                .iter()
                .map(move |rule| (category, rule.as_str()))
        })
    }
}
