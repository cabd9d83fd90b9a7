//! keepengine - Retention-rule cleanup
//!
//! keepengine thins a directory tree down to what a `.keep` rules file protects.
//! It runs in one of two modes:
//!
//! - **base**: the template tree. Everything not protected by an Always (`b `) or
//!   Initially (`bi `) rule is deleted. Directories leading to a protected path
//!   survive so the walk can reach it.
//! - **user**: a copy of the template. Only paths matching an Always rule exactly
//!   are deleted, so they can be regenerated from the template.
//!
//! Rules are compiled once ([`patterns`]), grouped by category ([`rules`]),
//! wrapped in a [`policy`] and applied by a depth-first [`walker`].

pub mod config;
pub mod error;
pub mod patterns;
pub mod policy;
pub mod rules;
pub mod walker;

use std::path::Path;

// Re-export commonly used items
pub use config::RulesConfig;
pub use error::{KeepError, PatternError, Result};
pub use patterns::{compile, PatternSet};
pub use policy::{explain, BasePolicy, Decision, KeepPolicy, Mode, UserPolicy};
pub use rules::{RuleCategory, RuleSet, KEEP_FILE_NAME};
pub use walker::{clean_tree, clean_tree_with, CleanOptions, CleanReport, Removal};

/// Parse `rules` and clean `root` with the policy for `mode`.
///
/// Rule errors are reported before the tree is touched.
pub fn evaluate(
    rules: &str,
    mode: Mode,
    root: &Path,
    options: CleanOptions,
) -> Result<CleanReport> {
    evaluate_with_config(rules, &RulesConfig::default(), mode, root, options)
}

/// Like [`evaluate`], with extra rules from a config.
pub fn evaluate_with_config(
    rules: &str,
    config: &RulesConfig,
    mode: Mode,
    root: &Path,
    options: CleanOptions,
) -> Result<CleanReport> {
    let rules = RuleSet::parse_with(rules, config)?;
    let policy = mode.policy(&rules);
    clean_tree(root, policy.as_ref(), options)
}
