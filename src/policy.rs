//! Keep/descend decisions for single relative paths.

use crate::rules::RuleSet;
use clap::ValueEnum;

/// Decides what happens to one path. Implementations never touch the filesystem.
pub trait KeepPolicy {
    /// Whether the path survives the cleanup
    fn should_keep(&self, path: &str) -> bool;

    /// Whether the walker has to look at the path's children
    fn should_descend(&self, path: &str) -> bool;
}

/// Which tree is being cleaned
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The template tree: keep only what a rule protects
    Base,
    /// A per-user copy of the template: delete what Always rules name exactly
    User,
}

impl Mode {
    pub fn policy(self, rules: &RuleSet) -> Box<dyn KeepPolicy + '_> {
        match self {
            Mode::Base => Box::new(BasePolicy::new(rules)),
            Mode::User => Box::new(UserPolicy::new(rules)),
        }
    }
}

/// Whitelist over both rule categories.
///
/// Ancestors of protected paths are kept so the walker can reach them.
pub struct BasePolicy<'a> {
    rules: &'a RuleSet,
}

impl<'a> BasePolicy<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    fn any_exact(&self, path: &str) -> bool {
        self.rules.always().matches_exact(path) || self.rules.initially().matches_exact(path)
    }

    fn any_prefix(&self, path: &str) -> bool {
        self.rules.always().matches_prefix(path) || self.rules.initially().matches_prefix(path)
    }
}

impl KeepPolicy for BasePolicy<'_> {
    fn should_keep(&self, path: &str) -> bool {
        self.any_prefix(path) || self.any_exact(path)
    }

    fn should_descend(&self, path: &str) -> bool {
        // an exact match keeps the whole subtree
        if self.any_exact(path) {
            return false;
        }
        self.any_prefix(path)
    }
}

/// Blacklist of exact Always matches. Initially rules are ignored.
pub struct UserPolicy<'a> {
    rules: &'a RuleSet,
}

impl<'a> UserPolicy<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }
}

impl KeepPolicy for UserPolicy<'_> {
    fn should_keep(&self, path: &str) -> bool {
        !self.rules.always().matches_exact(path)
    }

    fn should_descend(&self, path: &str) -> bool {
        // already selected for deletion
        if self.rules.always().matches_exact(path) {
            return false;
        }
        self.rules.always().matches_prefix(path)
    }
}

/// Both decisions for one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub keep: bool,
    pub descend: bool,
}

pub fn explain(policy: &dyn KeepPolicy, path: &str) -> Decision {
    Decision {
        keep: policy.should_keep(path),
        descend: policy.should_descend(path),
    }
}
