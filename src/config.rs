//! Lookup configuration for member map registries
//!
//! This module provides the options that control how a
//! [`crate::mapping::MemberMapRegistry`] decides whether a registered member matches a
//! queried one, and how deep hierarchy walks may go.

use strum::{Display, EnumIter, EnumString};

/// How registered members are compared against a queried member
///
/// The string forms (`"exact"`, `"structural"`) can be parsed with [`std::str::FromStr`],
/// which allows the mode to come from settings files or command line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MatchMode {
    /// Only the identical member descriptor matches
    Exact,
    /// Identical descriptors match, and so do members with the same name whose declaring
    /// types are related by assignability in either direction
    #[default]
    Structural,
}

/// Configuration for member lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    /// Rule used by `find` to compare members
    pub match_mode: MatchMode,

    /// Maximum depth of base chains and nested reference maps (default: 64)
    pub max_hierarchy_depth: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Structural,
            max_hierarchy_depth: 64,
        }
    }
}

impl LookupConfig {
    /// Creates a configuration that only accepts identical member descriptors
    ///
    /// Members re-declared on a derived type will not find the association registered for
    /// the base type.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            match_mode: MatchMode::Exact,
            ..Self::default()
        }
    }

    /// Creates a configuration that matches members by name across the type hierarchy
    #[must_use]
    pub fn structural() -> Self {
        Self::default()
    }

    /// Returns a copy of this configuration with a different hierarchy depth limit
    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }
}
