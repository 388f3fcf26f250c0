//! List filter kinds shared by the store and the view.
//!
//! # Invariants
//! - Exactly three kinds exist: `all`, `active`, `completed`.
//! - Unrecognized tokens resolve to `All` wherever a raw token is accepted.

use crate::model::task::Task;
use once_cell::sync::Lazy;
use regex::Regex;

static FILTER_FRAGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(all|completed|active)$").expect("valid filter fragment regex"));

/// Which subset of tasks a traversal or rendered list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    /// Display order used by footer filter links.
    pub const ALL_KINDS: [TaskFilter; 3] = [Self::All, Self::Active, Self::Completed];

    /// Parses an exact filter token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Parses a filter token, treating anything unrecognized as `All`.
    pub fn from_token_or_all(token: &str) -> Self {
        Self::from_token(token).unwrap_or_default()
    }

    /// Parses a location fragment such as `#active`.
    ///
    /// Only `#all`, `#active` and `#completed` select a filter; an empty or
    /// unknown fragment yields `All`.
    pub fn from_fragment(fragment: &str) -> Self {
        FILTER_FRAGMENT_RE
            .captures(fragment)
            .and_then(|caps| caps.get(1))
            .and_then(|token| Self::from_token(token.as_str()))
            .unwrap_or_default()
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Human-readable link label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Returns whether `task` belongs to this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}
