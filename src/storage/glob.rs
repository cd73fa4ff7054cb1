//! Glob patterns over object-store keys
//!
//! Matching is delegated to `glob::Pattern` with literal separators, so
//! `*`, `?` and `[..]`/`[!..]` stay within one path segment and only a
//! whole `**` segment crosses directories.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: Pattern,
}

impl Glob {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = pattern.trim_start_matches('/');
        if pattern.is_empty() {
            return Err(Error::invalid_glob(pattern, "pattern is empty"));
        }

        let compiled = Pattern::new(pattern).map_err(|e| {
            Error::invalid_glob(pattern, format!("{} at position {}", e.msg, e.pos))
        })?;
        Ok(Self { pattern: compiled })
    }

    /// The pattern text as given
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Check whether a `/`-separated key matches the whole pattern
    pub fn is_match(&self, key: &str) -> bool {
        self.pattern
            .matches_with(key.trim_start_matches('/'), MATCH_OPTIONS)
    }

    /// The literal directory prefix before the first wildcard segment
    ///
    /// Used to narrow object-store listings; empty when the first segment
    /// already contains a wildcard.
    pub fn literal_prefix(&self) -> String {
        let segments: Vec<&str> = self.pattern().split('/').collect();
        let literal: Vec<&str> = segments[..segments.len() - 1]
            .iter()
            .take_while(|segment| !segment.contains(['*', '?', '[']))
            .copied()
            .collect();
        literal.join("/")
    }
}
