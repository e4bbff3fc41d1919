//! Glob pattern utilities
//!
//! This module wraps `globset` with the matching options used for both the
//! document selection pattern and the globs found inside documents.

use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};

use crate::error::ExpandError;

/// Options controlling how a pattern is matched against candidate paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Let wildcards match path segments that start with a dot
    pub dot: bool,

    /// Case-insensitive matching
    pub nocase: bool,

    /// Patterns without a slash are matched against the basename only
    pub match_base: bool,

    /// Treat `**` like a single `*`
    pub noglobstar: bool,

    /// Do not treat a leading `!` as negation
    pub nonegate: bool,

    /// Do not treat a leading `#` as a comment that matches nothing
    pub nocomment: bool,
}

/// Check if an attribute value carries a wildcard and should be expanded
pub fn contains_wildcard(value: &str) -> bool {
    value.contains('*') || value.contains('?')
}

/// A compiled pattern together with the options it was built with
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    options: MatchOptions,
    /// `None` for comment patterns, which never match
    matcher: Option<GlobMatcher>,
    negated: bool,
    basename_only: bool,
    /// Pattern segments that explicitly start with a dot
    dot_segments: Vec<GlobMatcher>,
}

impl PatternMatcher {
    pub fn new(pattern: &str, options: MatchOptions) -> Result<Self, ExpandError> {
        if !options.nocomment && pattern.starts_with('#') {
            return Ok(Self {
                options,
                matcher: None,
                negated: false,
                basename_only: false,
                dot_segments: Vec::new(),
            });
        }

        let (negated, body) = if options.nonegate {
            (false, pattern)
        } else {
            let stripped = pattern.trim_start_matches('!');
            let bangs = pattern.len() - stripped.len();
            (bangs % 2 == 1, stripped)
        };

        let body = if options.noglobstar {
            body.replace("**", "*")
        } else {
            body.to_string()
        };

        let matcher = compile(&body, options, pattern)?;

        let mut dot_segments = Vec::new();
        if !options.dot {
            for segment in body.split('/') {
                if segment.starts_with('.') && segment != "." && segment != ".." {
                    dot_segments.push(compile(segment, options, pattern)?);
                }
            }
        }

        Ok(Self {
            options,
            matcher: Some(matcher),
            negated,
            basename_only: options.match_base && !body.contains('/'),
            dot_segments,
        })
    }

    /// Test a candidate path
    pub fn is_match(&self, candidate: &str) -> bool {
        let Some(matcher) = &self.matcher else {
            return false;
        };

        let target = if self.basename_only {
            candidate.rsplit('/').next().unwrap_or(candidate)
        } else {
            candidate
        };

        let hit = matcher.is_match(target) && (self.options.dot || self.dots_are_explicit(target));
        hit != self.negated
    }

    /// Without the `dot` option a dot-leading segment only matches when the
    /// pattern spells out a dot-leading segment for it.
    fn dots_are_explicit(&self, target: &str) -> bool {
        target
            .split('/')
            .filter(|segment| segment.starts_with('.') && *segment != "." && *segment != "..")
            .all(|segment| self.dot_segments.iter().any(|m| m.is_match(segment)))
    }
}

fn compile(glob: &str, options: MatchOptions, pattern: &str) -> Result<GlobMatcher, ExpandError> {
    let glob = GlobBuilder::new(glob)
        .literal_separator(true)
        .case_insensitive(options.nocase)
        .backslash_escape(true)
        .build()
        .map_err(|source| ExpandError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}
