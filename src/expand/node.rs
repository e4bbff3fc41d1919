//! Expansion of a single node definition inside one document

use std::sync::Arc;

use crate::config::NodeDefinition;
use crate::document::{Document, Element};
use crate::error::ExpandError;
use crate::files::FileCollection;
use crate::shared::glob::{MatchOptions, PatternMatcher, contains_wildcard};
use crate::shared::paths;

/// Predicate for one configured element/attribute pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSelector {
    element: String,
    property: String,
}

impl NodeSelector {
    pub fn new(definition: &NodeDefinition) -> Self {
        Self {
            element: definition.element.clone(),
            property: definition.property.clone(),
        }
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    /// Tag matches and the attribute holds a `*` or `?`
    pub fn matches(&self, element: &Element) -> bool {
        element.is(&self.element)
            && element
                .attr(&self.property)
                .is_some_and(contains_wildcard)
    }
}

/// Absolute forms of every path in the file set, captured once per pass.
///
/// Later rewrites never change this list, so every document sees the same
/// set of candidates.
#[derive(Debug, Clone, Default)]
pub struct KnownPaths {
    paths: Arc<[String]>,
}

impl KnownPaths {
    pub fn capture<C: FileCollection + ?Sized>(files: &C) -> Self {
        files.paths().iter().map(|path| paths::to_absolute(path)).collect()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

impl FromIterator<String> for KnownPaths {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

/// Known paths matched by `matcher`, relative to `base_path`, sorted by code point
pub fn match_set(matcher: &PatternMatcher, base_path: &str, known_paths: &KnownPaths) -> Vec<String> {
    let mut matches: Vec<String> = known_paths
        .iter()
        .filter(|path| matcher.is_match(path))
        .map(|path| paths::to_relative(base_path, path))
        .collect();
    matches.sort();
    matches
}

/// Replace every element selected by `selector` with one copy per matching
/// path, in document order. An element whose glob matches nothing is removed.
///
/// Returns the number of elements that were expanded.
pub fn expand_node(
    selector: &NodeSelector,
    document_path: &str,
    document: &mut Document,
    known_paths: &KnownPaths,
    options: MatchOptions,
) -> Result<usize, ExpandError> {
    if document.select(|element| selector.matches(element)).is_empty() {
        return Ok(0);
    }

    let base_path = paths::parent_directory(&paths::to_absolute(document_path));

    document.replace_elements(|element| {
        if !selector.matches(element) {
            return Ok(None);
        }
        let Some(glob_expression) = element.attr(&selector.property) else {
            return Ok(None);
        };

        let resolved_glob = paths::resolve_glob(document_path, glob_expression);
        let matcher = PatternMatcher::new(&resolved_glob, options)?;
        let matches = match_set(&matcher, &base_path, known_paths);

        tracing::trace!(
            "{}: <{} {}=\"{}\"> -> {} match(es)",
            document_path,
            selector.element,
            selector.property,
            glob_expression,
            matches.len()
        );

        let copies = matches
            .iter()
            .map(|path| {
                let mut copy = element.clone();
                copy.set_attr(&selector.property, path);
                copy
            })
            .collect();
        Ok(Some(copies))
    })
}
