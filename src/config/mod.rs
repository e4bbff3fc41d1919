//! Configuration management for link-globs
//!
//! [`LinkGlobsConfig`] is the explicit option object handed to the expansion
//! engine. Every field has a default, so an empty configuration file (or none
//! at all) behaves like the stock setup. [`core`] layers defaults, files,
//! environment variables and CLI overrides with figment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::encoding::TextEncoding;
use crate::error::ExpandError;
use crate::shared::glob::MatchOptions;

pub mod core;

#[cfg(test)]
mod tests;

pub use self::core::load;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkGlobsConfig {
    /// Pattern selecting which files are treated as HTML documents
    #[serde(rename = "match")]
    pub match_pattern: String,

    /// Text encoding of document contents
    pub encoding: String,

    /// Matcher options for `match`
    pub match_options: MatchOptions,

    /// Matcher options for the globs found inside documents
    pub element_match_options: MatchOptions,

    /// Elements and attributes that may carry globs, scanned in order
    pub nodes: Vec<NodeDefinition>,

    /// Worker pool settings
    pub parallel: ParallelConfig,
}

/// An element name and the attribute on it that may hold a glob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    #[serde(default)]
    pub element: String,

    #[serde(default)]
    pub property: String,
}

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Maximum number of worker threads (0 = no limit)
    pub max_threads: usize,

    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,

    /// Number of documents needed before work is spread over threads
    pub threshold: usize,
}

impl Default for LinkGlobsConfig {
    fn default() -> Self {
        Self {
            match_pattern: "**/*.html".to_string(),
            match_options: MatchOptions::default(),
            element_match_options: MatchOptions::default(),
            encoding: "utf8".to_string(),
            nodes: NodeDefinition::defaults(),
            parallel: ParallelConfig::default(),
        }
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 75,
            threshold: 32,
        }
    }
}

impl LinkGlobsConfig {
    /// Check the configuration before any document is processed
    pub fn validate(&self) -> Result<(), ExpandError> {
        if self.match_pattern.trim().is_empty() {
            return Err(ExpandError::Configuration("'match' must not be empty".to_string()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.element.trim().is_empty() {
                return Err(ExpandError::Configuration(format!(
                    "node #{} is missing 'element'",
                    index + 1
                )));
            }
            if node.property.trim().is_empty() {
                return Err(ExpandError::Configuration(format!(
                    "node #{} ({}) is missing 'property'",
                    index + 1,
                    node.element
                )));
            }
        }

        if self.parallel.thread_percentage == 0 || self.parallel.thread_percentage > 100 {
            return Err(ExpandError::Configuration(format!(
                "parallel.thread_percentage must be between 1 and 100, got {}",
                self.parallel.thread_percentage
            )));
        }

        self.text_encoding()?;
        Ok(())
    }

    pub fn text_encoding(&self) -> Result<TextEncoding, ExpandError> {
        self.encoding.parse()
    }
}

impl NodeDefinition {
    pub fn new(element: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            property: property.into(),
        }
    }

    /// `a/href`, `img/src`, `link/href`, `script/src`
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("a", "href"),
            Self::new("img", "src"),
            Self::new("link", "href"),
            Self::new("script", "src"),
        ]
    }
}

impl fmt::Display for NodeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.element, self.property)
    }
}

/// Parses `element:property` (or `element/property`) as given on the command line
impl FromStr for NodeDefinition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (element, property) = value
            .split_once(':')
            .or_else(|| value.split_once('/'))
            .ok_or_else(|| format!("expected ELEMENT:PROPERTY, got '{}'", value))?;

        if element.is_empty() || property.is_empty() {
            return Err(format!("expected ELEMENT:PROPERTY, got '{}'", value));
        }

        Ok(Self::new(element, property))
    }
}
