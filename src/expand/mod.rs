//! Glob expansion over a whole file collection
//!
//! The [`Expander`] picks the documents selected by the `match` pattern,
//! rewrites each of them with [`node::expand_node`] once per node definition
//! and commits the new contents only after every document succeeded.
//!
//! ```rust
//! use link_globs::{Expander, FileSet, LinkGlobsConfig};
//!
//! let mut files: FileSet = [
//!     ("a.css", ""),
//!     ("bb.css", ""),
//!     ("star.html", "<link href=\"*.css\">"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let expander = Expander::new(&LinkGlobsConfig::default()).unwrap();
//! expander.expand(&mut files).unwrap();
//!
//! assert_eq!(
//!     files.text("star.html"),
//!     Some("<link href=\"a.css\"><link href=\"bb.css\">")
//! );
//! ```

use std::sync::Arc;

use crate::config::{LinkGlobsConfig, ParallelConfig};
use crate::document::Document;
use crate::encoding::TextEncoding;
use crate::error::ExpandError;
use crate::files::FileCollection;
use crate::parallel::ExecutionStrategy;
use crate::shared::glob::{MatchOptions, PatternMatcher};

pub mod node;

pub use node::{KnownPaths, NodeSelector, expand_node, match_set};

/// Outcome for one processed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub path: String,
    /// Glob-bearing elements that were replaced
    pub expanded_elements: usize,
    /// Whether the stored bytes differ from the original
    pub changed: bool,
}

/// Summary of an expansion pass, ordered by document path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandReport {
    pub documents: Vec<DocumentReport>,
}

impl ExpandReport {
    pub fn changed_documents(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|document| document.changed)
    }

    pub fn expanded_elements(&self) -> usize {
        self.documents.iter().map(|document| document.expanded_elements).sum()
    }
}

/// Expansion engine built from a validated configuration
#[derive(Debug, Clone)]
pub struct Expander {
    document_matcher: PatternMatcher,
    selectors: Arc<[NodeSelector]>,
    element_match_options: MatchOptions,
    encoding: TextEncoding,
    parallel: ParallelConfig,
    strategy: Option<ExecutionStrategy>,
}

impl Expander {
    /// Validate `config` and compile the document selection pattern.
    ///
    /// Configuration problems surface here, before any document is read.
    pub fn new(config: &LinkGlobsConfig) -> Result<Self, ExpandError> {
        config.validate()?;

        Ok(Self {
            document_matcher: PatternMatcher::new(&config.match_pattern, config.match_options)?,
            selectors: config.nodes.iter().map(NodeSelector::new).collect(),
            element_match_options: config.element_match_options,
            encoding: config.text_encoding()?,
            parallel: config.parallel.clone(),
            strategy: None,
        })
    }

    /// Force an execution strategy instead of deciding per pass
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Whether `path` is treated as an HTML document
    pub fn is_document(&self, path: &str) -> bool {
        self.document_matcher.is_match(path)
    }

    /// Expand every glob-bearing element of every selected document in `files`.
    ///
    /// Keys are never added or removed. On error nothing in `files` changes.
    pub fn expand<C: FileCollection + ?Sized>(&self, files: &mut C) -> Result<ExpandReport, ExpandError> {
        let known_paths = KnownPaths::capture(files);

        let mut jobs: Vec<DocumentJob> = files
            .paths()
            .into_iter()
            .filter(|path| self.is_document(path))
            .filter_map(|path| {
                let contents = files.contents(&path)?.to_vec();
                Some(DocumentJob { path, contents })
            })
            .collect();
        jobs.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!(
            "Expanding {} document(s) against {} known path(s)",
            jobs.len(),
            known_paths.len()
        );

        let strategy = self.strategy_for(jobs.len());
        tracing::trace!("Execution strategy: {:?}", strategy);

        let context = Arc::new(DocumentContext {
            selectors: Arc::clone(&self.selectors),
            element_match_options: self.element_match_options,
            encoding: self.encoding,
            known_paths,
        });

        let rewritten = strategy
            .execute(jobs, move |job| context.rewrite(job))?
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = ExpandReport::default();
        for document in rewritten {
            report.documents.push(DocumentReport {
                path: document.path.clone(),
                expanded_elements: document.expanded_elements,
                changed: document.changed,
            });
            files.replace_contents(&document.path, document.contents);
        }

        tracing::info!(
            "Expanded {} element(s), {} of {} document(s) changed",
            report.expanded_elements(),
            report.changed_documents().count(),
            report.documents.len()
        );
        Ok(report)
    }

    fn strategy_for(&self, document_count: usize) -> ExecutionStrategy {
        if let Some(strategy) = &self.strategy {
            return strategy.clone();
        }
        let workers = ExecutionStrategy::calculate_optimal_workers(
            self.parallel.max_threads,
            self.parallel.thread_percentage,
        );
        ExecutionStrategy::auto(document_count, self.parallel.threshold, workers)
    }
}

/// Build an [`Expander`] from `config` and run it once over `files`
pub fn expand<C: FileCollection + ?Sized>(files: &mut C, config: &LinkGlobsConfig) -> Result<ExpandReport, ExpandError> {
    Expander::new(config)?.expand(files)
}

struct DocumentJob {
    path: String,
    contents: Vec<u8>,
}

struct RewrittenDocument {
    path: String,
    contents: Vec<u8>,
    expanded_elements: usize,
    changed: bool,
}

/// Read-only state shared by every worker during one pass
struct DocumentContext {
    selectors: Arc<[NodeSelector]>,
    element_match_options: MatchOptions,
    encoding: TextEncoding,
    known_paths: KnownPaths,
}

impl DocumentContext {
    fn rewrite(&self, job: DocumentJob) -> Result<RewrittenDocument, ExpandError> {
        let text = self.encoding.decode(&job.contents).ok_or_else(|| ExpandError::Decode {
            path: job.path.clone(),
            encoding: self.encoding.to_string(),
        })?;

        let mut document = Document::parse(&text);
        let mut expanded_elements = 0;

        for selector in self.selectors.iter() {
            let expanded = expand_node(
                selector,
                &job.path,
                &mut document,
                &self.known_paths,
                self.element_match_options,
            )?;
            if expanded > 0 {
                tracing::debug!(
                    "{}: expanded {} <{} {}> element(s)",
                    job.path,
                    expanded,
                    selector.element(),
                    selector.property()
                );
            }
            expanded_elements += expanded;
        }

        let contents = self
            .encoding
            .encode(&document.to_html())
            .ok_or_else(|| ExpandError::Encode {
                path: job.path.clone(),
                encoding: self.encoding.to_string(),
            })?;

        Ok(RewrittenDocument {
            changed: contents != job.contents,
            path: job.path,
            contents,
            expanded_elements,
        })
    }
}
