//! # link-globs
//!
//! Expands glob-valued references in HTML documents into one element per
//! matching file.
//!
//! Given a collection of files keyed by logical path, every HTML document is
//! scanned for configured elements (`<a href>`, `<img src>`, `<link href>` and
//! `<script src>` by default) whose attribute contains `*` or `?`. Each such
//! element is replaced by one copy per matching file, with the attribute set
//! to the path of that file relative to the document. Elements whose glob
//! matches nothing are removed.
//!
//! ## Quick Start
//!
//! ```bash
//! # Rewrite every HTML file below ./site in place
//! link-globs expand site
//!
//! # Preview, including dot directories
//! link-globs expand site --element-dot --dry-run -v
//! ```
//!
//! ```rust
//! use link_globs::{FileSet, LinkGlobsConfig};
//!
//! let mut files: FileSet = [
//!     ("a.png", ""),
//!     ("dir/b.png", ""),
//!     ("place/root-relative.html", "<img src=\"/dir/*.png\">"),
//! ]
//! .into_iter()
//! .collect();
//!
//! link_globs::expand::expand(&mut files, &LinkGlobsConfig::default()).unwrap();
//! assert_eq!(files.text("place/root-relative.html"), Some("<img src=\"../dir/b.png\">"));
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod encoding;
pub mod error;
pub mod expand;
pub mod files;
pub mod parallel;
pub mod shared;

pub use cli::{Cli, Output};
pub use config::{LinkGlobsConfig, NodeDefinition};
pub use error::ExpandError;
pub use expand::{ExpandReport, Expander};
pub use files::{FileCollection, FileSet};

/// Result type alias for CLI and configuration operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
