use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Output;
use crate::config::{self, NodeDefinition};
use crate::expand::Expander;
use crate::files::FileSet;
use crate::parallel::ExecutionStrategy;

#[derive(Args)]
pub struct ExpandArgs {
    /// Site directory to process
    #[arg(id = "site", value_name = "DIR", default_value = ".")]
    pub site: PathBuf,

    /// Pattern selecting the HTML documents (default: **/*.html)
    #[arg(long = "match", value_name = "PATTERN")]
    pub match_pattern: Option<String>,

    /// Element and attribute to expand, replaces the default list (repeatable)
    #[arg(long = "node", value_name = "ELEMENT:PROPERTY")]
    pub nodes: Vec<NodeDefinition>,

    /// Also select documents inside dot directories
    #[arg(long)]
    pub dot: bool,

    /// Let element globs match dot files and directories
    #[arg(long)]
    pub element_dot: bool,

    /// Text encoding of the documents
    #[arg(long, value_name = "ENCODING")]
    pub encoding: Option<String>,

    /// Show what would change without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Process documents on the calling thread only
    #[arg(long)]
    pub sequential: bool,
}

impl ExpandArgs {
    /// Only flags given on the command line override the configuration
    fn overrides(&self) -> Value {
        let mut overrides = Map::new();

        if let Some(pattern) = &self.match_pattern {
            overrides.insert("match".to_string(), json!(pattern));
        }
        if let Some(encoding) = &self.encoding {
            overrides.insert("encoding".to_string(), json!(encoding));
        }
        if !self.nodes.is_empty() {
            overrides.insert("nodes".to_string(), json!(self.nodes));
        }
        if self.dot {
            overrides.insert("match_options".to_string(), json!({ "dot": true }));
        }
        if self.element_dot {
            overrides.insert("element_match_options".to_string(), json!({ "dot": true }));
        }

        Value::Object(overrides)
    }
}

pub fn execute(args: ExpandArgs, custom_config: Option<&str>, output: &Output) -> Result<()> {
    let config = config::load(custom_config.map(Path::new), Some(args.overrides()))?;
    tracing::debug!("Configuration: {:?}", config);

    let mut expander = Expander::new(&config)?;
    if args.sequential {
        expander = expander.with_strategy(ExecutionStrategy::Sequential);
    }

    let root = args.site.as_path();
    let original = FileSet::load_dir(root)
        .with_context(|| format!("Failed to load files from {}", root.display()))?;

    let start = Instant::now();
    let mut files = original.clone();
    let report = expander
        .expand(&mut files)
        .with_context(|| format!("Failed to expand globs in {}", root.display()))?;
    let elapsed = start.elapsed();

    if report.documents.is_empty() {
        output.warning(&format!("No documents match '{}' in {}", config.match_pattern, root.display()));
    } else {
        output.header(&format!("Documents in {}", root.display()));
    }
    for document in &report.documents {
        if document.changed || document.expanded_elements > 0 {
            output.document(&document.path, document.expanded_elements, document.changed);
        } else {
            output.verbose(&format!("{} unchanged", document.path));
        }
    }
    output.blank_line();
    output.summary_stats("Files", files.len());
    output.summary_stats("Documents", report.documents.len());
    output.summary_stats("Elements expanded", report.expanded_elements());
    output.summary_stats("Documents changed", report.changed_documents().count());
    output.verbose(&format!("Expanded in {:.2?}", elapsed));

    if args.dry_run {
        output.info("Dry run, no files written");
        return Ok(());
    }

    let written = files.write_changed(root, &original)?;
    if written.is_empty() {
        output.success("Nothing to update");
    } else {
        output.success(&format!("Updated {} file(s)", written.len()));
    }
    Ok(())
}
