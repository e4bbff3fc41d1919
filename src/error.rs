//! Error type for the expansion engine

/// Everything that can stop an expansion pass
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// A document selection pattern or an element glob failed to compile
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Document bytes are not valid in the configured encoding
    #[error("cannot decode '{path}' as {encoding}")]
    Decode { path: String, encoding: String },

    /// Rewritten text cannot be represented in the configured encoding
    #[error("cannot encode '{path}' as {encoding}")]
    Encode { path: String, encoding: String },

    /// Invalid options, reported before any document is touched
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Worker(#[from] crate::parallel::WorkerPanic),
}
