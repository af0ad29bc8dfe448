//! Error types for search setup.

use thiserror::Error;

/// Errors that can occur while preparing or running a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The template text could not be parsed.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// Placeholder count and generator count disagree.
    #[error("template has {placeholders} placeholders but {generators} generators were supplied")]
    GeneratorCountMismatch {
        /// Placeholders in the template.
        placeholders: usize,
        /// Generators supplied by the caller.
        generators: usize,
    },

    /// A worker thread died before finishing its partition.
    #[error("search worker {0} panicked")]
    WorkerPanicked(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;
