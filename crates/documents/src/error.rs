//! Rendering and export errors.

use thiserror::Error;

/// Materialization failure.
///
/// Recoverable at the session level: the wizard keeps its records and the
/// caller may request the preview again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The output format cannot encode a character (e.g. non-Latin script with built-in PDF fonts).
    #[error("unsupported character {character:?} in {field}")]
    UnsupportedCharacter { field: String, character: char },

    /// The document backend rejected the document.
    #[error("document backend error: {0}")]
    Backend(String),

    /// The blocking materialization task panicked or was cancelled.
    #[error("materialization task failed: {0}")]
    Task(String),

    /// The request was dropped before materialization finished.
    #[error("materialization cancelled before completion")]
    Cancelled,
}

/// Outcome of a preview request that did not produce a current artifact.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A newer request was issued while this one was in flight; its result was discarded.
    #[error("preview request {generation} superseded by request {latest}")]
    Superseded { generation: u64, latest: u64 },
}
