//! Error types for the PDF generator library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF generator library
#[derive(Error, Debug)]
pub enum Error {
    /// A font file could not be read or parsed during registration
    #[error("font loading failed: {}: {reason}", .path.display())]
    FontLoad { path: PathBuf, reason: String },

    /// A font family/style combination that is neither built in nor registered
    #[error("Unknown font: {family} {style}")]
    UnknownFont { family: String, style: String },

    /// Text was drawn before any font was selected
    #[error("No font selected")]
    NoFont,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Drawing after the document was closed
    #[error("Document is already closed")]
    DocumentClosed,

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Job file parsing error
    #[error("Invalid job file: {0}")]
    Toml(#[from] toml::de::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// General error
    #[error("{0}")]
    General(String),
}
