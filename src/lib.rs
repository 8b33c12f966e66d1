//! PDF Generator Library
//!
//! Builds styled PDF documents from a page configuration and a handful of
//! role styles. This library provides functionality to:
//! - Lay out titles, subtitles, wrapped body text and signature lines
//! - Draw a centered header and a footer with page numbers on every page
//! - Register an external TrueType font family
//! - Describe whole documents in TOML job files
//! - Read page counts and metadata back from PDF files
//!
//! # Example
//!
//! ```no_run
//! use pdf_generator::{DocumentGenerator, DocumentStyles, PageConfig};
//! use std::path::Path;
//!
//! let config = PageConfig::new("P", "mm", "A4", 10.0, 10.0, 10.0, false)?;
//! let mut doc = DocumentGenerator::new(&config, DocumentStyles::default())?;
//! doc.set_default_footer("Confidential", true);
//! doc.add_title("Report");
//! doc.add_text("Lorem ipsum dolor sit amet.");
//! doc.add_signature("J. Doe");
//! doc.save(Path::new("report.pdf"))?;
//! # Ok::<(), pdf_generator::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod fonts;
pub mod generator;
pub mod job;
pub mod layout;
pub mod pdf;

// Re-export commonly used items
pub use config::{Align, Color, DocumentStyles, FontStyle, PageConfig, TextStyle};
pub use error::{Error, Result};
pub use generator::DocumentGenerator;
pub use job::Job;
