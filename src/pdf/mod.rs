//! PDF page flow, fonts and file output

pub mod engine;
pub mod font;
pub mod metadata;
pub mod metrics;
mod writer;

// Re-export commonly used items
pub use engine::{DocumentInfo, Engine, Flow, PageHook};
pub use font::TrueTypeFont;
pub use metadata::{count_pages, extract_metadata, inspect_bytes, PdfMetadata};
