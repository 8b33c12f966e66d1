//! TOML job files describing a complete document
//!
//! ```toml
//! [page]
//! orientation = "P"
//! unit = "mm"
//! paper_size = "A4"
//! margins = { left = 10, top = 10, right = 10 }
//!
//! [styles.footer]
//! style = "I"
//! size = 8
//! color = [200, 0, 0]
//!
//! [footer]
//! text = "Confidential"
//! page_numbers = true
//!
//! [[blocks]]
//! kind = "title"
//! text = "Report"
//! ```

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::config::{DocumentStyles, PageConfig};
use crate::error::{Error, Result};
use crate::fonts::BOOKMAN_OLD_STYLE;
use crate::generator::DocumentGenerator;
use crate::pdf::DocumentInfo;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeaderSection {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FooterSection {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub page_numbers: bool,
}

/// One piece of document content, emitted in file order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Title { text: String },
    Subtitle { text: String },
    Text { text: String },
    Signature { name: String },
}

/// A document description loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Job {
    pub page: PageConfig,
    pub styles: DocumentStyles,
    pub header: Option<HeaderSection>,
    pub footer: Option<FooterSection>,
    pub metadata: DocumentInfo,
    pub blocks: Vec<Block>,
}

impl Job {
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a job file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Lay out the document; fonts are resolved against `font_dir`
    pub fn render(&self, font_dir: &Path) -> Result<DocumentGenerator> {
        let mut gen = DocumentGenerator::with_fonts(&self.page, self.styles.clone(), &BOOKMAN_OLD_STYLE, font_dir)?;
        gen.set_document_info(self.metadata.clone());

        if let Some(header) = &self.header {
            gen.set_default_header(&header.text);
        }
        if let Some(footer) = &self.footer {
            gen.set_default_footer(&footer.text, footer.page_numbers);
        }

        for block in &self.blocks {
            match block {
                Block::Title { text } => gen.add_title(text),
                Block::Subtitle { text } => gen.add_subtitle(text),
                Block::Text { text } => gen.add_text(text),
                Block::Signature { name } => gen.add_signature(name),
            }
        }

        debug!("rendered {} block(s) on {} page(s)", self.blocks.len(), gen.page_count());
        Ok(gen)
    }
}
