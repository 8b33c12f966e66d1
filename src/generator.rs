//! Document generator: styled titles, text, headers, footers and signatures
//!
//! A [`DocumentGenerator`] owns one [`Engine`] together with the unit scale and
//! role styles it was built with. Layout constants are expressed in
//! millimeters and scaled to the page unit on every call.

use std::path::Path;

use log::{debug, error};

use crate::config::{Align, DocumentStyles, PageConfig, TextStyle};
use crate::error::Result;
use crate::fonts::{register_fonts, FontFamily, BOOKMAN_OLD_STYLE};
use crate::layout::{
    header_box, signature_line, Scale, FOOTER_HEIGHT, FOOTER_OFFSET, HEADER_HEIGHT, HEADER_LINE,
    LINE_BREAK, PAGE_BREAK_MARGIN, SIGNATURE_HEIGHT, SUBTITLE_HEIGHT, TEXT_HEIGHT, TITLE_HEIGHT,
};
use crate::pdf::{DocumentInfo, Engine, Flow};

/// Caption printed next to the footer text when page numbers are enabled
pub fn page_caption(page: usize) -> String {
    format!("Pág. {page}")
}

/// Select the font and text color of `style`
fn apply_style(pdf: &mut Engine, style: &TextStyle) {
    pdf.set_font(&style.font_family, style.style, style.size);
    pdf.set_text_color(style.color.r, style.color.g, style.color.b);
}

/// Builds a PDF document from styled blocks
pub struct DocumentGenerator {
    pdf: Engine,
    scale: Scale,
    styles: DocumentStyles,
}

impl DocumentGenerator {
    /// Create a generator, registering the Bookman family from `./font` when
    /// the page configuration asks for it
    pub fn new(config: &PageConfig, styles: DocumentStyles) -> Result<Self> {
        Self::with_fonts(config, styles, &BOOKMAN_OLD_STYLE, Path::new("."))
    }

    /// Create a generator that registers `family` relative to `base_dir`
    ///
    /// A font that cannot be loaded aborts construction. On success the
    /// margins are applied, automatic page breaking is enabled and the first
    /// page is open.
    pub fn with_fonts(
        config: &PageConfig,
        styles: DocumentStyles,
        family: &FontFamily,
        base_dir: &Path,
    ) -> Result<Self> {
        let mut pdf = Engine::new(config.orientation, config.unit, config.paper_size);
        let scale = Scale::for_unit(config.unit);

        if config.register_fonts {
            if let Err(e) = register_fonts(&mut pdf, family, base_dir) {
                error!("could not create document generator: {e}");
                return Err(e);
            }
        }

        let margins = config.margins;
        pdf.set_margins(margins.left, margins.top, margins.right);
        pdf.set_auto_page_break(true, scale.apply(PAGE_BREAK_MARGIN));
        pdf.add_page();

        debug!(
            "document generator ready: {:?} {:?} {:?}, scale {}",
            config.orientation,
            config.unit,
            config.paper_size,
            scale.factor()
        );

        Ok(Self { pdf, scale, styles })
    }

    /// Install a header drawn centered at the top of every page
    pub fn set_default_header(&mut self, text: &str) {
        let style = self.styles.header.clone();
        let scale = self.scale;
        let text = text.to_string();

        self.pdf.set_header(move |pdf| {
            apply_style(pdf, &style);
            let (page_width, _) = pdf.page_size();
            let (x, width) = header_box(page_width, pdf.string_width(&text), scale);
            // a negative x would count from the right edge
            pdf.set_x(x.max(0.0));
            pdf.cell(width, scale.apply(HEADER_HEIGHT), &text, Flow::Right, style.align);
            pdf.ln(Some(scale.apply(HEADER_LINE)));
        });
    }

    /// Install a footer drawn near the bottom of every page, optionally
    /// followed by the page number
    ///
    /// The page number is always black, whatever the footer color.
    pub fn set_default_footer(&mut self, text: &str, show_page_number: bool) {
        let style = self.styles.footer.clone();
        let scale = self.scale;
        let text = text.to_string();

        self.pdf.set_footer(move |pdf| {
            pdf.set_y(-scale.apply(FOOTER_OFFSET));
            apply_style(pdf, &style);
            let height = scale.apply(FOOTER_HEIGHT);
            pdf.cell(0.0, height, &text, Flow::Right, style.align);

            if show_page_number {
                let (left, _, _, _) = pdf.margins();
                pdf.set_x(left);
                pdf.set_text_color(0, 0, 0);
                let caption = page_caption(pdf.page_no());
                pdf.cell(0.0, height, &caption, Flow::Right, Align::Right);
            }
        });
    }

    /// Full-width title followed by a blank line
    pub fn add_title(&mut self, text: &str) {
        let style = self.styles.title.clone();
        self.heading(&style, TITLE_HEIGHT, text);
    }

    /// Full-width subtitle followed by a blank line
    pub fn add_subtitle(&mut self, text: &str) {
        let style = self.styles.subtitle.clone();
        self.heading(&style, SUBTITLE_HEIGHT, text);
    }

    fn heading(&mut self, style: &TextStyle, height: f64, text: &str) {
        apply_style(&mut self.pdf, style);
        self.pdf.cell(0.0, self.scale.apply(height), text, Flow::NewLine, style.align);
        self.pdf.ln(Some(self.scale.apply(LINE_BREAK)));
    }

    /// Word-wrapped body text across the content width
    pub fn add_text(&mut self, text: &str) {
        let style = &self.styles.text;
        apply_style(&mut self.pdf, style);
        self.pdf.multi_cell(0.0, self.scale.apply(TEXT_HEIGHT), text, style.align);
        self.pdf.ln(None);
    }

    /// Centered signature line with `name` printed beneath it
    pub fn add_signature(&mut self, name: &str) {
        let (left, _, right, _) = self.pdf.margins();
        let (page_width, _) = self.pdf.page_size();
        let line = signature_line(left, right, page_width, self.pdf.get_y(), self.scale);
        self.pdf.line(line.x1, line.y, line.x2, line.y);

        apply_style(&mut self.pdf, &self.styles.text);
        self.pdf
            .cell(0.0, self.scale.apply(SIGNATURE_HEIGHT), name, Flow::NewLine, Align::Center);
    }

    /// Title, author, subject and creator written to the document information
    pub fn set_document_info(&mut self, info: DocumentInfo) {
        self.pdf.set_info(info);
    }

    pub fn page_count(&self) -> usize {
        self.pdf.page_no()
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn styles(&self) -> &DocumentStyles {
        &self.styles
    }

    pub fn engine(&self) -> &Engine {
        &self.pdf
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.pdf
    }

    pub fn into_engine(self) -> Engine {
        self.pdf
    }

    /// Finish the document and return the PDF file contents
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.pdf.to_bytes()
    }

    /// Finish the document and write it to `path`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.pdf.save(path)
    }
}
