//! Cursor-driven page flow
//!
//! The engine keeps a current position, margins and an automatic page-break
//! threshold, and turns cells, multi-line cells and lines into PDF content
//! operators. Header and footer hooks are called whenever a page is opened or
//! closed. Coordinates are in the document unit with the origin at the top-left
//! corner of the page; conversion to PDF space (points, origin bottom-left)
//! happens when operators are written.
//!
//! Drawing calls do not return errors. The first failure is recorded, later
//! drawing becomes a no-op, and the error is reported when the document is
//! written.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;

use super::font::TrueTypeFont;
use super::metrics::{core_font, encode_win_ansi, CoreFont};
use super::writer;
use crate::config::{Align, Color, FontStyle, Orientation, PaperSize, Unit};
use crate::error::{Error, Result};

/// Callback run by the engine when a page is opened or closed
pub type PageHook = Box<dyn FnMut(&mut Engine)>;

/// Where the cursor goes after a cell is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// To the right of the cell
    Right,
    /// To the start of the next line
    NewLine,
    /// Below the cell, keeping x
    Below,
}

/// Document information written to the PDF Info dictionary
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

pub(crate) enum FontFace {
    Core(CoreFont),
    TrueType(TrueTypeFont),
}

impl FontFace {
    fn text_width(&self, text: &str) -> f64 {
        match self {
            FontFace::Core(font) => font.text_width(text),
            FontFace::TrueType(font) => font.text_width(text),
        }
    }

    fn encode(&mut self, text: &str) -> String {
        match self {
            FontFace::Core(_) => encode_win_ansi(text).iter().map(|b| format!("{b:02X}")).collect(),
            FontFace::TrueType(font) => font.encode(text),
        }
    }
}

pub(crate) struct FontEntry {
    pub family: String,
    pub style: FontStyle,
    /// Resource name, e.g. `F1`
    pub resource: String,
    pub face: FontFace,
    pub used: bool,
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    font: Option<usize>,
    font_size_pt: f64,
    underline: bool,
    text_color: Color,
    draw_color: Color,
    line_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Empty,
    PageOpen,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Header,
    Footer,
}

struct WrappedLine {
    text: String,
    paragraph_end: bool,
}

/// A PDF document being laid out page by page
pub struct Engine {
    unit: Unit,
    /// Points per user unit
    k: f64,
    width: f64,
    height: f64,
    left_margin: f64,
    top_margin: f64,
    right_margin: f64,
    break_margin: f64,
    cell_margin: f64,
    auto_page_break: bool,
    x: f64,
    y: f64,
    last_height: f64,
    pages: Vec<String>,
    state: State,
    fonts: Vec<FontEntry>,
    gs: GraphicsState,
    header: Option<PageHook>,
    footer: Option<PageHook>,
    in_header: bool,
    in_footer: bool,
    info: DocumentInfo,
    error: Option<Error>,
}

impl Engine {
    /// Create an engine with no pages
    ///
    /// Margins default to 1 cm, the cell margin to 1 mm and automatic page
    /// breaking triggers 2 cm above the bottom edge.
    pub fn new(orientation: Orientation, unit: Unit, paper_size: PaperSize) -> Self {
        let dims = match orientation {
            Orientation::Portrait => paper_size.dimensions(),
            Orientation::Landscape => paper_size.dimensions().landscape(),
        };
        let k = unit.points_per_unit();
        let margin = 28.35 / k;

        Self {
            unit,
            k,
            width: dims.width.pt() / k,
            height: dims.height.pt() / k,
            left_margin: margin,
            top_margin: margin,
            right_margin: margin,
            break_margin: margin * 2.0,
            cell_margin: margin / 10.0,
            auto_page_break: true,
            x: margin,
            y: margin,
            last_height: 0.0,
            pages: Vec::new(),
            state: State::Empty,
            fonts: Vec::new(),
            gs: GraphicsState {
                font: None,
                font_size_pt: 12.0,
                underline: false,
                text_color: Color::BLACK,
                draw_color: Color::BLACK,
                // 0.2 mm
                line_width: 0.567 / k,
            },
            header: None,
            footer: None,
            in_header: false,
            in_footer: false,
            info: DocumentInfo::default(),
            error: None,
        }
    }

    fn fail(&mut self, err: Error) {
        warn!("PDF engine error: {err}");
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// First error recorded, if any
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn ready_to_draw(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        match self.state {
            State::PageOpen => true,
            State::Empty => {
                self.fail(Error::General("no page has been added".to_string()));
                false
            }
            State::Closed => {
                self.fail(Error::DocumentClosed);
                false
            }
        }
    }

    // ----- fonts -----

    /// Register a TrueType/OpenType font file under `family` and `style`
    pub fn add_font_file(&mut self, family: &str, style: FontStyle, path: &Path) -> Result<()> {
        let data = std::fs::read(path).map_err(|e| Error::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.register_font(family, style, data, path.to_path_buf())
    }

    /// Register a TrueType/OpenType font from memory
    pub fn add_font_bytes(&mut self, family: &str, style: FontStyle, data: Vec<u8>) -> Result<()> {
        self.register_font(family, style, data, PathBuf::from("<memory>"))
    }

    fn register_font(&mut self, family: &str, style: FontStyle, data: Vec<u8>, origin: PathBuf) -> Result<()> {
        let style = style.face();
        let family_key = family.to_ascii_lowercase();
        if self.fonts.iter().any(|f| f.family == family_key && f.style == style) {
            debug!("font {family} {style} already registered");
            return Ok(());
        }

        let base_name = postscript_name(family, style);
        let font = TrueTypeFont::parse(&base_name, data, style.italic).map_err(|reason| Error::FontLoad {
            path: origin.clone(),
            reason,
        })?;

        debug!("registered font {base_name} from {}", origin.display());
        self.push_font(family_key, style, FontFace::TrueType(font));
        Ok(())
    }

    fn push_font(&mut self, family: String, style: FontStyle, face: FontFace) -> usize {
        let resource = format!("F{}", self.fonts.len() + 1);
        self.fonts.push(FontEntry {
            family,
            style,
            resource,
            face,
            used: false,
        });
        self.fonts.len() - 1
    }

    fn find_font(&mut self, family: &str, style: FontStyle) -> Option<usize> {
        let family_key = family.to_ascii_lowercase();
        if let Some(index) = self.fonts.iter().position(|f| f.family == family_key && f.style == style) {
            return Some(index);
        }

        let core = core_font(&family_key, style.bold, style.italic)?;
        let loaded = self
            .fonts
            .iter()
            .position(|f| matches!(&f.face, FontFace::Core(c) if c.base_name == core.base_name));
        match loaded {
            Some(index) => Some(index),
            None => Some(self.push_font(family_key, style, FontFace::Core(core))),
        }
    }

    /// Select the font used for text; a size of zero keeps the current size
    pub fn set_font(&mut self, family: &str, style: FontStyle, size: f64) {
        if self.error.is_some() {
            return;
        }
        match self.find_font(family, style.face()) {
            Some(index) => {
                self.gs.font = Some(index);
                self.gs.underline = style.underline;
                if size > 0.0 {
                    self.gs.font_size_pt = size;
                }
            }
            None => self.fail(Error::UnknownFont {
                family: family.to_string(),
                style: style.to_string(),
            }),
        }
    }

    /// Change the font size in points
    pub fn set_font_size(&mut self, size: f64) {
        self.gs.font_size_pt = size;
    }

    /// Current font size in user units
    pub fn font_size(&self) -> f64 {
        self.gs.font_size_pt / self.k
    }

    /// Width of `text` in user units with the current font
    pub fn string_width(&self, text: &str) -> f64 {
        match self.gs.font {
            Some(index) => self.fonts[index].face.text_width(text) * self.gs.font_size_pt / 1000.0 / self.k,
            None => 0.0,
        }
    }

    // ----- colors -----

    pub fn set_text_color(&mut self, r: u8, g: u8, b: u8) {
        self.gs.text_color = Color::new(r, g, b);
    }

    pub fn text_color(&self) -> Color {
        self.gs.text_color
    }

    // ----- geometry -----

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Page `(width, height)` in user units
    pub fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Page `(width, height)` in points
    pub(crate) fn page_size_pt(&self) -> (f64, f64) {
        (self.width * self.k, self.height * self.k)
    }

    /// `(left, top, right, bottom)` margins; bottom is the page-break margin
    pub fn margins(&self) -> (f64, f64, f64, f64) {
        (self.left_margin, self.top_margin, self.right_margin, self.break_margin)
    }

    /// Set left, top and right margins; a negative right margin copies the left
    pub fn set_margins(&mut self, left: f64, top: f64, right: f64) {
        self.left_margin = left;
        self.top_margin = top;
        self.right_margin = if right < 0.0 { left } else { right };
    }

    /// Enable or disable automatic page breaks `margin` above the bottom edge
    pub fn set_auto_page_break(&mut self, auto: bool, margin: f64) {
        self.auto_page_break = auto;
        self.break_margin = margin;
    }

    /// Y position past which a cell starts a new page
    pub fn page_break_trigger(&self) -> f64 {
        self.height - self.break_margin
    }

    pub fn cell_margin(&self) -> f64 {
        self.cell_margin
    }

    // ----- cursor -----

    pub fn get_x(&self) -> f64 {
        self.x
    }

    pub fn get_y(&self) -> f64 {
        self.y
    }

    /// Negative values count from the right edge
    pub fn set_x(&mut self, x: f64) {
        self.x = if x >= 0.0 { x } else { self.width + x };
    }

    /// Negative values count from the bottom edge; x returns to the left margin
    pub fn set_y(&mut self, y: f64) {
        self.x = self.left_margin;
        self.y = if y >= 0.0 { y } else { self.height + y };
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.set_y(y);
        self.set_x(x);
    }

    /// Line break: back to the left margin and down by `height`, or by the
    /// height of the last cell when `None`
    pub fn ln(&mut self, height: Option<f64>) {
        self.x = self.left_margin;
        self.y += height.unwrap_or(self.last_height);
    }

    // ----- pages -----

    /// Number of the current page (1-based, 0 before the first page)
    pub fn page_no(&self) -> usize {
        self.pages.len()
    }

    /// Content stream of page `page` (1-based)
    pub fn page_content(&self, page: usize) -> Option<&str> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .map(String::as_str)
    }

    /// Install the header hook
    ///
    /// If the current page is still blank the hook also runs right away, so
    /// the page that is already open gets its header too.
    pub fn set_header<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Engine) + 'static,
    {
        self.header = Some(Box::new(hook));
        let blank = self.state == State::PageOpen && self.pages.last().is_some_and(|page| page.is_empty());
        if blank && self.error.is_none() {
            let saved = self.gs;
            self.run_hook(Hook::Header);
            self.gs = saved;
        }
    }

    /// Install the footer hook, run when each page is closed
    pub fn set_footer<F>(&mut self, hook: F)
    where
        F: FnMut(&mut Engine) + 'static,
    {
        self.footer = Some(Box::new(hook));
    }

    fn run_hook(&mut self, which: Hook) {
        let hook = match which {
            Hook::Header => self.header.take(),
            Hook::Footer => self.footer.take(),
        };
        let Some(mut hook) = hook else {
            return;
        };

        match which {
            Hook::Header => self.in_header = true,
            Hook::Footer => self.in_footer = true,
        }
        hook(self);
        self.in_header = false;
        self.in_footer = false;

        // keep a replacement installed by the hook itself
        let slot = match which {
            Hook::Header => &mut self.header,
            Hook::Footer => &mut self.footer,
        };
        if slot.is_none() {
            *slot = Some(hook);
        }
    }

    /// Close the current page (running the footer) and open a new one
    /// (running the header). Font and colors survive the hooks.
    pub fn add_page(&mut self) {
        if self.error.is_some() {
            return;
        }
        if self.state == State::Closed {
            self.fail(Error::DocumentClosed);
            return;
        }

        let saved = self.gs;
        if self.state == State::PageOpen {
            self.run_hook(Hook::Footer);
            debug!("closed page {}", self.pages.len());
        }

        self.pages.push(String::new());
        self.state = State::PageOpen;
        self.x = self.left_margin;
        self.y = self.top_margin;
        debug!("opened page {}", self.pages.len());

        self.run_hook(Hook::Header);
        self.gs = saved;
    }

    /// Finish the document: run the footer of the last page
    ///
    /// A document without pages gets one empty page.
    pub fn close(&mut self) {
        match self.state {
            State::Closed => return,
            State::Empty => self.add_page(),
            State::PageOpen => {}
        }
        if self.state == State::PageOpen {
            self.run_hook(Hook::Footer);
        }
        self.state = State::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == State::Closed
    }

    // ----- metadata -----

    pub fn set_info(&mut self, info: DocumentInfo) {
        self.info = info;
    }

    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    pub fn set_title(&mut self, title: &str) {
        self.info.title = Some(title.to_string());
    }

    pub fn set_author(&mut self, author: &str) {
        self.info.author = Some(author.to_string());
    }

    // ----- drawing -----

    fn out(&mut self, ops: &str) {
        if let Some(page) = self.pages.last_mut() {
            page.push_str(ops);
        }
    }

    fn rgb(color: Color, op: &str) -> String {
        format!(
            "{:.3} {:.3} {:.3} {op}",
            color.r as f64 / 255.0,
            color.g as f64 / 255.0,
            color.b as f64 / 255.0
        )
    }

    fn stroke_state(&self) -> String {
        format!("{} {:.2} w", Self::rgb(self.gs.draw_color, "RG"), self.gs.line_width * self.k)
    }

    /// Draw a line between two points
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        if !self.ready_to_draw() {
            return;
        }
        let ops = format!(
            "q {} {:.2} {:.2} m {:.2} {:.2} l S Q\n",
            self.stroke_state(),
            x1 * self.k,
            (self.height - y1) * self.k,
            x2 * self.k,
            (self.height - y2) * self.k
        );
        self.out(&ops);
    }

    fn text_ops(&mut self, x: f64, baseline: f64, text: &str) -> String {
        let Some(index) = self.gs.font else {
            return String::new();
        };
        let width = self.string_width(text);
        let (k, height, size) = (self.k, self.height, self.gs.font_size_pt);
        let color = Self::rgb(self.gs.text_color, "rg");

        let entry = &mut self.fonts[index];
        entry.used = true;
        let hex = entry.face.encode(text);

        let mut ops = format!(
            "q {color} BT /{} {size:.2} Tf {:.2} {:.2} Td <{hex}> Tj ET",
            entry.resource,
            x * k,
            (height - baseline) * k
        );
        if self.gs.underline {
            let font_size = size / k;
            ops.push_str(&format!(
                " {:.2} {:.2} {:.2} {:.2} re f",
                x * k,
                (height - (baseline + 0.1 * font_size)) * k,
                width * k,
                -0.05 * size
            ));
        }
        ops.push_str(" Q\n");
        ops
    }

    /// Draw one line of text in a cell
    ///
    /// A width of zero extends the cell to the right margin. If the cell
    /// would cross the page-break trigger a new page is started first (never
    /// from inside a header or footer). Justified alignment only applies to
    /// lines produced by [`Engine::multi_cell`]; here it is drawn left-aligned.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, flow: Flow, align: Align) {
        self.draw_cell(w, h, text, flow, align, false);
    }

    fn draw_cell(&mut self, w: f64, h: f64, text: &str, flow: Flow, align: Align, justify: bool) {
        if !self.ready_to_draw() {
            return;
        }
        if !text.is_empty() && self.gs.font.is_none() {
            self.fail(Error::NoFont);
            return;
        }

        if self.auto_page_break && !self.in_header && !self.in_footer && self.y + h > self.page_break_trigger() {
            let x = self.x;
            self.add_page();
            self.x = x;
        }

        let w = if w == 0.0 { self.width - self.right_margin - self.x } else { w };
        let (x, y) = (self.x, self.y);
        let mut ops = String::new();

        if !text.is_empty() {
            let baseline = y + 0.5 * h + 0.3 * self.font_size();
            let words: Vec<&str> = text.split(' ').filter(|word| !word.is_empty()).collect();

            if justify && words.len() > 1 {
                let word_widths: Vec<f64> = words.iter().map(|word| self.string_width(word)).collect();
                let used: f64 = word_widths.iter().sum();
                let gap = (w - 2.0 * self.cell_margin - used) / (words.len() - 1) as f64;
                let mut cursor = x + self.cell_margin;
                for (word, width) in words.iter().zip(word_widths) {
                    let text_op = self.text_ops(cursor, baseline, word);
                    ops.push_str(&text_op);
                    cursor += width + gap;
                }
            } else {
                let text_width = self.string_width(text);
                let dx = match align {
                    Align::Right => w - self.cell_margin - text_width,
                    Align::Center => (w - text_width) / 2.0,
                    Align::Left | Align::Justify => self.cell_margin,
                };
                let text_op = self.text_ops(x + dx, baseline, text);
                ops.push_str(&text_op);
            }
        }

        self.out(&ops);
        self.last_height = h;
        match flow {
            Flow::Right => self.x += w,
            Flow::NewLine => {
                self.y += h;
                self.x = self.left_margin;
            }
            Flow::Below => self.y += h,
        }
    }

    /// Draw word-wrapped text as a stack of cells of height `h`
    ///
    /// Lines break at the last space that fits, at `\n`, and inside words
    /// wider than the cell. One trailing `\n` is ignored and spacing inside a
    /// line is kept. With [`Align::Justify`] every line except the last of
    /// each paragraph is spread to the full width. The cursor ends below the text at the
    /// left margin.
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str, align: Align) {
        if !self.ready_to_draw() {
            return;
        }
        if self.gs.font.is_none() {
            self.fail(Error::NoFont);
            return;
        }

        let w = if w == 0.0 { self.width - self.right_margin - self.x } else { w };
        for line in self.wrap(text, w - 2.0 * self.cell_margin) {
            let justify = align == Align::Justify && !line.paragraph_end;
            self.draw_cell(w, h, &line.text, Flow::Below, align, justify);
        }
        self.x = self.left_margin;
    }

    fn wrap(&self, text: &str, max_width: f64) -> Vec<WrappedLine> {
        let text = text.replace('\r', "");
        let text = text.strip_suffix('\n').unwrap_or(&text);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut start = 0;
            let mut space = None;
            let mut i = 0;

            while let Some(ch) = paragraph[i..].chars().next() {
                if ch == ' ' {
                    space = Some(i);
                }
                let end = i + ch.len_utf8();
                if self.string_width(&paragraph[start..end]) <= max_width {
                    i = end;
                    continue;
                }

                // break at the last space, or inside the word when there is none
                let (cut, resume) = match space {
                    Some(sep) => (sep, sep + 1),
                    None if i == start => (end, end),
                    None => (i, i),
                };
                lines.push(WrappedLine {
                    text: paragraph[start..cut].to_string(),
                    paragraph_end: false,
                });
                start = resume;
                space = None;
                i = resume;
            }

            lines.push(WrappedLine {
                text: paragraph[start..].to_string(),
                paragraph_end: true,
            });
        }

        lines
    }

    // ----- output -----

    pub(crate) fn pages(&self) -> &[String] {
        &self.pages
    }

    pub(crate) fn fonts(&self) -> &[FontEntry] {
        &self.fonts
    }

    /// Close the document and serialize it
    ///
    /// Returns the first error recorded while drawing, if any.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.close();
        if let Some(err) = self.error.take() {
            self.error = Some(Error::General(err.to_string()));
            return Err(err);
        }
        writer::write_document(self)
    }

    /// Close the document and write it to `path`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        info!("wrote {} page(s) to {}", self.page_no(), path.display());
        Ok(())
    }
}


/// PostScript-style name for an embedded font, e.g. `Bookman-BoldItalic`
fn postscript_name(family: &str, style: FontStyle) -> String {
    let base: String = family.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    let suffix = match (style.bold, style.italic) {
        (false, false) => "",
        (true, false) => "-Bold",
        (false, true) => "-Italic",
        (true, true) => "-BoldItalic",
    };
    format!("{base}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn engine() -> Engine {
        let mut pdf = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        pdf.set_margins(10.0, 10.0, 10.0);
        pdf.add_page();
        pdf.set_font("Helvetica", FontStyle::REGULAR, 12.0);
        pdf
    }

    fn hex(text: &str) -> String {
        encode_win_ansi(text).iter().map(|b| format!("{b:02X}")).collect()
    }

    #[test]
    fn test_page_geometry() {
        let pdf = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        let (w, h) = pdf.page_size();
        assert!((w - 210.0).abs() < 1e-9);
        assert!((h - 297.0).abs() < 1e-9);

        let landscape = Engine::new(Orientation::Landscape, Unit::Point, PaperSize::Letter);
        let (w, h) = landscape.page_size();
        assert!((w - 792.0).abs() < 1e-6);
        assert!((h - 612.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_margins() {
        let pdf = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        let (left, top, right, bottom) = pdf.margins();
        assert!((left - 10.0).abs() < 0.01);
        assert!((top - 10.0).abs() < 0.01);
        assert!((right - 10.0).abs() < 0.01);
        assert!((bottom - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_string_width_scales_with_unit() {
        let mut pt = Engine::new(Orientation::Portrait, Unit::Point, PaperSize::A4);
        pt.set_font("Helvetica", FontStyle::REGULAR, 10.0);
        // "Hello" = 2278/1000 em
        assert!((pt.string_width("Hello") - 22.78).abs() < 1e-9);

        let mut mm = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        mm.set_font("Helvetica", FontStyle::REGULAR, 10.0);
        assert!((mm.string_width("Hello") - 22.78 * 25.4 / 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_cell_flow() {
        let mut pdf = engine();
        pdf.cell(50.0, 8.0, "A", Flow::Right, Align::Left);
        assert_eq!(pdf.get_x(), 60.0);
        assert_eq!(pdf.get_y(), 10.0);

        pdf.cell(0.0, 8.0, "B", Flow::NewLine, Align::Left);
        assert_eq!(pdf.get_x(), 10.0);
        assert_eq!(pdf.get_y(), 18.0);

        pdf.set_x(30.0);
        pdf.cell(20.0, 5.0, "C", Flow::Below, Align::Left);
        assert_eq!(pdf.get_x(), 30.0);
        assert_eq!(pdf.get_y(), 23.0);

        pdf.ln(None);
        assert_eq!(pdf.get_x(), 10.0);
        assert_eq!(pdf.get_y(), 28.0);
    }

    #[test]
    fn test_cell_writes_text_and_color() {
        let mut pdf = engine();
        pdf.set_text_color(255, 0, 0);
        pdf.cell(0.0, 10.0, "Hi", Flow::NewLine, Align::Left);
        let content = pdf.page_content(1).unwrap();
        assert!(content.contains(&format!("<{}> Tj", hex("Hi"))));
        assert!(content.contains("1.000 0.000 0.000 rg"));
        assert!(content.contains("/F1 12.00 Tf"));
    }

    #[test]
    fn test_right_alignment_position() {
        let mut pdf = engine();
        let width = pdf.string_width("end");
        pdf.cell(100.0, 10.0, "end", Flow::Right, Align::Right);
        let expected_x = (10.0 + (100.0 - pdf.cell_margin() - width)) * (72.0 / 25.4);
        let content = pdf.page_content(1).unwrap();
        assert!(content.contains(&format!("{expected_x:.2} ")), "{content}");
    }

    #[test]
    fn test_set_y_negative_counts_from_bottom() {
        let mut pdf = engine();
        pdf.set_x(50.0);
        pdf.set_y(-15.0);
        assert!((pdf.get_y() - 282.0).abs() < 1e-9);
        assert_eq!(pdf.get_x(), 10.0);

        pdf.set_x(-20.0);
        assert!((pdf.get_x() - 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_auto_page_break() {
        let mut pdf = engine();
        pdf.set_auto_page_break(true, 20.0);
        for i in 0..40 {
            pdf.cell(0.0, 10.0, &format!("line {i}"), Flow::NewLine, Align::Left);
        }
        // 267 mm usable per page after a 10 mm top margin = 26 lines on page one
        assert_eq!(pdf.page_no(), 2);
        assert!(pdf.get_y() <= pdf.page_break_trigger());
    }

    #[test]
    fn test_no_page_break_when_disabled() {
        let mut pdf = engine();
        pdf.set_auto_page_break(false, 0.0);
        for _ in 0..40 {
            pdf.cell(0.0, 10.0, "x", Flow::NewLine, Align::Left);
        }
        assert_eq!(pdf.page_no(), 1);
    }

    #[test]
    fn test_multi_cell_wraps() {
        let mut pdf = engine();
        let text = "word ".repeat(100);
        pdf.multi_cell(0.0, 5.0, &text, Align::Left);
        let lines = pdf.page_content(1).unwrap().matches(" Tj ").count();
        assert!(lines > 1);
        assert_eq!(pdf.get_y(), 10.0 + 5.0 * lines as f64);
        assert_eq!(pdf.get_x(), 10.0);
    }

    #[test]
    fn test_multi_cell_breaks_long_words() {
        let mut pdf = engine();
        pdf.multi_cell(20.0, 5.0, &"x".repeat(200), Align::Left);
        let content = pdf.page_content(1).unwrap();
        assert!(content.matches(" Tj ").count() > 1);
    }

    #[test]
    fn test_multi_cell_hard_breaks() {
        let mut pdf = engine();
        pdf.multi_cell(0.0, 5.0, "one\ntwo\r\nthree", Align::Left);
        assert_eq!(pdf.get_y(), 25.0);
    }

    #[test]
    fn test_multi_cell_drops_one_trailing_newline() {
        let mut pdf = engine();
        pdf.multi_cell(0.0, 5.0, "abc\n", Align::Left);
        assert_eq!(pdf.get_y(), 15.0);

        pdf.multi_cell(0.0, 5.0, "abc\n\n", Align::Left);
        assert_eq!(pdf.get_y(), 25.0);
    }

    #[test]
    fn test_multi_cell_keeps_spacing() {
        let mut pdf = engine();
        pdf.multi_cell(0.0, 5.0, "a     b", Align::Left);
        let content = pdf.page_content(1).unwrap();
        assert!(content.contains(&format!("<{}> Tj", hex("a     b"))), "{content}");
    }

    #[test]
    fn test_multi_cell_breaks_at_last_space() {
        let pdf = engine();
        let width = pdf.string_width("one two");
        let lines = pdf.wrap("one two three", width);
        let texts: Vec<&str> = lines.iter().map(|line| line.text.as_str()).collect();
        assert_eq!(texts, ["one two", "three"]);
        assert!(!lines[0].paragraph_end);
        assert!(lines[1].paragraph_end);
    }

    #[test]
    fn test_justify_spreads_words() {
        let mut pdf = engine();
        let text = "alpha beta gamma delta ".repeat(10);
        pdf.multi_cell(0.0, 5.0, text.trim(), Align::Justify);
        let content = pdf.page_content(1).unwrap();
        // justified lines are written word by word
        assert!(content.contains(&format!("<{}> Tj", hex("alpha"))));
        assert!(!content.contains(&format!("<{}> Tj", hex("alpha beta"))));
    }

    #[test]
    fn test_header_and_footer_hooks_run_per_page() {
        let headers = Rc::new(Cell::new(0));
        let footers = Rc::new(Cell::new(0));

        let mut pdf = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        let h = Rc::clone(&headers);
        pdf.set_header(move |_| h.set(h.get() + 1));
        let f = Rc::clone(&footers);
        pdf.set_footer(move |pdf| {
            f.set(f.get() + 1);
            assert!(pdf.page_no() > 0);
        });

        pdf.add_page();
        pdf.add_page();
        pdf.add_page();
        pdf.close();

        assert_eq!(headers.get(), 3);
        assert_eq!(footers.get(), 3);
    }

    #[test]
    fn test_header_runs_on_blank_open_page() {
        let mut pdf = engine();
        pdf.set_header(|pdf| {
            pdf.set_font("Helvetica", FontStyle::BOLD, 14.0);
            pdf.cell(0.0, 10.0, "Header", Flow::NewLine, Align::Center);
        });
        assert!(pdf.page_content(1).unwrap().contains(&hex("Header")));
        assert_eq!(pdf.get_y(), 20.0);
    }

    #[test]
    fn test_hooks_restore_font() {
        let mut pdf = engine();
        pdf.set_text_color(0, 0, 255);
        pdf.set_footer(|pdf| {
            pdf.set_font("Times", FontStyle::ITALIC, 8.0);
            pdf.set_text_color(255, 0, 0);
        });
        pdf.add_page();
        assert!((pdf.font_size() - 12.0 * 25.4 / 72.0).abs() < 1e-9);
        assert_eq!(pdf.text_color(), Color::new(0, 0, 255));
    }

    #[test]
    fn test_unknown_font_is_sticky() {
        let mut pdf = engine();
        pdf.set_font("NoSuchFont", FontStyle::REGULAR, 12.0);
        assert!(matches!(pdf.error(), Some(Error::UnknownFont { .. })));

        pdf.cell(0.0, 10.0, "ignored", Flow::NewLine, Align::Left);
        assert!(!pdf.page_content(1).unwrap().contains(&hex("ignored")));

        let result = pdf.to_bytes();
        assert!(matches!(result, Err(Error::UnknownFont { .. })));
        assert!(pdf.to_bytes().is_err());
    }

    #[test]
    fn test_drawing_without_font_fails() {
        let mut pdf = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        pdf.add_page();
        pdf.cell(10.0, 10.0, "x", Flow::Right, Align::Left);
        assert!(matches!(pdf.error(), Some(Error::NoFont)));
    }

    #[test]
    fn test_draw_after_close_fails() {
        let mut pdf = engine();
        pdf.close();
        pdf.line(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(pdf.error(), Some(Error::DocumentClosed)));
    }

    #[test]
    fn test_close_without_pages_adds_one() {
        let mut pdf = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        let bytes = pdf.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(pdf.page_no(), 1);
    }

    #[test]
    fn test_line_operator() {
        let mut pdf = engine();
        pdf.line(10.0, 20.0, 110.0, 20.0);
        let content = pdf.page_content(1).unwrap();
        assert!(content.contains(" m "));
        assert!(content.contains(" l S Q"));
    }

    #[test]
    fn test_postscript_name() {
        assert_eq!(postscript_name("Bookman Old", FontStyle::BOLD_ITALIC), "BookmanOld-BoldItalic");
        assert_eq!(postscript_name("Bookman", FontStyle::REGULAR), "Bookman");
    }

    #[test]
    fn test_font_file_missing() {
        let mut pdf = Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4);
        let err = pdf
            .add_font_file("Bookman", FontStyle::REGULAR, Path::new("no/such/font.ttf"))
            .unwrap_err();
        assert!(matches!(err, Error::FontLoad { .. }));
        assert!(err.to_string().starts_with("font loading failed"));
    }
}
