//! Embedded TrueType fonts
//!
//! Registered fonts are embedded whole (no subsetting) as `Type0` fonts with
//! `Identity-H` encoding, so every glyph in a content stream is written as its
//! two-byte glyph id. Text is shaped with rustybuzz; the glyphs actually used
//! are tracked to build the `W` array and the `ToUnicode` map when the
//! document is written.

use std::collections::BTreeMap;

use rustybuzz::ttf_parser::GlyphId;
use rustybuzz::{Face, UnicodeBuffer};

/// A glyph that appears somewhere in the document
#[derive(Debug, Clone, PartialEq)]
pub struct UsedGlyph {
    /// Horizontal advance in font units
    pub advance: u16,
    /// Text this glyph stands for (empty for marks sharing a cluster)
    pub text: String,
}

#[derive(Debug, Clone)]
struct ShapedGlyph {
    id: u16,
    advance: u16,
    text: String,
}

/// A parsed TrueType/OpenType font ready for embedding
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    base_name: String,
    data: Vec<u8>,
    units_per_em: f64,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
    italic: bool,
    used: BTreeMap<u16, UsedGlyph>,
}

impl TrueTypeFont {
    /// Parse font data; the error is a human readable reason
    pub fn parse(base_name: &str, data: Vec<u8>, italic: bool) -> Result<Self, String> {
        let (units_per_em, ascent, descent, cap_height, bbox) = {
            let face = Face::from_slice(&data, 0)
                .ok_or_else(|| "not a valid TrueType/OpenType font".to_string())?;
            let rect = face.global_bounding_box();
            (
                face.units_per_em() as f64,
                face.ascender(),
                face.descender(),
                face.capital_height().unwrap_or(face.ascender()),
                [rect.x_min, rect.y_min, rect.x_max, rect.y_max],
            )
        };

        if units_per_em <= 0.0 {
            return Err("font has no units per em".to_string());
        }

        Ok(Self {
            base_name: base_name.to_string(),
            data,
            units_per_em,
            ascent,
            descent,
            cap_height,
            bbox,
            italic,
            used: BTreeMap::new(),
        })
    }

    fn shape(&self, text: &str) -> Vec<ShapedGlyph> {
        let Some(face) = Face::from_slice(&self.data, 0) else {
            return Vec::new();
        };

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        buffer.guess_segment_properties();
        let output = rustybuzz::shape(&face, &[], buffer);
        let infos = output.glyph_infos();

        infos
            .iter()
            .enumerate()
            .map(|(i, info)| {
                let id = info.glyph_id as u16;
                let start = info.cluster as usize;
                let shares_cluster = i > 0 && infos[i - 1].cluster == info.cluster;
                let cluster_text = if shares_cluster {
                    String::new()
                } else {
                    let end = infos[i + 1..]
                        .iter()
                        .map(|next| next.cluster as usize)
                        .find(|&cluster| cluster > start)
                        .unwrap_or(text.len());
                    text.get(start..end).unwrap_or_default().to_string()
                };

                ShapedGlyph {
                    id,
                    advance: face.glyph_hor_advance(GlyphId(id)).unwrap_or(0),
                    text: cluster_text,
                }
            })
            .collect()
    }

    /// Width of `text` in 1/1000 em
    pub fn text_width(&self, text: &str) -> f64 {
        let units: f64 = self.shape(text).iter().map(|g| g.advance as f64).sum();
        units * 1000.0 / self.units_per_em
    }

    /// Glyph ids of `text` as a hex string, recording every glyph used
    pub fn encode(&mut self, text: &str) -> String {
        let mut hex = String::new();
        for glyph in self.shape(text) {
            hex.push_str(&format!("{:04X}", glyph.id));
            self.used.entry(glyph.id).or_insert(UsedGlyph {
                advance: glyph.advance,
                text: glyph.text,
            });
        }
        hex
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn used_glyphs(&self) -> &BTreeMap<u16, UsedGlyph> {
        &self.used
    }

    /// Scale a font-unit value to 1/1000 em
    pub fn to_thousandths(&self, value: f64) -> i64 {
        (value * 1000.0 / self.units_per_em).round() as i64
    }

    pub fn ascent(&self) -> i64 {
        self.to_thousandths(self.ascent as f64)
    }

    pub fn descent(&self) -> i64 {
        self.to_thousandths(self.descent as f64)
    }

    pub fn cap_height(&self) -> i64 {
        self.to_thousandths(self.cap_height as f64)
    }

    /// Font bounding box in 1/1000 em
    pub fn bbox(&self) -> [i64; 4] {
        self.bbox.map(|v| self.to_thousandths(v as f64))
    }

    /// `ToUnicode` CMap covering every glyph used so far
    pub fn to_unicode_cmap(&self) -> String {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo\n\
             << /Registry (Adobe)\n\
             /Ordering (UCS)\n\
             /Supplement 0\n\
             >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n\
             <0000> <FFFF>\n\
             endcodespacerange\n",
        );

        let entries: Vec<(u16, &str)> = self
            .used
            .iter()
            .filter(|(_, glyph)| !glyph.text.is_empty())
            .map(|(id, glyph)| (*id, glyph.text.as_str()))
            .collect();

        // bfchar blocks hold at most 100 entries
        for chunk in entries.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (id, text) in chunk {
                let utf16: String = text.encode_utf16().map(|unit| format!("{unit:04X}")).collect();
                cmap.push_str(&format!("<{id:04X}> <{utf16}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap
    }
}
