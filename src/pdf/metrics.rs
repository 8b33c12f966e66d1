//! Built-in PDF fonts: names, glyph widths and WinAnsi encoding
//!
//! The standard 14 fonts need no embedding. Text drawn with them is encoded
//! as single WinAnsi bytes and measured with the width tables below (1/1000
//! em, codes 32-255).

/// A standard PDF font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreFont {
    /// PostScript name written as `BaseFont`
    pub base_name: &'static str,
    widths: &'static [u16; 224],
}

impl CoreFont {
    /// Width of a WinAnsi byte in 1/1000 em
    pub fn byte_width(&self, byte: u8) -> u16 {
        if byte < 32 {
            return 0;
        }
        self.widths[(byte - 32) as usize]
    }

    /// Width of `text` in 1/1000 em
    pub fn text_width(&self, text: &str) -> f64 {
        encode_win_ansi(text)
            .into_iter()
            .map(|byte| self.byte_width(byte) as f64)
            .sum()
    }
}

/// Resolve a core font by family name and style
///
/// Arial is accepted as an alias of Helvetica. Bold and italic Times faces,
/// and the Helvetica obliques, share the widths of their upright sibling.
pub fn core_font(family: &str, bold: bool, italic: bool) -> Option<CoreFont> {
    let font = match (family.to_ascii_lowercase().as_str(), bold, italic) {
        ("helvetica" | "arial", false, false) => CoreFont { base_name: "Helvetica", widths: &HELVETICA },
        ("helvetica" | "arial", true, false) => CoreFont { base_name: "Helvetica-Bold", widths: &HELVETICA_BOLD },
        ("helvetica" | "arial", false, true) => CoreFont { base_name: "Helvetica-Oblique", widths: &HELVETICA },
        ("helvetica" | "arial", true, true) => {
            CoreFont { base_name: "Helvetica-BoldOblique", widths: &HELVETICA_BOLD }
        }
        ("times", false, false) => CoreFont { base_name: "Times-Roman", widths: &TIMES_ROMAN },
        ("times", true, false) => CoreFont { base_name: "Times-Bold", widths: &TIMES_ROMAN },
        ("times", false, true) => CoreFont { base_name: "Times-Italic", widths: &TIMES_ROMAN },
        ("times", true, true) => CoreFont { base_name: "Times-BoldItalic", widths: &TIMES_ROMAN },
        ("courier", false, false) => CoreFont { base_name: "Courier", widths: &COURIER },
        ("courier", true, false) => CoreFont { base_name: "Courier-Bold", widths: &COURIER },
        ("courier", false, true) => CoreFont { base_name: "Courier-Oblique", widths: &COURIER },
        ("courier", true, true) => CoreFont { base_name: "Courier-BoldOblique", widths: &COURIER },
        _ => return None,
    };
    Some(font)
}

/// Encode text as WinAnsi bytes; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|ch| win_ansi_byte(ch).unwrap_or(b'?')).collect()
}

fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => return Some(code as u8),
        _ => {}
    }
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Courier is monospaced
const COURIER: [u16; 224] = [600; 224];

/// Helvetica
const HELVETICA: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 350, // 112
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350, // 128
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667, // 144
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 160
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 176
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 192
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 208
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 224
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 240
];

/// Helvetica-Bold
const HELVETICA_BOLD: [u16; 224] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 350, // 112
    556, 350, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350, // 128
    350, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 350, 500, 667, // 144
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 160
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 176
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 192
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 208
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // 224
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // 240
];

/// Times-Roman
const TIMES_ROMAN: [u16; 224] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // 32
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, // 48
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, // 64
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, // 80
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, // 96
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, 350, // 112
    500, 350, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 350, 611, 350, // 128
    350, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 350, 444, 722, // 144
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333, // 160
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444, // 176
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333, // 192
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500, // 208
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278, // 224
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500, // 240
];
