//! Page setup and text styling configuration
//!
//! All values are plain immutable data. Enumerations parse from the short
//! spellings used by classic fpdf-style engines (`"P"`, `"mm"`, `"A4"`,
//! `"BI"`, `"C"`) as well as their long names, and deserialize from the same
//! strings in job files.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::layout::{Length, PageDimensions};

/// Implements `TryFrom<String>` through `FromStr` so serde can use it.
macro_rules! try_from_string {
    ($ty:ty) => {
        impl TryFrom<String> for $ty {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }
    };
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            other => Err(Error::InvalidConfig(format!("unknown orientation '{other}'"))),
        }
    }
}

try_from_string!(Orientation);

/// Measurement unit used for every distance handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Unit {
    #[default]
    Millimeter,
    Point,
    Centimeter,
    Inch,
}

impl Unit {
    /// Number of PDF points in one unit
    pub fn points_per_unit(&self) -> f64 {
        match self {
            Unit::Millimeter => 72.0 / 25.4,
            Unit::Point => 1.0,
            Unit::Centimeter => 72.0 / 2.54,
            Unit::Inch => 72.0,
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimetre" => Ok(Unit::Millimeter),
            "pt" | "point" => Ok(Unit::Point),
            "cm" | "centimeter" | "centimetre" => Ok(Unit::Centimeter),
            "in" | "inch" => Ok(Unit::Inch),
            other => Err(Error::InvalidConfig(format!("unknown unit '{other}'"))),
        }
    }
}

try_from_string!(Unit);

/// Paper size
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    /// Custom portrait dimensions
    Custom(PageDimensions),
}

impl PaperSize {
    /// Portrait dimensions of this paper size
    pub fn dimensions(&self) -> PageDimensions {
        match self {
            PaperSize::A3 => PageDimensions::a3(),
            PaperSize::A4 => PageDimensions::a4(),
            PaperSize::A5 => PageDimensions::a5(),
            PaperSize::Letter => PageDimensions::letter(),
            PaperSize::Legal => PageDimensions::legal(),
            PaperSize::Tabloid => PageDimensions::tabloid(),
            PaperSize::Custom(dims) => *dims,
        }
    }
}

impl FromStr for PaperSize {
    type Err = Error;

    /// Accepts a size name or `"<width>x<height>mm"`
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "a3" => return Ok(PaperSize::A3),
            "a4" => return Ok(PaperSize::A4),
            "a5" => return Ok(PaperSize::A5),
            "letter" => return Ok(PaperSize::Letter),
            "legal" => return Ok(PaperSize::Legal),
            "tabloid" => return Ok(PaperSize::Tabloid),
            _ => {}
        }

        let custom = lower
            .strip_suffix("mm")
            .and_then(|dims| dims.split_once('x'))
            .and_then(|(w, h)| Some((w.trim().parse::<f64>().ok()?, h.trim().parse::<f64>().ok()?)));

        match custom {
            Some((width, height)) if width > 0.0 && height > 0.0 => {
                Ok(PaperSize::Custom(PageDimensions {
                    width: Length::from_mm(width),
                    height: Length::from_mm(height),
                }))
            }
            _ => Err(Error::InvalidConfig(format!("unknown paper size '{}'", s.trim()))),
        }
    }
}

try_from_string!(PaperSize);

/// Page margins in the configured unit
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
}

impl Margins {
    /// Create margins with same value on all sides
    pub fn uniform(margin: f64) -> Self {
        Self {
            left: margin,
            top: margin,
            right: margin,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

/// Page setup for a document
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub orientation: Orientation,
    pub unit: Unit,
    pub paper_size: PaperSize,
    pub margins: Margins,
    /// Register the external font family before the first page is opened
    pub register_fonts: bool,
}

impl PageConfig {
    /// Build a page configuration from the string spellings used by job files
    pub fn new(
        orientation: &str,
        unit: &str,
        paper_size: &str,
        left_margin: f64,
        right_margin: f64,
        top_margin: f64,
        register_fonts: bool,
    ) -> Result<Self> {
        Ok(Self {
            orientation: orientation.parse()?,
            unit: unit.parse()?,
            paper_size: paper_size.parse()?,
            margins: Margins {
                left: left_margin,
                top: top_margin,
                right: right_margin,
            },
            register_fonts,
        })
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl FromStr for Align {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "l" | "left" => Ok(Align::Left),
            "c" | "center" | "centre" => Ok(Align::Center),
            "r" | "right" => Ok(Align::Right),
            "j" | "justify" => Ok(Align::Justify),
            other => Err(Error::InvalidConfig(format!("unknown alignment '{other}'"))),
        }
    }
}

try_from_string!(Align);

/// Font style flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle { bold: false, italic: false, underline: false };
    pub const BOLD: FontStyle = FontStyle { bold: true, italic: false, underline: false };
    pub const ITALIC: FontStyle = FontStyle { bold: false, italic: true, underline: false };
    pub const BOLD_ITALIC: FontStyle = FontStyle { bold: true, italic: true, underline: false };

    /// The same style without decoration flags, as used for font lookup
    pub fn face(&self) -> FontStyle {
        FontStyle {
            underline: false,
            ..*self
        }
    }
}

impl FromStr for FontStyle {
    type Err = Error;

    /// Parses any combination of `B`, `I` and `U`, e.g. `"BI"`
    fn from_str(s: &str) -> Result<Self> {
        let mut style = FontStyle::REGULAR;
        for ch in s.trim().chars() {
            match ch.to_ascii_uppercase() {
                'B' => style.bold = true,
                'I' => style.italic = true,
                'U' => style.underline = true,
                other => {
                    return Err(Error::InvalidConfig(format!("unknown font style flag '{other}'")))
                }
            }
        }
        Ok(style)
    }
}

try_from_string!(FontStyle);

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bold {
            f.write_str("B")?;
        }
        if self.italic {
            f.write_str("I")?;
        }
        if self.underline {
            f.write_str("U")?;
        }
        Ok(())
    }
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Text styling for one document role
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: String,
    pub style: FontStyle,
    /// Size in points
    pub size: f64,
    pub align: Align,
    pub color: Color,
}

impl TextStyle {
    pub fn new(font_family: &str, style: FontStyle, size: f64, align: Align, color: Color) -> Self {
        Self {
            font_family: font_family.to_string(),
            style,
            size,
            align,
            color,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("Helvetica", FontStyle::REGULAR, 12.0, Align::Left, Color::BLACK)
    }
}

/// Styles for the five document roles
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentStyles {
    pub header: TextStyle,
    pub footer: TextStyle,
    pub title: TextStyle,
    pub subtitle: TextStyle,
    pub text: TextStyle,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            header: TextStyle::new("Helvetica", FontStyle::BOLD, 12.0, Align::Center, Color::BLACK),
            footer: TextStyle::new("Helvetica", FontStyle::ITALIC, 8.0, Align::Left, Color::BLACK),
            title: TextStyle::new("Helvetica", FontStyle::BOLD, 16.0, Align::Left, Color::BLACK),
            subtitle: TextStyle::new("Helvetica", FontStyle::BOLD, 13.0, Align::Left, Color::BLACK),
            text: TextStyle::new("Helvetica", FontStyle::REGULAR, 11.0, Align::Justify, Color::BLACK),
        }
    }
}
