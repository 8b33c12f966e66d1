//! Page geometry, unit scaling and layout arithmetic
//!
//! Layout constants are authored once in millimeters and converted to the
//! document's unit through [`Scale`] before they reach the engine.

use crate::config::Unit;

/// Millimeter-to-point factor applied to layout constants
pub const MM_TO_PT: f64 = 2.834;

/// Title cell height
pub const TITLE_HEIGHT: f64 = 10.0;
/// Subtitle cell height
pub const SUBTITLE_HEIGHT: f64 = 8.0;
/// Body text line height
pub const TEXT_HEIGHT: f64 = 5.0;
/// Blank advance after titles and subtitles
pub const LINE_BREAK: f64 = 5.0;
/// Header cell height
pub const HEADER_HEIGHT: f64 = 9.0;
/// Advance below the header
pub const HEADER_LINE: f64 = 10.0;
/// Horizontal padding added to the rendered header width
pub const HEADER_PADDING: f64 = 6.0;
/// Distance of the footer from the bottom edge
pub const FOOTER_OFFSET: f64 = 15.0;
/// Footer cell height
pub const FOOTER_HEIGHT: f64 = 10.0;
/// Bottom distance that triggers an automatic page break (40 pt)
pub const PAGE_BREAK_MARGIN: f64 = 40.0 / MM_TO_PT;
/// Signature line length
pub const SIGNATURE_LINE_LENGTH: f64 = 130.0;
/// Distance from the cursor down to the signature line
pub const SIGNATURE_DROP: f64 = 20.0;
/// Height of the cell holding the signer's name
pub const SIGNATURE_HEIGHT: f64 = 50.0;

/// Simple length type in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f64);

impl Length {
    /// Create a length from millimeters
    pub fn from_mm(mm: f64) -> Self {
        Length(mm)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f64) -> Self {
        Length(inches * 25.4)
    }

    /// Get the value in millimeters
    pub fn mm(&self) -> f64 {
        self.0
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f64 {
        self.0 * 72.0 / 25.4
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// A3 size (297mm × 420mm)
    pub fn a3() -> Self {
        Self::mm(297.0, 420.0)
    }

    /// A4 size (210mm × 297mm)
    pub fn a4() -> Self {
        Self::mm(210.0, 297.0)
    }

    /// A5 size (148mm × 210mm)
    pub fn a5() -> Self {
        Self::mm(148.0, 210.0)
    }

    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_inches(8.5),
            height: Length::from_inches(11.0),
        }
    }

    /// US Legal size (8.5" × 14")
    pub fn legal() -> Self {
        Self {
            width: Length::from_inches(8.5),
            height: Length::from_inches(14.0),
        }
    }

    /// Tabloid size (11" × 17")
    pub fn tabloid() -> Self {
        Self {
            width: Length::from_inches(11.0),
            height: Length::from_inches(17.0),
        }
    }

    fn mm(width: f64, height: f64) -> Self {
        Self {
            width: Length::from_mm(width),
            height: Length::from_mm(height),
        }
    }

    /// Same page turned sideways
    pub fn landscape(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Converts millimeter layout constants into the document's unit
///
/// The factor is fixed when the generator is built and never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    factor: f64,
}

impl Scale {
    pub fn for_unit(unit: Unit) -> Self {
        let factor = match unit {
            Unit::Millimeter => 1.0,
            Unit::Point => MM_TO_PT,
            Unit::Centimeter => 0.1,
            Unit::Inch => 1.0 / 25.4,
        };
        Self { factor }
    }

    /// Convert a millimeter magnitude into the active unit
    pub fn apply(&self, mm: f64) -> f64 {
        mm * self.factor
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }
}

/// A horizontal line segment in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

/// Left edge of a box of `box_width` centered on a page of `page_width`
pub fn centered_start(page_width: f64, box_width: f64) -> f64 {
    (page_width - box_width) / 2.0
}

/// Header box: returns `(x, width)` for text of `text_width` on the page
pub fn header_box(page_width: f64, text_width: f64, scale: Scale) -> (f64, f64) {
    let width = text_width + scale.apply(HEADER_PADDING);
    (centered_start(page_width, width), width)
}

/// Signature line centered between the margins, dropped below `cursor_y`
pub fn signature_line(left: f64, right: f64, page_width: f64, cursor_y: f64, scale: Scale) -> Segment {
    let length = scale.apply(SIGNATURE_LINE_LENGTH);
    let available = (page_width - left - right - length) / 2.0;
    let x1 = left + available;

    Segment {
        x1,
        x2: x1 + length,
        y: cursor_y + scale.apply(SIGNATURE_DROP),
    }
}
