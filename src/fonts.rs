//! External font family registration
//!
//! The font family used by documents is a constant table mapping each style
//! variant to a file path. Paths are relative and resolved against a base
//! directory supplied when fonts are registered.

use std::path::Path;

use log::{debug, error, info};

use crate::config::FontStyle;
use crate::error::Result;
use crate::pdf::Engine;

/// Style variant of a font family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontVariant {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub fn style(&self) -> FontStyle {
        match self {
            FontVariant::Regular => FontStyle::REGULAR,
            FontVariant::Bold => FontStyle::BOLD,
            FontVariant::Italic => FontStyle::ITALIC,
            FontVariant::BoldItalic => FontStyle::BOLD_ITALIC,
        }
    }
}

/// A font family and the file holding each of its variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFamily {
    /// Family name used in text styles
    pub name: &'static str,
    pub files: [(FontVariant, &'static str); 4],
}

/// Bookman Old Style, loaded from the `font/` directory
pub const BOOKMAN_OLD_STYLE: FontFamily = FontFamily {
    name: "Bookman",
    files: [
        (FontVariant::Regular, "font/bookman-old-style.ttf"),
        (FontVariant::Bold, "font/bookman-old-style-bold.ttf"),
        (FontVariant::BoldItalic, "font/bookman-old-style-bold-italic.ttf"),
        (FontVariant::Italic, "font/bookman-old-style-italic.ttf"),
    ],
};

/// Register every variant of `family` with the engine
///
/// Stops at the first file that cannot be read or parsed.
pub fn register_fonts(engine: &mut Engine, family: &FontFamily, base_dir: &Path) -> Result<()> {
    for (variant, file) in family.files {
        let path = base_dir.join(file);
        debug!("registering {} {:?} from {}", family.name, variant, path.display());

        if let Err(e) = engine.add_font_file(family.name, variant.style(), &path) {
            error!("{e}");
            return Err(e);
        }
    }

    info!("registered font family {}", family.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Orientation, PaperSize, Unit};
    use crate::error::Error;
    use tempfile::TempDir;

    fn engine() -> Engine {
        Engine::new(Orientation::Portrait, Unit::Millimeter, PaperSize::A4)
    }

    #[test]
    fn test_table_covers_every_variant() {
        let styles: Vec<FontStyle> = BOOKMAN_OLD_STYLE.files.iter().map(|(v, _)| v.style()).collect();
        for style in [FontStyle::REGULAR, FontStyle::BOLD, FontStyle::ITALIC, FontStyle::BOLD_ITALIC] {
            assert!(styles.contains(&style));
        }
        assert!(BOOKMAN_OLD_STYLE.files.iter().all(|(_, path)| path.starts_with("font/")));
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let result = register_fonts(&mut engine(), &BOOKMAN_OLD_STYLE, dir.path());
        assert!(matches!(result, Err(Error::FontLoad { .. })));
    }

    #[test]
    fn test_unparsable_file_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("font")).unwrap();
        for (_, file) in BOOKMAN_OLD_STYLE.files {
            std::fs::write(dir.path().join(file), b"not a font").unwrap();
        }

        let err = register_fonts(&mut engine(), &BOOKMAN_OLD_STYLE, dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("font loading failed"));
    }

    #[test]
    fn test_register_system_font() {
        let Some(data) = crate::test_util::system_font() else {
            eprintln!("Skipping: no system TrueType font found");
            return;
        };

        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("font")).unwrap();
        for (_, file) in BOOKMAN_OLD_STYLE.files {
            std::fs::write(dir.path().join(file), &data).unwrap();
        }

        let mut pdf = engine();
        register_fonts(&mut pdf, &BOOKMAN_OLD_STYLE, dir.path()).unwrap();
        pdf.add_page();
        pdf.set_font("Bookman", FontStyle::BOLD_ITALIC, 12.0);
        assert!(pdf.is_ok());
        assert!(pdf.string_width("Bookman") > 0.0);
    }

    #[test]
    fn test_last_missing_variant_fails() {
        let Some(data) = crate::test_util::system_font() else {
            eprintln!("Skipping: no system TrueType font found");
            return;
        };

        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("font")).unwrap();
        let (present, missing) = BOOKMAN_OLD_STYLE.files.split_at(3);
        for (_, file) in present {
            std::fs::write(dir.path().join(file), &data).unwrap();
        }

        match register_fonts(&mut engine(), &BOOKMAN_OLD_STYLE, dir.path()) {
            Err(Error::FontLoad { path, .. }) => assert_eq!(path, dir.path().join(missing[0].1)),
            other => panic!("expected a font loading error, got {other:?}"),
        }
    }
}
