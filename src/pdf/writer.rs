//! Serialization of an [`Engine`] into a PDF file using lopdf

use chrono::Local;
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::engine::{Engine, FontEntry, FontFace};
use super::font::TrueTypeFont;
use crate::error::Result;

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// PDF text string: literal for ASCII, UTF-16BE with byte order mark otherwise
pub(crate) fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn core_font_dict(base_name: &str) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", name("Font"));
    dict.set("Subtype", name("Type1"));
    dict.set("BaseFont", name(base_name));
    dict.set("Encoding", name("WinAnsiEncoding"));
    dict
}

/// Embed a TrueType font as a `Type0` composite font and return its id
fn embed_true_type(doc: &mut Document, font: &TrueTypeFont) -> ObjectId {
    let mut file_dict = Dictionary::new();
    file_dict.set("Length1", Object::Integer(font.data().len() as i64));
    let file_id = doc.add_object(Stream::new(file_dict, font.data().to_vec()));

    let mut flags = 32;
    if font.is_italic() {
        flags |= 64;
    }
    let [x_min, y_min, x_max, y_max] = font.bbox();

    let mut descriptor = Dictionary::new();
    descriptor.set("Type", name("FontDescriptor"));
    descriptor.set("FontName", name(font.base_name()));
    descriptor.set("Flags", Object::Integer(flags));
    descriptor.set(
        "FontBBox",
        Object::Array(vec![
            Object::Integer(x_min),
            Object::Integer(y_min),
            Object::Integer(x_max),
            Object::Integer(y_max),
        ]),
    );
    descriptor.set("ItalicAngle", Object::Integer(if font.is_italic() { -12 } else { 0 }));
    descriptor.set("Ascent", Object::Integer(font.ascent()));
    descriptor.set("Descent", Object::Integer(font.descent()));
    descriptor.set("CapHeight", Object::Integer(font.cap_height()));
    descriptor.set("StemV", Object::Integer(80));
    descriptor.set("FontFile2", Object::Reference(file_id));
    let descriptor_id = doc.add_object(descriptor);

    // W array: [gid [width] gid [width] ...]
    let mut widths = Vec::new();
    for (gid, glyph) in font.used_glyphs() {
        widths.push(Object::Integer(*gid as i64));
        widths.push(Object::Array(vec![Object::Integer(
            font.to_thousandths(glyph.advance as f64),
        )]));
    }

    let mut system_info = Dictionary::new();
    system_info.set("Registry", Object::string_literal("Adobe"));
    system_info.set("Ordering", Object::string_literal("Identity"));
    system_info.set("Supplement", Object::Integer(0));

    let mut cid_font = Dictionary::new();
    cid_font.set("Type", name("Font"));
    cid_font.set("Subtype", name("CIDFontType2"));
    cid_font.set("BaseFont", name(font.base_name()));
    cid_font.set("CIDSystemInfo", Object::Dictionary(system_info));
    cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
    cid_font.set("DW", Object::Integer(1000));
    cid_font.set("W", Object::Array(widths));
    cid_font.set("CIDToGIDMap", name("Identity"));
    let cid_font_id = doc.add_object(cid_font);

    let to_unicode_id = doc.add_object(Stream::new(
        Dictionary::new(),
        font.to_unicode_cmap().into_bytes(),
    ));

    let mut type0 = Dictionary::new();
    type0.set("Type", name("Font"));
    type0.set("Subtype", name("Type0"));
    type0.set("BaseFont", name(font.base_name()));
    type0.set("Encoding", name("Identity-H"));
    type0.set("DescendantFonts", Object::Array(vec![Object::Reference(cid_font_id)]));
    type0.set("ToUnicode", Object::Reference(to_unicode_id));
    doc.add_object(type0)
}

fn font_resources(doc: &mut Document, fonts: &[FontEntry]) -> Dictionary {
    let mut resources = Dictionary::new();
    for entry in fonts.iter().filter(|entry| entry.used) {
        let id = match &entry.face {
            FontFace::Core(core) => doc.add_object(core_font_dict(core.base_name)),
            FontFace::TrueType(font) => {
                debug!(
                    "embedding {} with {} glyph(s)",
                    font.base_name(),
                    font.used_glyphs().len()
                );
                embed_true_type(doc, font)
            }
        };
        resources.set(entry.resource.as_bytes().to_vec(), Object::Reference(id));
    }
    resources
}

fn info_dict(engine: &Engine) -> Dictionary {
    let info = engine.info();
    let mut dict = Dictionary::new();
    let fields = [
        ("Title", &info.title),
        ("Author", &info.author),
        ("Subject", &info.subject),
        ("Creator", &info.creator),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            dict.set(key, text_string(value));
        }
    }
    dict.set(
        "Producer",
        text_string(&format!("pdf-generator {}", env!("CARGO_PKG_VERSION"))),
    );
    let created = Local::now().format("D:%Y%m%d%H%M%S").to_string();
    dict.set("CreationDate", Object::string_literal(created));
    dict
}

/// Build the PDF file for a closed engine
pub(crate) fn write_document(engine: &Engine) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let fonts = font_resources(&mut doc, engine.fonts());
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));
    resources.set(
        "ProcSet",
        Object::Array(vec![name("PDF"), name("Text")]),
    );
    let resources_id = doc.add_object(resources);

    let (width, height) = engine.page_size_pt();
    let mut kids = Vec::new();
    for content in engine.pages() {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.as_bytes().to_vec()));

        let mut page = Dictionary::new();
        page.set("Type", name("Page"));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![real(0.0), real(0.0), real(width), real(height)]),
        );
        page.set("Contents", Object::Reference(content_id));
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages = Dictionary::new();
    pages.set("Type", name("Pages"));
    pages.set("Count", Object::Integer(kids.len() as i64));
    pages.set("Kids", Object::Array(kids));
    pages.set("Resources", Object::Reference(resources_id));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", name("Catalog"));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(info_dict(engine));
    doc.trailer.set("Info", Object::Reference(info_id));

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    debug!("serialized {} page(s), {} bytes", engine.page_no(), bytes.len());
    Ok(bytes)
}
