//! Integration tests for the PDF generator library

use std::path::{Path, PathBuf};

use lopdf::content::Content;
use lopdf::{Document, Object};
use pdf_generator::fonts::BOOKMAN_OLD_STYLE;
use pdf_generator::generator::page_caption;
use pdf_generator::pdf::metrics::encode_win_ansi;
use pdf_generator::pdf::{count_pages, extract_metadata, DocumentInfo};
use pdf_generator::{DocumentGenerator, DocumentStyles, Error, FontStyle, Job, PageConfig};
use tempfile::TempDir;

/// First TrueType font installed on this machine, if any
fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|path| path.exists())
}

/// Copy `font` into `dir` under every file name of the Bookman table
fn install_font_family(dir: &Path, font: &Path) {
    std::fs::create_dir_all(dir.join("font")).expect("Failed to create font directory");
    for (_, file) in BOOKMAN_OLD_STYLE.files {
        std::fs::copy(font, dir.join(file)).expect("Failed to copy font");
    }
}

/// Strings shown with `Tj` on each page, in page order
fn page_strings(bytes: &[u8]) -> Vec<Vec<Vec<u8>>> {
    let doc = Document::load_mem(bytes).expect("Generated PDF should parse");
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let data = doc.get_page_content(page_id).expect("Failed to read page content");
            let content = Content::decode(&data).expect("Failed to decode page content");
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(text, _)) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn report(config: &PageConfig) -> DocumentGenerator {
    let mut doc = DocumentGenerator::new(config, DocumentStyles::default()).expect("Failed to create generator");
    doc.set_default_footer("Report footer", true);
    doc.add_title("Report");
    doc.add_subtitle("Q1");
    doc.add_text(&"Revenue grew in every region during the first quarter of the year. ".repeat(120));
    doc.add_signature("J. Doe");
    doc
}

#[test]
fn test_end_to_end_page_numbers_on_every_page() {
    let config = PageConfig::new("P", "mm", "A4", 10.0, 10.0, 10.0, false).unwrap();
    let mut doc = report(&config);
    let bytes = doc.to_bytes().expect("Failed to write PDF");

    let pages = page_strings(&bytes);
    assert!(pages.len() > 1, "body text should spill onto a second page");
    assert_eq!(pages.len(), doc.page_count());

    for (index, strings) in pages.iter().enumerate() {
        let caption = encode_win_ansi(&page_caption(index + 1));
        assert!(
            strings.contains(&caption),
            "page {} is missing its page number",
            index + 1
        );
    }

    let first = &pages[0];
    assert!(first.contains(&b"Report".to_vec()));
    assert!(first.contains(&b"Q1".to_vec()));
    let last = pages.last().unwrap();
    assert!(last.contains(&b"J. Doe".to_vec()));

    println!("✓ Rendered {} pages with page numbers", pages.len());
}

#[test]
fn test_saved_file_metadata() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("report.pdf");

    let config = PageConfig::new("P", "mm", "A4", 10.0, 10.0, 10.0, false).unwrap();
    let mut doc = report(&config);
    doc.set_document_info(DocumentInfo {
        title: Some("Quarterly Report".to_string()),
        author: Some("Finance".to_string()),
        ..Default::default()
    });
    doc.save(&output_path).expect("Failed to save PDF");

    assert!(output_path.exists(), "PDF was not created");
    let page_count = count_pages(&output_path).expect("Failed to count pages");
    assert_eq!(page_count, doc.page_count());

    let metadata = extract_metadata(&output_path).expect("Failed to read metadata");
    assert_eq!(metadata.title.as_deref(), Some("Quarterly Report"));
    assert_eq!(metadata.author.as_deref(), Some("Finance"));
}

#[test]
fn test_font_registration_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = PageConfig::new("P", "mm", "A4", 10.0, 10.0, 10.0, true).unwrap();

    let result = DocumentGenerator::with_fonts(&config, DocumentStyles::default(), &BOOKMAN_OLD_STYLE, temp_dir.path());
    match result {
        Err(e) => {
            assert!(matches!(e, Error::FontLoad { .. }));
            assert!(e.to_string().contains("font loading failed"), "unexpected message: {}", e);
        }
        Ok(_) => panic!("Should fail without font files"),
    }
}

#[test]
fn test_registered_font_is_embedded() {
    let Some(font) = system_font() else {
        eprintln!("Skipping embedded font test: no system TrueType font found");
        return;
    };

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    install_font_family(temp_dir.path(), &font);

    let config = PageConfig::new("P", "mm", "A4", 10.0, 10.0, 10.0, true).unwrap();
    let mut styles = DocumentStyles::default();
    styles.text.font_family = "Bookman".to_string();
    styles.title.font_family = "Bookman".to_string();
    styles.title.style = FontStyle::BOLD;

    let mut doc = DocumentGenerator::with_fonts(&config, styles, &BOOKMAN_OLD_STYLE, temp_dir.path())
        .expect("Font registration should succeed");
    doc.add_title("Relatório");
    doc.add_text("Olá, mundo. Ação e coração.");
    let bytes = doc.to_bytes().expect("Failed to write PDF");

    let parsed = Document::load_mem(&bytes).expect("Generated PDF should parse");
    let subtypes: Vec<&[u8]> = parsed
        .objects
        .values()
        .filter_map(|obj| obj.as_dict().ok())
        .filter_map(|dict| dict.get(b"Subtype").ok())
        .filter_map(|subtype| subtype.as_name().ok())
        .collect();

    assert!(subtypes.contains(&&b"Type0"[..]), "expected a Type0 font");
    assert!(subtypes.contains(&&b"CIDFontType2"[..]), "expected a CIDFontType2 descendant");
}

#[test]
fn test_render_job_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let job_path = temp_dir.path().join("minutes.toml");
    std::fs::write(
        &job_path,
        r#"
[page]
unit = "mm"
margins = { left = 15, top = 15, right = 15 }

[header]
text = "Minutes"

[footer]
text = "Internal"
page_numbers = true

[metadata]
title = "Minutes"

[[blocks]]
kind = "title"
text = "Board meeting"

[[blocks]]
kind = "text"
text = "Attendance was recorded.\nThe budget was approved."

[[blocks]]
kind = "signature"
name = "Secretary"
"#,
    )
    .unwrap();

    let job = Job::load(&job_path).expect("Failed to load job");
    let output_path = temp_dir.path().join("minutes.pdf");
    job.render(temp_dir.path())
        .expect("Failed to render job")
        .save(&output_path)
        .expect("Failed to save PDF");

    let metadata = extract_metadata(&output_path).expect("Failed to read metadata");
    assert_eq!(metadata.page_count, 1);
    assert_eq!(metadata.title.as_deref(), Some("Minutes"));

    let pages = page_strings(&std::fs::read(&output_path).unwrap());
    assert!(pages[0].contains(&b"Minutes".to_vec()));
    assert!(pages[0].contains(&encode_win_ansi("Pág. 1")));
}

#[test]
fn test_count_pages_nonexistent_file() {
    let result = count_pages(Path::new("nonexistent.pdf"));
    assert!(result.is_err(), "Should fail with nonexistent file");
    assert!(result.unwrap_err().to_string().contains("not found"));
}
