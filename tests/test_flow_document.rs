//! Integration tests for DOCX output.
//!
//! Archives are read back with `zip` and parsed with `quick-xml`, the same
//! way a consumer would see them.

use pdf_office::converters::office::{OfficeFormat, PdfOfficeConverter};
use pdf_office::extract::TextBlock;
use pdf_office::geometry::{PageSize, Rect};
use pdf_office::record::{CancellationToken, PageFidelityRecord};
use pdf_office::rendering::BackgroundComposer;
use pdf_office::source::StaticPage;
use pdf_office::{convert_page_records_to_flow_document, ConversionConfig};
use quick_xml::events::Event;
use quick_xml::Reader;
use pdf_office::rendering::BackgroundImage;
use std::io::{Cursor, Read};
use tiny_skia::Pixmap;
use zip::ZipArchive;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn record(index: usize, blocks: Vec<TextBlock>) -> PageFidelityRecord {
    let page = StaticPage::new(PageSize::LETTER);
    let background = BackgroundComposer::default()
        .compose(&page, &blocks, index)
        .unwrap();
    PageFidelityRecord {
        index,
        background,
        text_blocks: blocks,
        size: PageSize::LETTER,
    }
}

fn block(text: &str, y: f64) -> TextBlock {
    TextBlock {
        text: text.to_string(),
        frame: Rect::new(72.0, y, 200.0, 12.0),
        font_size: 7.8,
    }
}

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn entry_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Count elements with the given qualified name.
fn count_elements(xml: &str, name: &[u8]) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == name => count += 1,
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML parse error: {}", e),
            _ => {},
        }
    }
    count
}

/// All `w:t` text, unescaped.
fn run_texts(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => in_text = false,
            Ok(Event::Text(e)) if in_text => texts.push(e.unescape().unwrap().into_owned()),
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML parse error: {}", e),
            _ => {},
        }
    }
    texts
}

#[test]
fn test_section_count_matches_pages() {
    init_logging();
    for n in [1usize, 2, 5] {
        let records: Vec<_> = (0..n)
            .map(|i| record(i, vec![block(&format!("page {}", i), 700.0)]))
            .collect();
        let bytes = convert_page_records_to_flow_document(&records).unwrap();
        let document = read_entry(&bytes, "word/document.xml");
        assert_eq!(count_elements(&document, b"w:sectPr"), n);
    }
}

#[test]
fn test_required_parts_present() {
    let bytes = convert_page_records_to_flow_document(&[record(0, vec![block("x", 700.0)])]).unwrap();
    let names = entry_names(&bytes);
    assert_eq!(names[0], "[Content_Types].xml");
    for required in [
        "_rels/.rels",
        "docProps/core.xml",
        "docProps/app.xml",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/media/bg1.jpg",
    ] {
        assert!(names.iter().any(|n| n == required), "missing {}", required);
    }
}

#[test]
fn test_text_escaped_in_run() {
    let bytes =
        convert_page_records_to_flow_document(&[record(0, vec![block("A & B < C", 700.0)])])
            .unwrap();
    let document = read_entry(&bytes, "word/document.xml");
    assert!(document.contains("A &amp; B &lt; C"));
    assert_eq!(run_texts(&document), vec!["A & B < C"]);
}

#[test]
fn test_byte_identical_output() {
    let records = vec![
        record(0, vec![block("alpha", 700.0), block("beta", 680.0)]),
        record(1, vec![block("gamma", 650.0)]),
    ];
    let first = convert_page_records_to_flow_document(&records).unwrap();
    let second = convert_page_records_to_flow_document(&records).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_image_reference_resolves() {
    let records: Vec<_> = (0..3).map(|i| record(i, vec![block("t", 700.0)])).collect();
    let bytes = convert_page_records_to_flow_document(&records).unwrap();
    let document = read_entry(&bytes, "word/document.xml");
    let rels = read_entry(&bytes, "word/_rels/document.xml.rels");
    let names = entry_names(&bytes);

    let mut reader = Reader::from_str(&document);
    let mut embeds = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) if e.name().as_ref() == b"a:blip" => {
                let attr = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() == b"r:embed")
                    .unwrap();
                embeds.push(String::from_utf8(attr.value.to_vec()).unwrap());
            },
            Ok(Event::Eof) => break,
            Err(e) => panic!("XML parse error: {}", e),
            _ => {},
        }
    }
    assert_eq!(embeds.len(), 3);
    for (i, id) in embeds.iter().enumerate() {
        let declaration = format!("Id=\"{}\"", id);
        assert!(rels.contains(&declaration), "{} not declared", id);
        assert!(names.contains(&format!("word/media/bg{}.jpg", i + 1)));
    }
}

#[test]
fn test_content_types_cover_every_entry() {
    let bytes = convert_page_records_to_flow_document(&[record(0, vec![])]).unwrap();
    let types = read_entry(&bytes, "[Content_Types].xml");
    for name in entry_names(&bytes) {
        if name == "[Content_Types].xml" {
            continue;
        }
        let extension = name.rsplit('.').next().unwrap();
        let by_default = types.contains(&format!("Extension=\"{}\"", extension));
        let by_override = types.contains(&format!("PartName=\"/{}\"", name));
        assert!(by_default || by_override, "{} has no content type", name);
    }
}

#[test]
fn test_mixed_page_sizes() {
    let mut landscape = record(1, vec![]);
    landscape.size = PageSize::new(842.0, 595.0).unwrap();
    let records = vec![record(0, vec![]), landscape];
    let bytes = convert_page_records_to_flow_document(&records).unwrap();
    let document = read_entry(&bytes, "word/document.xml");
    assert!(document.contains("<w:pgSz w:w=\"12240\" w:h=\"15840\"/>"));
    assert!(document.contains("<w:pgSz w:w=\"16840\" w:h=\"11900\" w:orient=\"landscape\"/>"));
}

#[test]
fn test_noise_lines_not_emitted() {
    let page = StaticPage::new(PageSize::LETTER)
        .with_line("Heading", Rect::new(72.0, 720.0, 120.0, 20.0))
        .with_line("whole page selection", Rect::new(0.0, 0.0, 612.0, 792.0))
        .with_line("runaway line", Rect::new(0.0, 400.0, 2500.0, 12.0))
        .with_line("   ", Rect::new(72.0, 600.0, 10.0, 12.0));

    let output = PdfOfficeConverter::new()
        .convert(&[page], OfficeFormat::Docx, &CancellationToken::new())
        .unwrap();
    let document = read_entry(&output.bytes, "word/document.xml");
    assert_eq!(run_texts(&document), vec!["Heading"]);
    // 0.65 * 20pt = 13pt = 26 half-points
    assert!(document.contains("<w:sz w:val=\"26\"/>"));
}

#[test]
fn test_metadata_written() {
    let config = ConversionConfig::new().with_metadata(
        pdf_office::config::DocumentMetadata::new()
            .title("Annual Report")
            .creator("Finance"),
    );
    let page = StaticPage::new(PageSize::LETTER);
    let output = PdfOfficeConverter::with_config(config)
        .convert(&[page], OfficeFormat::Docx, &CancellationToken::new())
        .unwrap();
    let core = read_entry(&output.bytes, "docProps/core.xml");
    assert!(core.contains("<dc:title>Annual Report</dc:title>"));
    let app = read_entry(&output.bytes, "docProps/app.xml");
    assert!(app.contains("<Pages>1</Pages>"));
}

#[test]
fn test_unencodable_background_emits_text_only() {
    init_logging();
    // wider than a JPEG frame can be
    let mut middle = record(1, vec![block("middle", 700.0)]);
    middle.background = BackgroundImage::from_pixmap(Pixmap::new(70_000, 1).unwrap(), 1.0);
    let records = vec![
        record(0, vec![block("first", 700.0)]),
        middle,
        record(2, vec![block("last", 700.0)]),
    ];

    let bytes = convert_page_records_to_flow_document(&records).unwrap();
    let names = entry_names(&bytes);
    assert!(names.contains(&"word/media/bg1.jpg".to_string()));
    assert!(!names.contains(&"word/media/bg2.jpg".to_string()));
    assert!(names.contains(&"word/media/bg3.jpg".to_string()));

    let rels = read_entry(&bytes, "word/_rels/document.xml.rels");
    assert!(!rels.contains("media/bg2.jpg"));
    assert_eq!(rels.matches("<Relationship ").count(), 3);

    let document = read_entry(&bytes, "word/document.xml");
    assert_eq!(count_elements(&document, b"w:sectPr"), 3);
    assert_eq!(count_elements(&document, b"a:blip"), 2);
    assert_eq!(run_texts(&document), vec!["first", "middle", "last"]);
}
