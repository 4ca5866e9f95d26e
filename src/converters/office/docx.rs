//! Page records to DOCX package assembly.
//!
//! Each source page becomes one section of a flow document. The section's
//! single paragraph holds a full-page picture anchored behind the text and
//! one floating text box per extracted line.
//!
//! Section properties close the section they describe: every page but the
//! last carries its `w:sectPr` in that paragraph's `w:pPr`, and the last
//! page's `w:sectPr` terminates `w:body` directly. Getting this backwards
//! changes the page count in word processors.

use super::{media_name, write_doc_props};
use crate::config::ConversionConfig;
use crate::error::Result;
use crate::geometry::mapper::font_half_points;
use crate::geometry::{CoordinateMapper, Emu, PageSize, PlacedBox};
use crate::package::content_types::mime;
use crate::package::doc_props::{self, UnitCount};
use crate::package::relationships::types;
use crate::package::xml::XmlWriter;
use crate::package::{
    ContentTypes, PackageTree, Relationships, CONTENT_TYPES_PATH, NS_DRAWINGML,
    NS_MARKUP_COMPAT, NS_PICTURE, NS_RELATIONSHIPS, NS_WORDPROCESSING, NS_WORD_SHAPE,
    NS_WP_DRAWING,
};
use crate::record::PageFidelityRecord;

const DOCUMENT_PATH: &str = "word/document.xml";
const STYLES_PATH: &str = "word/styles.xml";

const PICTURE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const WORD_SHAPE_URI: &str = "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";

/// Smallest page edge Word accepts, in points (0.1 inch).
const MIN_PAGE_EDGE: f64 = 7.2;
/// Largest page edge Word accepts, in points (22 inches, 31680 twips).
const MAX_PAGE_EDGE: f64 = 1584.0;

/// Builds the part tree of a `.docx` package from page records.
#[derive(Debug, Clone)]
pub struct DocxAssembler {
    config: ConversionConfig,
}

impl DocxAssembler {
    /// Create a new DOCX assembler.
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Assemble and verify the package tree.
    pub fn assemble(&self, records: &[PageFidelityRecord]) -> Result<PackageTree> {
        let mut content_types = ContentTypes::standard();
        content_types.add_override(DOCUMENT_PATH, mime::WORD_DOCUMENT);
        content_types.add_override(STYLES_PATH, mime::WORD_STYLES);
        content_types.add_override(doc_props::CORE_PATH, mime::CORE_PROPERTIES);
        content_types.add_override(doc_props::APP_PATH, mime::EXTENDED_PROPERTIES);

        let mut root_rels = Relationships::new("");
        root_rels.add(types::OFFICE_DOCUMENT, DOCUMENT_PATH);
        root_rels.add(types::CORE_PROPERTIES, doc_props::CORE_PATH);
        root_rels.add(types::EXTENDED_PROPERTIES, doc_props::APP_PATH);

        let mut doc_rels = Relationships::new(DOCUMENT_PATH);
        doc_rels.add(types::STYLES, "styles.xml");

        // Encode backgrounds first so the document body can reference them.
        let mut media = Vec::new();
        let mut pages = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let image_rel = match record.background.encode_jpeg(self.config.raster.jpeg_quality) {
                Ok(jpeg) => {
                    let name = media_name(position);
                    let id = doc_rels.add(types::IMAGE, format!("media/{}", name));
                    media.push((format!("word/media/{}", name), jpeg));
                    Some(id)
                },
                Err(e) => {
                    log::warn!(
                        "Page {}: background not embedded, emitting text only: {}",
                        record.index,
                        e
                    );
                    None
                },
            };
            pages.push(SectionPage { record, image_rel });
        }

        let mut tree = PackageTree::new();
        tree.add_xml(CONTENT_TYPES_PATH, content_types.to_xml()?)?;
        tree.add_relationships(&root_rels)?;
        write_doc_props(&mut tree, &self.config, UnitCount::Pages(records.len()))?;
        tree.add_xml(DOCUMENT_PATH, document_xml(&pages)?)?;
        tree.add_relationships(&doc_rels)?;
        tree.add_xml(STYLES_PATH, super::styles::word_styles_xml(&self.config.default_font)?)?;
        for (path, jpeg) in media {
            tree.add_binary(path, jpeg)?;
        }

        tree.verify(&content_types)?;
        log::debug!("Assembled DOCX package: {} sections, {} parts", records.len(), tree.len());
        Ok(tree)
    }
}

struct SectionPage<'a> {
    record: &'a PageFidelityRecord,
    image_rel: Option<String>,
}

fn document_xml(pages: &[SectionPage<'_>]) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start(
        "w:document",
        &[
            ("xmlns:w", NS_WORDPROCESSING),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:wp", NS_WP_DRAWING),
            ("xmlns:a", NS_DRAWINGML),
            ("xmlns:pic", NS_PICTURE),
            ("xmlns:wps", NS_WORD_SHAPE),
            ("xmlns:mc", NS_MARKUP_COMPAT),
        ],
    )?;
    w.start("w:body", &[])?;

    let mut doc_pr_id = 0u32;
    let mut next_id = move || {
        doc_pr_id += 1;
        doc_pr_id
    };

    for (position, page) in pages.iter().enumerate() {
        let record = page.record;
        let mapper = CoordinateMapper::new(record.size);
        let section = section_size(record.size, record.index);
        let (_, sy) = mapper.stretch_factors(section);
        let is_last = position + 1 == pages.len();

        w.start("w:p", &[])?;
        if !is_last {
            w.start("w:pPr", &[])?;
            write_section_properties(&mut w, section)?;
            w.end("w:pPr")?;
        }

        if let Some(rel_id) = &page.image_rel {
            let (cx, cy) = CoordinateMapper::new(section).page_extent();
            let full_page = PlacedBox {
                x: Emu(0),
                y: Emu(0),
                cx,
                cy,
            };
            write_background_anchor(&mut w, next_id(), &full_page, rel_id, position)?;
        }

        for block in &record.text_blocks {
            let placed = mapper.place_stretched(&block.frame, section);
            let size = font_half_points(block.font_size * sy).to_string();
            write_text_box_anchor(&mut w, next_id(), &placed, &block.text, &size)?;
        }

        w.end("w:p")?;

        if is_last {
            write_section_properties(&mut w, section)?;
        }
    }

    if pages.is_empty() {
        write_section_properties(&mut w, PageSize::LETTER)?;
    }

    w.end("w:body")?;
    w.end("w:document")?;
    w.finish()
}

/// Section page size: the source page clamped to the range Word accepts.
/// Content of a clamped page is stretched onto the section.
fn section_size(size: PageSize, page_index: usize) -> PageSize {
    let clamped = PageSize {
        width: size.width.clamp(MIN_PAGE_EDGE, MAX_PAGE_EDGE),
        height: size.height.clamp(MIN_PAGE_EDGE, MAX_PAGE_EDGE),
    };
    if clamped != size {
        log::warn!(
            "Page {}: size {}x{}pt out of range, section clamped to {}x{}pt",
            page_index,
            size.width,
            size.height,
            clamped.width,
            clamped.height
        );
    }
    clamped
}

/// `w:sectPr` with the page size in twips and zero margins.
fn write_section_properties(w: &mut XmlWriter, size: PageSize) -> Result<()> {
    let (width, height) = CoordinateMapper::new(size).page_twips();
    let width = width.to_string();
    let height = height.to_string();

    w.start("w:sectPr", &[])?;
    if size.width > size.height {
        w.empty(
            "w:pgSz",
            &[("w:w", width.as_str()), ("w:h", height.as_str()), ("w:orient", "landscape")],
        )?;
    } else {
        w.empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
    }
    w.empty(
        "w:pgMar",
        &[
            ("w:top", "0"),
            ("w:right", "0"),
            ("w:bottom", "0"),
            ("w:left", "0"),
            ("w:header", "0"),
            ("w:footer", "0"),
            ("w:gutter", "0"),
        ],
    )?;
    w.end("w:sectPr")
}

/// Open `wp:anchor` and write everything up to (not including) `a:graphic`.
fn start_anchor(
    w: &mut XmlWriter,
    id: u32,
    placed: &PlacedBox,
    behind: bool,
    name: &str,
) -> Result<()> {
    let id = id.to_string();
    let (x, y) = (placed.x.to_string(), placed.y.to_string());
    let (cx, cy) = (placed.cx.to_string(), placed.cy.to_string());

    w.start(
        "wp:anchor",
        &[
            ("distT", "0"),
            ("distB", "0"),
            ("distL", "0"),
            ("distR", "0"),
            ("simplePos", "0"),
            ("relativeHeight", id.as_str()),
            ("behindDoc", if behind { "1" } else { "0" }),
            ("locked", "0"),
            ("layoutInCell", "1"),
            ("allowOverlap", "1"),
        ],
    )?;
    w.empty("wp:simplePos", &[("x", "0"), ("y", "0")])?;
    w.start("wp:positionH", &[("relativeFrom", "page")])?;
    w.text_element("wp:posOffset", &[], &x)?;
    w.end("wp:positionH")?;
    w.start("wp:positionV", &[("relativeFrom", "page")])?;
    w.text_element("wp:posOffset", &[], &y)?;
    w.end("wp:positionV")?;
    w.empty("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.empty("wp:effectExtent", &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")])?;
    w.empty("wp:wrapNone", &[])?;
    w.empty("wp:docPr", &[("id", id.as_str()), ("name", name)])?;
    w.empty("wp:cNvGraphicFramePr", &[])?;
    Ok(())
}

fn write_transform(w: &mut XmlWriter, cx: Emu, cy: Emu) -> Result<()> {
    let (cx, cy) = (cx.to_string(), cy.to_string());
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.end("a:xfrm")?;
    w.start("a:prstGeom", &[("prst", "rect")])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")
}

fn write_background_anchor(
    w: &mut XmlWriter,
    id: u32,
    placed: &PlacedBox,
    rel_id: &str,
    position: usize,
) -> Result<()> {
    let name = format!("Background {}", position + 1);
    let file_name = media_name(position);

    w.start("w:r", &[])?;
    w.start("w:drawing", &[])?;
    start_anchor(w, id, placed, true, &name)?;
    w.start("a:graphic", &[])?;
    w.start("a:graphicData", &[("uri", PICTURE_URI)])?;
    w.start("pic:pic", &[])?;

    w.start("pic:nvPicPr", &[])?;
    w.empty("pic:cNvPr", &[("id", "0"), ("name", file_name.as_str())])?;
    w.empty("pic:cNvPicPr", &[])?;
    w.end("pic:nvPicPr")?;

    w.start("pic:blipFill", &[])?;
    w.empty("a:blip", &[("r:embed", rel_id)])?;
    w.start("a:stretch", &[])?;
    w.empty("a:fillRect", &[])?;
    w.end("a:stretch")?;
    w.end("pic:blipFill")?;

    w.start("pic:spPr", &[])?;
    write_transform(w, placed.cx, placed.cy)?;
    w.end("pic:spPr")?;

    w.end("pic:pic")?;
    w.end("a:graphicData")?;
    w.end("a:graphic")?;
    w.end("wp:anchor")?;
    w.end("w:drawing")?;
    w.end("w:r")
}

fn write_text_box_anchor(
    w: &mut XmlWriter,
    id: u32,
    placed: &PlacedBox,
    text: &str,
    half_points: &str,
) -> Result<()> {
    let name = format!("Text Box {}", id);

    w.start("w:r", &[])?;
    w.start("mc:AlternateContent", &[])?;
    w.start("mc:Choice", &[("Requires", "wps")])?;
    w.start("w:drawing", &[])?;
    start_anchor(w, id, placed, false, &name)?;
    w.start("a:graphic", &[])?;
    w.start("a:graphicData", &[("uri", WORD_SHAPE_URI)])?;
    w.start("wps:wsp", &[])?;
    w.empty("wps:cNvSpPr", &[("txBox", "1")])?;

    w.start("wps:spPr", &[])?;
    write_transform(w, placed.cx, placed.cy)?;
    w.empty("a:noFill", &[])?;
    w.start("a:ln", &[])?;
    w.empty("a:noFill", &[])?;
    w.end("a:ln")?;
    w.end("wps:spPr")?;

    w.start("wps:txbx", &[])?;
    w.start("w:txbxContent", &[])?;
    w.start("w:p", &[])?;
    w.start("w:pPr", &[])?;
    w.empty(
        "w:spacing",
        &[("w:before", "0"), ("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
    )?;
    w.end("w:pPr")?;
    w.start("w:r", &[])?;
    w.start("w:rPr", &[])?;
    w.empty("w:sz", &[("w:val", half_points)])?;
    w.empty("w:szCs", &[("w:val", half_points)])?;
    w.end("w:rPr")?;
    w.text_element("w:t", &[("xml:space", "preserve")], text)?;
    w.end("w:r")?;
    w.end("w:p")?;
    w.end("w:txbxContent")?;
    w.end("wps:txbx")?;

    w.start(
        "wps:bodyPr",
        &[
            ("rot", "0"),
            ("wrap", "none"),
            ("lIns", "0"),
            ("tIns", "0"),
            ("rIns", "0"),
            ("bIns", "0"),
            ("anchor", "t"),
        ],
    )?;
    w.empty("a:noAutofit", &[])?;
    w.end("wps:bodyPr")?;

    w.end("wps:wsp")?;
    w.end("a:graphicData")?;
    w.end("a:graphic")?;
    w.end("wp:anchor")?;
    w.end("w:drawing")?;
    w.end("mc:Choice")?;
    w.end("mc:AlternateContent")?;
    w.end("w:r")
}
