//! Page records to PPTX package assembly.
//!
//! One slide per page. The background goes into the slide's `p:bg` fill,
//! text blocks become borderless auto-fit text boxes. A presentation has a
//! single slide size, taken from the first page; pages of another size are
//! stretched onto it.

use super::{media_name, write_doc_props};
use crate::config::ConversionConfig;
use crate::error::Result;
use crate::geometry::mapper::{font_centipoints, points_to_emu};
use crate::geometry::{CoordinateMapper, PageSize};
use crate::package::content_types::mime;
use crate::package::doc_props::{self, UnitCount};
use crate::package::relationships::types;
use crate::package::xml::XmlWriter;
use crate::package::{
    ContentTypes, PackageTree, Relationships, CONTENT_TYPES_PATH, NS_DRAWINGML, NS_PRESENTATION,
    NS_RELATIONSHIPS,
};
use crate::record::PageFidelityRecord;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const MASTER_PATH: &str = "ppt/slideMasters/slideMaster1.xml";
const LAYOUT_PATH: &str = "ppt/slideLayouts/slideLayout1.xml";
const THEME_PATH: &str = "ppt/theme/theme1.xml";

/// Smallest slide edge PowerPoint accepts, in points (1 inch).
const MIN_SLIDE_EDGE: f64 = 72.0;
/// Largest slide edge PowerPoint accepts, in points (56 inches).
const MAX_SLIDE_EDGE: f64 = 4032.0;

const FIRST_SLIDE_ID: u32 = 256;
const MASTER_ID: &str = "2147483648";
const LAYOUT_ID: &str = "2147483649";

/// Portrait notes page, 7.5 x 10 inches.
const NOTES_CX: &str = "6858000";
const NOTES_CY: &str = "9144000";

/// Builds the part tree of a `.pptx` package from page records.
#[derive(Debug, Clone)]
pub struct PptxAssembler {
    config: ConversionConfig,
}

impl PptxAssembler {
    /// Create a new PPTX assembler.
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Assemble and verify the package tree.
    pub fn assemble(&self, records: &[PageFidelityRecord]) -> Result<PackageTree> {
        let slide_size = slide_size(records);

        let mut content_types = ContentTypes::standard();
        content_types.add_override(PRESENTATION_PATH, mime::PRESENTATION);
        content_types.add_override(MASTER_PATH, mime::SLIDE_MASTER);
        content_types.add_override(LAYOUT_PATH, mime::SLIDE_LAYOUT);
        content_types.add_override(THEME_PATH, mime::THEME);
        for position in 0..records.len() {
            content_types.add_override(&slide_path(position), mime::SLIDE);
        }
        content_types.add_override(doc_props::CORE_PATH, mime::CORE_PROPERTIES);
        content_types.add_override(doc_props::APP_PATH, mime::EXTENDED_PROPERTIES);

        let mut root_rels = Relationships::new("");
        root_rels.add(types::OFFICE_DOCUMENT, PRESENTATION_PATH);
        root_rels.add(types::CORE_PROPERTIES, doc_props::CORE_PATH);
        root_rels.add(types::EXTENDED_PROPERTIES, doc_props::APP_PATH);

        let mut presentation_rels = Relationships::new(PRESENTATION_PATH);
        let master_rel = presentation_rels.add(types::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
        presentation_rels.add(types::THEME, "theme/theme1.xml");
        let slide_rels: Vec<String> = (0..records.len())
            .map(|position| {
                presentation_rels.add(types::SLIDE, format!("slides/slide{}.xml", position + 1))
            })
            .collect();

        let mut master_rels = Relationships::new(MASTER_PATH);
        let layout_rel = master_rels.add(types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
        master_rels.add(types::THEME, "../theme/theme1.xml");

        let mut layout_rels = Relationships::new(LAYOUT_PATH);
        layout_rels.add(types::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");

        let mut tree = PackageTree::new();
        tree.add_xml(CONTENT_TYPES_PATH, content_types.to_xml()?)?;
        tree.add_relationships(&root_rels)?;
        write_doc_props(&mut tree, &self.config, UnitCount::Slides(records.len()))?;
        tree.add_xml(
            PRESENTATION_PATH,
            presentation_xml(&master_rel, &slide_rels, slide_size)?,
        )?;
        tree.add_relationships(&presentation_rels)?;
        tree.add_xml(MASTER_PATH, master_xml(&layout_rel)?)?;
        tree.add_relationships(&master_rels)?;
        tree.add_xml(LAYOUT_PATH, layout_xml()?)?;
        tree.add_relationships(&layout_rels)?;
        tree.add_xml(THEME_PATH, super::styles::theme_xml(&self.config.default_font)?)?;

        let mut media = Vec::new();
        for (position, record) in records.iter().enumerate() {
            let path = slide_path(position);
            let mut rels = Relationships::new(path.as_str());
            rels.add(types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");

            let image_rel = match record.background.encode_jpeg(self.config.raster.jpeg_quality) {
                Ok(jpeg) => {
                    let name = media_name(position);
                    media.push((format!("ppt/media/{}", name), jpeg));
                    Some(rels.add(types::IMAGE, format!("../media/{}", name)))
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

            tree.add_xml(path, slide_xml(record, image_rel.as_deref(), slide_size)?)?;
            tree.add_relationships(&rels)?;
        }
        for (path, jpeg) in media {
            tree.add_binary(path, jpeg)?;
        }

        tree.verify(&content_types)?;
        log::debug!(
            "Assembled PPTX package: {} slides at {}x{}pt, {} parts",
            records.len(),
            slide_size.width,
            slide_size.height,
            tree.len()
        );
        Ok(tree)
    }
}

/// Slide size: the first page, clamped to the range PowerPoint accepts.
/// An empty deck uses US Letter.
pub fn slide_size(records: &[PageFidelityRecord]) -> PageSize {
    let first = records.first().map(|r| r.size).unwrap_or(PageSize::LETTER);
    let clamped = PageSize {
        width: first.width.clamp(MIN_SLIDE_EDGE, MAX_SLIDE_EDGE),
        height: first.height.clamp(MIN_SLIDE_EDGE, MAX_SLIDE_EDGE),
    };
    if clamped != first {
        log::warn!(
            "Slide size {}x{}pt out of range, clamped to {}x{}pt",
            first.width,
            first.height,
            clamped.width,
            clamped.height
        );
    }
    clamped
}

fn slide_path(position: usize) -> String {
    format!("ppt/slides/slide{}.xml", position + 1)
}

fn presentation_xml(master_rel: &str, slide_rels: &[String], size: PageSize) -> Result<String> {
    let cx = points_to_emu(size.width).to_string();
    let cy = points_to_emu(size.height).to_string();

    let mut w = XmlWriter::new()?;
    w.start(
        "p:presentation",
        &[
            ("xmlns:a", NS_DRAWINGML),
            ("xmlns:r", NS_RELATIONSHIPS),
            ("xmlns:p", NS_PRESENTATION),
            ("saveSubsetFonts", "1"),
        ],
    )?;

    w.start("p:sldMasterIdLst", &[])?;
    w.empty("p:sldMasterId", &[("id", MASTER_ID), ("r:id", master_rel)])?;
    w.end("p:sldMasterIdLst")?;

    if !slide_rels.is_empty() {
        w.start("p:sldIdLst", &[])?;
        for (position, rel) in slide_rels.iter().enumerate() {
            let id = (FIRST_SLIDE_ID + position as u32).to_string();
            w.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
        }
        w.end("p:sldIdLst")?;
    }

    w.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.empty("p:notesSz", &[("cx", NOTES_CX), ("cy", NOTES_CY)])?;
    w.end("p:presentation")?;
    w.finish()
}

fn start_part(w: &mut XmlWriter, root: &str, extra: &[(&str, &str)]) -> Result<()> {
    let mut attrs = vec![
        ("xmlns:a", NS_DRAWINGML),
        ("xmlns:r", NS_RELATIONSHIPS),
        ("xmlns:p", NS_PRESENTATION),
    ];
    attrs.extend_from_slice(extra);
    w.start(root, &attrs)
}

/// Opening of `p:spTree` with the mandatory group properties.
fn start_shape_tree(w: &mut XmlWriter) -> Result<()> {
    w.start("p:spTree", &[])?;
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;
    w.start("p:grpSpPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    w.end("a:xfrm")?;
    w.end("p:grpSpPr")
}

fn master_xml(layout_rel: &str) -> Result<String> {
    let mut w = XmlWriter::new()?;
    start_part(&mut w, "p:sldMaster", &[])?;

    w.start("p:cSld", &[])?;
    w.start("p:bg", &[])?;
    w.start("p:bgRef", &[("idx", "1001")])?;
    w.empty("a:schemeClr", &[("val", "bg1")])?;
    w.end("p:bgRef")?;
    w.end("p:bg")?;
    start_shape_tree(&mut w)?;
    w.end("p:spTree")?;
    w.end("p:cSld")?;

    w.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;

    w.start("p:sldLayoutIdLst", &[])?;
    w.empty("p:sldLayoutId", &[("id", LAYOUT_ID), ("r:id", layout_rel)])?;
    w.end("p:sldLayoutIdLst")?;

    w.start("p:txStyles", &[])?;
    w.empty("p:titleStyle", &[])?;
    w.empty("p:bodyStyle", &[])?;
    w.empty("p:otherStyle", &[])?;
    w.end("p:txStyles")?;

    w.end("p:sldMaster")?;
    w.finish()
}

fn layout_xml() -> Result<String> {
    let mut w = XmlWriter::new()?;
    start_part(&mut w, "p:sldLayout", &[("type", "blank"), ("preserve", "1")])?;
    w.start("p:cSld", &[("name", "Blank")])?;
    start_shape_tree(&mut w)?;
    w.end("p:spTree")?;
    w.end("p:cSld")?;
    write_master_color_mapping(&mut w)?;
    w.end("p:sldLayout")?;
    w.finish()
}

fn write_master_color_mapping(w: &mut XmlWriter) -> Result<()> {
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")
}

fn slide_xml(
    record: &PageFidelityRecord,
    image_rel: Option<&str>,
    slide_size: PageSize,
) -> Result<String> {
    let mapper = CoordinateMapper::new(record.size);
    let (_, sy) = mapper.stretch_factors(slide_size);

    let mut w = XmlWriter::new()?;
    start_part(&mut w, "p:sld", &[])?;
    w.start("p:cSld", &[])?;

    if let Some(rel_id) = image_rel {
        w.start("p:bg", &[])?;
        w.start("p:bgPr", &[])?;
        w.start("a:blipFill", &[("dpi", "0"), ("rotWithShape", "1")])?;
        w.empty("a:blip", &[("r:embed", rel_id)])?;
        w.empty("a:srcRect", &[])?;
        w.start("a:stretch", &[])?;
        w.empty("a:fillRect", &[])?;
        w.end("a:stretch")?;
        w.end("a:blipFill")?;
        w.empty("a:effectLst", &[])?;
        w.end("p:bgPr")?;
        w.end("p:bg")?;
    }

    start_shape_tree(&mut w)?;
    for (i, block) in record.text_blocks.iter().enumerate() {
        // id 1 is the shape tree itself
        let id = (i + 2).to_string();
        let name = format!("TextBox {}", i + 1);
        let placed = mapper.place_stretched(&block.frame, slide_size);
        let (x, y) = (placed.x.to_string(), placed.y.to_string());
        let (cx, cy) = (placed.cx.to_string(), placed.cy.to_string());
        let size = font_centipoints(block.font_size * sy).to_string();

        w.start("p:sp", &[])?;
        w.start("p:nvSpPr", &[])?;
        w.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
        w.empty("p:cNvSpPr", &[("txBox", "1")])?;
        w.empty("p:nvPr", &[])?;
        w.end("p:nvSpPr")?;

        w.start("p:spPr", &[])?;
        w.start("a:xfrm", &[])?;
        w.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
        w.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        w.end("a:xfrm")?;
        w.start("a:prstGeom", &[("prst", "rect")])?;
        w.empty("a:avLst", &[])?;
        w.end("a:prstGeom")?;
        w.empty("a:noFill", &[])?;
        w.end("p:spPr")?;

        w.start("p:txBody", &[])?;
        w.start(
            "a:bodyPr",
            &[
                ("wrap", "none"),
                ("lIns", "0"),
                ("tIns", "0"),
                ("rIns", "0"),
                ("bIns", "0"),
                ("rtlCol", "0"),
                ("anchor", "t"),
            ],
        )?;
        w.empty("a:spAutoFit", &[])?;
        w.end("a:bodyPr")?;
        w.empty("a:lstStyle", &[])?;
        w.start("a:p", &[])?;
        w.start("a:r", &[])?;
        w.empty("a:rPr", &[("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")])?;
        w.text_element("a:t", &[], &block.text)?;
        w.end("a:r")?;
        w.end("a:p")?;
        w.end("p:txBody")?;
        w.end("p:sp")?;
    }
    w.end("p:spTree")?;
    w.end("p:cSld")?;

    write_master_color_mapping(&mut w)?;
    w.end("p:sld")?;
    w.finish()
}
