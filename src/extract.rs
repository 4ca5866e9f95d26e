//! Text block extraction from line-level selection geometry.
//!
//! PDF has no paragraph model, so the converter works at line granularity:
//! every selection line the engine reports becomes one editable text box,
//! unless it is empty or its box fails the size sanity check. Selection APIs
//! occasionally return page-sized boxes for whitespace runs; those are noise,
//! not text, and are dropped silently.

use crate::config::ExtractionConfig;
use crate::geometry::Rect;
use crate::source::{LineSelection, PdfPage};
use serde::{Deserialize, Serialize};

/// A line of text with its page-space frame and derived font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Trimmed, non-empty text
    pub text: String,
    /// Frame in PDF points, origin bottom-left
    pub frame: Rect,
    /// Font size in points, derived from the frame height
    pub font_size: f64,
}

/// Why a selection line was not turned into a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Only whitespace
    Empty,
    /// Non-finite or non-positive frame
    Degenerate,
    /// Taller or wider than the configured limits
    Oversized,
}

/// Counters for one page's extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Lines turned into blocks
    pub accepted: usize,
    /// Whitespace-only lines
    pub empty: usize,
    /// Lines dropped by the size filter (including degenerate frames)
    pub noise: usize,
}

/// Turns an engine's line selections into [`TextBlock`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBlockExtractor {
    config: ExtractionConfig,
}

impl TextBlockExtractor {
    /// Create an extractor with the given thresholds.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract the text blocks of a page, in the engine's line order.
    ///
    /// A page without text yields an empty vector, not an error.
    pub fn extract<P: PdfPage + ?Sized>(&self, page: &P) -> Vec<TextBlock> {
        self.extract_lines(page.line_selections()).0
    }

    /// Filter and convert raw selections, returning blocks plus counters.
    pub fn extract_lines(
        &self,
        lines: impl IntoIterator<Item = LineSelection>,
    ) -> (Vec<TextBlock>, ExtractionStats) {
        let mut stats = ExtractionStats::default();
        let mut blocks = Vec::new();

        for line in lines {
            match self.to_block(line) {
                Ok(block) => {
                    stats.accepted += 1;
                    blocks.push(block);
                },
                Err(Rejection::Empty) => stats.empty += 1,
                Err(reason) => {
                    log::trace!("Dropping selection line as noise: {:?}", reason);
                    stats.noise += 1;
                },
            }
        }

        (blocks, stats)
    }

    /// Convert a single selection line.
    pub fn to_block(&self, line: LineSelection) -> Result<TextBlock, Rejection> {
        let text = line.text.trim();
        if text.is_empty() {
            return Err(Rejection::Empty);
        }

        let frame = line.bounds;
        if !frame.is_finite() || frame.width <= 0.0 || frame.height <= 0.0 {
            return Err(Rejection::Degenerate);
        }
        if frame.height > self.config.max_block_height || frame.width > self.config.max_block_width
        {
            return Err(Rejection::Oversized);
        }

        Ok(TextBlock {
            text: text.to_string(),
            frame,
            font_size: frame.height * self.config.font_size_ratio,
        })
    }
}

/// Extract text blocks with default thresholds.
pub fn extract_text_blocks<P: PdfPage + ?Sized>(page: &P) -> Vec<TextBlock> {
    TextBlockExtractor::default().extract(page)
}
