//! Per-page fidelity records and the page pipeline that produces them.
//!
//! A [`PageFidelityRecord`] is one page's worth of work: the composed
//! background, the text blocks that were erased from it, and the page size.
//! Records are built independently per page; a page whose render call fails
//! is skipped and reported in [`RecordSet::failures`] while the rest of the
//! document goes ahead.

use crate::config::ConversionConfig;
use crate::error::{Error, Result};
use crate::extract::{TextBlock, TextBlockExtractor};
use crate::geometry::PageSize;
use crate::rendering::{BackgroundComposer, BackgroundImage};
use crate::source::PdfPage;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One source page ready for packaging.
#[derive(Debug, Clone)]
pub struct PageFidelityRecord {
    /// Zero-based index of the source page
    pub index: usize,
    /// Page raster with text areas whited out
    pub background: BackgroundImage,
    /// Editable text, in line order
    pub text_blocks: Vec<TextBlock>,
    /// Media box size
    pub size: PageSize,
}

impl PageFidelityRecord {
    /// Text of all blocks joined with newlines.
    pub fn plain_text(&self) -> String {
        self.text_blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A page that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    /// Zero-based page index
    pub page: usize,
    /// Error description
    pub reason: String,
}

/// Records for every page that converted, plus the pages that did not.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Successful pages, ordered by page index
    pub records: Vec<PageFidelityRecord>,
    /// Skipped pages, ordered by page index
    pub failures: Vec<PageFailure>,
}

impl RecordSet {
    /// Indices of the skipped pages.
    pub fn skipped_pages(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.page).collect()
    }

    /// Whether any page was skipped.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    fn push(&mut self, index: usize, result: Result<PageFidelityRecord>) -> Result<()> {
        match result {
            Ok(record) => self.records.push(record),
            Err(e) if e.is_page_scoped() => {
                log::warn!("Skipping page {}: {}", index, e);
                self.failures.push(PageFailure {
                    page: index,
                    reason: e.to_string(),
                });
            },
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

/// Shared flag checked between pages.
///
/// Clones observe the same flag, so a token handed to another thread can
/// stop a running conversion.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Build the record for a single page.
pub fn build_page_record<P: PdfPage + ?Sized>(
    page: &P,
    index: usize,
    config: &ConversionConfig,
) -> Result<PageFidelityRecord> {
    let size = page.page_size();
    size.validate()?;

    let text_blocks = TextBlockExtractor::new(config.extraction).extract(page);
    let background = BackgroundComposer::new(config.raster).compose(page, &text_blocks, index)?;

    log::debug!("Page {}: {} text blocks", index, text_blocks.len());

    Ok(PageFidelityRecord {
        index,
        background,
        text_blocks,
        size,
    })
}

/// Build records for all pages in order, checking `cancel` before each page.
pub fn build_page_records<P: PdfPage>(
    pages: &[P],
    config: &ConversionConfig,
    cancel: &CancellationToken,
) -> Result<RecordSet> {
    let mut set = RecordSet::default();

    for (index, page) in pages.iter().enumerate() {
        if cancel.is_cancelled() {
            log::info!("Conversion cancelled before page {}", index);
            return Err(Error::Cancelled { completed: index });
        }
        set.push(index, build_page_record(page, index, config))?;
    }

    Ok(set)
}

/// Build records concurrently. Output order follows page index regardless of
/// completion order.
#[cfg(feature = "parallel")]
pub fn build_page_records_parallel<P: PdfPage + Sync>(
    pages: &[P],
    config: &ConversionConfig,
    cancel: &CancellationToken,
) -> Result<RecordSet> {
    use rayon::prelude::*;

    let results: Vec<Option<Result<PageFidelityRecord>>> = pages
        .par_iter()
        .enumerate()
        .map(|(index, page)| {
            if cancel.is_cancelled() {
                None
            } else {
                Some(build_page_record(page, index, config))
            }
        })
        .collect();

    let completed = results.iter().filter(|r| r.is_some()).count();
    if cancel.is_cancelled() {
        log::info!("Conversion cancelled after {} pages", completed);
        return Err(Error::Cancelled { completed });
    }

    let mut set = RecordSet::default();
    for (index, result) in results.into_iter().enumerate() {
        if let Some(result) = result {
            set.push(index, result)?;
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::source::StaticPage;

    fn text_page(text: &str) -> StaticPage {
        StaticPage::new(PageSize::LETTER).with_line(text, Rect::new(72.0, 700.0, 80.0, 12.0))
    }

    #[test]
    fn test_build_single_record() {
        let page = text_page("Hello")
            .with_line("noise", Rect::new(0.0, 0.0, 612.0, 792.0))
            .with_line("World", Rect::new(72.0, 680.0, 80.0, 12.0));
        let record = build_page_record(&page, 0, &ConversionConfig::default()).unwrap();
        assert_eq!(record.text_blocks.len(), 2);
        assert_eq!(record.plain_text(), "Hello\nWorld");
        assert_eq!(record.size, PageSize::LETTER);
        assert_eq!(record.background.width(), 612);
    }

    #[test]
    fn test_partial_failure_recorded() {
        let pages = vec![
            text_page("one"),
            StaticPage::unrenderable(PageSize::LETTER, "render error"),
            text_page("three"),
        ];
        let set = build_page_records(&pages, &ConversionConfig::default(), &CancellationToken::new())
            .unwrap();
        assert_eq!(set.records.len(), 2);
        assert_eq!(set.records[0].index, 0);
        assert_eq!(set.records[1].index, 2);
        assert_eq!(set.skipped_pages(), vec![1]);
        assert!(set.is_partial());
        assert!(set.failures[0].reason.contains("render error"));
    }

    #[test]
    fn test_invalid_page_is_skipped() {
        let pages = vec![
            StaticPage::new(PageSize {
                width: -1.0,
                height: 10.0,
            }),
            text_page("ok"),
        ];
        let set = build_page_records(&pages, &ConversionConfig::default(), &CancellationToken::new())
            .unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.skipped_pages(), vec![0]);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());

        let pages = vec![text_page("one")];
        let err = build_page_records(&pages, &ConversionConfig::default(), &token).unwrap_err();
        assert!(matches!(err, Error::Cancelled { completed: 0 }));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_preserves_order() {
        let pages: Vec<StaticPage> = (0..8).map(|i| text_page(&format!("page {}", i))).collect();
        let set = build_page_records_parallel(
            &pages,
            &ConversionConfig::default(),
            &CancellationToken::new(),
        )
        .unwrap();
        let indices: Vec<usize> = set.records.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
    }
}
