//! Configuration for PDF to Office conversion.
//!
//! The extraction thresholds and the font-size ratio are empirical values.
//! They are exposed here so callers can tune visual fidelity without
//! touching the assemblers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lines taller than this (in points) are treated as selection noise.
pub const DEFAULT_MAX_BLOCK_HEIGHT: f64 = 100.0;

/// Lines wider than this (in points) are treated as selection noise.
pub const DEFAULT_MAX_BLOCK_WIDTH: f64 = 2000.0;

/// Font size as a fraction of the selection line height.
pub const DEFAULT_FONT_SIZE_RATIO: f64 = 0.65;

/// JPEG quality for page backgrounds (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Longest edge of a background raster in pixels.
pub const DEFAULT_MAX_RASTER_DIMENSION: u32 = 2560;

/// Typeface used when none is configured.
pub const DEFAULT_FONT: &str = "Arial";

/// Text block extraction thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum accepted line height in points
    pub max_block_height: f64,
    /// Maximum accepted line width in points
    pub max_block_width: f64,
    /// Derived font size = line height * ratio
    pub font_size_ratio: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_block_height: DEFAULT_MAX_BLOCK_HEIGHT,
            max_block_width: DEFAULT_MAX_BLOCK_WIDTH,
            font_size_ratio: DEFAULT_FONT_SIZE_RATIO,
        }
    }
}

impl ExtractionConfig {
    /// Set the noise thresholds.
    pub fn with_limits(mut self, max_height: f64, max_width: f64) -> Self {
        self.max_block_height = max_height;
        self.max_block_width = max_width;
        self
    }

    /// Set the font-size ratio.
    pub fn with_font_size_ratio(mut self, ratio: f64) -> Self {
        self.font_size_ratio = ratio;
        self
    }
}

/// Background raster options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Pixels per PDF point before the dimension cap is applied
    pub scale: f64,
    /// Longest edge in pixels; larger canvases are scaled down uniformly
    pub max_dimension: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            max_dimension: DEFAULT_MAX_RASTER_DIMENSION,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl RasterConfig {
    /// Render at a given DPI (72 DPI = one pixel per point).
    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            scale: dpi as f64 / 72.0,
            ..Default::default()
        }
    }

    /// Set JPEG quality, clamped to 1-100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the longest-edge cap.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }
}

/// Document properties written to `docProps/core.xml` and `docProps/app.xml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Author written as `dc:creator`
    pub creator: Option<String>,
    /// Application name in `docProps/app.xml`
    pub application: String,
    /// Creation timestamp; `None` keeps archives byte-reproducible
    pub created: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: None,
            creator: None,
            application: format!("{} {}", crate::NAME, crate::VERSION),
            created: None,
        }
    }
}

impl DocumentMetadata {
    /// Create metadata with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the creator.
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the creation timestamp.
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

/// Complete conversion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Text block extraction thresholds
    pub extraction: ExtractionConfig,
    /// Background raster options
    pub raster: RasterConfig,
    /// Package metadata
    pub metadata: DocumentMetadata,
    /// Typeface named in the styles part and the deck theme
    pub default_font: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            raster: RasterConfig::default(),
            metadata: DocumentMetadata::default(),
            default_font: DEFAULT_FONT.to_string(),
        }
    }
}

impl ConversionConfig {
    /// Create configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction thresholds.
    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    /// Set raster options.
    pub fn with_raster(mut self, raster: RasterConfig) -> Self {
        self.raster = raster;
        self
    }

    /// Set package metadata.
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the default typeface.
    pub fn with_default_font(mut self, font: impl Into<String>) -> Self {
        self.default_font = font.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.max_block_height, 100.0);
        assert_eq!(config.max_block_width, 2000.0);
        assert_eq!(config.font_size_ratio, 0.65);
    }

    #[test]
    fn test_raster_quality_bounds() {
        assert_eq!(RasterConfig::default().with_jpeg_quality(0).jpeg_quality, 1);
        assert_eq!(RasterConfig::default().with_jpeg_quality(150).jpeg_quality, 100);
    }

    #[test]
    fn test_raster_dpi() {
        let config = RasterConfig::with_dpi(144);
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.jpeg_quality, DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn test_metadata_builder() {
        let meta = DocumentMetadata::new().title("Report").creator("Ops");
        assert_eq!(meta.title.as_deref(), Some("Report"));
        assert_eq!(meta.creator.as_deref(), Some("Ops"));
        assert!(meta.created.is_none());
        assert!(meta.application.starts_with("pdf_office"));
    }

    #[test]
    fn test_default_font() {
        assert_eq!(ConversionConfig::default().default_font, "Arial");
        let config = ConversionConfig::new().with_default_font("Calibri");
        assert_eq!(config.default_font, "Calibri");
    }

    #[test]
    fn test_config_serde() {
        let config = ConversionConfig::new()
            .with_raster(RasterConfig::with_dpi(144))
            .with_metadata(DocumentMetadata::new().title("Q3"));
        let json = serde_json::to_string(&config).unwrap();
        let back: ConversionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
