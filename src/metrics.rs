//! Passive data model describing a layout snapshot.
//!
//! A [`LayoutMetrics`] value is an immutable picture of a document's layout
//! at one instant: frames, margins, column count, and optionally the style
//! table and per-frame formatted text regions. Frame indices are stable
//! within one snapshot and are the join key the comparison engine uses to
//! line up reference and current frames.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::DocumentFacts;

/// A rectangular frame as captured in a layout snapshot.
///
/// Position and size are in points, page-local. `content_length` is the
/// character count of the frame's story portion; `overflows` is the host's
/// overset indicator for this frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// X position of the frame origin
    pub x: f64,
    /// Y position of the frame origin
    pub y: f64,
    /// Frame width
    pub width: f64,
    /// Frame height
    pub height: f64,
    /// Whether the frame holds any text
    #[serde(default)]
    pub has_text: bool,
    /// Character count of the frame's content
    #[serde(default)]
    pub content_length: usize,
    /// Whether the frame's content oversets
    #[serde(default)]
    pub overflows: bool,
}

impl Frame {
    /// Create an empty frame at the given position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            has_text: false,
            content_length: 0,
            overflows: false,
        }
    }

    /// Mark the frame as holding `content_length` characters of text.
    pub fn with_text(mut self, content_length: usize) -> Self {
        self.has_text = true;
        self.content_length = content_length;
        self
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: f64,
    /// Left margin
    pub left: f64,
    /// Bottom margin
    pub bottom: f64,
    /// Right margin
    pub right: f64,
}

impl Margins {
    /// Create margins from the four values.
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Equal margins on all four sides.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

/// One entry of the document's style table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleInfo {
    /// Style name, unique within a snapshot
    pub name: String,
    /// Point size the style applies
    pub font_size: f64,
    /// Font family the style applies
    pub font_family: String,
}

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Ragged-right
    Left,
    /// Centered
    Center,
    /// Ragged-left
    Right,
    /// Justified
    Justify,
}

/// Visual attributes of one formatted text segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualAttributes {
    /// Font family name
    pub font_family: String,
    /// Font style name ("Regular", "Bold", ...)
    pub font_style: String,
    /// Point size
    pub size: f64,
    /// Leading in points
    pub leading: f64,
    /// Paragraph alignment
    pub alignment: Alignment,
    /// First-line indent in points
    pub first_line_indent: f64,
    /// Left indent in points
    pub left_indent: f64,
}

/// A run of text sharing one set of visual attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    /// The segment's text
    pub text: String,
    /// Formatting applied to the segment
    pub attributes: VisualAttributes,
}

/// The formatted content of one frame, segment by segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    /// Index of the frame this region belongs to (snapshot-stable join key)
    pub frame_index: usize,
    /// Formatted segments in story order
    pub segments: Vec<TextSegment>,
}

/// Snapshot of a layout at one instant.
///
/// `styles` and `text_regions` are optional because the extraction boundary
/// only materializes them when the caller asks for style- or region-level
/// comparison; their absence means "no comparable data", not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Frames in snapshot order
    pub frames: Vec<Frame>,
    /// Document margins
    pub margins: Margins,
    /// Column count
    pub columns: u32,
    /// Style table, if captured
    #[serde(default)]
    pub styles: Option<Vec<StyleInfo>>,
    /// Per-frame formatted text, if captured
    #[serde(default)]
    pub text_regions: Option<Vec<TextRegion>>,
}

/// Which pages a metric extraction should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSelector {
    /// Every page of the document
    All,
    /// A single 1-based page
    Page(u32),
    /// An inclusive 1-based page range
    Range(u32, u32),
}

impl Default for PageSelector {
    fn default() -> Self {
        PageSelector::All
    }
}

/// The external fact-extraction boundary.
///
/// Implementations talk to the live document (through whatever scripting
/// host drives it) and return already-structured records. This crate treats
/// the trait as a black box: a failure here is the one genuine I/O error in
/// the system and propagates verbatim as [`crate::Error::Extraction`].
pub trait MetricsSource {
    /// Capture a fresh [`LayoutMetrics`] snapshot for the selected pages.
    fn fetch_layout_metrics(&self, selector: &PageSelector) -> Result<LayoutMetrics>;

    /// Fetch the raw document facts the state analyzer consumes.
    fn fetch_document_facts(&self) -> Result<DocumentFacts>;
}
