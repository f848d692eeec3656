//! Document state assembly.
//!
//! A [`DocumentState`] is the full health picture of a document at one
//! instant: raw facts from the extraction boundary, the derived spatial
//! analysis, a document-type label, and the detected issues. States are
//! produced fresh on every check and never mutated in place, only replaced.

use serde::{Deserialize, Serialize};

use crate::classify::{classify, DocumentShape, DocumentType};
use crate::config::InspectorConfig;
use crate::geometry::Bounds;
use crate::issues::{detect_issues_with, DocumentIssue};
use crate::metrics::{LayoutMetrics, Margins};
use crate::spatial::{analyze_spatial, SpatialAnalysis};

/// One page of the document as reported by the extraction boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-based page number
    pub number: u32,
    /// Full page bounds
    pub bounds: Bounds,
    /// Page margins
    pub margins: Margins,
}

impl PageInfo {
    /// The page rectangle inset by its margins.
    pub fn content_bounds(&self) -> Bounds {
        Bounds::new(
            self.bounds.min_y() + self.margins.top,
            self.bounds.min_x() + self.margins.left,
            self.bounds.max_y() - self.margins.bottom,
            self.bounds.max_x() - self.margins.right,
        )
    }
}

/// One text frame as reported by the extraction boundary.
///
/// `next_frame` is the frame's explicit threading successor. Carrying the
/// real link (instead of inferring that the next index continues the story)
/// keeps out-of-order chains intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFrameInfo {
    /// Snapshot-stable frame index
    pub index: usize,
    /// 1-based page the frame sits on
    pub page: u32,
    /// Frame bounds in page-local coordinates
    pub bounds: Bounds,
    /// Character count of the frame's content
    pub content_length: usize,
    /// Whether the frame's content oversets
    pub overflows: bool,
    /// Index of the threading successor, if any
    pub next_frame: Option<usize>,
}

/// Raw facts the extraction boundary reports for a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFacts {
    /// Whether the host considers the document open and addressable
    pub is_valid: bool,
    /// Pages in order
    pub pages: Vec<PageInfo>,
    /// Text frames in snapshot order
    pub text_frames: Vec<TextFrameInfo>,
    /// Full extracted text
    pub text_content: String,
    /// Host-reported overset indicator
    pub has_overset_text: bool,
    /// Host-reported threading integrity
    pub threading_integrity: bool,
    /// Layout snapshot captured alongside the facts
    pub metrics: LayoutMetrics,
}

/// Aggregated health picture of a document at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    /// Whether the document is open and addressable
    pub is_valid: bool,
    /// Pages in order
    pub pages: Vec<PageInfo>,
    /// Text frames in snapshot order
    pub text_frames: Vec<TextFrameInfo>,
    /// Full extracted text
    pub text_content: String,
    /// Whether any story oversets
    pub has_overset_text: bool,
    /// Whether threading links are intact
    pub threading_integrity: bool,
    /// Coarse document-type label
    pub document_type: DocumentType,
    /// Derived spatial facts
    pub spatial: SpatialAnalysis,
    /// Issues found by the rule set, in presentation order
    pub issues: Vec<DocumentIssue>,
    /// The layout snapshot the state was built from
    pub metrics: LayoutMetrics,
}

impl DocumentState {
    /// Build a full state from raw facts.
    ///
    /// Runs the spatial analyzer, classifies the document, and applies the
    /// issue rule set, in that order.
    pub fn from_facts(facts: DocumentFacts, config: &InspectorConfig) -> Self {
        let spatial = analyze_spatial(&facts.pages, &facts.text_frames, config);
        let has_threading = facts.text_frames.iter().any(|f| f.next_frame.is_some());
        let document_type = classify(DocumentShape::new(
            facts.pages.len(),
            facts.text_frames.len(),
            has_threading,
        ));

        let mut state = Self {
            is_valid: facts.is_valid,
            pages: facts.pages,
            text_frames: facts.text_frames,
            text_content: facts.text_content,
            has_overset_text: facts.has_overset_text,
            threading_integrity: facts.threading_integrity,
            document_type,
            spatial,
            issues: Vec::new(),
            metrics: facts.metrics,
        };
        state.issues = detect_issues_with(&state, config);
        state
    }

    /// A valid, contentless state for tests.
    #[cfg(test)]
    pub(crate) fn stub() -> Self {
        Self {
            is_valid: true,
            pages: Vec::new(),
            text_frames: Vec::new(),
            text_content: String::new(),
            has_overset_text: false,
            threading_integrity: true,
            document_type: DocumentType::Empty,
            spatial: SpatialAnalysis::empty(),
            issues: Vec::new(),
            metrics: LayoutMetrics {
                frames: Vec::new(),
                margins: Margins::uniform(0.0),
                columns: 1,
                styles: None,
                text_regions: None,
            },
        }
    }
}
