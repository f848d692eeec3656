//! Coarse document-type classification.
//!
//! A strict decision list over page count, frame count, and threading
//! presence. Rule order is load-bearing: boundary shapes (for example five
//! pages, two frames, no threading) must fall through the magazine rule and
//! land on `Report`, so reordering changes observable results.

use serde::{Deserialize, Serialize};

/// The facts the classifier looks at.
///
/// Kept as its own small type (rather than a partial document state) so
/// callers state exactly what they know and no optional-field defaulting is
/// needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentShape {
    /// Total pages in the document
    pub page_count: usize,
    /// Total text frames in the document
    pub frame_count: usize,
    /// Whether any frame-to-frame threading exists
    pub has_threading: bool,
}

impl DocumentShape {
    /// Create a shape from the three classification facts.
    pub fn new(page_count: usize, frame_count: usize, has_threading: bool) -> Self {
        Self {
            page_count,
            frame_count,
            has_threading,
        }
    }
}

/// Coarse document-type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// No pages
    Empty,
    /// Single page, at most two frames
    Brochure,
    /// Two to four pages with several frames
    Newsletter,
    /// Five to twenty pages with threading
    Magazine,
    /// Few frames over multiple pages
    Report,
    /// More than twenty pages
    Book,
    /// Nothing matched
    Unknown,
}

/// Classify a document shape.
///
/// First matching rule wins; see the module docs for why the order matters.
///
/// # Examples
///
/// ```
/// use layout_oxide::classify::{classify, DocumentShape, DocumentType};
///
/// assert_eq!(classify(DocumentShape::new(0, 0, false)), DocumentType::Empty);
/// assert_eq!(classify(DocumentShape::new(8, 12, true)), DocumentType::Magazine);
/// assert_eq!(classify(DocumentShape::new(2, 2, false)), DocumentType::Report);
/// ```
pub fn classify(shape: DocumentShape) -> DocumentType {
    let DocumentShape {
        page_count,
        frame_count,
        has_threading,
    } = shape;

    if page_count == 0 {
        DocumentType::Empty
    } else if page_count == 1 && frame_count <= 2 {
        DocumentType::Brochure
    } else if page_count > 1 && page_count <= 4 && frame_count > 3 {
        DocumentType::Newsletter
    } else if page_count > 4 && page_count <= 20 && has_threading {
        DocumentType::Magazine
    } else if page_count > 20 {
        DocumentType::Book
    } else if page_count >= 2 && frame_count <= 3 {
        DocumentType::Report
    } else {
        DocumentType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_pages_is_empty() {
        for frames in [0, 1, 10] {
            for threading in [false, true] {
                assert_eq!(
                    classify(DocumentShape::new(0, frames, threading)),
                    DocumentType::Empty
                );
            }
        }
    }

    #[test]
    fn test_single_page_few_frames_is_brochure() {
        assert_eq!(
            classify(DocumentShape::new(1, 2, false)),
            DocumentType::Brochure
        );
    }

    #[test]
    fn test_few_pages_many_frames_is_newsletter() {
        assert_eq!(
            classify(DocumentShape::new(4, 4, false)),
            DocumentType::Newsletter
        );
    }

    #[test]
    fn test_threaded_mid_length_is_magazine() {
        assert_eq!(
            classify(DocumentShape::new(5, 2, true)),
            DocumentType::Magazine
        );
    }

    #[test]
    fn test_long_document_is_book() {
        assert_eq!(
            classify(DocumentShape::new(21, 1, false)),
            DocumentType::Book
        );
    }

    #[test]
    fn test_unthreaded_mid_length_falls_through_to_report() {
        // Five pages, two frames, no threading: the magazine rule requires
        // threading, so this lands on report further down the list.
        assert_eq!(
            classify(DocumentShape::new(5, 2, false)),
            DocumentType::Report
        );
    }

    #[test]
    fn test_two_pages_two_frames_is_report() {
        assert_eq!(
            classify(DocumentShape::new(2, 2, false)),
            DocumentType::Report
        );
    }

    #[test]
    fn test_unmatched_shape_is_unknown() {
        // Six pages, many frames, no threading matches nothing above report,
        // and report needs at most three frames.
        assert_eq!(
            classify(DocumentShape::new(6, 10, false)),
            DocumentType::Unknown
        );
    }
}
