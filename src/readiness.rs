//! Pre-flight readiness checks for editing operations.
//!
//! Advisory only: a blocked verdict never prevents anything by itself, it
//! tells the calling agent what to fix before asking the host to perform an
//! operation. Operations are an enumerated type rather than a string switch,
//! so extending the rule table is a compile-time-checked change.

use serde::{Deserialize, Serialize};

use crate::state::DocumentState;

/// An editing operation the caller intends to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOperation {
    /// Place or append text into a frame
    AddText,
    /// Link two text frames into a thread
    ThreadFrames,
    /// Apply a paragraph style to existing text
    ApplyParagraphStyle,
    /// An operation without specific rules; only the universal
    /// precondition applies
    Other(String),
}

impl EditOperation {
    /// Parse an operation name, case-insensitively and ignoring `_`/`-`
    /// separators, so `"addText"`, `"add_text"`, and `"ADD-TEXT"` all map to
    /// the same variant. Unknown names land in [`EditOperation::Other`].
    pub fn parse(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "addtext" => EditOperation::AddText,
            "threadframes" | "threadtextframes" => EditOperation::ThreadFrames,
            "applyparagraphstyle" => EditOperation::ApplyParagraphStyle,
            _ => EditOperation::Other(name.to_string()),
        }
    }
}

/// Verdict of a readiness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    /// True iff no blockers were found
    pub ready: bool,
    /// What prevents the operation right now
    pub blockers: Vec<String>,
    /// How to clear the blockers
    pub recommendations: Vec<String>,
}

/// Check whether the document is in shape for `operation`.
///
/// The universal precondition is document validity; per-operation rules are
/// layered on top of it.
pub fn check_readiness(operation: &EditOperation, state: &DocumentState) -> ReadinessReport {
    let mut blockers = Vec::new();
    let mut recommendations = Vec::new();

    if !state.is_valid {
        blockers.push("No valid document is open".to_string());
        recommendations.push("Open a document and re-run state analysis".to_string());
    }

    match operation {
        EditOperation::AddText => {
            if state.has_overset_text {
                blockers.push("Document has overset text".to_string());
                recommendations
                    .push("Resolve the overset text before adding more content".to_string());
            }
        }
        EditOperation::ThreadFrames => {
            if state.text_frames.len() < 2 {
                blockers.push(format!(
                    "Threading requires at least 2 text frames, found {}",
                    state.text_frames.len()
                ));
                recommendations.push("Create a second text frame first".to_string());
            }
        }
        EditOperation::ApplyParagraphStyle => {
            if state.text_content.trim().is_empty() {
                blockers.push("Document has no text content to style".to_string());
                recommendations.push("Add text before applying paragraph styles".to_string());
            }
        }
        EditOperation::Other(name) => {
            log::debug!("No specific readiness rules for operation '{}'", name);
        }
    }

    ReadinessReport {
        ready: blockers.is_empty(),
        blockers,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::state::TextFrameInfo;

    #[test]
    fn test_parse_is_case_and_separator_insensitive() {
        assert_eq!(EditOperation::parse("addText"), EditOperation::AddText);
        assert_eq!(EditOperation::parse("ADD_TEXT"), EditOperation::AddText);
        assert_eq!(
            EditOperation::parse("thread-frames"),
            EditOperation::ThreadFrames
        );
        assert_eq!(
            EditOperation::parse("export_pdf"),
            EditOperation::Other("export_pdf".to_string())
        );
    }

    #[test]
    fn test_invalid_document_blocks_everything() {
        let mut state = DocumentState::stub();
        state.is_valid = false;

        let report = check_readiness(&EditOperation::Other("export".to_string()), &state);
        assert!(!report.ready);
        assert_eq!(report.blockers.len(), 1);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[test]
    fn test_overset_blocks_add_text() {
        let mut state = DocumentState::stub();
        state.has_overset_text = true;

        let report = check_readiness(&EditOperation::AddText, &state);
        assert!(!report.ready);
        assert!(report.blockers[0].contains("overset"));
    }

    #[test]
    fn test_threading_needs_two_frames() {
        let mut state = DocumentState::stub();
        state.text_frames.push(TextFrameInfo {
            index: 0,
            page: 1,
            bounds: Bounds::new(0.0, 0.0, 100.0, 100.0),
            content_length: 0,
            overflows: false,
            next_frame: None,
        });

        let report = check_readiness(&EditOperation::ThreadFrames, &state);
        assert!(!report.ready);
        assert!(report.blockers[0].contains("at least 2"));
    }

    #[test]
    fn test_style_on_empty_text_is_blocked() {
        let state = DocumentState::stub();
        let report = check_readiness(&EditOperation::ApplyParagraphStyle, &state);
        assert!(!report.ready);
    }

    #[test]
    fn test_ready_when_no_rules_fire() {
        let mut state = DocumentState::stub();
        state.text_content = "body copy".to_string();
        let report = check_readiness(&EditOperation::AddText, &state);
        assert!(report.ready);
        assert!(report.blockers.is_empty());
    }
}
