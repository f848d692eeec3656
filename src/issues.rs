//! Structural issue detection.
//!
//! A fixed rule set applied to a [`DocumentState`]. The rule order is the
//! order issues are presented to the caller, so it stays stable: overset
//! text, broken threading, empty frames, spatial overlap, then the softer
//! consistency rules. Absence of data yields an empty list, never an error.

use serde::{Deserialize, Serialize};

use crate::config::InspectorConfig;
use crate::spatial;
use crate::state::DocumentState;

/// The kind of structural problem found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Content does not fit its frame chain
    OversetText,
    /// A threading link points at a missing frame
    BrokenThreading,
    /// White space is far outside normal bounds
    PoorSpacing,
    /// Too many distinct font sizes in use
    InconsistentStyles,
    /// Two frames on one page intersect
    SpatialOverlap,
    /// Text frames with no content
    EmptyFrames,
    /// A valid document with pages but no extracted text
    MissingContent,
}

/// How urgent an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Cosmetic or advisory
    Info,
    /// Should be fixed before hand-off
    Warning,
    /// Blocks correct output
    Critical,
}

/// Where an issue was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLocation {
    /// 1-based page number, if page-specific
    pub page: Option<u32>,
    /// Frame index, if frame-specific
    pub frame: Option<usize>,
}

/// One detected issue with a suggested remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentIssue {
    /// The kind of problem
    pub issue_type: IssueType,
    /// How urgent it is
    pub severity: IssueSeverity,
    /// Human-readable description
    pub description: String,
    /// Where it was found, when localizable
    pub location: Option<IssueLocation>,
    /// Suggested remediation
    pub suggestion: String,
}

/// Apply the issue rule set to a document state with default thresholds.
///
/// Issues are derived, never persisted: callers recompute them on every
/// check. A partially filled state (validity flag and text-frame list at
/// minimum) is acceptable.
pub fn detect_issues(state: &DocumentState) -> Vec<DocumentIssue> {
    detect_issues_with(state, &InspectorConfig::default())
}

/// Apply the issue rule set with caller-supplied thresholds.
pub fn detect_issues_with(state: &DocumentState, config: &InspectorConfig) -> Vec<DocumentIssue> {
    let mut issues = Vec::new();

    if state.has_overset_text {
        issues.push(DocumentIssue {
            issue_type: IssueType::OversetText,
            severity: IssueSeverity::Critical,
            description: "Document contains overset text that is not visible".to_string(),
            location: None,
            suggestion: "Enlarge the affected frames or thread them into additional frames"
                .to_string(),
        });
    }

    if !state.threading_integrity {
        issues.push(DocumentIssue {
            issue_type: IssueType::BrokenThreading,
            severity: IssueSeverity::Critical,
            description: "Text threading is broken between frames".to_string(),
            location: None,
            suggestion: "Re-link the story's frames in reading order".to_string(),
        });
    }

    let empty_count = state
        .text_frames
        .iter()
        .filter(|f| f.content_length == 0)
        .count();
    if empty_count > 0 {
        issues.push(DocumentIssue {
            issue_type: IssueType::EmptyFrames,
            severity: IssueSeverity::Warning,
            description: format!("{} text frame(s) contain no content", empty_count),
            location: None,
            suggestion: "Fill or remove the empty frames".to_string(),
        });
    }

    let overlaps = spatial::find_overlaps(&state.text_frames);
    if !overlaps.is_empty() {
        let (a, b) = overlaps[0];
        let page = state
            .text_frames
            .iter()
            .find(|f| f.index == a)
            .map(|f| f.page);
        issues.push(DocumentIssue {
            issue_type: IssueType::SpatialOverlap,
            severity: IssueSeverity::Warning,
            description: format!(
                "{} pair(s) of frames overlap (first: frames {} and {})",
                overlaps.len(),
                a,
                b
            ),
            location: Some(IssueLocation {
                page,
                frame: Some(a),
            }),
            suggestion: "Reposition or resize the overlapping frames".to_string(),
        });
    }

    // Softer consistency rules run after the four core checks so the
    // presentation order above stays stable.
    issues.extend(consistency_issues(state, config));

    log::debug!("Issue detection found {} issue(s)", issues.len());
    issues
}

fn consistency_issues(state: &DocumentState, config: &InspectorConfig) -> Vec<DocumentIssue> {
    let mut issues = Vec::new();

    if let Some(regions) = &state.metrics.text_regions {
        let mut sizes: Vec<i64> = regions
            .iter()
            .flat_map(|r| r.segments.iter())
            .map(|s| (s.attributes.size * 10.0).round() as i64)
            .collect();
        sizes.sort_unstable();
        sizes.dedup();
        if sizes.len() > config.max_distinct_font_sizes {
            issues.push(DocumentIssue {
                issue_type: IssueType::InconsistentStyles,
                severity: IssueSeverity::Info,
                description: format!("{} distinct font sizes are in use", sizes.len()),
                location: None,
                suggestion: "Consolidate formatting into named styles".to_string(),
            });
        }
    }

    let ratio = state.spatial.margin_usage.whitespace_ratio;
    if state.spatial.page_count > 0 && !state.text_frames.is_empty() {
        if ratio > config.sparse_whitespace_ratio {
            issues.push(DocumentIssue {
                issue_type: IssueType::PoorSpacing,
                severity: IssueSeverity::Info,
                description: format!("Pages are {:.0}% empty", ratio * 100.0),
                location: None,
                suggestion: "Distribute content more evenly or remove pages".to_string(),
            });
        } else if ratio < config.crowded_whitespace_ratio {
            issues.push(DocumentIssue {
                issue_type: IssueType::PoorSpacing,
                severity: IssueSeverity::Info,
                description: format!("Pages are {:.0}% covered by frames", (1.0 - ratio) * 100.0),
                location: None,
                suggestion: "Add breathing room between frames".to_string(),
            });
        }
    }

    if state.is_valid
        && state.spatial.page_count > 0
        && !state.text_frames.is_empty()
        && state.text_content.trim().is_empty()
    {
        issues.push(DocumentIssue {
            issue_type: IssueType::MissingContent,
            severity: IssueSeverity::Warning,
            description: "Document has text frames but no text content".to_string(),
            location: None,
            suggestion: "Place content into the existing frames".to_string(),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::state::{DocumentState, TextFrameInfo};

    fn frame(index: usize, page: u32, content_length: usize) -> TextFrameInfo {
        TextFrameInfo {
            index,
            page,
            bounds: Bounds::new(
                0.0,
                index as f64 * 200.0,
                100.0,
                index as f64 * 200.0 + 100.0,
            ),
            content_length,
            overflows: false,
            next_frame: None,
        }
    }

    #[test]
    fn test_healthy_state_has_no_issues() {
        let mut state = DocumentState::stub();
        state.text_frames = vec![frame(0, 1, 100)];
        state.text_content = "hello".to_string();
        assert!(detect_issues(&state).is_empty());
    }

    #[test]
    fn test_overset_is_first_and_critical() {
        let mut state = DocumentState::stub();
        state.has_overset_text = true;
        state.threading_integrity = false;

        let issues = detect_issues(&state);
        assert_eq!(issues[0].issue_type, IssueType::OversetText);
        assert_eq!(issues[0].severity, IssueSeverity::Critical);
        assert_eq!(issues[1].issue_type, IssueType::BrokenThreading);
    }

    #[test]
    fn test_empty_frames_count_in_description() {
        let mut state = DocumentState::stub();
        state.text_frames = vec![frame(0, 1, 0), frame(1, 1, 0), frame(2, 1, 50)];
        state.text_content = "x".to_string();

        let issues = detect_issues(&state);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::EmptyFrames);
        assert!(issues[0].description.contains('2'));
    }

    #[test]
    fn test_overlapping_frames_reported_with_location() {
        let mut state = DocumentState::stub();
        state.text_frames = vec![frame(0, 1, 10), frame(1, 1, 10)];
        state.text_frames[1].bounds = Bounds::new(50.0, 50.0, 150.0, 150.0);
        state.text_frames[0].bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        state.text_content = "x".to_string();

        let issues = detect_issues(&state);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::SpatialOverlap);
        let location = issues[0].location.unwrap();
        assert_eq!(location.page, Some(1));
        assert_eq!(location.frame, Some(0));
    }

    #[test]
    fn test_missing_content_needs_frames_and_pages() {
        let mut state = DocumentState::stub();
        state.spatial.page_count = 1;
        state.text_frames = vec![frame(0, 1, 0)];
        state.text_content = "   ".to_string();

        let issues = detect_issues(&state);
        let kinds: Vec<IssueType> = issues.iter().map(|i| i.issue_type).collect();
        assert!(kinds.contains(&IssueType::MissingContent));
        assert!(kinds.contains(&IssueType::EmptyFrames));
        // Core rule ordering: empty frames come before the softer rules
        assert_eq!(kinds[0], IssueType::EmptyFrames);
    }
}
