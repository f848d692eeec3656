//! Tolerance-aware comparison of a layout snapshot against a reference.
//!
//! The engine walks the requested check categories, records a [`Deviation`]
//! for every field whose relative deviation exceeds the tolerance, and
//! aggregates the result into a 0-100 score. It performs no mutation and is
//! idempotent: identical inputs always produce identical output.
//!
//! Degenerate cases are rules, not failures: an expected value of zero turns
//! any nonzero actual into a 100% deviation, and a reference snapshot missing
//! a requested category simply contributes no deviations for it.

use std::collections::HashMap;

use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::metrics::{LayoutMetrics, StyleInfo, TextRegion};

bitflags! {
    /// Which snapshot categories a comparison should cover.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CheckCategories: u8 {
        /// Frame count and per-frame position/size
        const FRAMES = 1;
        /// The four margin values
        const MARGINS = 1 << 1;
        /// Style table entries by name
        const STYLES = 1 << 2;
        /// Formatted text regions by frame index
        const TEXT_REGIONS = 1 << 3;
    }
}

impl Default for CheckCategories {
    fn default() -> Self {
        CheckCategories::all()
    }
}

impl CheckCategories {
    /// Build a category set from names such as `"frames"` or
    /// `"text_regions"` (case- and separator-insensitive). Unknown names are
    /// ignored.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut set = CheckCategories::empty();
        for name in names {
            let normalized: String = name
                .as_ref()
                .chars()
                .filter(|c| *c != '_' && *c != '-')
                .collect::<String>()
                .to_lowercase();
            match normalized.as_str() {
                "frames" => set |= CheckCategories::FRAMES,
                "margins" => set |= CheckCategories::MARGINS,
                "styles" => set |= CheckCategories::STYLES,
                "textregions" => set |= CheckCategories::TEXT_REGIONS,
                other => log::warn!("Ignoring unknown check category '{}'", other),
            }
        }
        set
    }
}

/// Settings for one comparison run.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Maximum relative deviation before a field is flagged
    pub tolerance: f64,
    /// Categories to check
    pub categories: CheckCategories,
    /// Acceptable substitute font families, keyed by reference family.
    ///
    /// A current family found in its reference family's substitute list does
    /// not count as a deviation.
    pub font_fallbacks: HashMap<String, Vec<String>>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            categories: CheckCategories::all(),
            font_fallbacks: HashMap::new(),
        }
    }
}

impl CompareOptions {
    /// Set the tolerance fraction.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Restrict the checked categories.
    pub fn with_categories(mut self, categories: CheckCategories) -> Self {
        self.categories = categories;
        self
    }

    /// Allow `substitutes` to stand in for `family` without a deviation.
    pub fn allow_font_substitutes<I, S>(mut self, family: &str, substitutes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.font_fallbacks.insert(
            family.to_string(),
            substitutes.into_iter().map(Into::into).collect(),
        );
        self
    }
}

/// The category a deviation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationKind {
    /// Frame count or geometry
    Frames,
    /// Margin values
    Margins,
    /// Style table
    Styles,
    /// Formatted text regions
    TextRegions,
}

/// One field that differs from the reference beyond tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    /// Category the field belongs to
    #[serde(rename = "type")]
    pub kind: DeviationKind,
    /// Path of the deviating field, e.g. `frames[2].x`
    pub field: String,
    /// Reference value
    pub expected: Value,
    /// Observed value
    pub actual: Value,
    /// Relative deviation as a rounded percentage
    #[serde(rename = "deviation")]
    pub deviation_pct: u32,
}

/// Outcome of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// True iff no deviations were recorded
    #[serde(rename = "match")]
    pub matches: bool,
    /// 100 minus the mean deviation percentage, floored at 0
    pub score: u8,
    /// Every recorded deviation, in check order
    pub deviations: Vec<Deviation>,
}

/// Compare a current snapshot against a reference snapshot.
///
/// # Examples
///
/// ```
/// use layout_oxide::compare::{compare, CompareOptions};
/// use layout_oxide::metrics::{Frame, LayoutMetrics, Margins};
///
/// let reference = LayoutMetrics {
///     frames: vec![Frame::new(10.0, 10.0, 200.0, 100.0)],
///     margins: Margins::uniform(36.0),
///     columns: 1,
///     styles: None,
///     text_regions: None,
/// };
/// let mut current = reference.clone();
/// current.frames[0].x = 10.3; // 3% off, inside the default 5% tolerance
///
/// let result = compare(&reference, &current, &CompareOptions::default());
/// assert!(result.matches);
/// ```
pub fn compare(
    reference: &LayoutMetrics,
    current: &LayoutMetrics,
    options: &CompareOptions,
) -> ComparisonResult {
    let mut deviations = Vec::new();

    if options.categories.contains(CheckCategories::FRAMES) {
        compare_frames(reference, current, options, &mut deviations);
    }
    if options.categories.contains(CheckCategories::MARGINS) {
        compare_margins(reference, current, options, &mut deviations);
    }
    if options.categories.contains(CheckCategories::STYLES) {
        compare_styles(reference, current, options, &mut deviations);
    }
    if options.categories.contains(CheckCategories::TEXT_REGIONS) {
        compare_text_regions(reference, current, options, &mut deviations);
    }

    let score = if deviations.is_empty() {
        100
    } else {
        let mean = deviations
            .iter()
            .map(|d| d.deviation_pct as f64)
            .sum::<f64>()
            / deviations.len() as f64;
        (100.0 - mean).max(0.0).round() as u8
    };

    log::debug!(
        "Comparison: {} deviation(s), score {}",
        deviations.len(),
        score
    );

    ComparisonResult {
        matches: deviations.is_empty(),
        score,
        deviations,
    }
}

/// Relative deviation of `actual` from `expected`.
///
/// A zero expected value makes any nonzero actual a 100% deviation, so the
/// division can never blow up.
fn relative_deviation(expected: f64, actual: f64) -> f64 {
    if expected == 0.0 {
        if actual == 0.0 {
            0.0
        } else {
            1.0
        }
    } else {
        ((actual - expected) / expected).abs()
    }
}

fn record_numeric(
    deviations: &mut Vec<Deviation>,
    options: &CompareOptions,
    kind: DeviationKind,
    field: String,
    expected: f64,
    actual: f64,
) {
    let deviation = relative_deviation(expected, actual);
    if deviation > options.tolerance {
        deviations.push(Deviation {
            kind,
            field,
            expected: json!(expected),
            actual: json!(actual),
            deviation_pct: (deviation * 100.0).round() as u32,
        });
    }
}

fn compare_frames(
    reference: &LayoutMetrics,
    current: &LayoutMetrics,
    options: &CompareOptions,
    deviations: &mut Vec<Deviation>,
) {
    if reference.frames.len() != current.frames.len() {
        // Per-frame checks are meaningless when the join key is off
        deviations.push(Deviation {
            kind: DeviationKind::Frames,
            field: "frames.count".to_string(),
            expected: json!(reference.frames.len()),
            actual: json!(current.frames.len()),
            deviation_pct: 100,
        });
        return;
    }

    for (i, (expected, actual)) in reference.frames.iter().zip(&current.frames).enumerate() {
        record_numeric(
            deviations,
            options,
            DeviationKind::Frames,
            format!("frames[{}].x", i),
            expected.x,
            actual.x,
        );
        record_numeric(
            deviations,
            options,
            DeviationKind::Frames,
            format!("frames[{}].y", i),
            expected.y,
            actual.y,
        );
        record_numeric(
            deviations,
            options,
            DeviationKind::Frames,
            format!("frames[{}].width", i),
            expected.width,
            actual.width,
        );
        record_numeric(
            deviations,
            options,
            DeviationKind::Frames,
            format!("frames[{}].height", i),
            expected.height,
            actual.height,
        );
    }
}

fn compare_margins(
    reference: &LayoutMetrics,
    current: &LayoutMetrics,
    options: &CompareOptions,
    deviations: &mut Vec<Deviation>,
) {
    let pairs = [
        ("margins.top", reference.margins.top, current.margins.top),
        ("margins.left", reference.margins.left, current.margins.left),
        (
            "margins.bottom",
            reference.margins.bottom,
            current.margins.bottom,
        ),
        (
            "margins.right",
            reference.margins.right,
            current.margins.right,
        ),
    ];
    for (field, expected, actual) in pairs {
        record_numeric(
            deviations,
            options,
            DeviationKind::Margins,
            field.to_string(),
            expected,
            actual,
        );
    }
}

fn compare_styles(
    reference: &LayoutMetrics,
    current: &LayoutMetrics,
    options: &CompareOptions,
    deviations: &mut Vec<Deviation>,
) {
    // Reference without a style table: nothing to compare against
    let reference_styles = match &reference.styles {
        Some(styles) => styles,
        None => return,
    };

    let current_styles: IndexMap<&str, &StyleInfo> = current
        .styles
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|s| (s.name.as_str(), s))
        .collect();

    for style in reference_styles {
        match current_styles.get(style.name.as_str()) {
            None => deviations.push(Deviation {
                kind: DeviationKind::Styles,
                field: format!("styles.{}", style.name),
                expected: json!(style.name),
                actual: Value::Null,
                deviation_pct: 100,
            }),
            Some(found) => record_numeric(
                deviations,
                options,
                DeviationKind::Styles,
                format!("styles.{}.font_size", style.name),
                style.font_size,
                found.font_size,
            ),
        }
    }
}

fn compare_text_regions(
    reference: &LayoutMetrics,
    current: &LayoutMetrics,
    options: &CompareOptions,
    deviations: &mut Vec<Deviation>,
) {
    let reference_regions = match &reference.text_regions {
        Some(regions) => regions,
        None => return,
    };

    let current_regions: HashMap<usize, &TextRegion> = current
        .text_regions
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|r| (r.frame_index, r))
        .collect();

    for region in reference_regions {
        let found = match current_regions.get(&region.frame_index) {
            Some(found) => *found,
            None => {
                deviations.push(Deviation {
                    kind: DeviationKind::TextRegions,
                    field: format!("text_regions[{}]", region.frame_index),
                    expected: json!(region.frame_index),
                    actual: Value::Null,
                    deviation_pct: 100,
                });
                continue;
            }
        };

        record_numeric(
            deviations,
            options,
            DeviationKind::TextRegions,
            format!("text_regions[{}].segments.count", region.frame_index),
            region.segments.len() as f64,
            found.segments.len() as f64,
        );

        for (i, (expected, actual)) in region.segments.iter().zip(&found.segments).enumerate() {
            let path = |attr: &str| {
                format!(
                    "text_regions[{}].segments[{}].{}",
                    region.frame_index, i, attr
                )
            };
            let exp = &expected.attributes;
            let act = &actual.attributes;

            record_numeric(
                deviations,
                options,
                DeviationKind::TextRegions,
                path("size"),
                exp.size,
                act.size,
            );
            record_numeric(
                deviations,
                options,
                DeviationKind::TextRegions,
                path("leading"),
                exp.leading,
                act.leading,
            );
            record_numeric(
                deviations,
                options,
                DeviationKind::TextRegions,
                path("first_line_indent"),
                exp.first_line_indent,
                act.first_line_indent,
            );
            record_numeric(
                deviations,
                options,
                DeviationKind::TextRegions,
                path("left_indent"),
                exp.left_indent,
                act.left_indent,
            );

            if exp.alignment != act.alignment {
                deviations.push(Deviation {
                    kind: DeviationKind::TextRegions,
                    field: path("alignment"),
                    expected: json!(exp.alignment),
                    actual: json!(act.alignment),
                    deviation_pct: 100,
                });
            }

            if !family_matches(&exp.font_family, &act.font_family, options) {
                deviations.push(Deviation {
                    kind: DeviationKind::TextRegions,
                    field: path("font_family"),
                    expected: json!(exp.font_family),
                    actual: json!(act.font_family),
                    deviation_pct: 100,
                });
            }
        }
    }
}

/// Exact family match, or a substitute the caller declared acceptable.
fn family_matches(expected: &str, actual: &str, options: &CompareOptions) -> bool {
    if expected == actual {
        return true;
    }
    options
        .font_fallbacks
        .get(expected)
        .map(|subs| subs.iter().any(|s| s == actual))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{
        Alignment, Frame, Margins, StyleInfo, TextRegion, TextSegment, VisualAttributes,
    };

    fn base_metrics() -> LayoutMetrics {
        LayoutMetrics {
            frames: vec![Frame::new(0.0, 0.0, 100.0, 50.0)],
            margins: Margins::new(100.0, 36.0, 36.0, 36.0),
            columns: 1,
            styles: Some(vec![StyleInfo {
                name: "Body".to_string(),
                font_size: 11.0,
                font_family: "Helvetica".to_string(),
            }]),
            text_regions: Some(vec![TextRegion {
                frame_index: 0,
                segments: vec![TextSegment {
                    text: "hello".to_string(),
                    attributes: attrs("Helvetica"),
                }],
            }]),
        }
    }

    fn attrs(family: &str) -> VisualAttributes {
        VisualAttributes {
            font_family: family.to_string(),
            font_style: "Regular".to_string(),
            size: 11.0,
            leading: 13.2,
            alignment: Alignment::Left,
            first_line_indent: 0.0,
            left_indent: 0.0,
        }
    }

    #[test]
    fn test_snapshot_matches_itself() {
        let snapshot = base_metrics();
        let result = compare(&snapshot, &snapshot, &CompareOptions::default());
        assert!(result.matches);
        assert_eq!(result.score, 100);
        assert!(result.deviations.is_empty());
    }

    #[test]
    fn test_zero_expected_position_is_full_deviation() {
        let reference = base_metrics();
        let mut current = base_metrics();
        current.frames[0].x = 6.0;

        let result = compare(&reference, &current, &CompareOptions::default());
        assert!(!result.matches);
        let dev = &result.deviations[0];
        assert_eq!(dev.field, "frames[0].x");
        assert_eq!(dev.deviation_pct, 100);
    }

    #[test]
    fn test_margin_within_tolerance_passes() {
        let reference = base_metrics();
        let mut current = base_metrics();
        current.margins.top = 104.0; // 4% off against 5% tolerance

        let result = compare(&reference, &current, &CompareOptions::default());
        assert!(result.matches);
    }

    #[test]
    fn test_margin_beyond_tolerance_is_recorded() {
        let reference = base_metrics();
        let mut current = base_metrics();
        current.margins.top = 110.0;

        let result = compare(&reference, &current, &CompareOptions::default());
        assert!(!result.matches);
        assert_eq!(result.deviations[0].field, "margins.top");
        assert_eq!(result.deviations[0].deviation_pct, 10);
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_frame_count_mismatch_short_circuits() {
        let reference = base_metrics();
        let mut current = base_metrics();
        current.frames.push(Frame::new(500.0, 500.0, 10.0, 10.0));

        let result = compare(&reference, &current, &CompareOptions::default());
        let frame_devs: Vec<&Deviation> = result
            .deviations
            .iter()
            .filter(|d| d.kind == DeviationKind::Frames)
            .collect();
        assert_eq!(frame_devs.len(), 1);
        assert_eq!(frame_devs[0].field, "frames.count");
        assert_eq!(frame_devs[0].deviation_pct, 100);
    }

    #[test]
    fn test_missing_style_is_full_deviation() {
        let reference = base_metrics();
        let mut current = base_metrics();
        current.styles = Some(vec![]);

        let result = compare(&reference, &current, &CompareOptions::default());
        let dev = result
            .deviations
            .iter()
            .find(|d| d.kind == DeviationKind::Styles)
            .unwrap();
        assert_eq!(dev.field, "styles.Body");
        assert_eq!(dev.deviation_pct, 100);
    }

    #[test]
    fn test_reference_without_styles_degrades_gracefully() {
        let mut reference = base_metrics();
        reference.styles = None;
        let current = base_metrics();

        let result = compare(&reference, &current, &CompareOptions::default());
        assert!(result
            .deviations
            .iter()
            .all(|d| d.kind != DeviationKind::Styles));
    }

    #[test]
    fn test_font_fallback_suppresses_deviation() {
        let reference = base_metrics();
        let mut current = base_metrics();
        if let Some(regions) = &mut current.text_regions {
            regions[0].segments[0].attributes.font_family = "Arial".to_string();
        }

        let strict = compare(&reference, &current, &CompareOptions::default());
        assert!(!strict.matches);

        let options = CompareOptions::default()
            .allow_font_substitutes("Helvetica", ["Arial", "Helvetica Neue"]);
        let lenient = compare(&reference, &current, &options);
        assert!(lenient.matches);
    }

    #[test]
    fn test_alignment_mismatch_is_exact() {
        let reference = base_metrics();
        let mut current = base_metrics();
        if let Some(regions) = &mut current.text_regions {
            regions[0].segments[0].attributes.alignment = Alignment::Justify;
        }

        let result = compare(&reference, &current, &CompareOptions::default());
        let dev = result
            .deviations
            .iter()
            .find(|d| d.field.ends_with("alignment"))
            .unwrap();
        assert_eq!(dev.deviation_pct, 100);
    }

    #[test]
    fn test_segment_count_mismatch_is_proportional() {
        let reference = base_metrics();
        let mut current = base_metrics();
        if let Some(regions) = &mut current.text_regions {
            let extra = TextSegment {
                text: "extra".to_string(),
                attributes: attrs("Helvetica"),
            };
            regions[0].segments.push(extra);
        }

        let result = compare(&reference, &current, &CompareOptions::default());
        let dev = result
            .deviations
            .iter()
            .find(|d| d.field.ends_with("segments.count"))
            .unwrap();
        // One extra segment against a reference of one: 100%
        assert_eq!(dev.deviation_pct, 100);
    }

    #[test]
    fn test_missing_region_is_full_deviation() {
        let reference = base_metrics();
        let mut current = base_metrics();
        current.text_regions = Some(vec![]);

        let result = compare(&reference, &current, &CompareOptions::default());
        let dev = result
            .deviations
            .iter()
            .find(|d| d.kind == DeviationKind::TextRegions)
            .unwrap();
        assert_eq!(dev.field, "text_regions[0]");
        assert_eq!(dev.deviation_pct, 100);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut reference = base_metrics();
        reference.styles = None;
        reference.text_regions = None;
        reference.margins = Margins::uniform(10.0);
        let mut current = reference.clone();
        current.margins = Margins::uniform(100.0); // 900% off on every side

        let result = compare(&reference, &current, &CompareOptions::default());
        assert_eq!(result.score, 0);
        assert!(!result.matches);
    }

    #[test]
    fn test_category_selection_limits_checks() {
        let reference = base_metrics();
        let mut current = base_metrics();
        current.margins.top = 500.0;
        current.frames[0].width = 500.0;

        let options =
            CompareOptions::default().with_categories(CheckCategories::FRAMES);
        let result = compare(&reference, &current, &options);
        assert!(result
            .deviations
            .iter()
            .all(|d| d.kind == DeviationKind::Frames));
    }

    #[test]
    fn test_from_names_parses_all_categories() {
        let set = CheckCategories::from_names(&["frames", "MARGINS", "textRegions"]);
        assert!(set.contains(CheckCategories::FRAMES));
        assert!(set.contains(CheckCategories::MARGINS));
        assert!(set.contains(CheckCategories::TEXT_REGIONS));
        assert!(!set.contains(CheckCategories::STYLES));
    }
}
