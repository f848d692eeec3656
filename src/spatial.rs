//! Spatial analysis of pages and text frames.
//!
//! Derives aggregate spatial facts from the raw frame/page records: per-page
//! frame distribution, average text density, the threading graph, frame
//! overlaps, and available-space estimation via rectangle subtraction.

use serde::{Deserialize, Serialize};

use crate::config::InspectorConfig;
use crate::geometry::Bounds;
use crate::metrics::Margins;
use crate::state::{PageInfo, TextFrameInfo};

/// How frames are distributed over one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDistribution {
    /// 1-based page number
    pub page: u32,
    /// Number of text frames on the page
    pub frame_count: usize,
    /// Summed content length of the page's frames
    pub text_density: f64,
    /// Whether any frame on the page oversets
    pub has_overflow: bool,
}

/// Averaged margins and white-space usage across the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginUsage {
    /// Margins averaged over all pages
    pub average_margins: Margins,
    /// Fraction of page area not covered by text frames, averaged over pages
    pub whitespace_ratio: f64,
}

/// One edge of the threading graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadingConnection {
    /// Source frame index
    pub from_frame: usize,
    /// Target frame index
    pub to_frame: usize,
    /// Page of the source frame
    pub from_page: u32,
    /// Page of the target frame, 0 when the target does not exist
    pub to_page: u32,
    /// False when the recorded successor is missing from the snapshot
    pub valid: bool,
}

/// A rectangle of unoccupied page area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceRegion {
    /// Page the region sits on
    pub page: u32,
    /// Region bounds, normalized so `top <= bottom`
    pub bounds: Bounds,
    /// Region area in square points
    pub area: f64,
    /// Whether the region is large and square enough to host a text frame
    pub optimal_for_text: bool,
}

/// Aggregate spatial facts for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialAnalysis {
    /// Total page count
    pub page_count: usize,
    /// Mean per-page text density (0 for an empty document)
    pub average_text_density: f64,
    /// Per-page frame distribution, in page order
    pub frame_distribution: Vec<FrameDistribution>,
    /// Averaged margins and white-space ratio
    pub margin_usage: MarginUsage,
    /// Threading graph edges, in source-frame order
    pub threading: Vec<ThreadingConnection>,
    /// Free regions across all pages, sorted by descending area
    pub free_regions: Vec<SpaceRegion>,
}

impl SpatialAnalysis {
    /// Analysis of a document with no pages and no frames.
    pub fn empty() -> Self {
        Self {
            page_count: 0,
            average_text_density: 0.0,
            frame_distribution: Vec::new(),
            margin_usage: MarginUsage {
                average_margins: Margins::uniform(0.0),
                whitespace_ratio: 1.0,
            },
            threading: Vec::new(),
            free_regions: Vec::new(),
        }
    }
}

/// Derive the full spatial analysis for a set of pages and frames.
pub fn analyze_spatial(
    pages: &[PageInfo],
    frames: &[TextFrameInfo],
    config: &InspectorConfig,
) -> SpatialAnalysis {
    if pages.is_empty() {
        return SpatialAnalysis {
            threading: threading_map(frames),
            ..SpatialAnalysis::empty()
        };
    }

    let mut distribution = Vec::with_capacity(pages.len());
    let mut free_regions = Vec::new();
    let mut whitespace_sum = 0.0;

    for page in pages {
        let on_page: Vec<&TextFrameInfo> =
            frames.iter().filter(|f| f.page == page.number).collect();

        let density: f64 = on_page.iter().map(|f| f.content_length as f64).sum();
        distribution.push(FrameDistribution {
            page: page.number,
            frame_count: on_page.len(),
            text_density: density,
            has_overflow: on_page.iter().any(|f| f.overflows),
        });

        let free = free_regions_for_page(page, &on_page, config);
        let page_area = page.bounds.area();
        if page_area > 0.0 {
            let free_area: f64 = free.iter().map(|r| r.area).sum();
            whitespace_sum += (free_area / page_area).min(1.0);
        } else {
            whitespace_sum += 1.0;
        }
        free_regions.extend(free);
    }

    // Free regions across pages reported largest-first
    free_regions.sort_by(|a, b| {
        b.area
            .partial_cmp(&a.area)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let page_count = pages.len();
    let total_density: f64 = distribution.iter().map(|d| d.text_density).sum();

    let n = page_count as f64;
    let average_margins = Margins::new(
        pages.iter().map(|p| p.margins.top).sum::<f64>() / n,
        pages.iter().map(|p| p.margins.left).sum::<f64>() / n,
        pages.iter().map(|p| p.margins.bottom).sum::<f64>() / n,
        pages.iter().map(|p| p.margins.right).sum::<f64>() / n,
    );

    let analysis = SpatialAnalysis {
        page_count,
        average_text_density: total_density / n,
        frame_distribution: distribution,
        margin_usage: MarginUsage {
            average_margins,
            whitespace_ratio: whitespace_sum / n,
        },
        threading: threading_map(frames),
        free_regions,
    };

    log::debug!(
        "Spatial analysis: {} pages, avg density {:.1}, {} threading edges, {} free regions",
        analysis.page_count,
        analysis.average_text_density,
        analysis.threading.len(),
        analysis.free_regions.len()
    );

    analysis
}

/// Build the threading graph from the frames' explicit successor links.
///
/// An edge whose recorded successor is absent from the snapshot is kept but
/// marked invalid, so a broken chain is visible rather than silently dropped.
pub fn threading_map(frames: &[TextFrameInfo]) -> Vec<ThreadingConnection> {
    let mut connections = Vec::new();
    for frame in frames {
        let next = match frame.next_frame {
            Some(next) => next,
            None => continue,
        };
        match frames.iter().find(|f| f.index == next) {
            Some(target) => connections.push(ThreadingConnection {
                from_frame: frame.index,
                to_frame: next,
                from_page: frame.page,
                to_page: target.page,
                valid: true,
            }),
            None => {
                log::warn!(
                    "Frame {} links to missing successor {}",
                    frame.index,
                    next
                );
                connections.push(ThreadingConnection {
                    from_frame: frame.index,
                    to_frame: next,
                    from_page: frame.page,
                    to_page: 0,
                    valid: false,
                });
            }
        }
    }
    connections
}

/// Find all pairs of frames on the same page whose bounds intersect.
///
/// Pairwise per page, O(n²) in the page's frame count; layout documents keep
/// per-page frame counts small enough that this is not worth an index.
pub fn find_overlaps(frames: &[TextFrameInfo]) -> Vec<(usize, usize)> {
    let mut overlaps = Vec::new();
    for (i, a) in frames.iter().enumerate() {
        for b in frames.iter().skip(i + 1) {
            if a.page == b.page && a.bounds.intersects(&b.bounds) {
                overlaps.push((a.index, b.index));
            }
        }
    }
    overlaps
}

/// Compute one page's free regions by subtracting every occupied frame from
/// the page's content rectangle (the page inset by its margins).
fn free_regions_for_page(
    page: &PageInfo,
    frames: &[&TextFrameInfo],
    config: &InspectorConfig,
) -> Vec<SpaceRegion> {
    let content = page.content_bounds();
    if content.width() <= 0.0 || content.height() <= 0.0 {
        return Vec::new();
    }

    let mut free = vec![content];
    for frame in frames {
        let mut next = Vec::with_capacity(free.len());
        for rect in &free {
            next.extend(rect.subtract(&frame.bounds));
        }
        next.retain(|b| b.area() >= config.min_region_area);
        free = next;
        if free.is_empty() {
            break;
        }
    }

    let mut regions: Vec<SpaceRegion> = free
        .into_iter()
        .map(|bounds| {
            let area = bounds.area();
            let optimal_for_text = area >= config.optimal_text_area
                && bounds.width() >= config.optimal_text_side
                && bounds.height() >= config.optimal_text_side;
            SpaceRegion {
                page: page.number,
                bounds,
                area,
                optimal_for_text,
            }
        })
        .collect();

    regions.sort_by(|a, b| {
        b.area
            .partial_cmp(&a.area)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize, page: u32, bounds: Bounds) -> TextFrameInfo {
        TextFrameInfo {
            index,
            page,
            bounds,
            content_length: 100,
            overflows: false,
            next_frame: None,
        }
    }

    fn page(number: u32) -> PageInfo {
        PageInfo {
            number,
            bounds: Bounds::new(0.0, 0.0, 792.0, 612.0),
            margins: Margins::uniform(36.0),
        }
    }

    #[test]
    fn test_empty_document_density_is_zero() {
        let analysis = analyze_spatial(&[], &[], &InspectorConfig::default());
        assert_eq!(analysis.page_count, 0);
        assert_eq!(analysis.average_text_density, 0.0);
    }

    #[test]
    fn test_distribution_groups_by_page() {
        let frames = vec![
            frame(0, 1, Bounds::new(0.0, 0.0, 100.0, 100.0)),
            frame(1, 1, Bounds::new(200.0, 200.0, 300.0, 300.0)),
            frame(2, 2, Bounds::new(0.0, 0.0, 100.0, 100.0)),
        ];
        let pages = vec![page(1), page(2)];
        let analysis = analyze_spatial(&pages, &frames, &InspectorConfig::default());

        assert_eq!(analysis.frame_distribution.len(), 2);
        assert_eq!(analysis.frame_distribution[0].frame_count, 2);
        assert_eq!(analysis.frame_distribution[0].text_density, 200.0);
        assert_eq!(analysis.frame_distribution[1].frame_count, 1);
        assert_eq!(analysis.average_text_density, 150.0);
    }

    #[test]
    fn test_threading_follows_explicit_links() {
        // Frames threaded out of index order: 0 -> 2 -> 1
        let mut frames = vec![
            frame(0, 1, Bounds::new(0.0, 0.0, 100.0, 100.0)),
            frame(1, 2, Bounds::new(0.0, 0.0, 100.0, 100.0)),
            frame(2, 1, Bounds::new(200.0, 200.0, 300.0, 300.0)),
        ];
        frames[0].next_frame = Some(2);
        frames[2].next_frame = Some(1);

        let map = threading_map(&frames);
        assert_eq!(map.len(), 2);
        assert_eq!((map[0].from_frame, map[0].to_frame), (0, 2));
        assert_eq!((map[1].from_frame, map[1].to_frame), (2, 1));
        assert_eq!(map[1].to_page, 2);
        assert!(map.iter().all(|c| c.valid));
    }

    #[test]
    fn test_dangling_link_is_invalid_edge() {
        let mut frames = vec![frame(0, 1, Bounds::new(0.0, 0.0, 100.0, 100.0))];
        frames[0].next_frame = Some(7);

        let map = threading_map(&frames);
        assert_eq!(map.len(), 1);
        assert!(!map[0].valid);
    }

    #[test]
    fn test_overlaps_skip_different_pages() {
        let frames = vec![
            frame(0, 1, Bounds::new(0.0, 0.0, 100.0, 100.0)),
            frame(1, 2, Bounds::new(0.0, 0.0, 100.0, 100.0)),
        ];
        assert!(find_overlaps(&frames).is_empty());
    }

    #[test]
    fn test_overlaps_detect_same_page_intersection() {
        let frames = vec![
            frame(0, 1, Bounds::new(100.0, 0.0, 0.0, 50.0)),
            frame(1, 1, Bounds::new(100.0, 40.0, 0.0, 90.0)),
            frame(2, 1, Bounds::new(100.0, 200.0, 0.0, 250.0)),
        ];
        assert_eq!(find_overlaps(&frames), vec![(0, 1)]);
    }

    #[test]
    fn test_free_regions_sorted_and_disjoint_from_frames() {
        let p = page(1);
        let frames = vec![frame(0, 1, Bounds::new(36.0, 36.0, 400.0, 300.0))];
        let analysis = analyze_spatial(&[p], &frames, &InspectorConfig::default());

        assert!(!analysis.free_regions.is_empty());
        for pair in analysis.free_regions.windows(2) {
            assert!(pair[0].area >= pair[1].area);
        }
        for region in &analysis.free_regions {
            let clipped = region.bounds.intersection(&frames[0].bounds);
            assert!(clipped.map(|c| c.area() < 1e-9).unwrap_or(true));
        }
    }

    #[test]
    fn test_whitespace_ratio_for_empty_page_is_the_content_area() {
        let analysis = analyze_spatial(&[page(1)], &[], &InspectorConfig::default());
        let content_ratio = analysis.margin_usage.whitespace_ratio;
        // Content area of a 612x792 page with 36pt margins over the page area
        let expected = (540.0 * 720.0) / (612.0 * 792.0);
        assert!((content_ratio - expected).abs() < 1e-9);
    }
}
