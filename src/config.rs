//! Configuration for layout inspection.

/// Tunable thresholds for the spatial analyzer and issue detector.
///
/// Defaults are calibrated for letter/A4-sized pages measured in points.
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Default tolerance fraction for reference comparison.
    pub default_tolerance: f64,

    /// Minimum area (in square points) below which a free-space sliver is
    /// discarded during rectangle subtraction.
    pub min_region_area: f64,

    /// Minimum area for a free region to be flagged as usable for a new
    /// text frame.
    pub optimal_text_area: f64,

    /// Minimum width or height for a free region to be flagged as usable
    /// for a new text frame.
    pub optimal_text_side: f64,

    /// White-space ratio above which a document is flagged as sparse.
    pub sparse_whitespace_ratio: f64,

    /// White-space ratio below which a document is flagged as overcrowded.
    pub crowded_whitespace_ratio: f64,

    /// Number of distinct font sizes tolerated before styles are flagged
    /// as inconsistent.
    pub max_distinct_font_sizes: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl InspectorConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            default_tolerance: 0.05,
            min_region_area: 1000.0,
            optimal_text_area: 10_000.0,
            optimal_text_side: 72.0,
            sparse_whitespace_ratio: 0.85,
            crowded_whitespace_ratio: 0.05,
            max_distinct_font_sizes: 5,
        }
    }

    /// Set the default comparison tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.default_tolerance = tolerance;
        self
    }

    /// Set the minimum retained free-region area.
    pub fn with_min_region_area(mut self, area: f64) -> Self {
        self.min_region_area = area;
        self
    }

    /// Set the thresholds for text-worthy free regions.
    pub fn with_optimal_text_region(mut self, area: f64, side: f64) -> Self {
        self.optimal_text_area = area;
        self.optimal_text_side = side;
        self
    }
}
