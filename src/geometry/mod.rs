//! Geometric primitives for layout analysis.
//!
//! This module provides the edge-based rectangle type used for frame bounds
//! and the operations the spatial analyzer needs: overlap testing,
//! intersection, and rectangle subtraction for free-space estimation.

use serde::{Deserialize, Serialize};

/// A rectangle described by its four edges in page-local coordinates.
///
/// Bounds arrive from the extraction boundary in `(top, left, bottom, right)`
/// order, matching the source snapshot's convention. Snapshots are not
/// consistent about whether y grows up or down the page, so every operation
/// here normalizes the vertical interval with [`Bounds::min_y`]/[`Bounds::max_y`]
/// before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top edge y-coordinate
    pub top: f64,
    /// Left edge x-coordinate
    pub left: f64,
    /// Bottom edge y-coordinate
    pub bottom: f64,
    /// Right edge x-coordinate
    pub right: f64,
}

impl Bounds {
    /// Create bounds from the four edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::Bounds;
    ///
    /// let b = Bounds::new(0.0, 36.0, 720.0, 576.0);
    /// assert_eq!(b.width(), 540.0);
    /// assert_eq!(b.height(), 720.0);
    /// ```
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Smaller of the two x edges.
    pub fn min_x(&self) -> f64 {
        self.left.min(self.right)
    }

    /// Larger of the two x edges.
    pub fn max_x(&self) -> f64 {
        self.left.max(self.right)
    }

    /// Smaller of the two y edges.
    pub fn min_y(&self) -> f64 {
        self.top.min(self.bottom)
    }

    /// Larger of the two y edges.
    pub fn max_y(&self) -> f64 {
        self.top.max(self.bottom)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// Area in square units.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Test whether two bounds overlap.
    ///
    /// Separation requires a strict gap on some axis, so rectangles that
    /// merely share an edge count as overlapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_oxide::geometry::Bounds;
    ///
    /// let a = Bounds::new(100.0, 0.0, 0.0, 50.0);
    /// let b = Bounds::new(100.0, 40.0, 0.0, 90.0);
    /// assert!(a.intersects(&b));
    ///
    /// let c = Bounds::new(100.0, 60.0, 0.0, 90.0);
    /// assert!(!a.intersects(&c));
    /// ```
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.max_x() < other.min_x()
            || other.max_x() < self.min_x()
            || self.max_y() < other.min_y()
            || other.max_y() < self.min_y())
    }

    /// Intersection of two bounds, normalized so `top <= bottom` and
    /// `left <= right`. Returns `None` when the bounds do not overlap.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }
        Some(Bounds {
            top: self.min_y().max(other.min_y()),
            left: self.min_x().max(other.min_x()),
            bottom: self.max_y().min(other.max_y()),
            right: self.max_x().min(other.max_x()),
        })
    }

    /// Subtract `hole` from `self`, returning the remainder as up to four
    /// normalized rectangles (above, below, left, right of the hole).
    ///
    /// If the two do not overlap, `self` is returned unchanged as the single
    /// remainder. Degenerate slivers (zero width or height) are dropped.
    pub fn subtract(&self, hole: &Bounds) -> Vec<Bounds> {
        let clipped = match self.intersection(hole) {
            Some(c) => c,
            None => return vec![*self],
        };

        let mut out = Vec::with_capacity(4);

        // Band above the hole (smaller y side)
        if clipped.min_y() > self.min_y() {
            out.push(Bounds::new(
                self.min_y(),
                self.min_x(),
                clipped.min_y(),
                self.max_x(),
            ));
        }
        // Band below the hole
        if self.max_y() > clipped.max_y() {
            out.push(Bounds::new(
                clipped.max_y(),
                self.min_x(),
                self.max_y(),
                self.max_x(),
            ));
        }
        // Left of the hole, limited to the hole's vertical band
        if clipped.min_x() > self.min_x() {
            out.push(Bounds::new(
                clipped.min_y(),
                self.min_x(),
                clipped.max_y(),
                clipped.min_x(),
            ));
        }
        // Right of the hole
        if self.max_x() > clipped.max_x() {
            out.push(Bounds::new(
                clipped.min_y(),
                clipped.max_x(),
                clipped.max_y(),
                self.max_x(),
            ));
        }

        out.retain(|b| b.width() > 0.0 && b.height() > 0.0);
        out
    }
}
