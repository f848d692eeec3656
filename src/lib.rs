//! # Layout Oxide
//!
//! Layout intelligence for page-layout documents: state analysis, issue
//! detection, document classification, and tolerance-aware comparison of an
//! observed layout against a reference layout.
//!
//! The crate sits in front of a document-editing automation surface. It does
//! not touch the live document itself: raw facts (pages, frame bounds, styles,
//! text) arrive through the [`metrics::MetricsSource`] boundary, and every
//! operation here is a pure computation over those already-materialized
//! records.
//!
//! ## Core Components
//!
//! - **Metric model** ([`metrics`]): passive snapshot of a layout (frames,
//!   margins, columns, styles, per-segment visual attributes).
//! - **Spatial analyzer** ([`spatial`]): frame distribution per page, text
//!   density, overlap detection, threading graph, free-space estimation.
//! - **Issue detector** ([`issues`]): fixed rule set producing typed,
//!   severity-ranked issues.
//! - **Document classifier** ([`classify`]): decision-list heuristic mapping
//!   page/frame counts and threading to a coarse document type.
//! - **Readiness gate** ([`readiness`]): advisory pre-flight check for editing
//!   operations against current document health.
//! - **Comparison engine** ([`compare`]): scored, tolerance-aware deviation
//!   report between a reference snapshot and the current snapshot.
//! - **Decision log** ([`decision`]): append-only audit trail of agent
//!   decisions, injectable rather than process-global.
//!
//! ## Quick Start
//!
//! ```
//! use layout_oxide::classify::{classify, DocumentShape, DocumentType};
//! use layout_oxide::compare::{compare, CompareOptions};
//! use layout_oxide::metrics::{Frame, LayoutMetrics, Margins};
//!
//! let snapshot = LayoutMetrics {
//!     frames: vec![Frame::new(36.0, 36.0, 540.0, 720.0)],
//!     margins: Margins::uniform(36.0),
//!     columns: 1,
//!     styles: None,
//!     text_regions: None,
//! };
//!
//! // A snapshot compared against itself always matches at score 100.
//! let result = compare(&snapshot, &snapshot, &CompareOptions::default());
//! assert!(result.matches);
//! assert_eq!(result.score, 100);
//!
//! let doc_type = classify(DocumentShape::new(1, 1, false));
//! assert_eq!(doc_type, DocumentType::Brochure);
//! ```
//!
//! ## Design Notes
//!
//! All analysis functions are total: malformed-but-well-typed input degrades
//! to defined output (an empty issue list, an `Unknown` classification, a
//! recorded deviation) rather than an error. The only genuine error path is
//! the external extraction boundary, surfaced as [`Error::Extraction`].
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Geometric primitives
pub mod geometry;

// Configuration
pub mod config;

// Metric model and the external extraction boundary
pub mod metrics;

// Analysis components
pub mod classify;
pub mod compare;
pub mod issues;
pub mod readiness;
pub mod spatial;
pub mod state;

// Agent audit trail
pub mod decision;

// Operation-shaped entry points
pub mod api;

// Re-export main types
pub use api::LayoutInspector;
pub use classify::{classify, DocumentShape, DocumentType};
pub use compare::{compare, CheckCategories, CompareOptions, ComparisonResult, Deviation};
pub use config::InspectorConfig;
pub use decision::{DecisionCheckpoint, DecisionLog, DecisionStage};
pub use error::{Error, Result};
pub use geometry::Bounds;
pub use issues::{detect_issues, DocumentIssue, IssueSeverity, IssueType};
pub use metrics::{Frame, LayoutMetrics, Margins, MetricsSource, PageSelector};
pub use readiness::{check_readiness, EditOperation, ReadinessReport};
pub use spatial::{analyze_spatial, SpatialAnalysis};
pub use state::{DocumentFacts, DocumentState, PageInfo, TextFrameInfo};
