//! Operation-shaped entry points.
//!
//! [`LayoutInspector`] bundles the extraction boundary, the configuration,
//! and a decision log behind the six operations the calling agent uses. Every
//! result is a plain serializable structure, and [`LayoutInspector::call`]
//! exposes the same operations by name with JSON arguments for hosts that
//! dispatch dynamically.

use serde::Deserialize;
use serde_json::Value;

use crate::classify::{classify, DocumentShape, DocumentType};
use crate::compare::{compare, CheckCategories, CompareOptions, ComparisonResult};
use crate::config::InspectorConfig;
use crate::decision::{DecisionCheckpoint, DecisionLog, DecisionStage};
use crate::error::{Error, Result};
use crate::issues::{detect_issues_with, DocumentIssue};
use crate::metrics::{LayoutMetrics, MetricsSource, PageSelector};
use crate::readiness::{check_readiness, EditOperation, ReadinessReport};
use crate::state::DocumentState;

/// The layout-intelligence service.
///
/// Owns a boxed [`MetricsSource`] (the only asynchronous collaborator in the
/// system, awaited by whoever implements it), an [`InspectorConfig`], and an
/// injectable [`DecisionLog`].
pub struct LayoutInspector {
    source: Box<dyn MetricsSource>,
    config: InspectorConfig,
    decisions: DecisionLog,
}

impl LayoutInspector {
    /// Create an inspector over an extraction boundary with default
    /// configuration and a fresh decision log.
    pub fn new(source: Box<dyn MetricsSource>) -> Self {
        Self {
            source,
            config: InspectorConfig::default(),
            decisions: DecisionLog::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: InspectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the decision log, e.g. to share one across inspectors.
    pub fn with_decision_log(mut self, log: DecisionLog) -> Self {
        self.decisions = log;
        self
    }

    /// Fetch fresh facts and build a full [`DocumentState`].
    ///
    /// Each call produces a new state; states are never updated in place.
    pub fn analyze_document_state(&self) -> Result<DocumentState> {
        let facts = self.source.fetch_document_facts()?;
        Ok(DocumentState::from_facts(facts, &self.config))
    }

    /// Re-run the issue rule set over an existing state.
    pub fn detect_document_issues(&self, state: &DocumentState) -> Vec<DocumentIssue> {
        detect_issues_with(state, &self.config)
    }

    /// Classify a document shape.
    pub fn classify_document_type(&self, shape: DocumentShape) -> DocumentType {
        classify(shape)
    }

    /// Capture the current snapshot and score it against `reference`.
    ///
    /// An extraction failure propagates verbatim; the comparison itself
    /// cannot fail.
    pub fn compare_to_reference(
        &self,
        reference: &LayoutMetrics,
        options: &CompareOptions,
    ) -> Result<ComparisonResult> {
        let current = self.source.fetch_layout_metrics(&PageSelector::All)?;
        Ok(compare(reference, &current, options))
    }

    /// Check whether `operation` is advisable against `state`.
    pub fn check_readiness(
        &self,
        operation: &EditOperation,
        state: &DocumentState,
    ) -> ReadinessReport {
        check_readiness(operation, state)
    }

    /// Record an agent decision; the stored checkpoint (with its assigned
    /// timestamp) is returned.
    pub fn record_decision(
        &self,
        stage: DecisionStage,
        decision: impl Into<String>,
        alternatives: Vec<String>,
        reasoning: impl Into<String>,
    ) -> DecisionCheckpoint {
        self.decisions.record(stage, decision, alternatives, reasoning)
    }

    /// The full decision log in insertion order.
    pub fn decision_log(&self) -> Vec<DecisionCheckpoint> {
        self.decisions.entries()
    }

    /// Dispatch an operation by name with JSON arguments.
    ///
    /// Operation names match the method names above (`get_decision_log` for
    /// the log read). Unknown names and malformed arguments are dispatch
    /// errors; everything downstream behaves exactly like the typed methods.
    pub fn call(&self, operation: &str, args: Value) -> Result<Value> {
        match operation {
            "analyze_document_state" => {
                let state = self.analyze_document_state()?;
                Ok(serde_json::to_value(state)?)
            }
            "detect_document_issues" => {
                let args: StateArgs = decode(operation, args)?;
                Ok(serde_json::to_value(
                    self.detect_document_issues(&args.state),
                )?)
            }
            "classify_document_type" => {
                let shape: DocumentShape = decode(operation, args)?;
                Ok(serde_json::to_value(self.classify_document_type(shape))?)
            }
            "compare_to_reference" => {
                let args: CompareArgs = decode(operation, args)?;
                let mut options = CompareOptions::default()
                    .with_tolerance(args.tolerance.unwrap_or(self.config.default_tolerance));
                if let Some(names) = &args.check_types {
                    options = options.with_categories(CheckCategories::from_names(names));
                }
                options.font_fallbacks = args.font_fallbacks.unwrap_or_default();
                Ok(serde_json::to_value(
                    self.compare_to_reference(&args.reference, &options)?,
                )?)
            }
            "check_readiness" => {
                let args: ReadinessArgs = decode(operation, args)?;
                let op = EditOperation::parse(&args.operation);
                Ok(serde_json::to_value(self.check_readiness(&op, &args.state))?)
            }
            "record_decision" => {
                let args: DecisionArgs = decode(operation, args)?;
                Ok(serde_json::to_value(self.record_decision(
                    args.stage,
                    args.decision,
                    args.alternatives.unwrap_or_default(),
                    args.reasoning.unwrap_or_default(),
                ))?)
            }
            "get_decision_log" => Ok(serde_json::to_value(self.decision_log())?),
            other => Err(Error::UnknownOperation(other.to_string())),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(operation: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| Error::InvalidArguments {
        operation: operation.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Deserialize)]
struct StateArgs {
    state: DocumentState,
}

#[derive(Deserialize)]
struct CompareArgs {
    reference: LayoutMetrics,
    tolerance: Option<f64>,
    check_types: Option<Vec<String>>,
    font_fallbacks: Option<std::collections::HashMap<String, Vec<String>>>,
}

#[derive(Deserialize)]
struct ReadinessArgs {
    operation: String,
    state: DocumentState,
}

#[derive(Deserialize)]
struct DecisionArgs {
    stage: DecisionStage,
    decision: String,
    alternatives: Option<Vec<String>>,
    reasoning: Option<String>,
}
