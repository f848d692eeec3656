//! Append-only audit trail of agent decisions.
//!
//! The log is an explicitly owned store rather than process-global state:
//! tests instantiate independent logs, and callers decide whether concurrent
//! agents share one instance or get isolated ones. Appends are serialized
//! through a mutex so insertion order and timestamps stay monotone. Nothing
//! ever mutates or removes an entry; the log lives as long as its owner.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The workflow stage a decision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStage {
    /// Frame and page geometry
    Layout,
    /// Fonts, styles, formatting
    Styling,
    /// Frame linking
    Threading,
    /// Final review
    Final,
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionCheckpoint {
    /// Stage the decision was made in
    pub stage: DecisionStage,
    /// What was decided
    pub decision: String,
    /// Alternatives that were considered
    pub alternatives: Vec<String>,
    /// Why the decision was made
    pub reasoning: String,
    /// Assigned at record time, non-decreasing in insertion order
    pub timestamp: DateTime<Utc>,
}

/// Append-only, insertion-ordered decision store.
#[derive(Debug, Default)]
pub struct DecisionLog {
    entries: Mutex<Vec<DecisionCheckpoint>>,
}

impl DecisionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decision and return the stored checkpoint, timestamp
    /// assigned here.
    pub fn record(
        &self,
        stage: DecisionStage,
        decision: impl Into<String>,
        alternatives: Vec<String>,
        reasoning: impl Into<String>,
    ) -> DecisionCheckpoint {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        // The timestamp is assigned inside the critical section: a clock
        // read taken before the lock could land out of order once a later
        // reader wins the lock race.
        let checkpoint = DecisionCheckpoint {
            stage,
            decision: decision.into(),
            alternatives,
            reasoning: reasoning.into(),
            timestamp: Utc::now(),
        };
        entries.push(checkpoint.clone());
        checkpoint
    }

    /// The full log in insertion order.
    pub fn entries(&self) -> Vec<DecisionCheckpoint> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded decisions.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
