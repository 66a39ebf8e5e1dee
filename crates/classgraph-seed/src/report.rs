//! Seed run reports.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Result, SeedError};
use crate::plan::StepKind;

/// How a single step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded { rows: usize },
    Failed { reason: String },
    /// Not run because an earlier step failed in strict mode.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub name: String,
    pub kind: StepKind,
    pub outcome: StepOutcome,
    pub duration_ms: u64,
}

/// Everything that happened during one seed run.
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub run_id: Uuid,
    pub database: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepReport>,
}

impl SeedReport {
    pub fn new(database: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            database: database.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::new(),
        }
    }

    pub fn record(&mut self, step: StepReport) {
        self.steps.push(step);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Succeeded { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }

    /// Turn the first failed step into an error.
    pub fn ensure_success(&self) -> Result<()> {
        match self.steps.iter().find_map(|s| match &s.outcome {
            StepOutcome::Failed { reason } => Some((s, reason)),
            _ => None,
        }) {
            Some((step, reason)) => Err(SeedError::StepFailed {
                step: step.name.clone(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn count(&self, pred: impl Fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(&s.outcome)).count()
    }
}
