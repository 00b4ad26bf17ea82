//! Per-entry outcomes of a batch walk.
//!
//! Walks never stop at the first failing entry. Each entry gets a
//! [`StepOutcome`] and the caller folds the [`BatchReport`] into a verdict.

use std::path::{Path, PathBuf};

use crate::errors::TakeOverError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// Deliberately left alone (e.g. destination exists without --force).
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    steps: Vec<(PathBuf, StepOutcome)>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: impl Into<PathBuf>, outcome: StepOutcome) {
        self.steps.push((path.into(), outcome));
    }

    pub fn steps(&self) -> &[(PathBuf, StepOutcome)] {
        &self.steps
    }

    /// Paths whose step completed (or would complete, in a dry run).
    pub fn done(&self) -> impl Iterator<Item = &Path> {
        self.steps
            .iter()
            .filter(|(_, o)| *o == StepOutcome::Done)
            .map(|(p, _)| p.as_path())
    }

    pub fn done_count(&self) -> usize {
        self.done().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|(_, o)| matches!(o, StepOutcome::Skipped(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|(_, o)| matches!(o, StepOutcome::Failed(_)))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.steps.extend(other.steps);
    }

    /// Fold into a result: any failed step makes the whole batch an error.
    pub fn into_result(self, op: &'static str) -> Result<Self, TakeOverError> {
        match self.failed_count() {
            0 => Ok(self),
            failed => Err(TakeOverError::PartialFailure { op, failed }),
        }
    }
}
