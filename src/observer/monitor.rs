// Training observer
// Evaluates the classifier at checkpoints, keeps the history and the best snapshot

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::classifier::{Classifier, ClassifierError};
use crate::data::{PerSplit, SplitKind, Splits};
use crate::evaluation::{self, EvaluationError};

use super::history::{EvaluationRecord, History, HistoryError};
use super::journal::{Journal, JournalError};
use super::snapshot::{calculate_sha256, BestSnapshot, SavedSnapshot};

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Evaluation on the {split} split failed: {source}")]
    Evaluation {
        split: &'static str,
        #[source]
        source: EvaluationError,
    },

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("No classifier snapshot has been taken yet")]
    NoSnapshot,

    #[error("Cannot write snapshot to {}: {source}", .path.display())]
    NonWritablePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),
}

pub type ObserverResult<T> = Result<T, ObserverError>;

/// Watches a classifier while it is being trained.
///
/// The training driver owns and mutates the classifier; the observer only
/// runs it and keeps independent clones. Every `evaluate` call either
/// commits a record (and possibly a new best snapshot) or changes nothing.
pub struct Observer<C: Classifier> {
    splits: Splits,
    history: History,
    best: Option<BestSnapshot<C>>,
    journal: Option<Journal>,
}

impl<C: Classifier> Observer<C> {
    /// Create an observer with an empty history and no snapshot
    pub fn new(splits: Splits) -> Self {
        Observer {
            splits,
            history: History::new(),
            best: None,
            journal: None,
        }
    }

    /// Also append every evaluation to a journal file
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Evaluate `classifier` on every split at `step`.
    ///
    /// Returns whether the best snapshot was replaced. A non-finite devel
    /// error is recorded but never counts as an improvement.
    pub fn evaluate(&mut self, classifier: &C, step: u64) -> ObserverResult<bool> {
        self.history.check_next(step)?;

        let mse = self.splits.try_map(|kind, split| {
            evaluation::evaluate(classifier, split).map_err(|source| ObserverError::Evaluation {
                split: kind.name(),
                source,
            })
        })?;
        let record = EvaluationRecord::new(step, mse);
        let devel = record.devel();

        if !devel.is_finite() {
            log::warn!(
                "Step {} - devel MSE is not finite ({}), keeping snapshot from step {:?}",
                step,
                devel,
                self.best.as_ref().map(|b| b.step)
            );
        }

        let improved = devel.is_finite()
            && self.best.as_ref().map_or(true, |best| devel < best.devel_mse);
        let stalled = if improved { 0 } else { self.stalled(step) };

        if let Some(journal) = &self.journal {
            journal.append(&record, improved, stalled)?;
        }

        self.history.push(record)?;
        if improved {
            match &self.best {
                Some(best) => log::info!(
                    "Step {} - saving current classifier, devel MSE = {:.4e} < {:.4e}",
                    step,
                    devel,
                    best.devel_mse
                ),
                None => log::info!(
                    "Step {} - saving current classifier, devel MSE = {:.4e}",
                    step,
                    devel
                ),
            }
            self.best = Some(BestSnapshot {
                step,
                devel_mse: devel,
                classifier: classifier.clone(),
            });
        }

        Ok(improved)
    }

    /// Steps elapsed since the best snapshot was taken, or since the first
    /// record while no snapshot exists. Saturates at zero.
    pub fn stalled(&self, step: u64) -> u64 {
        let since = match (&self.best, self.history.records().first()) {
            (Some(best), _) => best.step,
            (None, Some(first)) => first.step,
            (None, None) => return 0,
        };
        step.saturating_sub(since)
    }

    /// Persist the best snapshot through the classifier's own `save`
    pub fn save_best(&self, path: &Path) -> ObserverResult<SavedSnapshot> {
        let best = self.best.as_ref().ok_or(ObserverError::NoSnapshot)?;

        best.classifier.save(path).map_err(|err| match err {
            ClassifierError::Io(source) => ObserverError::NonWritablePath {
                path: path.to_path_buf(),
                source,
            },
            other => ObserverError::Classifier(other),
        })?;

        let sha256 = calculate_sha256(&fs::read(path)?);
        log::info!(
            "Saved classifier from step {} to {} (sha256 {})",
            best.step,
            path.display(),
            sha256
        );

        Ok(SavedSnapshot {
            path: path.to_path_buf(),
            step: best.step,
            sha256,
        })
    }

    /// One-line progress summary of the latest record and the stall count
    pub fn statistics(&self, step: u64) -> String {
        match self.history.last() {
            Some(last) => format!(
                "Step {} - devel: {:.4e}; train: {:.4e}; test: {:.4e}; stalled: {}",
                last.step,
                last.mse.devel,
                last.mse.train,
                last.mse.test,
                self.stalled(step)
            ),
            None => format!("Step {} - no evaluations recorded", step),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn best(&self) -> Option<&BestSnapshot<C>> {
        self.best.as_ref()
    }

    pub fn splits(&self) -> &Splits {
        &self.splits
    }

    /// `(step, mse)` series per split
    pub fn mse_series(&self) -> PerSplit<Vec<(u64, f64)>> {
        self.history.all_series()
    }

    /// Devel error of the best snapshot, if any
    pub fn best_devel_mse(&self) -> Option<f64> {
        self.best.as_ref().map(|b| b.devel_mse)
    }

    /// Record for the step the best snapshot was taken at
    pub fn best_record(&self) -> Option<&EvaluationRecord> {
        self.best.as_ref().and_then(|b| self.history.get(b.step))
    }

    /// Error of the latest record on one split
    pub fn latest(&self, kind: SplitKind) -> Option<f64> {
        self.history.last().map(|r| *r.mse.get(kind))
    }
}
